use std::sync::Arc;

use wave_shooter::entities::*;
use wave_shooter::mask::Collidable;
use wave_shooter::sprites::SpriteSet;

use rand::rngs::StdRng;
use rand::SeedableRng;

fn sprites() -> SpriteSet {
    SpriteSet::placeholders()
}

#[test]
fn enemy_color_lookup_is_lenient() {
    assert_eq!(EnemyColor::from_name(Some("green")), EnemyColor::Green);
    assert_eq!(EnemyColor::from_name(Some("PURPLE")), EnemyColor::Purple);
    assert_eq!(EnemyColor::from_name(Some(" Blue ")), EnemyColor::Blue);
    // Unknown and missing names fall back to blue
    assert_eq!(EnemyColor::from_name(Some("red")), EnemyColor::Blue);
    assert_eq!(EnemyColor::from_name(None), EnemyColor::Blue);
}

#[test]
fn enemy_color_random_covers_all() {
    let mut rng = StdRng::seed_from_u64(42);
    let mut seen = std::collections::HashSet::new();
    for _ in 0..200 {
        seen.insert(EnemyColor::random(&mut rng));
    }
    assert_eq!(seen.len(), EnemyColor::ALL.len());
}

#[test]
fn enemy_takes_skin_of_its_color() {
    let set = sprites();
    let e = Enemy::new(10.0, 20.0, EnemyColor::Purple, 2.0, &set);
    assert!(Arc::ptr_eq(&e.ship.sprite, &set.enemy(EnemyColor::Purple).ship));
    assert!(Arc::ptr_eq(&e.shot, &set.enemy(EnemyColor::Purple).shot));
    assert_eq!(e.ship.speed, 2.0);
}

// ── Ship ──────────────────────────────────────────────────────────────────────

#[test]
fn ship_rect_follows_position() {
    let set = sprites();
    let mut ship = Ship::new(10.5, 20.25, 100, 6.0, Arc::clone(&set.player));
    assert_eq!((ship.rect.x, ship.rect.y), (10, 20));
    assert_eq!((ship.rect.width, ship.rect.height), (40, 24));

    ship.move_by(5.0, -3.0);
    assert_eq!((ship.x, ship.y), (15.5, 17.25));
    assert_eq!((ship.rect.x, ship.rect.y), (15, 17));

    ship.set_position(100.0, 200.0);
    assert_eq!(ship.rect, ship.rect());
    assert_eq!((ship.rect.x, ship.rect.y), (100, 200));
}

#[test]
fn ship_clamp_keeps_whole_box_inside() {
    let set = sprites();
    let mut ship = Ship::new(-5.0, 900.0, 100, 6.0, Arc::clone(&set.player));
    ship.clamp_to(800, 600);
    assert_eq!((ship.x, ship.y), (0.0, 576.0));

    ship.set_position(790.0, -1.0);
    ship.clamp_to(800, 600);
    assert_eq!((ship.x, ship.y), (760.0, 0.0));
    assert_eq!((ship.rect.x, ship.rect.y), (760, 0));
}

// ── Bullet ────────────────────────────────────────────────────────────────────

#[test]
fn bullet_moves_by_own_speed_or_override() {
    let set = sprites();
    let mut b = Bullet::new(50.0, 100.0, Arc::clone(&set.player_bullet), -10.0);
    b.move_by(None);
    assert_eq!(b.y, 90.0);
    b.move_by(Some(4.0));
    assert_eq!(b.y, 94.0);
    assert_eq!(b.rect.y, 94);
    assert_eq!(b.x, 50.0);
}

#[test]
fn bullet_collision_against_ships() {
    let set = sprites();
    let b = Bullet::new(50.0, 100.0, Arc::clone(&set.player_bullet), -10.0);
    let near = Enemy::new(45.0, 95.0, EnemyColor::Blue, 1.0, &set);
    let far = Enemy::new(300.0, 95.0, EnemyColor::Blue, 1.0, &set);
    assert!(b.collision(&near));
    assert!(!b.collision(&far));
}

// ── Player ────────────────────────────────────────────────────────────────────

#[test]
fn player_defaults() {
    let p = Player::new(380.0, 520.0, 6.0, 6.0, 100, &sprites());
    assert_eq!(p.bullet_speed, -10.0);
    assert_eq!(p.max_amount_bullets, 3);
    assert_eq!(p.cool_down, 120);
    assert!(p.bullets.is_empty());
    assert_eq!(p.ship.health, 100);
}

#[test]
fn refill_fills_pool_and_drops_shots() {
    let set = sprites();
    let mut p = Player::new(380.0, 520.0, 6.0, 6.0, 100, &set);
    p.fired_bullets
        .push(Bullet::new(0.0, 0.0, Arc::clone(&set.player_bullet), -10.0));
    p.max_amount_bullets = 5;
    p.refill_bullets();
    assert_eq!(p.bullets.len(), 5);
    assert!(p.fired_bullets.is_empty());
    assert!(p.bullets.iter().all(|b| b.speed == -10.0));
}

// ── Level & state ─────────────────────────────────────────────────────────────

#[test]
fn wave_speed_is_rounded_and_at_least_one() {
    let mut level = LevelState {
        number: 1,
        kills: 0,
        target_kills: 12,
        enemy_speed: 0.4,
        max_enemies_on_screen: 6,
        spawn_cooldown: 30,
        spawn_counter: 0,
    };
    assert_eq!(level.wave_speed(), 1.0);
    level.enemy_speed = 1.52;
    assert_eq!(level.wave_speed(), 2.0);
    level.enemy_speed = 2.3;
    assert_eq!(level.wave_speed(), 2.0);

    assert!(!level.target_reached());
    level.kills = 12;
    assert!(level.target_reached());
}

#[test]
fn game_state_clone_is_independent() {
    use wave_shooter::compute::init_state;
    use wave_shooter::config::GameConfig;

    let original = init_state(
        &GameConfig::default(),
        Some("ada".to_string()),
        0,
        Arc::new(sprites()),
        &mut StdRng::seed_from_u64(42),
    );
    let mut copy = original.clone();
    copy.score = 999;
    copy.enemies.clear();
    copy.player.ship.move_by(10.0, 0.0);
    copy.player_name = None;

    assert_eq!(original.score, 0);
    assert_eq!(original.enemies.len(), 6);
    assert_eq!(original.player.ship.x, 380.0);
    assert_eq!(original.player_name.as_deref(), Some("ada"));
    // Sprites are shared, not copied
    assert!(Arc::ptr_eq(&original.sprites, &copy.sprites));
}

#[test]
fn status_and_event_equality() {
    assert_eq!(
        GameStatus::LevelComplete { frames_left: 3 },
        GameStatus::LevelComplete { frames_left: 3 }
    );
    assert_ne!(
        GameStatus::GameOver { frames_left: 3 },
        GameStatus::GameOver { frames_left: 2 }
    );
    assert_ne!(
        GameEvent::LifeLost { lives_left: 1 },
        GameEvent::GameOver { score: 1 }
    );
}
