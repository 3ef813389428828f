/// Pure game-logic functions.
///
/// `tick` takes an immutable reference to the current `GameState` plus the
/// frame's `InputSnapshot` and an RNG handle, and returns a brand-new
/// `GameState` together with the events the frame produced.  The building
/// blocks below mutate a single entity or the state in place and are public
/// so each rule can be exercised on its own.

use std::sync::Arc;

use rand::Rng;
use tracing::{debug, info};

use crate::config::GameConfig;
use crate::entities::{
    Enemy, EnemyColor, GameEvent, GameState, GameStatus, LevelState, Player,
};
use crate::input::InputSnapshot;
use crate::mask::collides;
use crate::sprites::SpriteSet;

// ── Rules ─────────────────────────────────────────────────────────────────────

/// Rows kept free for the HUD below the player's lowest position.
pub const HUD_CLEARANCE: f32 = 60.0;
/// Frames between two shots.
pub const FIRE_COOLDOWN_FRAMES: u32 = 20;
pub const SCORE_PER_KILL: u32 = 100;
/// Fired bullets are kept while their top edge is below this line.
pub const BULLET_TOP_MARGIN: f32 = -40.0;
/// Fired bullets appear this far below the ship's top edge.
pub const MUZZLE_OFFSET: f32 = 10.0;
/// Distance from the bottom of the playfield to the player's spawn row.
pub const PLAYER_BOTTOM_OFFSET: f32 = 80.0;
pub const PLAYER_SPEED: f32 = 6.0;
pub const PLAYER_HEALTH: i32 = 100;
pub const WAVE_SIZE: usize = 6;
pub const MAX_WAVE_SIZE: usize = 12;
pub const ENEMY_SPEED_GROWTH: f32 = 1.15;
pub const ENEMY_EDGE_PADDING: i32 = 20;
/// Enemies enter from this vertical band above the screen.
pub const ENEMY_ENTRY_BAND: std::ops::Range<i32> = -1000..-100;
pub const GAME_OVER_SECONDS: u32 = 3;

const MAX_PLAYER_X_SPEED: f32 = 10.0;
const MAX_PLAYER_Y_SPEED: f32 = 8.0;
const PLAYER_SPEED_STEP: f32 = 1.25;
const MIN_CREATION_COOLDOWN: u32 = 25;

// ── Constructors ──────────────────────────────────────────────────────────────

/// Build the opening state of a session.
pub fn init_state(
    config: &GameConfig,
    player_name: Option<String>,
    previous_best: u32,
    sprites: Arc<SpriteSet>,
    rng: &mut impl Rng,
) -> GameState {
    let (x, y) = player_spawn(config.width, config.height, sprites.player.width);
    let mut player = Player::new(x, y, PLAYER_SPEED, PLAYER_SPEED, PLAYER_HEALTH, &sprites);
    player.refill_bullets();

    let level = LevelState {
        number: 1,
        kills: 0,
        target_kills: config.initial_target_kills,
        enemy_speed: config.enemy_speed,
        max_enemies_on_screen: config.max_enemies_on_screen,
        spawn_cooldown: config.spawn_cooldown,
        spawn_counter: 0,
    };
    let enemies = create_enemies(WAVE_SIZE, level.wave_speed(), config.width, &sprites, rng);

    GameState {
        player,
        enemies,
        lives: config.lives,
        score: 0,
        level,
        status: GameStatus::Playing,
        frame: 0,
        width: config.width,
        height: config.height,
        fps: config.fps,
        player_name,
        previous_best,
        high_score_cue_played: false,
        sprites,
    }
}

fn player_spawn(width: u32, height: u32, ship_width: u32) -> (f32, f32) {
    (
        (width / 2) as f32 - (ship_width / 2) as f32,
        height as f32 - PLAYER_BOTTOM_OFFSET,
    )
}

/// `count` enemies scattered above the screen so they enter staggered.
pub fn create_enemies(
    count: usize,
    speed: f32,
    width: u32,
    sprites: &SpriteSet,
    rng: &mut impl Rng,
) -> Vec<Enemy> {
    let ship_w = sprites.enemy(EnemyColor::Blue).ship.width as i32;
    let x_max = (width as i32 - ship_w - ENEMY_EDGE_PADDING).max(ENEMY_EDGE_PADDING + 1);
    (0..count)
        .map(|_| {
            let x = rng.gen_range(ENEMY_EDGE_PADDING..x_max);
            let y = rng.gen_range(ENEMY_ENTRY_BAND);
            let color = EnemyColor::random(rng);
            Enemy::new(x as f32, y as f32, color, speed, sprites)
        })
        .collect()
}

// ── Player ────────────────────────────────────────────────────────────────────

/// Move by at most one step per axis.  Up wins over down and right over
/// left; a blocked direction lets the opposite one through.
pub fn player_move(player: &mut Player, input: &InputSnapshot, width: u32, height: u32) {
    let ship = &player.ship;
    let max_x = width as f32 - ship.width() as f32;
    let max_y = height as f32 - ship.height() as f32 - HUD_CLEARANCE;
    let (mut x, mut y) = (ship.x, ship.y);

    if input.up && y > 0.0 {
        y = (y - player.y_speed).max(0.0);
    } else if input.down && y < max_y {
        y = (y + player.y_speed).min(max_y);
    }
    if input.right && x < max_x {
        x = (x + player.x_speed).min(max_x);
    } else if input.left && x > 0.0 {
        x = (x - player.x_speed).max(0.0);
    }

    player.ship.set_position(x, y);
}

/// Chamber one bullet when the pool has room and creation is off cooldown.
pub fn player_create_bullets(player: &mut Player) {
    if player.bullets.len() < player.max_amount_bullets && player.creation_cooldown_counter == 0 {
        let bullet = player.new_bullet();
        player.bullets.push(bullet);
        player.creation_cooldown_counter = 1;
    }
}

/// Advance both cooldown counters by one frame.
pub fn player_cooldown(player: &mut Player) {
    if player.bullet_cooldown_counter >= FIRE_COOLDOWN_FRAMES {
        player.bullet_cooldown_counter = 0;
    } else if player.bullet_cooldown_counter > 0 {
        player.bullet_cooldown_counter += 1;
    }

    if player.creation_cooldown_counter >= player.cool_down {
        player.creation_cooldown_counter = 0;
    } else if player.creation_cooldown_counter > 0 {
        player.creation_cooldown_counter += 1;
    }
}

/// Fire the most recently chambered bullet.  Returns whether a shot left.
pub fn player_fire(player: &mut Player, input: &InputSnapshot) -> bool {
    if !input.fire || player.bullet_cooldown_counter != 0 {
        return false;
    }
    let Some(mut bullet) = player.bullets.pop() else {
        return false;
    };
    let ship = &player.ship;
    let x = ship.x + (ship.width() as f32 - bullet.sprite.width as f32) / 2.0;
    bullet.set_position(x, ship.y + MUZZLE_OFFSET);
    player.fired_bullets.push(bullet);
    player.bullet_cooldown_counter = 1;
    player.creation_cooldown_counter = 1;
    true
}

/// Move every bullet in flight and forget those past the top edge.
pub fn player_update_bullets(player: &mut Player) {
    let dy = player.bullet_speed;
    for bullet in &mut player.fired_bullets {
        bullet.move_by(Some(dy));
    }
    player.fired_bullets.retain(|b| b.y > BULLET_TOP_MARGIN);
}

/// Difficulty knob: faster ship, then a shorter creation cooldown once the
/// ship is at top speed.  Not part of the default frame; callers opt in.
pub fn player_increase_speed(player: &mut Player) {
    if player.x_speed < MAX_PLAYER_X_SPEED {
        player.x_speed += PLAYER_SPEED_STEP;
        player.y_speed += PLAYER_SPEED_STEP;
    } else {
        player.x_speed = MAX_PLAYER_X_SPEED;
        player.y_speed = MAX_PLAYER_Y_SPEED;
        if player.cool_down > MIN_CREATION_COOLDOWN {
            player.cool_down = (player.cool_down as f32 * 0.9) as u32;
        }
    }
}

// ── Enemies ───────────────────────────────────────────────────────────────────

/// Straight descent at the enemy's own speed.
pub fn enemy_update(enemy: &mut Enemy) {
    let speed = enemy.ship.speed;
    enemy.ship.move_by(0.0, speed);
}

/// Add one enemy when the level still needs kills, the screen has room and
/// the spawn cooldown has run out.
pub fn spawn_enemies(state: &mut GameState, rng: &mut impl Rng) {
    let level = &mut state.level;
    if level.target_reached() {
        return;
    }
    if state.enemies.len() >= level.max_enemies_on_screen {
        return;
    }
    if level.spawn_counter > 0 {
        level.spawn_counter -= 1;
        return;
    }
    let mut spawned = create_enemies(1, level.wave_speed(), state.width, &state.sprites, rng);
    state.enemies.append(&mut spawned);
    level.spawn_counter = level.spawn_cooldown;
}

/// Drop every enemy whose bottom edge reached the playfield floor.
/// Returns whether any did.
pub fn enemies_reached_bottom(state: &mut GameState) -> bool {
    let floor = state.height as i32;
    let before = state.enemies.len();
    state.enemies.retain(|e| e.ship.rect.bottom() < floor);
    state.enemies.len() != before
}

pub fn player_hit_by_enemy(state: &GameState) -> bool {
    state.enemies.iter().any(|e| collides(&state.player, e))
}

// ── Combat ────────────────────────────────────────────────────────────────────

/// Bullet-vs-enemy pass.  Each enemy consumes at most one bullet; meeting
/// the kill target clears the whole wave.
pub fn resolve_collisions(state: &mut GameState, events: &mut Vec<GameEvent>) {
    if state.player.fired_bullets.is_empty() || state.enemies.is_empty() {
        return;
    }

    let enemies = std::mem::take(&mut state.enemies);
    let mut remaining = Vec::with_capacity(enemies.len());
    let mut target_reached = false;

    for enemy in enemies {
        if target_reached {
            break;
        }
        let hit = state
            .player
            .fired_bullets
            .iter()
            .position(|b| b.collision(&enemy));
        let Some(index) = hit else {
            remaining.push(enemy);
            continue;
        };

        state.player.fired_bullets.remove(index);
        state.score += SCORE_PER_KILL;
        if !state.high_score_cue_played
            && state.player_name.is_some()
            && state.score > state.previous_best
        {
            state.high_score_cue_played = true;
            events.push(GameEvent::HighScoreBeaten { score: state.score });
        }
        let level = &mut state.level;
        if level.kills < level.target_kills {
            level.kills += 1;
        }
        if level.target_reached() {
            target_reached = true;
        }
    }

    state.enemies = if target_reached { Vec::new() } else { remaining };
}

// ── Level controller ──────────────────────────────────────────────────────────

/// Fresh wave at the current speed; score and lives are kept.
pub fn restart_level(state: &mut GameState, rng: &mut impl Rng) {
    state.level.kills = 0;
    state.level.spawn_counter = 0;
    state.enemies = create_enemies(
        WAVE_SIZE,
        state.level.wave_speed(),
        state.width,
        &state.sprites,
        rng,
    );

    let player = &mut state.player;
    let (x, y) = player_spawn(state.width, state.height, player.ship.width());
    player.ship.set_position(x, y);
    player.bullets.clear();
    player.fired_bullets.clear();
    player.creation_cooldown_counter = 0;
    player.bullet_cooldown_counter = 0;
}

/// Next kill target: +4 at least, +25% once that is larger.
pub fn next_target_kills(target: u32) -> u32 {
    (target + 4).max((target as f32 * 1.25).round() as u32)
}

pub fn advance_level(state: &mut GameState, rng: &mut impl Rng) {
    let level = &mut state.level;
    level.number += 1;
    level.enemy_speed *= ENEMY_SPEED_GROWTH;
    level.target_kills = next_target_kills(level.target_kills);
    level.kills = 0;

    state.player.max_amount_bullets += 1;
    state.player.refill_bullets();

    let count = (WAVE_SIZE + state.level.number as usize).min(MAX_WAVE_SIZE);
    state.enemies = create_enemies(
        count,
        state.level.wave_speed(),
        state.width,
        &state.sprites,
        rng,
    );
    info!(
        level = state.level.number,
        target = state.level.target_kills,
        speed = state.level.enemy_speed,
        "level started"
    );
}

fn lose_life(state: &mut GameState, rng: &mut impl Rng, events: &mut Vec<GameEvent>) {
    state.lives = state.lives.saturating_sub(1);
    events.push(GameEvent::LifeLost {
        lives_left: state.lives,
    });
    info!(lives = state.lives, "life lost");
    if state.lives > 0 {
        restart_level(state, rng);
    }
}

// ── Per-frame tick (RNG is injected) ──────────────────────────────────────────

/// Advance the simulation by one frame.
pub fn tick(
    state: &GameState,
    input: &InputSnapshot,
    rng: &mut impl Rng,
) -> (GameState, Vec<GameEvent>) {
    let mut next = state.clone();
    let mut events = Vec::new();
    next.frame += 1;

    match next.status {
        GameStatus::Playing => play_frame(&mut next, input, rng, &mut events),
        GameStatus::LevelComplete { frames_left } if frames_left > 1 => {
            next.status = GameStatus::LevelComplete {
                frames_left: frames_left - 1,
            };
        }
        GameStatus::LevelComplete { .. } => {
            advance_level(&mut next, rng);
            next.status = GameStatus::Playing;
            events.push(GameEvent::LevelStarted {
                level: next.level.number,
            });
        }
        GameStatus::GameOver { frames_left } if frames_left > 1 => {
            next.status = GameStatus::GameOver {
                frames_left: frames_left - 1,
            };
        }
        GameStatus::GameOver { .. } => next.status = GameStatus::Finished,
        GameStatus::Finished => {}
    }

    (next, events)
}

fn play_frame(
    state: &mut GameState,
    input: &InputSnapshot,
    rng: &mut impl Rng,
    events: &mut Vec<GameEvent>,
) {
    // ── 1. Player: move, chamber, cool down, fire, advance shots ─────────────
    let (width, height) = (state.width, state.height);
    let player = &mut state.player;
    player_move(player, input, width, height);
    player_create_bullets(player);
    player_cooldown(player);
    if player_fire(player, input) {
        debug!(ready = player.bullets.len(), "shot fired");
    }
    player_update_bullets(player);

    // ── 2. Enemies descend ───────────────────────────────────────────────────
    for enemy in &mut state.enemies {
        enemy_update(enemy);
    }

    // ── 3. Life loss: floor reached, or rammed ───────────────────────────────
    if enemies_reached_bottom(state) {
        lose_life(state, rng, events);
    }
    if state.lives > 0 && player_hit_by_enemy(state) {
        lose_life(state, rng, events);
    }

    // ── 4. Shots vs enemies, then top up the wave ────────────────────────────
    resolve_collisions(state, events);
    spawn_enemies(state, rng);

    // ── 5. Status transitions ────────────────────────────────────────────────
    if state.lives == 0 {
        state.status = GameStatus::GameOver {
            frames_left: (state.fps * GAME_OVER_SECONDS).max(1),
        };
        events.push(GameEvent::GameOver { score: state.score });
        info!(score = state.score, level = state.level.number, "game over");
    } else if state.level.target_reached() {
        state.status = GameStatus::LevelComplete {
            frames_left: state.fps.max(1),
        };
        events.push(GameEvent::LevelComplete {
            level: state.level.number,
        });
        info!(level = state.level.number, score = state.score, "level complete");
    }
}
