/// All game entity types.  Data plus the few geometric helpers every
/// moving sprite shares; game rules live in `compute`.

use std::sync::Arc;

use rand::Rng;

use crate::mask::{collides, Collidable, PixelMask, Rect};
use crate::sprites::{Sprite, SpriteSet};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum EnemyColor {
    Blue,
    Green,
    Purple,
}

impl EnemyColor {
    pub const ALL: [EnemyColor; 3] = [EnemyColor::Blue, EnemyColor::Green, EnemyColor::Purple];

    pub fn name(self) -> &'static str {
        match self {
            EnemyColor::Blue => "blue",
            EnemyColor::Green => "green",
            EnemyColor::Purple => "purple",
        }
    }

    /// Case-insensitive lookup; unknown or missing names map to `Blue`.
    pub fn from_name(name: Option<&str>) -> Self {
        let Some(name) = name else {
            return EnemyColor::Blue;
        };
        Self::ALL
            .into_iter()
            .find(|c| c.name().eq_ignore_ascii_case(name.trim()))
            .unwrap_or(EnemyColor::Blue)
    }

    pub fn random(rng: &mut impl Rng) -> Self {
        Self::ALL[rng.gen_range(0..Self::ALL.len())]
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum GameStatus {
    Playing,
    /// Level objective met; gameplay frozen until the countdown ends.
    LevelComplete { frames_left: u32 },
    /// Out of lives; the message stays up until the countdown ends.
    GameOver { frames_left: u32 },
    Finished,
}

/// Things the surrounding application reacts to (audio, persistence, logs).
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum GameEvent {
    HighScoreBeaten { score: u32 },
    LifeLost { lives_left: u32 },
    LevelComplete { level: u32 },
    LevelStarted { level: u32 },
    GameOver { score: u32 },
}

// ── Shared moving sprite ──────────────────────────────────────────────────────

#[derive(Clone, Debug)]
pub struct Ship {
    pub x: f32,
    pub y: f32,
    pub rect: Rect,
    pub health: i32,
    pub speed: f32,
    pub sprite: Arc<Sprite>,
}

impl Ship {
    pub fn new(x: f32, y: f32, health: i32, speed: f32, sprite: Arc<Sprite>) -> Self {
        let rect = Rect::new(x as i32, y as i32, sprite.width, sprite.height);
        Self {
            x,
            y,
            rect,
            health,
            speed,
            sprite,
        }
    }

    pub fn width(&self) -> u32 {
        self.sprite.width
    }

    pub fn height(&self) -> u32 {
        self.sprite.height
    }

    pub fn move_by(&mut self, dx: f32, dy: f32) {
        self.x += dx;
        self.y += dy;
        self.sync_rect();
    }

    pub fn set_position(&mut self, x: f32, y: f32) {
        self.x = x;
        self.y = y;
        self.sync_rect();
    }

    /// Keep the whole bounding box inside `width` x `height`.
    pub fn clamp_to(&mut self, width: u32, height: u32) {
        let max_x = (width as f32 - self.width() as f32).max(0.0);
        let max_y = (height as f32 - self.height() as f32).max(0.0);
        self.x = self.x.clamp(0.0, max_x);
        self.y = self.y.clamp(0.0, max_y);
        self.sync_rect();
    }

    fn sync_rect(&mut self) {
        self.rect.x = self.x as i32;
        self.rect.y = self.y as i32;
    }
}

impl Collidable for Ship {
    fn rect(&self) -> Rect {
        self.rect
    }

    fn mask(&self) -> Option<&PixelMask> {
        Some(&self.sprite.mask)
    }
}

// ── Projectiles ───────────────────────────────────────────────────────────────

#[derive(Clone, Debug)]
pub struct Bullet {
    pub x: f32,
    pub y: f32,
    pub rect: Rect,
    /// Signed vertical velocity; negative travels up.
    pub speed: f32,
    pub sprite: Arc<Sprite>,
}

impl Bullet {
    pub fn new(x: f32, y: f32, sprite: Arc<Sprite>, speed: f32) -> Self {
        let rect = Rect::new(x as i32, y as i32, sprite.width, sprite.height);
        Self {
            x,
            y,
            rect,
            speed,
            sprite,
        }
    }

    /// Advance vertically by `dy`, or by the bullet's own speed.
    pub fn move_by(&mut self, dy: Option<f32>) {
        self.y += dy.unwrap_or(self.speed);
        self.sync_rect();
    }

    pub fn set_position(&mut self, x: f32, y: f32) {
        self.x = x;
        self.y = y;
        self.sync_rect();
    }

    pub fn collision<T: Collidable + ?Sized>(&self, target: &T) -> bool {
        collides(self, target)
    }

    fn sync_rect(&mut self) {
        self.rect.x = self.x as i32;
        self.rect.y = self.y as i32;
    }
}

impl Collidable for Bullet {
    fn rect(&self) -> Rect {
        self.rect
    }

    fn mask(&self) -> Option<&PixelMask> {
        Some(&self.sprite.mask)
    }
}

// ── Player & enemy ────────────────────────────────────────────────────────────

#[derive(Clone, Debug)]
pub struct Player {
    pub ship: Ship,
    pub x_speed: f32,
    pub y_speed: f32,
    pub bullet_speed: f32,
    pub bullet_sprite: Arc<Sprite>,
    /// Capacity of the ready pool; grows by one per level.
    pub max_amount_bullets: usize,
    /// Ready bullets ("in the chamber"); the last one is fired first.
    pub bullets: Vec<Bullet>,
    pub fired_bullets: Vec<Bullet>,
    /// Frames since the last bullet was created, 0 when creation is allowed.
    pub creation_cooldown_counter: u32,
    /// Frames since the last shot, 0 when firing is allowed.
    pub bullet_cooldown_counter: u32,
    /// Creation-cooldown threshold in frames.
    pub cool_down: u32,
}

impl Player {
    pub fn new(x: f32, y: f32, x_speed: f32, y_speed: f32, health: i32, sprites: &SpriteSet) -> Self {
        Self {
            ship: Ship::new(x, y, health, x_speed.max(y_speed), Arc::clone(&sprites.player)),
            x_speed,
            y_speed,
            bullet_speed: -10.0,
            bullet_sprite: Arc::clone(&sprites.player_bullet),
            max_amount_bullets: 3,
            bullets: Vec::new(),
            fired_bullets: Vec::new(),
            creation_cooldown_counter: 0,
            bullet_cooldown_counter: 0,
            cool_down: 120,
        }
    }

    /// A ready bullet sitting on the ship's current position.
    pub fn new_bullet(&self) -> Bullet {
        Bullet::new(
            self.ship.x,
            self.ship.y,
            Arc::clone(&self.bullet_sprite),
            self.bullet_speed,
        )
    }

    /// Replace the ready pool with a full one and drop bullets in flight.
    pub fn refill_bullets(&mut self) {
        self.fired_bullets.clear();
        self.bullets = (0..self.max_amount_bullets)
            .map(|_| self.new_bullet())
            .collect();
    }
}

impl Collidable for Player {
    fn rect(&self) -> Rect {
        self.ship.rect
    }

    fn mask(&self) -> Option<&PixelMask> {
        self.ship.mask()
    }
}

#[derive(Clone, Debug)]
pub struct Enemy {
    pub ship: Ship,
    pub color: EnemyColor,
    pub shot: Arc<Sprite>,
}

impl Enemy {
    pub fn new(x: f32, y: f32, color: EnemyColor, speed: f32, sprites: &SpriteSet) -> Self {
        let skin = sprites.enemy(color);
        Self {
            ship: Ship::new(x, y, 100, speed, Arc::clone(&skin.ship)),
            color,
            shot: Arc::clone(&skin.shot),
        }
    }
}

impl Collidable for Enemy {
    fn rect(&self) -> Rect {
        self.ship.rect
    }

    fn mask(&self) -> Option<&PixelMask> {
        self.ship.mask()
    }
}

// ── Level progression ─────────────────────────────────────────────────────────

#[derive(Clone, Debug, PartialEq)]
pub struct LevelState {
    pub number: u32,
    pub kills: u32,
    pub target_kills: u32,
    pub enemy_speed: f32,
    pub max_enemies_on_screen: usize,
    pub spawn_cooldown: u32,
    pub spawn_counter: u32,
}

impl LevelState {
    /// Whole-number speed handed to newly created enemies.
    pub fn wave_speed(&self) -> f32 {
        self.enemy_speed.round().max(1.0)
    }

    pub fn target_reached(&self) -> bool {
        self.kills >= self.target_kills
    }
}

// ── Master game state ─────────────────────────────────────────────────────────

/// The entire game state.  Cloneable so `compute::tick` can return a new
/// copy without mutating the original; sprites are shared.
#[derive(Clone, Debug)]
pub struct GameState {
    pub player: Player,
    pub enemies: Vec<Enemy>,
    pub lives: u32,
    pub score: u32,
    pub level: LevelState,
    pub status: GameStatus,
    pub frame: u64,
    pub width: u32,
    pub height: u32,
    pub fps: u32,
    pub player_name: Option<String>,
    /// Stored best for `player_name` when the session began.
    pub previous_best: u32,
    pub high_score_cue_played: bool,
    pub sprites: Arc<SpriteSet>,
}
