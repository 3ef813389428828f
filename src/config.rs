/// Game settings.
///
/// Defaults cover everything; a TOML file can override any subset and the
/// command line overrides the file.

use std::fmt;
use std::path::{Path, PathBuf};

use serde::Deserialize;

pub const MIN_PLAYFIELD: u32 = 200;

#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct GameConfig {
    /// Playfield width in sprite pixels.
    pub width: u32,
    /// Playfield height in sprite pixels.
    pub height: u32,
    pub fps: u32,
    pub lives: u32,
    pub scores_path: PathBuf,
    pub assets_dir: PathBuf,
    pub initial_target_kills: u32,
    pub max_enemies_on_screen: usize,
    /// Frames between spawner additions.
    pub spawn_cooldown: u32,
    pub enemy_speed: f32,
    pub seed: Option<u64>,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            width: 800,
            height: 600,
            fps: 60,
            lives: 3,
            scores_path: PathBuf::from("scores.txt"),
            assets_dir: PathBuf::from("assets"),
            initial_target_kills: 12,
            max_enemies_on_screen: 6,
            spawn_cooldown: 30,
            enemy_speed: 1.0,
            seed: None,
        }
    }
}

#[derive(Debug)]
pub enum ConfigError {
    Io { path: PathBuf, source: std::io::Error },
    Parse { path: PathBuf, message: String },
    Invalid { field: &'static str, reason: String },
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Io { path, source } => {
                write!(f, "cannot read config {}: {source}", path.display())
            }
            Self::Parse { path, message } => {
                write!(f, "invalid config {}: {message}", path.display())
            }
            Self::Invalid { field, reason } => write!(f, "invalid `{field}`: {reason}"),
        }
    }
}

impl std::error::Error for ConfigError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Io { source, .. } => Some(source),
            _ => None,
        }
    }
}

impl GameConfig {
    pub fn from_toml_str(raw: &str, path: &Path) -> Result<Self, ConfigError> {
        let config: GameConfig = toml::from_str(raw).map_err(|e| ConfigError::Parse {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?;
        config.validate()?;
        Ok(config)
    }

    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let raw = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml_str(&raw, path)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        fn invalid(field: &'static str, reason: impl Into<String>) -> Result<(), ConfigError> {
            Err(ConfigError::Invalid {
                field,
                reason: reason.into(),
            })
        }

        if self.width < MIN_PLAYFIELD {
            return invalid("width", format!("must be at least {MIN_PLAYFIELD}"));
        }
        if self.height < MIN_PLAYFIELD {
            return invalid("height", format!("must be at least {MIN_PLAYFIELD}"));
        }
        if self.fps == 0 {
            return invalid("fps", "must be positive");
        }
        if self.lives == 0 {
            return invalid("lives", "must be positive");
        }
        if self.initial_target_kills == 0 {
            return invalid("initial_target_kills", "must be positive");
        }
        if self.max_enemies_on_screen == 0 {
            return invalid("max_enemies_on_screen", "must be positive");
        }
        if !(self.enemy_speed > 0.0) {
            return invalid("enemy_speed", "must be positive");
        }
        Ok(())
    }
}
