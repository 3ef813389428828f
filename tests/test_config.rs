use std::path::Path;

use wave_shooter::config::*;

fn parse(raw: &str) -> Result<GameConfig, ConfigError> {
    GameConfig::from_toml_str(raw, Path::new("test.toml"))
}

#[test]
fn defaults_are_valid() {
    let config = GameConfig::default();
    assert!(config.validate().is_ok());
    assert_eq!((config.width, config.height, config.fps), (800, 600, 60));
    assert_eq!(config.lives, 3);
    assert_eq!(config.initial_target_kills, 12);
    assert_eq!(config.seed, None);
}

#[test]
fn empty_file_means_defaults() {
    assert_eq!(parse("").unwrap(), GameConfig::default());
}

#[test]
fn partial_file_overrides_some_fields() {
    let config = parse("fps = 30\nlives = 5\nseed = 9\nscores_path = \"data/hs.txt\"\n").unwrap();
    assert_eq!(config.fps, 30);
    assert_eq!(config.lives, 5);
    assert_eq!(config.seed, Some(9));
    assert_eq!(config.scores_path, Path::new("data/hs.txt"));
    assert_eq!(config.width, 800);
}

#[test]
fn unknown_keys_are_rejected() {
    let err = parse("colour = \"red\"\n").unwrap_err();
    assert!(matches!(err, ConfigError::Parse { .. }));
}

#[test]
fn out_of_range_values_are_rejected() {
    for (raw, field) in [
        ("width = 100", "width"),
        ("height = 10", "height"),
        ("fps = 0", "fps"),
        ("lives = 0", "lives"),
        ("initial_target_kills = 0", "initial_target_kills"),
        ("max_enemies_on_screen = 0", "max_enemies_on_screen"),
        ("enemy_speed = 0.0", "enemy_speed"),
    ] {
        match parse(raw) {
            Err(ConfigError::Invalid { field: f, .. }) => assert_eq!(f, field),
            other => panic!("{raw}: expected Invalid, got {other:?}"),
        }
    }
}

#[test]
fn missing_file_is_an_io_error() {
    let dir = tempfile::tempdir().unwrap();
    let err = GameConfig::load(&dir.path().join("nope.toml")).unwrap_err();
    assert!(matches!(err, ConfigError::Io { .. }));
    assert!(err.to_string().contains("nope.toml"));
}
