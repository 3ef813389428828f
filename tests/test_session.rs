use std::fs;
use std::path::Path;
use std::sync::Arc;

use wave_shooter::audio::{AudioCue, RecordingAudio};
use wave_shooter::config::GameConfig;
use wave_shooter::entities::{GameEvent, GameStatus};
use wave_shooter::input::InputSnapshot;
use wave_shooter::session::Session;
use wave_shooter::sprites::SpriteSet;

/// Small field and a single life so an idle game ends quickly.
fn short_game(scores: &Path) -> GameConfig {
    GameConfig {
        height: 200,
        lives: 1,
        scores_path: scores.to_path_buf(),
        seed: Some(42),
        ..GameConfig::default()
    }
}

fn start(config: &GameConfig, name: Option<&str>) -> Session<RecordingAudio> {
    Session::new(
        config,
        name.map(str::to_string),
        Arc::new(SpriteSet::placeholders()),
        RecordingAudio::default(),
    )
}

/// Step with no keys held until the session stops.  Returns every event.
fn play_out(session: &mut Session<RecordingAudio>) -> Vec<GameEvent> {
    let idle = InputSnapshot::default();
    let mut events = Vec::new();
    for _ in 0..10_000 {
        if !session.is_running() {
            break;
        }
        events.extend(session.step(&idle));
    }
    events
}

#[test]
fn start_cue_plays_once() {
    let dir = tempfile::tempdir().unwrap();
    let session = start(&short_game(&dir.path().join("scores.txt")), Some("ada"));
    assert_eq!(session.audio().played, vec![AudioCue::Start]);
    assert!(session.is_running());
    assert_eq!(session.state().status, GameStatus::Playing);
}

#[test]
fn quit_stops_without_saving() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("scores.txt");
    let mut session = start(&short_game(&path), Some("ada"));

    let events = session.step(&InputSnapshot {
        quit: true,
        ..InputSnapshot::default()
    });
    assert!(events.is_empty());
    assert!(!session.is_running());
    assert!(!session.score_saved());
    assert_eq!(session.state().frame, 0);
    assert!(!path.exists());

    // Stopped sessions ignore further input
    assert!(session.step(&InputSnapshot::default()).is_empty());
    assert_eq!(session.state().frame, 0);
}

#[test]
fn game_over_saves_score_once() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("scores.txt");
    let mut session = start(&short_game(&path), Some("ada"));

    let events = play_out(&mut session);

    assert!(!session.is_running());
    assert!(session.score_saved());
    assert_eq!(session.state().status, GameStatus::Finished);
    let game_overs = events
        .iter()
        .filter(|e| matches!(e, GameEvent::GameOver { .. }))
        .count();
    assert_eq!(game_overs, 1);
    assert_eq!(fs::read_to_string(&path).unwrap(), "ada,0\n");
}

#[test]
fn game_over_keeps_better_stored_score() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("scores.txt");
    fs::write(&path, "ada,500\nbob,100\n").unwrap();

    let mut session = start(&short_game(&path), Some("ada"));
    assert_eq!(session.state().previous_best, 500);
    play_out(&mut session);

    assert_eq!(fs::read_to_string(&path).unwrap(), "ada,500\nbob,100\n");
}

#[test]
fn anonymous_session_writes_nothing() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("scores.txt");
    let mut session = start(&short_game(&path), None);
    play_out(&mut session);

    assert!(!session.is_running());
    assert!(session.score_saved());
    assert!(!path.exists());
}

#[test]
fn seeded_sessions_replay_identically() {
    let dir = tempfile::tempdir().unwrap();
    let config = short_game(&dir.path().join("scores.txt"));
    let a = start(&config, None);
    let b = start(&config, None);
    let ys = |s: &Session<RecordingAudio>| -> Vec<f32> {
        s.state().enemies.iter().map(|e| e.ship.y).collect()
    };
    assert_eq!(ys(&a), ys(&b));
}

#[test]
fn blank_name_plays_anonymously() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("scores.txt");
    let mut session = start(&short_game(&path), Some("   "));
    assert_eq!(session.state().player_name, None);

    play_out(&mut session);
    assert!(session.score_saved());
    assert!(!path.exists());
}

#[test]
fn name_with_delimiter_is_never_written() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("scores.txt");
    fs::write(&path, "bob,100\n").unwrap();

    let mut session = start(&short_game(&path), Some("a,b"));
    assert_eq!(session.state().player_name, None);
    play_out(&mut session);

    // Existing records survive untouched
    assert_eq!(fs::read_to_string(&path).unwrap(), "bob,100\n");
}

#[test]
fn stored_name_is_trimmed() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("scores.txt");
    let mut session = start(&short_game(&path), Some("  ada "));
    assert_eq!(session.state().player_name.as_deref(), Some("ada"));
    play_out(&mut session);
    assert_eq!(fs::read_to_string(&path).unwrap(), "ada,0\n");
}
