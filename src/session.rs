/// One play-through, from the start cue to the end of the game-over screen.
///
/// `Session` owns the `GameState` and everything around it the core must
/// not know about: the RNG, the audio sink and the score file.  The frame
/// loop hands it one `InputSnapshot` per tick.

use std::path::PathBuf;
use std::sync::Arc;

use rand::rngs::StdRng;
use rand::SeedableRng;
use tracing::{info, warn};

use crate::audio::{AudioCue, AudioSink};
use crate::compute::{init_state, tick};
use crate::config::GameConfig;
use crate::entities::{GameEvent, GameState, GameStatus};
use crate::input::InputSnapshot;
use crate::scores::{self, NameError};
use crate::sprites::SpriteSet;

pub struct Session<A: AudioSink> {
    state: GameState,
    rng: StdRng,
    audio: A,
    scores_path: PathBuf,
    score_saved: bool,
    running: bool,
}

impl<A: AudioSink> Session<A> {
    pub fn new(
        config: &GameConfig,
        player_name: Option<String>,
        sprites: Arc<SpriteSet>,
        mut audio: A,
    ) -> Self {
        // Blank or unstorable names play anonymously.
        let player_name = player_name.and_then(|raw| match scores::check_name_format(&raw) {
            Ok(name) => Some(name),
            Err(NameError::Empty) => None,
            Err(e) => {
                warn!("{e}; playing without a name");
                None
            }
        });
        let previous_best = match player_name.as_deref() {
            Some(name) => scores::best_for(&config.scores_path, name).unwrap_or_else(|e| {
                warn!("{e}; assuming no previous best");
                0
            }),
            None => 0,
        };
        let mut rng = match config.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        let state = init_state(config, player_name, previous_best, sprites, &mut rng);

        info!(
            player = state.player_name.as_deref().unwrap_or("-"),
            previous_best,
            "session started"
        );
        audio.play(AudioCue::Start);

        Self {
            state,
            rng,
            audio,
            scores_path: config.scores_path.clone(),
            score_saved: false,
            running: true,
        }
    }

    pub fn state(&self) -> &GameState {
        &self.state
    }

    pub fn audio(&self) -> &A {
        &self.audio
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    pub fn score_saved(&self) -> bool {
        self.score_saved
    }

    /// Run one frame.  A quit request stops the session before any update.
    pub fn step(&mut self, input: &InputSnapshot) -> Vec<GameEvent> {
        if !self.running {
            return Vec::new();
        }
        if input.quit {
            info!(frame = self.state.frame, "quit requested");
            self.running = false;
            return Vec::new();
        }

        let (next, events) = tick(&self.state, input, &mut self.rng);
        self.state = next;
        for event in &events {
            self.handle(event);
        }
        if self.state.status == GameStatus::Finished {
            self.running = false;
        }
        events
    }

    fn handle(&mut self, event: &GameEvent) {
        match event {
            GameEvent::HighScoreBeaten { .. } | GameEvent::LevelComplete { .. } => {
                self.audio.play(AudioCue::Win);
            }
            GameEvent::GameOver { score } => self.persist_score(*score),
            GameEvent::LifeLost { .. } | GameEvent::LevelStarted { .. } => {}
        }
    }

    /// Write the final score once; later calls do nothing.
    fn persist_score(&mut self, score: u32) {
        if self.score_saved {
            return;
        }
        self.score_saved = true;
        let Some(name) = self.state.player_name.as_deref() else {
            return;
        };
        if let Err(e) = scores::save(&self.scores_path, name, score) {
            warn!("could not save score: {e}");
        }
    }
}
