/// Per-frame input sampling.
///
/// The game loop never acts on individual key events.  Instead a `KeyTracker`
/// records the frame each key was last seen (press or repeat) and produces
/// one `InputSnapshot` per frame of everything currently held.

use std::collections::HashMap;

use crossterm::event::{KeyCode, KeyEvent, KeyEventKind, KeyModifiers};

/// Everything the core reads from the player in one frame.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct InputSnapshot {
    pub up: bool,
    pub down: bool,
    pub left: bool,
    pub right: bool,
    pub fire: bool,
    pub quit: bool,
}

/// A key is "held" if its last press/repeat event arrived within this many
/// frames.  Covers terminals that never emit key-release events: OS key
/// repeat runs at 15 Hz or faster, i.e. at most 4 frames apart at 60 FPS.
pub const HOLD_WINDOW: u64 = 8;

// ── Default bindings: arrows + WASD alternates, space fires, Esc quits ────────

const UP_KEYS: &[KeyCode] = &[KeyCode::Up, KeyCode::Char('w'), KeyCode::Char('W')];
const DOWN_KEYS: &[KeyCode] = &[KeyCode::Down, KeyCode::Char('s'), KeyCode::Char('S')];
const LEFT_KEYS: &[KeyCode] = &[KeyCode::Left, KeyCode::Char('a'), KeyCode::Char('A')];
const RIGHT_KEYS: &[KeyCode] = &[KeyCode::Right, KeyCode::Char('d'), KeyCode::Char('D')];
const FIRE_KEYS: &[KeyCode] = &[KeyCode::Char(' ')];

pub fn is_quit(event: &KeyEvent) -> bool {
    match event.code {
        KeyCode::Esc | KeyCode::Char('q') | KeyCode::Char('Q') => true,
        KeyCode::Char('c') => event.modifiers.contains(KeyModifiers::CONTROL),
        _ => false,
    }
}

#[derive(Debug, Default)]
pub struct KeyTracker {
    key_frame: HashMap<KeyCode, u64>,
    quit: bool,
}

impl KeyTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fold one terminal key event observed during `frame`.
    pub fn record(&mut self, event: &KeyEvent, frame: u64) {
        match event.kind {
            KeyEventKind::Press => {
                if is_quit(event) {
                    self.quit = true;
                }
                self.key_frame.insert(event.code, frame);
            }
            KeyEventKind::Repeat => {
                self.key_frame.insert(event.code, frame);
            }
            // Keyboard-enhancement terminals report releases; drop at once.
            KeyEventKind::Release => {
                self.key_frame.remove(&event.code);
            }
        }
    }

    fn any_held(&self, keys: &[KeyCode], frame: u64) -> bool {
        keys.iter().any(|k| {
            self.key_frame
                .get(k)
                .map(|&last| frame.saturating_sub(last) <= HOLD_WINDOW)
                .unwrap_or(false)
        })
    }

    pub fn snapshot(&self, frame: u64) -> InputSnapshot {
        InputSnapshot {
            up: self.any_held(UP_KEYS, frame),
            down: self.any_held(DOWN_KEYS, frame),
            left: self.any_held(LEFT_KEYS, frame),
            right: self.any_held(RIGHT_KEYS, frame),
            fire: self.any_held(FIRE_KEYS, frame),
            quit: self.quit,
        }
    }
}
