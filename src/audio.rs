/// Sound cues.  The core only says *which* cue to play; a sink decides how.
/// Sinks never fail: a missing device just means silence.

use std::io::Write;

use tracing::debug;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum AudioCue {
    Start,
    /// High score beaten or level complete.
    Win,
}

pub trait AudioSink {
    fn play(&mut self, cue: AudioCue);
}

/// Plays nothing.
#[derive(Debug, Default)]
pub struct SilentAudio;

impl AudioSink for SilentAudio {
    fn play(&mut self, _cue: AudioCue) {}
}

/// Rings the terminal bell: once for start, twice for a win.
#[derive(Debug)]
pub struct TerminalBell<W: Write> {
    out: W,
}

impl<W: Write> TerminalBell<W> {
    pub fn new(out: W) -> Self {
        Self { out }
    }
}

impl<W: Write> AudioSink for TerminalBell<W> {
    fn play(&mut self, cue: AudioCue) {
        let rings = match cue {
            AudioCue::Start => "\x07",
            AudioCue::Win => "\x07\x07",
        };
        if let Err(e) = self.out.write_all(rings.as_bytes()).and_then(|_| self.out.flush()) {
            debug!("bell unavailable: {e}");
        }
    }
}

/// Remembers every cue; handy for tests and replays.
#[derive(Debug, Default)]
pub struct RecordingAudio {
    pub played: Vec<AudioCue>,
}

impl AudioSink for RecordingAudio {
    fn play(&mut self, cue: AudioCue) {
        self.played.push(cue);
    }
}
