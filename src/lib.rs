//! Wave shooter: a terminal arcade game against descending enemy waves.
//!
//! `compute` holds the per-frame rules, `entities` the data they act on.
//! Everything else is plumbing around them: sprites, input, audio, the
//! score file and the crossterm renderer.

pub mod audio;
pub mod compute;
pub mod config;
pub mod display;
pub mod entities;
pub mod input;
pub mod mask;
pub mod scores;
pub mod session;
pub mod sprites;
