//! MusicVerse - Playback and Stem Mixer Engine
//!
//! Two independent state machines behind a web-style studio UI:
//! 1. Playback Engine - transport (play, seek, skip, rate) and loop semantics
//! 2. Stem Mixer Engine - per-stem volume, pan, mute and solo feeding a master bus
//!
//! # Architecture
//!
//! - `engine`: the plain state structs and their mutators and selectors
//! - `state`: observable stores, serializable actions, mix history and snapshots
//! - `config`: studio settings loaded from JSON
//! - `cli`: the `musicverse-cli` binary's commands

pub mod cli;
pub mod config;
pub mod engine;
pub mod error;
pub mod state;

pub use config::StudioConfig;
pub use error::{Result, StudioError};
