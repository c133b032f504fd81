//! CLI Module
//!
//! Command-line interface for driving the studio stores headlessly.

pub mod commands;

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// MusicVerse Studio - playback and stem mixer engine
#[derive(Parser, Debug)]
#[command(name = "musicverse-cli")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Studio config file (JSON)
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Seed stems, apply mixer flags and print effective volumes
    #[command(name = "mix")]
    Mix {
        /// Stem ids to seed (in addition to the configured ones)
        #[arg(short, long, value_delimiter = ',')]
        stems: Vec<String>,

        /// Stems to solo
        #[arg(long, value_delimiter = ',')]
        solo: Vec<String>,

        /// Stems to mute
        #[arg(long, value_delimiter = ',')]
        mute: Vec<String>,

        /// Stem volume as id=value (repeatable)
        #[arg(long = "volume", value_parser = parse_stem_volume)]
        volumes: Vec<(String, f32)>,

        /// Master volume
        #[arg(short, long)]
        master: Option<f32>,

        /// Save the resulting mix snapshot to this file
        #[arg(long)]
        save: Option<PathBuf>,
    },

    /// Apply a JSON list of studio actions and print the final state
    #[command(name = "replay")]
    Replay {
        /// Session file containing an array of actions
        path: PathBuf,

        /// Mix snapshot to restore before replaying
        #[arg(long)]
        snapshot: Option<PathBuf>,
    },

    /// Print the effective configuration
    #[command(name = "config")]
    Config,
}

/// Parse `id=value` into a stem volume pair
fn parse_stem_volume(arg: &str) -> std::result::Result<(String, f32), String> {
    let (id, value) = arg
        .split_once('=')
        .ok_or_else(|| format!("expected id=value, got '{}'", arg))?;
    let volume = value
        .trim()
        .parse::<f32>()
        .map_err(|e| format!("invalid volume '{}': {}", value, e))?;
    Ok((id.trim().to_string(), volume))
}
