//! MusicVerse CLI - Playback and Stem Mixer
//!
//! Command-line interface for the MusicVerse studio engine.

use anyhow::Context;
use clap::Parser;
use tracing::info;
use tracing_subscriber::EnvFilter;

use musicverse::cli::{commands, Cli, Commands};
use musicverse::config::StudioConfig;

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let default_level = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)),
        )
        .init();

    info!("MusicVerse Studio v{}", env!("CARGO_PKG_VERSION"));

    let config = StudioConfig::load_or_default(cli.config.as_deref())
        .context("failed to load studio config")?;

    match cli.command {
        Some(cmd) => handle_command(&config, cmd),
        None => {
            println!("MusicVerse Studio v{}", env!("CARGO_PKG_VERSION"));
            println!("Use --help for available commands");
            Ok(())
        }
    }
}

fn handle_command(config: &StudioConfig, cmd: Commands) -> anyhow::Result<()> {
    match cmd {
        Commands::Mix {
            stems,
            solo,
            mute,
            volumes,
            master,
            save,
        } => commands::mix(
            config,
            &stems,
            &solo,
            &mute,
            &volumes,
            master,
            save.as_deref(),
        )
        .context("mix failed")?,
        Commands::Replay { path, snapshot } => commands::replay(config, &path, snapshot.as_deref())
            .with_context(|| format!("replay of {} failed", path.display()))?,
        Commands::Config => commands::show_config(config)?,
    }
    Ok(())
}
