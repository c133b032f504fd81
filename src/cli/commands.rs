//! CLI Command Implementations
//!
//! Implements the actual logic for each CLI command.

use std::fs;
use std::path::Path;

use tracing::info;

use crate::config::StudioConfig;
use crate::engine::PlaybackStatus;
use crate::error::{Result, StudioError};
use crate::state::{parse_session, MixSnapshot, MixerAction, StudioStore};

/// Seed stems, apply mixer flags and print effective volumes.
pub fn mix(
    config: &StudioConfig,
    stems: &[String],
    solo: &[String],
    mute: &[String],
    volumes: &[(String, f32)],
    master: Option<f32>,
    save: Option<&Path>,
) -> Result<()> {
    let mut studio = config.build_store();
    studio.update_mixer(|mixer| mixer.initialize_stem_states(stems));

    let mut actions: Vec<MixerAction> = Vec::new();
    actions.extend(volumes.iter().map(|(id, volume)| MixerAction::SetStemVolume {
        id: id.clone(),
        volume: *volume,
    }));
    actions.extend(mute.iter().map(|id| MixerAction::ToggleStemMute { id: id.clone() }));
    actions.extend(solo.iter().map(|id| MixerAction::ToggleStemSolo { id: id.clone() }));
    if let Some(volume) = master {
        actions.push(MixerAction::SetMasterVolume { volume });
    }

    for action in actions {
        info!("{}", action);
        studio.dispatch(&action.into());
    }

    print_mixer(&studio);

    if let Some(path) = save {
        MixSnapshot::from(studio.mixer()).save(path)?;
        println!("Mix saved: {}", path.display());
    }

    Ok(())
}

/// Apply a recorded session and print the final state.
pub fn replay(config: &StudioConfig, path: &Path, snapshot: Option<&Path>) -> Result<()> {
    info!("Replaying session: {}", path.display());

    if !path.exists() {
        return Err(StudioError::FileNotFound {
            path: path.to_path_buf(),
        });
    }
    let content = fs::read_to_string(path).map_err(|e| StudioError::FileReadError {
        path: path.to_path_buf(),
        source: e,
    })?;
    let actions = parse_session(&content)?;

    let mut studio = config.build_store();
    if let Some(snapshot_path) = snapshot {
        let snapshot = MixSnapshot::load(snapshot_path)?;
        studio.update_mixer(|mixer| snapshot.apply_to(mixer));
        info!("Restored mix from {}", snapshot_path.display());
    }

    let applied = studio.replay(&actions);
    println!("Applied {} action(s)", applied);
    print_transport(&studio);
    print_mixer(&studio);

    let history = studio.history();
    if history.can_undo() {
        println!("Undo stack ({}):", history.undo_count());
        for description in history.descriptions() {
            println!("    {}", description);
        }
    }

    Ok(())
}

/// Print the effective configuration.
pub fn show_config(config: &StudioConfig) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(config)?);
    Ok(())
}

/// "Paused" once the playhead has left zero without playing
fn transport_label(status: &PlaybackStatus) -> &'static str {
    if status.is_playing {
        "Playing"
    } else if status.current_time > 0.0 {
        "Paused"
    } else {
        "Stopped"
    }
}

fn print_transport(studio: &StudioStore) {
    let status = studio.status();
    let loops = studio.loop_state();

    println!("Transport:");
    println!("{:-<60}", "");
    println!(
        "  {} at {:.2}s / {:.2}s ({:.0}%)",
        transport_label(&status),
        status.current_time,
        status.duration,
        studio.progress() * 100.0
    );
    println!("  Rate: {:.2}x", studio.playback().playback_rate());
    println!("  Loop: {}", loops.loop_mode);
    if let Some(region) = loops.loop_region {
        println!("  Region: {:.2}s - {:.2}s", region.start, region.end);
    }
}

fn print_mixer(studio: &StudioStore) {
    let master = studio.master_controls();

    println!("Mixer:");
    println!("{:-<60}", "");
    println!("  {:<12} {:>6} {:>6}  {:>9}", "stem", "vol", "pan", "effective");
    for (id, channel) in studio.mixer().stem_states() {
        let mut flags = String::new();
        if channel.muted {
            flags.push_str(" [M]");
        }
        if channel.solo {
            flags.push_str(" [S]");
        }
        println!(
            "  {:<12} {:>6.2} {:>6.2}  {:>9.3}{}",
            id,
            channel.volume,
            channel.pan,
            studio.effective_stem_volume(id),
            flags
        );
    }
    println!("{:-<60}", "");
    println!(
        "  master {:.2} pan {:.2}{}",
        master.master_volume,
        master.master_pan,
        if master.master_muted { " [MUTED]" } else { "" }
    );
}

#[cfg(test)]
mod tests {
    use super::*;
    use test_case::test_case;

    #[test_case(true, 0.0, "Playing" ; "playing from start")]
    #[test_case(true, 12.0, "Playing" ; "playing midway")]
    #[test_case(false, 12.0, "Paused" ; "paused midway")]
    #[test_case(false, 0.0, "Stopped" ; "stopped")]
    fn test_transport_label(is_playing: bool, current_time: f64, expected: &str) {
        let status = PlaybackStatus {
            is_playing,
            current_time,
            duration: 60.0,
        };
        assert_eq!(transport_label(&status), expected);
    }
}
