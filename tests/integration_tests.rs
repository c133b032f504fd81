//! Integration Tests
//!
//! End-to-end tests for the studio stores: playback and mixer behavior
//! through the public API, session replay, snapshots and config.

use approx::assert_relative_eq;
use pretty_assertions::assert_eq;
use std::sync::{Arc, Mutex};
use tempfile::TempDir;
use test_case::test_case;

use musicverse::engine::{select_progress, LoopMode, PlaybackState, StemChannel, StemMixerState};
use musicverse::state::{
    parse_session, MixSnapshot, MixerAction, MixerChannel, PlaybackAction, PlaybackChannel,
    PlaybackStore, StemMixerStore, StudioChannel, StudioStore,
};
use musicverse::{StudioConfig, StudioError};

/// Helper: mixer with stems seeded
fn mixer_with(ids: &[&str]) -> StemMixerState {
    let mut mixer = StemMixerState::new();
    mixer.initialize_stem_states(ids);
    mixer
}

// === Clamping ===

#[test_case(-0.5, 0.0 ; "volume below range")]
#[test_case(0.42, 0.42 ; "volume in range")]
#[test_case(1.7, 1.0 ; "volume above range")]
fn test_stem_volume_clamped(input: f32, expected: f32) {
    let mut store = StemMixerStore::new();
    store.actions().set_stem_volume("vocals", input);
    assert_relative_eq!(store.stem_state("vocals").volume, expected);
}

#[test_case(-3.0, -1.0 ; "pan hard left")]
#[test_case(0.3, 0.3 ; "pan in range")]
#[test_case(2.0, 1.0 ; "pan hard right")]
fn test_stem_pan_clamped(input: f32, expected: f32) {
    let mut store = StemMixerStore::new();
    store.actions().set_stem_pan("bass", input);
    assert_relative_eq!(store.stem_state("bass").pan, expected);
}

#[test_case(0.1, 0.25 ; "rate below range")]
#[test_case(1.5, 1.5 ; "rate in range")]
#[test_case(8.0, 4.0 ; "rate above range")]
fn test_playback_rate_clamped(input: f64, expected: f64) {
    let mut store = PlaybackStore::new();
    store.controls().set_playback_rate(input);
    assert_eq!(store.playback_rate(), expected);
}

#[test]
fn test_position_clamped_to_duration() {
    let mut store = PlaybackStore::new();
    store.controls().set_duration(-4.0);
    assert_eq!(store.status().duration, 0.0);

    store.controls().set_duration(100.0);
    store.controls().seek(250.0);
    assert_eq!(store.status().current_time, 100.0);

    store.controls().skip_backward(Some(500.0));
    assert_eq!(store.status().current_time, 0.0);

    store.controls().seek(95.0);
    store.controls().skip_forward(None);
    assert_eq!(store.status().current_time, 100.0);
}

// === Mixer Scenarios ===

#[test]
fn test_initialize_is_idempotent() {
    let mut mixer = mixer_with(&["a"]);
    mixer.set_stem_volume("a", 0.3);
    mixer.initialize_stem_states(["a"]);
    assert_relative_eq!(mixer.stem_state("a").volume, 0.3);
}

#[test]
fn test_solo_precedence() {
    let mut mixer = mixer_with(&["a", "b"]);
    mixer.toggle_stem_solo("b");

    assert_eq!(mixer.get_effective_volume("a"), 0.0);
    assert_relative_eq!(mixer.get_effective_volume("b"), 0.85);
}

#[test]
fn test_master_mute_overrides_everything() {
    let mut mixer = mixer_with(&["a", "b", "c"]);
    mixer.toggle_stem_solo("a");
    mixer.toggle_stem_mute("b");
    mixer.set_stem_volume("c", 0.5);
    mixer.toggle_master_mute();

    for id in ["a", "b", "c", "never-seen"] {
        assert_eq!(mixer.get_effective_volume(id), 0.0, "stem {}", id);
        assert!(mixer.is_stem_effectively_muted(id));
    }
}

#[test]
fn test_reset_after_mutations() {
    let mut mixer = mixer_with(&["vocals", "drums"]);
    mixer.set_stem_volume("vocals", 0.1);
    mixer.set_stem_pan("drums", 0.9);
    mixer.toggle_stem_solo("drums");
    mixer.toggle_stem_mute("vocals");
    mixer.set_master_volume(0.3);
    mixer.toggle_master_mute();

    mixer.reset_stem_states();

    assert_relative_eq!(mixer.master_volume(), 0.85);
    assert!(!mixer.master_muted());
    assert!(!mixer.has_solo_stems());
    for id in ["vocals", "drums"] {
        assert_eq!(mixer.stem_state(id), StemChannel::default());
    }
}

// === Playback Scenarios ===

#[test]
fn test_loop_cycle_returns_to_none() {
    let mut playback = PlaybackState::new();
    let mut seen = Vec::new();
    for _ in 0..3 {
        playback.cycle_loop_mode();
        seen.push(playback.loop_mode());
    }
    assert_eq!(seen, vec![LoopMode::All, LoopMode::One, LoopMode::None]);
}

#[test]
fn test_stop_versus_pause() {
    let mut paused = PlaybackState::new();
    paused.play();
    paused.set_current_time(42.0);
    paused.pause();
    assert_eq!(paused.current_time(), 42.0);
    assert!(!paused.is_playing());

    let mut stopped = PlaybackState::new();
    stopped.play();
    stopped.set_current_time(42.0);
    stopped.stop();
    assert_eq!(stopped.current_time(), 0.0);
    assert!(!stopped.is_playing());
}

#[test]
fn test_progress_guard() {
    let playback = PlaybackState::new();
    let progress = select_progress(&playback);
    assert_eq!(progress, 0.0);
    assert!(!progress.is_nan());
}

// === Unified Store ===

#[test]
fn test_studio_subscribers_follow_groupings() {
    let mut studio = StudioStore::new();
    studio.dispatch(
        &MixerAction::InitializeStemStates {
            stem_ids: vec!["vocals".into(), "drums".into()],
        }
        .into(),
    );

    let log = Arc::new(Mutex::new(Vec::new()));
    for (name, channel) in [
        ("status", StudioChannel::Playback(PlaybackChannel::Status)),
        ("loop", StudioChannel::Playback(PlaybackChannel::Loop)),
        ("vocals", StudioChannel::Mixer(MixerChannel::Stem("vocals".into()))),
        ("solo", StudioChannel::Mixer(MixerChannel::Solo)),
    ] {
        let sink = Arc::clone(&log);
        studio.subscribe(channel, move |_| sink.lock().unwrap().push(name));
    }

    studio.dispatch(&PlaybackAction::Play.into());
    studio.dispatch(&PlaybackAction::CycleLoopMode.into());
    studio.dispatch(
        &MixerAction::SetStemVolume {
            id: "drums".into(),
            volume: 0.5,
        }
        .into(),
    );
    studio.dispatch(&MixerAction::ToggleStemSolo { id: "vocals".into() }.into());
    studio.dispatch(&PlaybackAction::Play.into());

    assert_eq!(*log.lock().unwrap(), vec!["status", "loop", "vocals", "solo"]);
}

#[test]
fn test_session_replay_from_json() {
    let session = r#"[
        {"type": "initialize_stem_states", "stem_ids": ["vocals", "drums", "bass"]},
        {"type": "set_duration", "duration": 180.0},
        {"type": "play"},
        {"type": "seek", "time": 60.0},
        {"type": "skip_forward"},
        {"type": "set_loop_region", "region": {"start": 70.0, "end": 80.0}},
        {"type": "set_loop_mode", "mode": "one"},
        {"type": "toggle_stem_solo", "id": "vocals"},
        {"type": "set_master_volume", "volume": 0.5}
    ]"#;
    let actions = parse_session(session).unwrap();

    let mut studio = StudioStore::new();
    assert_eq!(studio.replay(&actions), 9);

    assert!(studio.status().is_playing);
    assert_eq!(studio.status().current_time, 70.0);
    assert_eq!(studio.loop_state().loop_mode, LoopMode::One);
    assert_relative_eq!(studio.effective_stem_volume("vocals"), 0.5);
    assert_eq!(studio.effective_stem_volume("drums"), 0.0);

    // undo walks back mixer edits only
    studio.undo().unwrap();
    studio.undo().unwrap();
    assert_relative_eq!(studio.effective_stem_volume("drums"), 0.85);
    assert_eq!(studio.status().current_time, 70.0);
}

#[test]
fn test_bad_session_entry_reported() {
    let err = parse_session(r#"[{"type": "play"}, {"type": "explode"}]"#).unwrap_err();
    assert_eq!(err.error_code(), "REPLAY_ERROR");
    assert!(matches!(err, StudioError::ReplayError { index: 1, .. }));
}

// === Persistence ===

#[test]
fn test_snapshot_restores_into_studio() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("mix.json");

    let mut source = StemMixerStore::new();
    source.actions().initialize_stem_states(["vocals", "drums"]);
    source.actions().set_stem_volume("drums", 0.4);
    source.actions().toggle_stem_solo("vocals");
    MixSnapshot::from(source.state()).save(&path).unwrap();

    let mut studio = StudioStore::new();
    let snapshot = MixSnapshot::load(&path).unwrap();
    studio.update_mixer(|mixer| snapshot.apply_to(mixer));

    assert_eq!(studio.mixer(), source.state());
    assert_eq!(studio.effective_stem_volume("drums"), 0.0);
}

#[test]
fn test_config_drives_store() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("studio.json");
    std::fs::write(
        &path,
        r#"{"default_master_volume": 0.6, "skip_seconds": 15.0, "stem_ids": ["vocals"]}"#,
    )
    .unwrap();

    let config = StudioConfig::load(&path).unwrap();
    let mut studio = config.build_store();
    studio.dispatch(&PlaybackAction::SetDuration { duration: 60.0 }.into());
    studio.dispatch(&PlaybackAction::SkipForward { amount: None }.into());
    studio.dispatch(&MixerAction::SetMasterVolume { volume: 1.0 }.into());
    studio.dispatch(&MixerAction::ResetStemStates.into());

    assert_eq!(studio.status().current_time, 15.0);
    assert_relative_eq!(studio.master_controls().master_volume, 0.6);
    assert_relative_eq!(studio.effective_stem_volume("vocals"), 0.6);
}
