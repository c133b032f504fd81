//! Serializable studio actions
//!
//! Every engine mutator has a matching action variant so sessions can be
//! recorded, replayed from JSON, and described in undo history.

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::engine::params::DEFAULT_SKIP_SECONDS;
use crate::engine::{LoopMode, LoopRegion, PlaybackState, StemChannel, StemMixerState};
use crate::error::{Result, StudioError};

/// Transport and loop actions
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum PlaybackAction {
    Play,
    Pause,
    TogglePlay,
    Stop,
    SetCurrentTime { time: f64 },
    SetDuration { duration: f64 },
    Seek { time: f64 },
    /// `amount` defaults to the store's skip step
    SkipForward {
        #[serde(default)]
        amount: Option<f64>,
    },
    SkipBackward {
        #[serde(default)]
        amount: Option<f64>,
    },
    SetPlaybackRate { rate: f64 },
    SetIsBuffering { value: bool },
    SetIsSeeking { value: bool },
    SetLoopMode { mode: LoopMode },
    CycleLoopMode,
    SetLoopRegion { region: Option<LoopRegion> },
}

impl PlaybackAction {
    /// Apply with the built-in 10 second skip step
    pub fn apply(&self, state: &mut PlaybackState) {
        self.apply_with_skip(state, DEFAULT_SKIP_SECONDS);
    }

    /// Apply, using `skip_seconds` for skips that carry no explicit amount
    pub fn apply_with_skip(&self, state: &mut PlaybackState, skip_seconds: f64) {
        match self {
            PlaybackAction::Play => state.play(),
            PlaybackAction::Pause => state.pause(),
            PlaybackAction::TogglePlay => state.toggle_play(),
            PlaybackAction::Stop => state.stop(),
            PlaybackAction::SetCurrentTime { time } => state.set_current_time(*time),
            PlaybackAction::SetDuration { duration } => state.set_duration(*duration),
            PlaybackAction::Seek { time } => state.seek(*time),
            PlaybackAction::SkipForward { amount } => {
                state.skip_forward(amount.unwrap_or(skip_seconds))
            }
            PlaybackAction::SkipBackward { amount } => {
                state.skip_backward(amount.unwrap_or(skip_seconds))
            }
            PlaybackAction::SetPlaybackRate { rate } => state.set_playback_rate(*rate),
            PlaybackAction::SetIsBuffering { value } => state.set_is_buffering(*value),
            PlaybackAction::SetIsSeeking { value } => state.set_is_seeking(*value),
            PlaybackAction::SetLoopMode { mode } => state.set_loop_mode(*mode),
            PlaybackAction::CycleLoopMode => state.cycle_loop_mode(),
            PlaybackAction::SetLoopRegion { region } => state.set_loop_region(*region),
        }
    }
}

/// Stem channel and master bus actions
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum MixerAction {
    InitializeStemStates { stem_ids: Vec<String> },
    SetAllStemStates { states: BTreeMap<String, StemChannel> },
    SetStemVolume { id: String, volume: f32 },
    SetStemPan { id: String, pan: f32 },
    ToggleStemMute { id: String },
    ToggleStemSolo { id: String },
    MuteAllStems,
    UnmuteAllStems,
    ClearAllSolo,
    SetMasterVolume { volume: f32 },
    SetMasterPan { pan: f32 },
    ToggleMasterMute,
    SetMasterMuted { muted: bool },
    ResetStemStates,
}

impl MixerAction {
    /// Apply this action to a mixer
    pub fn apply(&self, state: &mut StemMixerState) {
        match self {
            MixerAction::InitializeStemStates { stem_ids } => {
                state.initialize_stem_states(stem_ids)
            }
            MixerAction::SetAllStemStates { states } => state
                .set_all_stem_states(states.iter().map(|(id, channel)| (id.clone(), *channel))),
            MixerAction::SetStemVolume { id, volume } => state.set_stem_volume(id, *volume),
            MixerAction::SetStemPan { id, pan } => state.set_stem_pan(id, *pan),
            MixerAction::ToggleStemMute { id } => state.toggle_stem_mute(id),
            MixerAction::ToggleStemSolo { id } => state.toggle_stem_solo(id),
            MixerAction::MuteAllStems => state.mute_all_stems(),
            MixerAction::UnmuteAllStems => state.unmute_all_stems(),
            MixerAction::ClearAllSolo => state.clear_all_solo(),
            MixerAction::SetMasterVolume { volume } => state.set_master_volume(*volume),
            MixerAction::SetMasterPan { pan } => state.set_master_pan(*pan),
            MixerAction::ToggleMasterMute => state.toggle_master_mute(),
            MixerAction::SetMasterMuted { muted } => state.set_master_muted(*muted),
            MixerAction::ResetStemStates => state.reset_stem_states(),
        }
    }
}

impl fmt::Display for MixerAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MixerAction::InitializeStemStates { stem_ids } => {
                write!(f, "Initialize {} stem(s)", stem_ids.len())
            }
            MixerAction::SetAllStemStates { states } => {
                write!(f, "Set {} stem state(s)", states.len())
            }
            MixerAction::SetStemVolume { id, volume } => {
                write!(f, "Set '{}' volume to {:.2}", id, volume)
            }
            MixerAction::SetStemPan { id, pan } => write!(f, "Set '{}' pan to {:.2}", id, pan),
            MixerAction::ToggleStemMute { id } => write!(f, "Toggle mute on '{}'", id),
            MixerAction::ToggleStemSolo { id } => write!(f, "Toggle solo on '{}'", id),
            MixerAction::MuteAllStems => write!(f, "Mute all stems"),
            MixerAction::UnmuteAllStems => write!(f, "Unmute all stems"),
            MixerAction::ClearAllSolo => write!(f, "Clear solo"),
            MixerAction::SetMasterVolume { volume } => {
                write!(f, "Set master volume to {:.2}", volume)
            }
            MixerAction::SetMasterPan { pan } => write!(f, "Set master pan to {:.2}", pan),
            MixerAction::ToggleMasterMute => write!(f, "Toggle master mute"),
            MixerAction::SetMasterMuted { muted } => {
                write!(f, "{} master", if *muted { "Mute" } else { "Unmute" })
            }
            MixerAction::ResetStemStates => write!(f, "Reset mixer"),
        }
    }
}

/// Any action the unified studio store accepts.
///
/// Untagged: the inner `type` names are disjoint, so
/// `{"type": "play"}` and `{"type": "toggle_stem_solo", "id": "drums"}`
/// both deserialize directly.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum StudioAction {
    Playback(PlaybackAction),
    Mixer(MixerAction),
}

impl From<PlaybackAction> for StudioAction {
    fn from(action: PlaybackAction) -> Self {
        StudioAction::Playback(action)
    }
}

impl From<MixerAction> for StudioAction {
    fn from(action: MixerAction) -> Self {
        StudioAction::Mixer(action)
    }
}

/// Parse a recorded session: a JSON array of actions
///
/// Each element is parsed on its own so a bad entry is reported by index.
pub fn parse_session(json: &str) -> Result<Vec<StudioAction>> {
    let raw: Vec<serde_json::Value> = serde_json::from_str(json)?;
    raw.into_iter()
        .enumerate()
        .map(|(index, value)| {
            serde_json::from_value(value).map_err(|e| StudioError::ReplayError {
                index,
                reason: e.to_string(),
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    #[test]
    fn test_playback_action_apply() {
        let mut playback = PlaybackState::new();
        PlaybackAction::SetDuration { duration: 60.0 }.apply(&mut playback);
        PlaybackAction::Seek { time: 30.0 }.apply(&mut playback);
        PlaybackAction::SkipForward { amount: None }.apply(&mut playback);
        assert_eq!(playback.current_time(), 40.0);

        PlaybackAction::SkipBackward { amount: Some(5.0) }.apply_with_skip(&mut playback, 20.0);
        assert_eq!(playback.current_time(), 35.0);

        PlaybackAction::SkipBackward { amount: None }.apply_with_skip(&mut playback, 20.0);
        assert_eq!(playback.current_time(), 15.0);
    }

    #[test]
    fn test_mixer_action_apply() {
        let mut mixer = StemMixerState::new();
        MixerAction::InitializeStemStates {
            stem_ids: vec!["a".into(), "b".into()],
        }
        .apply(&mut mixer);
        MixerAction::ToggleStemSolo { id: "b".into() }.apply(&mut mixer);

        assert_eq!(mixer.get_effective_volume("a"), 0.0);
        assert_eq!(mixer.get_effective_volume("b"), 0.85);
    }

    #[test]
    fn test_parse_studio_actions() {
        let actions: Vec<StudioAction> = serde_json::from_value(json!([
            {"type": "play"},
            {"type": "set_loop_region", "region": {"start": 1.0, "end": 4.0}},
            {"type": "skip_forward"},
            {"type": "toggle_stem_solo", "id": "drums"},
            {"type": "set_master_volume", "volume": 0.5}
        ]))
        .unwrap();

        assert_eq!(
            actions,
            vec![
                StudioAction::Playback(PlaybackAction::Play),
                StudioAction::Playback(PlaybackAction::SetLoopRegion {
                    region: Some(LoopRegion::new(1.0, 4.0)),
                }),
                StudioAction::Playback(PlaybackAction::SkipForward { amount: None }),
                StudioAction::Mixer(MixerAction::ToggleStemSolo { id: "drums".into() }),
                StudioAction::Mixer(MixerAction::SetMasterVolume { volume: 0.5 }),
            ]
        );
    }

    #[test]
    fn test_unknown_action_rejected() {
        let parsed: std::result::Result<StudioAction, _> =
            serde_json::from_value(json!({"type": "rewind_time"}));
        assert!(parsed.is_err());
    }

    #[test]
    fn test_parse_session_reports_index() {
        let err = parse_session(r#"[{"type": "play"}, {"type": "seek"}]"#).unwrap_err();
        assert!(matches!(err, StudioError::ReplayError { index: 1, .. }));

        let actions = parse_session(r#"[{"type": "stop"}]"#).unwrap();
        assert_eq!(actions, vec![StudioAction::Playback(PlaybackAction::Stop)]);
    }

    #[test]
    fn test_mixer_action_display() {
        let action = MixerAction::SetStemVolume {
            id: "vocals".into(),
            volume: 0.5,
        };
        assert_eq!(action.to_string(), "Set 'vocals' volume to 0.50");
        assert_eq!(MixerAction::ResetStemStates.to_string(), "Reset mixer");
    }
}
