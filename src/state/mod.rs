//! State Management Module
//!
//! Observable stores over the playback and mixer engines, serializable
//! actions, mix undo history and mix snapshots.

pub mod action;
pub mod history;
pub mod mixer_store;
pub mod playback_store;
pub mod snapshot;
pub mod store;
pub mod studio;

pub use action::{parse_session, MixerAction, PlaybackAction, StudioAction};
pub use history::{HistoryEntry, MixHistory, DEFAULT_HISTORY_DEPTH};
pub use mixer_store::{MixerChannel, StemActions, StemMixerStore};
pub use playback_store::{LoopControls, PlaybackChannel, PlaybackControls, PlaybackStore};
pub use snapshot::{MixSnapshot, SNAPSHOT_VERSION};
pub use store::{Observable, Store, SubscriptionId};
pub use studio::{StudioChannel, StudioState, StudioStore};
