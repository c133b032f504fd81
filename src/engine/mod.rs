//! Studio Engine Module
//!
//! Pure in-memory state machines driven by the studio UI:
//! - Playback transport and loop semantics
//! - Stem mixer with master bus and effective-volume resolution
//! - Shared parameter ranges

pub mod mixer;
pub mod params;
pub mod transport;

pub use mixer::{
    select_has_solo_stems, select_master_controls, select_stem_state, MasterControls,
    StemChannel, StemMixerState,
};
pub use params::{DEFAULT_MASTER_VOLUME, DEFAULT_SKIP_SECONDS};
pub use transport::{
    select_loading_state, select_loop_state, select_playback_status, select_progress,
    LoadingState, LoopMode, LoopRegion, LoopState, PlaybackState, PlaybackStatus,
};
