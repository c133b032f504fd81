//! Stem Mixer State
//!
//! Per-stem channel strips (volume, pan, mute, solo) feeding a single master
//! bus, plus the effective-volume resolution that an audio adapter applies as
//! the final gain of each stem.
//!
//! Resolution order for [`StemMixerState::get_effective_volume`]:
//! 1. master muted -> 0
//! 2. stem muted -> 0
//! 3. any stem soloed and this stem is not -> 0
//! 4. otherwise `stem.volume * master_volume`

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::engine::params::{clamp_pan, clamp_volume, DEFAULT_MASTER_VOLUME};

/// State of a single stem channel strip
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct StemChannel {
    /// Channel volume (0.0 to 1.0)
    pub volume: f32,
    pub muted: bool,
    pub solo: bool,
    /// Stereo position (-1.0 hard left to 1.0 hard right)
    pub pan: f32,
}

impl Default for StemChannel {
    fn default() -> Self {
        Self {
            volume: 1.0,
            muted: false,
            solo: false,
            pan: 0.0,
        }
    }
}

impl StemChannel {
    /// Channel with volume and pan clamped into range
    pub fn new(volume: f32, muted: bool, solo: bool, pan: f32) -> Self {
        Self {
            volume,
            muted,
            solo,
            pan,
        }
        .clamped()
    }

    /// Copy of this channel with volume and pan forced into range
    pub fn clamped(self) -> Self {
        Self {
            volume: clamp_volume(self.volume),
            pan: clamp_pan(self.pan),
            ..self
        }
    }
}

/// Master bus fields read together by the master strip
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct MasterControls {
    pub master_volume: f32,
    pub master_muted: bool,
    pub master_pan: f32,
}

/// Stem mixer engine state
///
/// Stems are keyed by caller-supplied ids ("vocals", "drums", ...). Reads of
/// an id that was never written return [`StemChannel::default`]; writes to an
/// unknown id create the channel with defaults first.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StemMixerState {
    stem_states: BTreeMap<String, StemChannel>,
    master_volume: f32,
    master_muted: bool,
    master_pan: f32,
    /// True iff at least one channel has `solo` set. Updated by every
    /// mutation that touches a solo flag.
    has_solo_stems: bool,
    /// Master volume restored by `reset_stem_states`
    #[serde(skip)]
    default_master_volume: f32,
}

impl Default for StemMixerState {
    fn default() -> Self {
        Self::new()
    }
}

impl StemMixerState {
    /// Create an empty mixer with the master at 0.85
    ///
    /// # Example
    /// ```
    /// use musicverse::engine::StemMixerState;
    /// let mixer = StemMixerState::new();
    /// assert_eq!(mixer.master_volume(), 0.85);
    /// assert!(!mixer.has_solo_stems());
    /// ```
    pub fn new() -> Self {
        Self::with_master_volume(DEFAULT_MASTER_VOLUME)
    }

    /// Create an empty mixer whose master starts (and resets) at `master_volume`
    pub fn with_master_volume(master_volume: f32) -> Self {
        let master_volume = clamp_volume(master_volume);
        Self {
            stem_states: BTreeMap::new(),
            master_volume,
            master_muted: false,
            master_pan: 0.0,
            has_solo_stems: false,
            default_master_volume: master_volume,
        }
    }

    /// Return the channel for `id`, inserting a default one first if absent.
    fn channel_mut(&mut self, id: &str) -> &mut StemChannel {
        self.stem_states.entry(id.to_owned()).or_default()
    }

    fn refresh_solo_flag(&mut self) {
        self.has_solo_stems = self.stem_states.values().any(|channel| channel.solo);
    }

    // ========================================================================
    // Stem Actions
    // ========================================================================

    /// Seed default channels for ids not yet present; existing ids are untouched
    pub fn initialize_stem_states<I, S>(&mut self, stem_ids: I)
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        for id in stem_ids {
            let id = id.as_ref();
            if !self.stem_states.contains_key(id) {
                self.stem_states.insert(id.to_owned(), StemChannel::default());
            }
        }
    }

    /// Replace every channel at once. Values are clamped; the solo flag is
    /// recomputed from the new channels.
    pub fn set_all_stem_states<I, S>(&mut self, states: I)
    where
        I: IntoIterator<Item = (S, StemChannel)>,
        S: Into<String>,
    {
        self.stem_states = states
            .into_iter()
            .map(|(id, channel)| (id.into(), channel.clamped()))
            .collect();
        self.refresh_solo_flag();
    }

    /// Set a stem's volume, clamped to 0.0..=1.0
    ///
    /// Unknown ids are created with defaults first.
    ///
    /// # Example
    /// ```
    /// use musicverse::engine::StemMixerState;
    /// let mut mixer = StemMixerState::new();
    /// mixer.set_stem_volume("vocals", 1.4);
    /// assert_eq!(mixer.stem_state("vocals").volume, 1.0);
    /// ```
    pub fn set_stem_volume(&mut self, id: &str, volume: f32) {
        self.channel_mut(id).volume = clamp_volume(volume);
    }

    /// Set a stem's pan, clamped to -1.0..=1.0
    pub fn set_stem_pan(&mut self, id: &str, pan: f32) {
        self.channel_mut(id).pan = clamp_pan(pan);
    }

    /// Flip mute on one stem
    pub fn toggle_stem_mute(&mut self, id: &str) {
        let channel = self.channel_mut(id);
        channel.muted = !channel.muted;
        debug!("[MIXER] Stem '{}' muted={}", id, channel.muted);
    }

    /// Flip solo on one stem. Other stems keep their solo flags, so several
    /// stems can be soloed together.
    pub fn toggle_stem_solo(&mut self, id: &str) {
        let channel = self.channel_mut(id);
        channel.solo = !channel.solo;
        debug!("[MIXER] Stem '{}' solo={}", id, channel.solo);
        self.refresh_solo_flag();
    }

    /// Mute every existing channel
    pub fn mute_all_stems(&mut self) {
        for channel in self.stem_states.values_mut() {
            channel.muted = true;
        }
    }

    /// Unmute every existing channel
    pub fn unmute_all_stems(&mut self) {
        for channel in self.stem_states.values_mut() {
            channel.muted = false;
        }
    }

    /// Drop solo from every channel
    pub fn clear_all_solo(&mut self) {
        for channel in self.stem_states.values_mut() {
            channel.solo = false;
        }
        self.has_solo_stems = false;
    }

    // ========================================================================
    // Master Actions
    // ========================================================================

    /// Set the master bus volume, clamped to 0.0..=1.0
    pub fn set_master_volume(&mut self, volume: f32) {
        self.master_volume = clamp_volume(volume);
    }

    /// Set the master bus pan, clamped to -1.0..=1.0
    pub fn set_master_pan(&mut self, pan: f32) {
        self.master_pan = clamp_pan(pan);
    }

    /// Flip the master mute. While set, every stem resolves to 0.
    pub fn toggle_master_mute(&mut self) {
        self.master_muted = !self.master_muted;
        debug!("[MIXER] Master muted={}", self.master_muted);
    }

    /// Set the master mute explicitly
    pub fn set_master_muted(&mut self, muted: bool) {
        self.master_muted = muted;
    }

    /// Restore the master bus and every known channel to defaults
    ///
    /// Channel ids are kept so a mounted multi-stem view still lists them.
    ///
    /// # Example
    /// ```
    /// use musicverse::engine::{StemChannel, StemMixerState};
    /// let mut mixer = StemMixerState::new();
    /// mixer.set_stem_volume("vocals", 0.3);
    /// mixer.toggle_stem_solo("drums");
    /// mixer.set_master_volume(0.2);
    ///
    /// mixer.reset_stem_states();
    /// assert_eq!(mixer.master_volume(), 0.85);
    /// assert_eq!(mixer.stem_state("vocals"), StemChannel::default());
    /// assert!(!mixer.has_solo_stems());
    /// ```
    pub fn reset_stem_states(&mut self) {
        self.master_volume = self.default_master_volume;
        self.master_muted = false;
        self.master_pan = 0.0;
        for channel in self.stem_states.values_mut() {
            *channel = StemChannel::default();
        }
        self.has_solo_stems = false;
        debug!("[MIXER] Reset {} stem(s) to defaults", self.stem_states.len());
    }

    // ========================================================================
    // Derived Reads
    // ========================================================================

    /// Final gain for a stem after master mute, stem mute, and solo rules
    ///
    /// # Example
    /// ```
    /// use musicverse::engine::StemMixerState;
    /// let mut mixer = StemMixerState::new();
    /// mixer.initialize_stem_states(["a", "b"]);
    /// mixer.toggle_stem_solo("b");
    /// assert_eq!(mixer.get_effective_volume("a"), 0.0);
    /// assert_eq!(mixer.get_effective_volume("b"), 0.85);
    /// ```
    pub fn get_effective_volume(&self, id: &str) -> f32 {
        if self.master_muted {
            return 0.0;
        }

        let channel = self.stem_state(id);
        if channel.muted {
            return 0.0;
        }

        if self.has_solo_stems && !channel.solo {
            return 0.0;
        }

        channel.volume * self.master_volume
    }

    /// True when the stem resolves to zero gain for any reason
    pub fn is_stem_effectively_muted(&self, id: &str) -> bool {
        self.get_effective_volume(id) == 0.0
    }

    // ========================================================================
    // State Queries
    // ========================================================================

    /// Channel for `id`, or the default channel if it was never written
    pub fn stem_state(&self, id: &str) -> StemChannel {
        self.stem_states.get(id).copied().unwrap_or_default()
    }

    /// All channels, ordered by id
    pub fn stem_states(&self) -> &BTreeMap<String, StemChannel> {
        &self.stem_states
    }

    /// Known stem ids in sorted order
    pub fn stem_ids(&self) -> impl Iterator<Item = &str> {
        self.stem_states.keys().map(String::as_str)
    }

    /// Ids of muted stems, sorted
    pub fn muted_stem_ids(&self) -> Vec<&str> {
        self.stem_states
            .iter()
            .filter(|(_, channel)| channel.muted)
            .map(|(id, _)| id.as_str())
            .collect()
    }

    /// Ids of soloed stems, sorted
    pub fn solo_stem_ids(&self) -> Vec<&str> {
        self.stem_states
            .iter()
            .filter(|(_, channel)| channel.solo)
            .map(|(id, _)| id.as_str())
            .collect()
    }

    /// Master bus volume (0.0 to 1.0)
    pub fn master_volume(&self) -> f32 {
        self.master_volume
    }

    /// Whether the master bus is muted
    pub fn master_muted(&self) -> bool {
        self.master_muted
    }

    /// Master bus pan (-1.0 to 1.0)
    pub fn master_pan(&self) -> f32 {
        self.master_pan
    }

    /// Whether any channel is soloed
    pub fn has_solo_stems(&self) -> bool {
        self.has_solo_stems
    }

    /// Master volume restored by [`StemMixerState::reset_stem_states`]
    pub fn default_master_volume(&self) -> f32 {
        self.default_master_volume
    }

    /// Number of known channels
    pub fn len(&self) -> usize {
        self.stem_states.len()
    }

    /// True when no stem has been seeded or written
    pub fn is_empty(&self) -> bool {
        self.stem_states.is_empty()
    }
}

// ============================================================================
// Selectors
// ============================================================================

/// Selector for one stem's channel, falling back to defaults
pub fn select_stem_state(id: &str) -> impl Fn(&StemMixerState) -> StemChannel + '_ {
    move |state| state.stem_state(id)
}

/// Master strip read grouping
pub fn select_master_controls(state: &StemMixerState) -> MasterControls {
    MasterControls {
        master_volume: state.master_volume,
        master_muted: state.master_muted,
        master_pan: state.master_pan,
    }
}

/// Solo flag read grouping
pub fn select_has_solo_stems(state: &StemMixerState) -> bool {
    state.has_solo_stems
}
