//! Standalone stem mixer store
//!
//! Wraps [`StemMixerState`] in a [`Store`]. Channel strips subscribe to
//! their own stem, the master strip to [`MixerChannel::Master`], and an
//! audio adapter that applies effective gain subscribes with
//! [`StemMixerStore::subscribe_stem_gain`], which also fires when the master
//! bus or the solo set changes.

use crate::engine::{select_master_controls, MasterControls, StemChannel, StemMixerState};
use crate::state::action::MixerAction;
use crate::state::store::{Observable, Store, SubscriptionId};

/// Change-notification groupings for the mixer
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum MixerChannel {
    /// One stem's channel strip was created or changed
    Stem(String),
    /// master_volume, master_muted, master_pan
    Master,
    /// The "any stem soloed" flag flipped
    Solo,
}

impl Observable for StemMixerState {
    type Channel = MixerChannel;

    fn changed_channels(before: &Self, after: &Self) -> Vec<MixerChannel> {
        let mut changed = Vec::new();

        for (id, channel) in after.stem_states() {
            if before.stem_states().get(id) != Some(channel) {
                changed.push(MixerChannel::Stem(id.clone()));
            }
        }
        for id in before.stem_states().keys() {
            if !after.stem_states().contains_key(id) {
                changed.push(MixerChannel::Stem(id.clone()));
            }
        }

        if select_master_controls(before) != select_master_controls(after) {
            changed.push(MixerChannel::Master);
        }
        if before.has_solo_stems() != after.has_solo_stems() {
            changed.push(MixerChannel::Solo);
        }
        changed
    }
}

/// Store exposing only the stem mixer engine
#[derive(Debug, Default)]
pub struct StemMixerStore {
    store: Store<StemMixerState>,
}

impl StemMixerStore {
    /// Empty mixer store with the default master volume
    pub fn new() -> Self {
        Self::default()
    }

    /// Store whose master starts and resets at `master_volume`
    pub fn with_master_volume(master_volume: f32) -> Self {
        Self {
            store: Store::new(StemMixerState::with_master_volume(master_volume)),
        }
    }

    /// Current mixer state
    pub fn state(&self) -> &StemMixerState {
        self.store.state()
    }

    // ========================================================================
    // Read groupings
    // ========================================================================

    /// Channel strip for `id` (defaults when unknown)
    pub fn stem_state(&self, id: &str) -> StemChannel {
        self.store.state().stem_state(id)
    }

    /// Master volume, mute and pan
    pub fn master_controls(&self) -> MasterControls {
        select_master_controls(self.store.state())
    }

    /// Final gain an audio adapter should apply to `id`
    pub fn effective_stem_volume(&self, id: &str) -> f32 {
        self.store.state().get_effective_volume(id)
    }

    /// True when `id` is silent after master, mute and solo rules
    pub fn is_stem_muted(&self, id: &str) -> bool {
        self.store.state().is_stem_effectively_muted(id)
    }

    /// Whether any stem is soloed
    pub fn has_solo_stems(&self) -> bool {
        self.store.state().has_solo_stems()
    }

    // ========================================================================
    // Actions
    // ========================================================================

    /// Apply a serialized mixer action
    pub fn dispatch(&mut self, action: &MixerAction) {
        self.store.update(|state| action.apply(state));
    }

    /// Borrow a handle exposing every mixer mutator
    ///
    /// # Example
    /// ```
    /// use musicverse::state::StemMixerStore;
    /// let mut store = StemMixerStore::new();
    /// store.actions().initialize_stem_states(["a", "b"]);
    /// store.actions().toggle_stem_solo("b");
    /// assert!(store.is_stem_muted("a"));
    /// ```
    pub fn actions(&mut self) -> StemActions<'_> {
        StemActions {
            store: &mut self.store,
        }
    }

    /// Replace the whole mixer state (e.g. when restoring a snapshot)
    pub fn replace(&mut self, state: StemMixerState) {
        self.store.replace(state);
    }

    // ========================================================================
    // Subscriptions
    // ========================================================================

    /// Listen to one mixer channel
    pub fn subscribe(
        &mut self,
        channel: MixerChannel,
        listener: impl FnMut(&StemMixerState) + Send + 'static,
    ) -> SubscriptionId {
        self.store.subscribe(channel, listener)
    }

    /// Listen for anything that can change the effective volume of `id`
    pub fn subscribe_stem_gain(
        &mut self,
        id: &str,
        listener: impl FnMut(&StemMixerState) + Send + 'static,
    ) -> SubscriptionId {
        self.store.subscribe_many(
            vec![
                MixerChannel::Stem(id.to_owned()),
                MixerChannel::Master,
                MixerChannel::Solo,
            ],
            listener,
        )
    }

    /// Listen to every mixer change
    pub fn subscribe_all(
        &mut self,
        listener: impl FnMut(&StemMixerState) + Send + 'static,
    ) -> SubscriptionId {
        self.store.subscribe_all(listener)
    }

    /// Remove a listener. Returns false if the id was unknown.
    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        self.store.unsubscribe(id)
    }
}

/// Mixer action handle borrowed from a [`StemMixerStore`]
pub struct StemActions<'a> {
    store: &'a mut Store<StemMixerState>,
}

impl StemActions<'_> {
    /// Seed default channels; existing ids keep their settings
    pub fn initialize_stem_states<I, S>(&mut self, stem_ids: I)
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.store.update(|state| state.initialize_stem_states(stem_ids));
    }

    /// Replace every channel at once
    pub fn set_all_stem_states<I, S>(&mut self, states: I)
    where
        I: IntoIterator<Item = (S, StemChannel)>,
        S: Into<String>,
    {
        self.store.update(|state| state.set_all_stem_states(states));
    }

    /// Set one stem's volume (clamped)
    pub fn set_stem_volume(&mut self, id: &str, volume: f32) {
        self.store.update(|state| state.set_stem_volume(id, volume));
    }

    /// Set one stem's pan (clamped)
    pub fn set_stem_pan(&mut self, id: &str, pan: f32) {
        self.store.update(|state| state.set_stem_pan(id, pan));
    }

    /// Flip mute on one stem
    pub fn toggle_stem_mute(&mut self, id: &str) {
        self.store.update(|state| state.toggle_stem_mute(id));
    }

    /// Flip solo on one stem
    pub fn toggle_stem_solo(&mut self, id: &str) {
        self.store.update(|state| state.toggle_stem_solo(id));
    }

    /// Mute every channel
    pub fn mute_all_stems(&mut self) {
        self.store.update(StemMixerState::mute_all_stems);
    }

    /// Unmute every channel
    pub fn unmute_all_stems(&mut self) {
        self.store.update(StemMixerState::unmute_all_stems);
    }

    /// Drop solo from every channel
    pub fn clear_all_solo(&mut self) {
        self.store.update(StemMixerState::clear_all_solo);
    }

    /// Set the master volume (clamped)
    pub fn set_master_volume(&mut self, volume: f32) {
        self.store.update(|state| state.set_master_volume(volume));
    }

    /// Set the master pan (clamped)
    pub fn set_master_pan(&mut self, pan: f32) {
        self.store.update(|state| state.set_master_pan(pan));
    }

    /// Flip the master mute
    pub fn toggle_master_mute(&mut self) {
        self.store.update(StemMixerState::toggle_master_mute);
    }

    /// Set the master mute explicitly
    pub fn set_master_muted(&mut self, muted: bool) {
        self.store.update(|state| state.set_master_muted(muted));
    }

    /// Restore master and every channel to defaults
    pub fn reset_stem_states(&mut self) {
        self.store.update(StemMixerState::reset_stem_states);
    }
}
