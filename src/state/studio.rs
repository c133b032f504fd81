//! Unified studio store
//!
//! Composes the playback and mixer engines into a single observable state
//! with one update path. Mixer edits made through [`StudioStore::dispatch`]
//! or [`StudioStore::commit_mix`] are recorded in a [`MixHistory`];
//! transport changes never are.

use serde::Serialize;
use tracing::{debug, info};

use crate::engine::params::{DEFAULT_MASTER_VOLUME, DEFAULT_SKIP_SECONDS};
use crate::engine::{
    select_loading_state, select_loop_state, select_master_controls, select_playback_status,
    select_progress, LoadingState, LoopState, MasterControls, PlaybackState, PlaybackStatus,
    StemChannel, StemMixerState,
};
use crate::error::Result;
use crate::state::action::{MixerAction, StudioAction};
use crate::state::history::{HistoryEntry, MixHistory, DEFAULT_HISTORY_DEPTH};
use crate::state::mixer_store::MixerChannel;
use crate::state::playback_store::PlaybackChannel;
use crate::state::store::{Observable, Store, SubscriptionId};

/// Both engines side by side
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct StudioState {
    pub playback: PlaybackState,
    pub mixer: StemMixerState,
}

/// Change-notification groupings for the composed store
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum StudioChannel {
    Playback(PlaybackChannel),
    Mixer(MixerChannel),
}

impl Observable for StudioState {
    type Channel = StudioChannel;

    fn changed_channels(before: &Self, after: &Self) -> Vec<StudioChannel> {
        let playback = PlaybackState::changed_channels(&before.playback, &after.playback)
            .into_iter()
            .map(StudioChannel::Playback);
        let mixer = StemMixerState::changed_channels(&before.mixer, &after.mixer)
            .into_iter()
            .map(StudioChannel::Mixer);
        playback.chain(mixer).collect()
    }
}

/// Unified store over playback, mixer and mix history
#[derive(Debug)]
pub struct StudioStore {
    store: Store<StudioState>,
    history: MixHistory,
    skip_seconds: f64,
}

impl Default for StudioStore {
    fn default() -> Self {
        Self::new()
    }
}

impl StudioStore {
    /// Studio store with default master volume, skip step and undo depth
    pub fn new() -> Self {
        Self::with_settings(
            DEFAULT_MASTER_VOLUME,
            DEFAULT_SKIP_SECONDS,
            DEFAULT_HISTORY_DEPTH,
        )
    }

    /// Store with a custom master default, skip step and undo depth
    pub fn with_settings(master_volume: f32, skip_seconds: f64, history_depth: usize) -> Self {
        let state = StudioState {
            playback: PlaybackState::new(),
            mixer: StemMixerState::with_master_volume(master_volume),
        };
        Self {
            store: Store::new(state),
            history: MixHistory::new(history_depth),
            skip_seconds,
        }
    }

    // ========================================================================
    // Reads
    // ========================================================================

    /// Both engines
    pub fn state(&self) -> &StudioState {
        self.store.state()
    }

    /// Playback engine state
    pub fn playback(&self) -> &PlaybackState {
        &self.store.state().playback
    }

    /// Mixer engine state
    pub fn mixer(&self) -> &StemMixerState {
        &self.store.state().mixer
    }

    /// Undo history of mixer edits
    pub fn history(&self) -> &MixHistory {
        &self.history
    }

    /// Step used by skips without an explicit amount
    pub fn skip_seconds(&self) -> f64 {
        self.skip_seconds
    }

    /// Transport status read grouping
    pub fn status(&self) -> PlaybackStatus {
        select_playback_status(self.playback())
    }

    /// Loop read grouping
    pub fn loop_state(&self) -> LoopState {
        select_loop_state(self.playback())
    }

    /// Buffering and seeking flags
    pub fn loading_state(&self) -> LoadingState {
        select_loading_state(self.playback())
    }

    /// Played fraction, 0 when the duration is unknown
    pub fn progress(&self) -> f64 {
        select_progress(self.playback())
    }

    /// Channel strip for `id` (defaults when unknown)
    pub fn stem_state(&self, id: &str) -> StemChannel {
        self.mixer().stem_state(id)
    }

    /// Master volume, mute and pan
    pub fn master_controls(&self) -> MasterControls {
        select_master_controls(self.mixer())
    }

    /// Final gain for `id` after master, mute and solo rules
    pub fn effective_stem_volume(&self, id: &str) -> f32 {
        self.mixer().get_effective_volume(id)
    }

    /// True when `id` resolves to zero gain
    pub fn is_stem_muted(&self, id: &str) -> bool {
        self.mixer().is_stem_effectively_muted(id)
    }

    // ========================================================================
    // Updates
    // ========================================================================

    /// Apply any studio action; mixer actions that change state are recorded
    pub fn dispatch(&mut self, action: &StudioAction) {
        match action {
            StudioAction::Playback(action) => {
                let skip_seconds = self.skip_seconds;
                self.store
                    .update(|state| action.apply_with_skip(&mut state.playback, skip_seconds));
            }
            StudioAction::Mixer(action) => self.dispatch_mixer(action),
        }
    }

    fn dispatch_mixer(&mut self, action: &MixerAction) {
        self.commit_mix(action.to_string(), |mixer| action.apply(mixer));
    }

    /// Apply each action in order
    pub fn replay<'a>(&mut self, actions: impl IntoIterator<Item = &'a StudioAction>) -> usize {
        let mut applied = 0;
        for action in actions {
            self.dispatch(action);
            applied += 1;
        }
        info!("Replayed {} action(s)", applied);
        applied
    }

    /// Mutate playback directly (never recorded)
    pub fn update_playback<R>(&mut self, mutate: impl FnOnce(&mut PlaybackState) -> R) -> R {
        self.store.update(|state| mutate(&mut state.playback))
    }

    /// Mutate the mixer without recording history
    pub fn update_mixer<R>(&mut self, mutate: impl FnOnce(&mut StemMixerState) -> R) -> R {
        self.store.update(|state| mutate(&mut state.mixer))
    }

    /// Mutate the mixer as one undoable edit
    ///
    /// Returns `true` if the edit changed anything and was recorded.
    ///
    /// # Example
    /// ```
    /// use musicverse::state::StudioStore;
    ///
    /// let mut studio = StudioStore::new();
    /// studio.commit_mix("Balance drums", |mixer| {
    ///     mixer.set_stem_volume("drums", 0.6);
    ///     mixer.set_stem_pan("drums", -0.1);
    /// });
    ///
    /// studio.undo().unwrap();
    /// assert_eq!(studio.stem_state("drums").volume, 1.0);
    /// ```
    pub fn commit_mix(
        &mut self,
        description: impl Into<String>,
        mutate: impl FnOnce(&mut StemMixerState),
    ) -> bool {
        let history = &mut self.history;
        self.store.update(|state| {
            let before = state.mixer.clone();
            mutate(&mut state.mixer);
            history.record(description, &before, &state.mixer)
        })
    }

    /// Restore the mixer to before the last recorded edit.
    ///
    /// The playhead and every other transport field are left alone.
    pub fn undo(&mut self) -> Result<HistoryEntry> {
        let history = &mut self.history;
        let entry = self.store.update(|state| history.undo(&mut state.mixer))?;
        debug!("Undid '{}'", entry.description);
        Ok(entry)
    }

    /// Re-apply the last undone mixer edit.
    pub fn redo(&mut self) -> Result<HistoryEntry> {
        let history = &mut self.history;
        let entry = self.store.update(|state| history.redo(&mut state.mixer))?;
        debug!("Redid '{}'", entry.description);
        Ok(entry)
    }

    // ========================================================================
    // Subscriptions
    // ========================================================================

    /// Listen to one studio channel
    pub fn subscribe(
        &mut self,
        channel: StudioChannel,
        listener: impl FnMut(&StudioState) + Send + 'static,
    ) -> SubscriptionId {
        self.store.subscribe(channel, listener)
    }

    /// Listen for anything that can change the effective volume of `id`
    pub fn subscribe_stem_gain(
        &mut self,
        id: &str,
        listener: impl FnMut(&StudioState) + Send + 'static,
    ) -> SubscriptionId {
        self.store.subscribe_many(
            vec![
                StudioChannel::Mixer(MixerChannel::Stem(id.to_owned())),
                StudioChannel::Mixer(MixerChannel::Master),
                StudioChannel::Mixer(MixerChannel::Solo),
            ],
            listener,
        )
    }

    /// Listen to every studio change
    pub fn subscribe_all(
        &mut self,
        listener: impl FnMut(&StudioState) + Send + 'static,
    ) -> SubscriptionId {
        self.store.subscribe_all(listener)
    }

    /// Remove a listener. Returns false if the id was unknown.
    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        self.store.unsubscribe(id)
    }
}
