//! Standalone playback store
//!
//! Wraps [`PlaybackState`] in a [`Store`] and exposes the read groupings a
//! transport UI subscribes to (status, loop, rate, loading) plus handles
//! that dispatch transport and loop actions.

use crate::engine::params::DEFAULT_SKIP_SECONDS;
use crate::engine::{
    select_loading_state, select_loop_state, select_playback_status, select_progress,
    LoadingState, LoopMode, LoopRegion, LoopState, PlaybackState, PlaybackStatus,
};
use crate::state::action::PlaybackAction;
use crate::state::store::{Observable, Store, SubscriptionId};

/// Change-notification groupings for the transport
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PlaybackChannel {
    /// is_playing, current_time, duration
    Status,
    /// loop_mode, loop_region
    Loop,
    /// playback_rate
    Rate,
    /// is_buffering, is_seeking
    Loading,
}

impl Observable for PlaybackState {
    type Channel = PlaybackChannel;

    fn changed_channels(before: &Self, after: &Self) -> Vec<PlaybackChannel> {
        let mut changed = Vec::new();
        if status_changed(&select_playback_status(before), &select_playback_status(after)) {
            changed.push(PlaybackChannel::Status);
        }
        if loop_changed(&select_loop_state(before), &select_loop_state(after)) {
            changed.push(PlaybackChannel::Loop);
        }
        if !same_seconds(before.playback_rate(), after.playback_rate()) {
            changed.push(PlaybackChannel::Rate);
        }
        if select_loading_state(before) != select_loading_state(after) {
            changed.push(PlaybackChannel::Loading);
        }
        changed
    }
}

/// Float equality that treats two NaNs as the same value.
///
/// `set_current_time` and `set_loop_region` store their input verbatim, so
/// a NaN playhead must not look changed on every later update.
fn same_seconds(a: f64, b: f64) -> bool {
    a == b || (a.is_nan() && b.is_nan())
}

fn status_changed(before: &PlaybackStatus, after: &PlaybackStatus) -> bool {
    before.is_playing != after.is_playing
        || !same_seconds(before.current_time, after.current_time)
        || !same_seconds(before.duration, after.duration)
}

fn loop_changed(before: &LoopState, after: &LoopState) -> bool {
    if before.loop_mode != after.loop_mode {
        return true;
    }
    match (before.loop_region, after.loop_region) {
        (None, None) => false,
        (Some(a), Some(b)) => !same_seconds(a.start, b.start) || !same_seconds(a.end, b.end),
        _ => true,
    }
}

/// Store exposing only the playback engine
#[derive(Debug)]
pub struct PlaybackStore {
    store: Store<PlaybackState>,
    skip_seconds: f64,
}

impl Default for PlaybackStore {
    fn default() -> Self {
        Self::new()
    }
}

impl PlaybackStore {
    /// Store with the default 10 second skip step
    pub fn new() -> Self {
        Self::with_skip_seconds(DEFAULT_SKIP_SECONDS)
    }

    /// Store whose default skip step is `skip_seconds`
    pub fn with_skip_seconds(skip_seconds: f64) -> Self {
        Self {
            store: Store::new(PlaybackState::new()),
            skip_seconds,
        }
    }

    /// Current playback state
    pub fn state(&self) -> &PlaybackState {
        self.store.state()
    }

    // ========================================================================
    // Read groupings
    // ========================================================================

    /// is_playing, current_time and duration
    pub fn status(&self) -> PlaybackStatus {
        select_playback_status(self.store.state())
    }

    /// Loop mode and region
    pub fn loop_state(&self) -> LoopState {
        select_loop_state(self.store.state())
    }

    /// Played fraction, 0 when the duration is unknown
    pub fn progress(&self) -> f64 {
        select_progress(self.store.state())
    }

    /// Buffering and seeking flags
    pub fn loading_state(&self) -> LoadingState {
        select_loading_state(self.store.state())
    }

    /// Current rate multiplier
    pub fn playback_rate(&self) -> f64 {
        self.store.state().playback_rate()
    }

    /// Step used by skips without an explicit amount
    pub fn skip_seconds(&self) -> f64 {
        self.skip_seconds
    }

    // ========================================================================
    // Actions
    // ========================================================================

    /// Apply a serialized action through the store's single update path
    pub fn dispatch(&mut self, action: &PlaybackAction) {
        let skip_seconds = self.skip_seconds;
        self.store
            .update(|state| action.apply_with_skip(state, skip_seconds));
    }

    /// Borrow a transport action handle
    pub fn controls(&mut self) -> PlaybackControls<'_> {
        PlaybackControls { store: self }
    }

    /// Borrow a loop action handle
    pub fn loop_controls(&mut self) -> LoopControls<'_> {
        LoopControls {
            store: &mut self.store,
        }
    }

    // ========================================================================
    // Subscriptions
    // ========================================================================

    /// Listen to one transport channel
    pub fn subscribe(
        &mut self,
        channel: PlaybackChannel,
        listener: impl FnMut(&PlaybackState) + Send + 'static,
    ) -> SubscriptionId {
        self.store.subscribe(channel, listener)
    }

    /// Listen to every transport change
    pub fn subscribe_all(
        &mut self,
        listener: impl FnMut(&PlaybackState) + Send + 'static,
    ) -> SubscriptionId {
        self.store.subscribe_all(listener)
    }

    /// Remove a listener. Returns false if the id was unknown.
    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        self.store.unsubscribe(id)
    }
}

/// Transport action handle borrowed from a [`PlaybackStore`]
pub struct PlaybackControls<'a> {
    store: &'a mut PlaybackStore,
}

impl PlaybackControls<'_> {
    fn update(&mut self, mutate: impl FnOnce(&mut PlaybackState)) {
        self.store.store.update(mutate);
    }

    /// Start playback
    pub fn play(&mut self) {
        self.update(PlaybackState::play);
    }

    /// Pause, keeping the playhead
    pub fn pause(&mut self) {
        self.update(PlaybackState::pause);
    }

    /// Play if paused, pause if playing
    pub fn toggle_play(&mut self) {
        self.update(PlaybackState::toggle_play);
    }

    /// Stop and rewind to zero
    pub fn stop(&mut self) {
        self.update(PlaybackState::stop);
    }

    /// Move the playhead, clamped to the track
    pub fn seek(&mut self, time: f64) {
        self.update(|state| state.seek(time));
    }

    /// Skip forward by `amount`, or by the store's skip step when `None`
    pub fn skip_forward(&mut self, amount: Option<f64>) {
        let amount = amount.unwrap_or(self.store.skip_seconds);
        self.update(|state| state.skip_forward(amount));
    }

    /// Skip backward by `amount`, or by the store's skip step when `None`
    pub fn skip_backward(&mut self, amount: Option<f64>) {
        let amount = amount.unwrap_or(self.store.skip_seconds);
        self.update(|state| state.skip_backward(amount));
    }

    /// Set the rate multiplier (clamped to 0.25..=4.0)
    pub fn set_playback_rate(&mut self, rate: f64) {
        self.update(|state| state.set_playback_rate(rate));
    }

    /// Mirror the audio element's playhead verbatim
    pub fn set_current_time(&mut self, time: f64) {
        self.update(|state| state.set_current_time(time));
    }

    /// Set the track length (negative becomes 0)
    pub fn set_duration(&mut self, duration: f64) {
        self.update(|state| state.set_duration(duration));
    }

    /// Set the buffering flag
    pub fn set_is_buffering(&mut self, buffering: bool) {
        self.update(|state| state.set_is_buffering(buffering));
    }

    /// Set the seeking flag
    pub fn set_is_seeking(&mut self, seeking: bool) {
        self.update(|state| state.set_is_seeking(seeking));
    }
}

/// Loop action handle borrowed from a [`PlaybackStore`]
pub struct LoopControls<'a> {
    store: &'a mut Store<PlaybackState>,
}

impl LoopControls<'_> {
    /// Set the loop mode
    pub fn set_loop_mode(&mut self, mode: LoopMode) {
        self.store.update(|state| state.set_loop_mode(mode));
    }

    /// Advance none -> all -> one -> none
    pub fn cycle_loop_mode(&mut self) {
        self.store.update(PlaybackState::cycle_loop_mode);
    }

    /// Set or clear the A/B region
    pub fn set_loop_region(&mut self, region: Option<LoopRegion>) {
        self.store.update(|state| state.set_loop_region(region));
    }
}
