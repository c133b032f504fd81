//! Playback Transport State Machine
//!
//! Owns transport state (playing/paused, playhead, duration, rate,
//! buffering/seeking flags) and loop semantics (loop mode cycling and an
//! optional A/B loop region).
//!
//! The transport does not touch audio hardware. An external audio adapter
//! reads this state to drive real playback and pushes playhead updates back
//! in through [`PlaybackState::set_current_time`],
//! [`PlaybackState::set_is_buffering`] and [`PlaybackState::set_is_seeking`].
//! Every action is callable from every state; there is no terminal state.

use std::fmt;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::engine::params::{
    clamp_duration, clamp_playback_rate, clamp_position, DEFAULT_SKIP_SECONDS,
};

/// Loop behaviour applied when the playhead reaches the end of the track
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LoopMode {
    /// Stop at the end (default)
    #[default]
    None,
    /// Loop the whole queue/track list
    All,
    /// Repeat the current track
    One,
}

impl LoopMode {
    /// Next mode in the rotation None -> All -> One -> None
    pub fn next(self) -> Self {
        match self {
            LoopMode::None => LoopMode::All,
            LoopMode::All => LoopMode::One,
            LoopMode::One => LoopMode::None,
        }
    }
}

impl fmt::Display for LoopMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LoopMode::None => write!(f, "none"),
            LoopMode::All => write!(f, "all"),
            LoopMode::One => write!(f, "one"),
        }
    }
}

/// Explicit A/B loop bounds in seconds.
///
/// The transport stores the region as given; `start < end` is not enforced.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LoopRegion {
    pub start: f64,
    pub end: f64,
}

impl LoopRegion {
    /// Region from `start` to `end` seconds
    pub fn new(start: f64, end: f64) -> Self {
        Self { start, end }
    }

    /// Length of the region in seconds (negative for an inverted region)
    pub fn length(&self) -> f64 {
        self.end - self.start
    }
}

/// Transport fields read together by transport buttons and seek bars
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct PlaybackStatus {
    pub is_playing: bool,
    pub current_time: f64,
    pub duration: f64,
}

/// Loop fields read together by loop controls
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct LoopState {
    pub loop_mode: LoopMode,
    pub loop_region: Option<LoopRegion>,
}

/// Transient loading flags
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct LoadingState {
    pub is_buffering: bool,
    pub is_seeking: bool,
}

/// Playback engine state
///
/// Invariants maintained by the setters:
/// - `duration >= 0`
/// - `playback_rate` in `[0.25, 4.0]`
/// - `current_time` in `[0, duration]` after any `seek`/`skip_*`
///   (`set_current_time` trusts its caller and stores the value verbatim)
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PlaybackState {
    is_playing: bool,
    current_time: f64,
    duration: f64,
    playback_rate: f64,
    is_buffering: bool,
    is_seeking: bool,
    loop_mode: LoopMode,
    loop_region: Option<LoopRegion>,
}

impl Default for PlaybackState {
    fn default() -> Self {
        Self::new()
    }
}

impl PlaybackState {
    /// Create a stopped transport at position 0 with no track loaded
    ///
    /// # Example
    /// ```
    /// use musicverse::engine::PlaybackState;
    /// let playback = PlaybackState::new();
    /// assert!(!playback.is_playing());
    /// assert_eq!(playback.playback_rate(), 1.0);
    /// ```
    pub fn new() -> Self {
        Self {
            is_playing: false,
            current_time: 0.0,
            duration: 0.0,
            playback_rate: 1.0,
            is_buffering: false,
            is_seeking: false,
            loop_mode: LoopMode::None,
            loop_region: None,
        }
    }

    // ========================================================================
    // Transport Controls
    // ========================================================================

    /// Start playback from the current position
    pub fn play(&mut self) {
        self.is_playing = true;
        debug!("[TRANSPORT] Play from {:.3}s", self.current_time);
    }

    /// Pause playback, keeping the playhead where it is
    pub fn pause(&mut self) {
        self.is_playing = false;
        debug!("[TRANSPORT] Paused at {:.3}s", self.current_time);
    }

    /// Flip between playing and paused
    pub fn toggle_play(&mut self) {
        if self.is_playing {
            self.pause();
        } else {
            self.play();
        }
    }

    /// Stop playback and rewind to the start
    ///
    /// # Example
    /// ```
    /// use musicverse::engine::PlaybackState;
    /// let mut playback = PlaybackState::new();
    /// playback.play();
    /// playback.set_current_time(42.0);
    /// playback.stop();
    /// assert!(!playback.is_playing());
    /// assert_eq!(playback.current_time(), 0.0);
    /// ```
    pub fn stop(&mut self) {
        self.is_playing = false;
        self.current_time = 0.0;
        debug!("[TRANSPORT] Stopped, playhead reset to 0");
    }

    /// Mirror a raw playhead position from the audio element.
    ///
    /// Stored verbatim; use [`seek`](Self::seek) for user-initiated jumps.
    pub fn set_current_time(&mut self, time: f64) {
        self.current_time = time;
    }

    /// Set the track length; negative values become 0
    pub fn set_duration(&mut self, duration: f64) {
        self.duration = clamp_duration(duration);
    }

    /// Jump to a position, clamped to `[0, duration]`
    ///
    /// # Example
    /// ```
    /// use musicverse::engine::PlaybackState;
    /// let mut playback = PlaybackState::new();
    /// playback.set_duration(180.0);
    /// playback.seek(200.0);
    /// assert_eq!(playback.current_time(), 180.0);
    /// ```
    pub fn seek(&mut self, time: f64) {
        self.current_time = clamp_position(time, self.duration);
        debug!("[TRANSPORT] Seek to {:.3}s", self.current_time);
    }

    /// Move the playhead forward by `amount` seconds (clamped to duration)
    pub fn skip_forward(&mut self, amount: f64) {
        self.seek(self.current_time + amount);
    }

    /// Move the playhead back by `amount` seconds (clamped to 0)
    pub fn skip_backward(&mut self, amount: f64) {
        self.seek(self.current_time - amount);
    }

    /// Skip forward by the default 10 seconds
    pub fn skip_forward_default(&mut self) {
        self.skip_forward(DEFAULT_SKIP_SECONDS);
    }

    /// Skip backward by the default 10 seconds
    pub fn skip_backward_default(&mut self) {
        self.skip_backward(DEFAULT_SKIP_SECONDS);
    }

    /// Set the speed multiplier, clamped to `[0.25, 4.0]`
    pub fn set_playback_rate(&mut self, rate: f64) {
        self.playback_rate = clamp_playback_rate(rate);
        debug!("[TRANSPORT] Playback rate {:.2}x", self.playback_rate);
    }

    /// Set while the audio source is waiting for data
    pub fn set_is_buffering(&mut self, buffering: bool) {
        self.is_buffering = buffering;
    }

    /// Set while a seek is in flight
    pub fn set_is_seeking(&mut self, seeking: bool) {
        self.is_seeking = seeking;
    }

    // ========================================================================
    // Loop Controls
    // ========================================================================

    /// Set the loop mode directly
    pub fn set_loop_mode(&mut self, mode: LoopMode) {
        self.loop_mode = mode;
    }

    /// Rotate the loop mode None -> All -> One -> None
    ///
    /// # Example
    /// ```
    /// use musicverse::engine::{LoopMode, PlaybackState};
    /// let mut playback = PlaybackState::new();
    /// playback.cycle_loop_mode();
    /// assert_eq!(playback.loop_mode(), LoopMode::All);
    /// ```
    pub fn cycle_loop_mode(&mut self) {
        self.loop_mode = self.loop_mode.next();
        debug!("[TRANSPORT] Loop mode -> {}", self.loop_mode);
    }

    /// Set or clear the A/B loop region
    pub fn set_loop_region(&mut self, region: Option<LoopRegion>) {
        self.loop_region = region;
    }

    // ========================================================================
    // State Queries
    // ========================================================================

    /// Whether the transport is running
    pub fn is_playing(&self) -> bool {
        self.is_playing
    }

    /// Playhead position in seconds
    pub fn current_time(&self) -> f64 {
        self.current_time
    }

    /// Track length in seconds (0 when unknown)
    pub fn duration(&self) -> f64 {
        self.duration
    }

    /// Rate multiplier (0.25 to 4.0)
    pub fn playback_rate(&self) -> f64 {
        self.playback_rate
    }

    /// Whether the source is buffering
    pub fn is_buffering(&self) -> bool {
        self.is_buffering
    }

    /// Whether a seek is in flight
    pub fn is_seeking(&self) -> bool {
        self.is_seeking
    }

    /// Current loop mode
    pub fn loop_mode(&self) -> LoopMode {
        self.loop_mode
    }

    /// A/B loop region, if one is set
    pub fn loop_region(&self) -> Option<LoopRegion> {
        self.loop_region
    }
}

// ============================================================================
// Selectors
// ============================================================================

/// Transport status read grouping
///
/// # Example
/// ```
/// use musicverse::engine::{select_playback_status, PlaybackState};
/// let mut playback = PlaybackState::new();
/// playback.set_duration(90.0);
/// playback.seek(30.0);
/// let status = select_playback_status(&playback);
/// assert_eq!(status.current_time, 30.0);
/// assert!(!status.is_playing);
/// ```
pub fn select_playback_status(state: &PlaybackState) -> PlaybackStatus {
    PlaybackStatus {
        is_playing: state.is_playing,
        current_time: state.current_time,
        duration: state.duration,
    }
}

/// Loop controls read grouping
pub fn select_loop_state(state: &PlaybackState) -> LoopState {
    LoopState {
        loop_mode: state.loop_mode,
        loop_region: state.loop_region,
    }
}

/// Buffering and seeking flags
pub fn select_loading_state(state: &PlaybackState) -> LoadingState {
    LoadingState {
        is_buffering: state.is_buffering,
        is_seeking: state.is_seeking,
    }
}

/// Fraction of the track played, or 0 when no duration is known
pub fn select_progress(state: &PlaybackState) -> f64 {
    if state.duration > 0.0 {
        state.current_time / state.duration
    } else {
        0.0
    }
}

// ============================================================================
// Unit Tests
// ============================================================================
