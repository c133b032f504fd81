//! Parameter ranges shared by the transport and the mixer.
//!
//! Every numeric setter in the engines routes its input through one of the
//! helpers below, so out-of-range values are clamped at write time and
//! readers never need to re-check them.

// ============================================================================
// Constants
// ============================================================================

/// Minimum channel or master volume (silent)
pub const MIN_VOLUME: f32 = 0.0;

/// Maximum channel or master volume (unity)
pub const MAX_VOLUME: f32 = 1.0;

/// Hard left
pub const MIN_PAN: f32 = -1.0;

/// Hard right
pub const MAX_PAN: f32 = 1.0;

/// Slowest supported playback rate
pub const MIN_PLAYBACK_RATE: f64 = 0.25;

/// Fastest supported playback rate
pub const MAX_PLAYBACK_RATE: f64 = 4.0;

/// Master volume restored on reset. Kept below unity for headroom.
pub const DEFAULT_MASTER_VOLUME: f32 = 0.85;

/// Step used by skip forward/backward when no amount is given (seconds)
pub const DEFAULT_SKIP_SECONDS: f64 = 10.0;

// ============================================================================
// Helper Functions
// ============================================================================

/// Clamp a volume into `[0, 1]`. NaN collapses to silence.
#[inline]
pub fn clamp_volume(volume: f32) -> f32 {
    if volume.is_nan() {
        return MIN_VOLUME;
    }
    volume.clamp(MIN_VOLUME, MAX_VOLUME)
}

/// Clamp a pan position into `[-1, 1]`. NaN collapses to hard left.
#[inline]
pub fn clamp_pan(pan: f32) -> f32 {
    if pan.is_nan() {
        return MIN_PAN;
    }
    pan.clamp(MIN_PAN, MAX_PAN)
}

/// Clamp a playback rate into `[0.25, 4.0]`.
#[inline]
pub fn clamp_playback_rate(rate: f64) -> f64 {
    if rate.is_nan() {
        return MIN_PLAYBACK_RATE;
    }
    rate.clamp(MIN_PLAYBACK_RATE, MAX_PLAYBACK_RATE)
}

/// Clamp a duration to be non-negative.
#[inline]
pub fn clamp_duration(duration: f64) -> f64 {
    // f64::max returns the non-NaN operand
    duration.max(0.0)
}

/// Clamp a playhead position into `[0, duration]`.
///
/// `duration` is assumed already non-negative (see [`clamp_duration`]).
#[inline]
pub fn clamp_position(position: f64, duration: f64) -> f64 {
    if position.is_nan() {
        return 0.0;
    }
    position.clamp(0.0, duration)
}
