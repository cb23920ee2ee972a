//! Time calculation utilities for scroll transitions
//!
//! All functions take the current time explicitly so a transition can be
//! sampled at any instant, including in tests.

use std::time::{Duration, Instant};

/// Calculate transition progress (0.0 to 1.0) from start time and duration
///
/// A `now` earlier than `start` yields 0.0; a zero duration is already done.
#[inline]
pub fn progress(start: Instant, now: Instant, duration: Duration) -> f64 {
    if duration.is_zero() {
        return 1.0;
    }
    let elapsed = now.saturating_duration_since(start);
    let ratio = elapsed.as_secs_f64() / duration.as_secs_f64();
    ratio.clamp(0.0, 1.0)
}

/// Check if a transition is complete
#[inline]
pub fn is_complete(start: Instant, now: Instant, duration: Duration) -> bool {
    now.saturating_duration_since(start) >= duration
}

/// Linear interpolation between two values
#[inline]
pub fn lerp(from: f64, to: f64, t: f64) -> f64 {
    from + (to - from) * t
}
