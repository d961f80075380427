//! Time helpers for scroll animations

use std::time::{Duration, Instant};

/// Share of `duration` elapsed between `start` and `now`, clamped to [0, 1]
#[inline]
pub fn progress(start: Instant, duration: Duration, now: Instant) -> f64 {
    if duration.is_zero() {
        return 1.0;
    }
    let elapsed = now.saturating_duration_since(start);
    (elapsed.as_secs_f64() / duration.as_secs_f64()).clamp(0.0, 1.0)
}

#[inline]
pub fn lerp(from: f64, to: f64, t: f64) -> f64 {
    from + (to - from) * t
}

/// Interpolated row offset
#[inline]
pub fn lerp_rows(from: u32, to: u32, t: f64) -> u32 {
    lerp(from as f64, to as f64, t).round().max(0.0) as u32
}
