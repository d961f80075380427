//! Symmetric power easing used by the parallax engine
//!
//! The curve is centred at 0.5: the first half is `(2t)^k / 2`, the second half
//! mirrors it as `1 - (2(1-t))^k / 2`. Endpoints are pinned so that any exponent,
//! including zero, maps 0 to 0 and 1 to 1.

/// Default exponent for parallax bindings
pub const DEFAULT_EASING: f64 = 0.5;

/// Apply the symmetric power curve to a progress value
///
/// # Arguments
/// * `progress` - Progress in [0, 1]; values outside are clamped
/// * `exponent` - Curve exponent; 1.0 is linear
#[inline]
pub fn ease_in_out_pow(progress: f64, exponent: f64) -> f64 {
    let t = progress.clamp(0.0, 1.0);
    if t == 0.0 {
        0.0
    } else if t == 1.0 {
        1.0
    } else if t < 0.5 {
        (2.0 * t).powf(exponent) / 2.0
    } else {
        1.0 - (2.0 * (1.0 - t)).powf(exponent) / 2.0
    }
}
