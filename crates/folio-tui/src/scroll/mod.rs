//! Smooth scrolling for the page view
//!
//! - `easing` - easing curves for the animation
//! - `timing` - progress and interpolation helpers
//! - `config` - duration and frame-rate helpers on the core `ScrollConfig`
//! - `animation` - the animator that produces the offset fed to the scroll publisher

pub mod animation;
pub mod config;
pub mod easing;
pub mod timing;

pub use animation::ScrollAnimator;
pub use config::{ScrollConfig, ScrollConfigExt};
pub use easing::{EasingType, EasingTypeExt};
