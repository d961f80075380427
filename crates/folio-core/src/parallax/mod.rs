//! Parallax transform engine
//!
//! Every bound element reads the one shared scroll offset and derives its own
//! translation from its geometry and parameters. The computation is pure so that
//! any number of bindings can be evaluated per frame without coordination.

mod easing;
mod engine;

pub use easing::{ease_in_out_pow, DEFAULT_EASING};
pub use engine::{
    compute_transform, progress, Axis, Direction, ElementGeometry, ParallaxBinding,
    ParallaxConfig, Translation,
};
