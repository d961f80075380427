use std::time::Duration;

pub use folio_core::{EasingType, ScrollConfig};

/// Derived timings for `ScrollConfig`
pub trait ScrollConfigExt {
    fn animation_duration(&self) -> Duration;

    /// Frame interval while an animation is running
    fn frame_interval(&self) -> Duration;

    /// Smooth scrolling is on and has a non-zero duration
    fn is_smooth(&self) -> bool;
}

impl ScrollConfigExt for ScrollConfig {
    #[inline]
    fn animation_duration(&self) -> Duration {
        Duration::from_millis(self.animation_duration_ms)
    }

    #[inline]
    fn frame_interval(&self) -> Duration {
        match self.animation_fps {
            0 => Duration::from_millis(16),
            fps => Duration::from_millis(1000 / fps as u64),
        }
    }

    #[inline]
    fn is_smooth(&self) -> bool {
        self.smooth_enabled && self.animation_duration_ms > 0 && self.easing != EasingType::None
    }
}
