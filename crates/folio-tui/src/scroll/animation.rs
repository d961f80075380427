//! Scroll animation controller
//!
//! Key presses accumulate a row delta; each frame folds the delta into the
//! target and advances the eased animation towards it. The current position is
//! what the host publishes as the page's scroll offset.

use std::time::{Duration, Instant};

use super::config::{ScrollConfig, ScrollConfigExt};
use super::easing::{EasingType, EasingTypeExt};
use super::timing::{lerp_rows, progress};

#[derive(Debug, Clone)]
struct ActiveAnimation {
    start: Instant,
    from: u32,
    to: u32,
    duration: Duration,
    easing: EasingType,
}

#[derive(Debug, Clone, Default)]
pub struct ScrollAnimator {
    animation: Option<ActiveAnimation>,
    config: ScrollConfig,
    current: u32,
    /// Rows requested since the last frame
    pending_delta: i64,
}

impl ScrollAnimator {
    pub fn new(config: ScrollConfig) -> Self {
        Self {
            config,
            ..Default::default()
        }
    }

    pub fn config(&self) -> &ScrollConfig {
        &self.config
    }

    #[inline]
    pub fn is_animating(&self) -> bool {
        self.animation.is_some()
    }

    /// Whether the next frame has work to do; drives the fast tick rate
    #[inline]
    pub fn needs_update(&self) -> bool {
        self.animation.is_some() || self.pending_delta != 0
    }

    /// Where the page will come to rest
    pub fn target(&self) -> u32 {
        self.animation.as_ref().map(|a| a.to).unwrap_or(self.current)
    }

    #[inline]
    pub fn current(&self) -> u32 {
        self.current
    }

    /// Jump without animating
    pub fn set_position(&mut self, rows: u32) {
        self.animation = None;
        self.pending_delta = 0;
        self.current = rows;
    }

    /// Queue a relative scroll (positive = down)
    pub fn scroll_by(&mut self, delta: i64, max: u32) {
        if self.config.is_smooth() {
            self.pending_delta += delta;
        } else {
            self.current = clamp_rows(self.current as i64 + delta, max);
            self.animation = None;
        }
    }

    pub fn line_down(&mut self, max: u32) {
        self.scroll_by(self.step(), max);
    }

    pub fn line_up(&mut self, max: u32) {
        self.scroll_by(-self.step(), max);
    }

    pub fn half_page_down(&mut self, viewport_rows: u16, max: u32) {
        self.scroll_by(half_page(viewport_rows), max);
    }

    pub fn half_page_up(&mut self, viewport_rows: u16, max: u32) {
        self.scroll_by(-half_page(viewport_rows), max);
    }

    /// Animate back to the first row
    pub fn to_top(&mut self, now: Instant) {
        self.pending_delta = 0;
        self.animate_to(0, now);
    }

    /// Advance to `now` and return the current row offset
    pub fn update(&mut self, now: Instant, max: u32) -> u32 {
        if self.pending_delta != 0 {
            let target = clamp_rows(self.target() as i64 + self.pending_delta, max);
            self.pending_delta = 0;
            self.animate_to(target, now);
        }

        if let Some(ref anim) = self.animation {
            let t = progress(anim.start, anim.duration, now);
            if t >= 1.0 {
                self.current = anim.to;
                self.animation = None;
            } else {
                self.current = lerp_rows(anim.from, anim.to, anim.easing.apply(t));
            }
        }

        // Content may have shrunk under us
        self.current = self.current.min(max);
        self.current
    }

    fn animate_to(&mut self, target: u32, now: Instant) {
        if !self.config.is_smooth() || target == self.current {
            self.current = target;
            self.animation = None;
            return;
        }
        self.animation = Some(ActiveAnimation {
            start: now,
            from: self.current,
            to: target,
            duration: self.config.animation_duration(),
            easing: self.config.easing,
        });
    }

    fn step(&self) -> i64 {
        if self.config.is_smooth() {
            1
        } else {
            self.config.scroll_lines.max(1) as i64
        }
    }
}

fn half_page(viewport_rows: u16) -> i64 {
    (viewport_rows / 2).max(1) as i64
}

fn clamp_rows(rows: i64, max: u32) -> u32 {
    rows.clamp(0, max as i64) as u32
}
