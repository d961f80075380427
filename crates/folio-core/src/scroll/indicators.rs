/// Offset past which the navigation bar switches to its compact style
pub const NAVBAR_SCROLLED_AFTER: u32 = 50;
/// Offset past which the reading progress bar is shown
pub const PROGRESS_VISIBLE_AFTER: u32 = 100;
/// Offset past which the back-to-top control is shown
pub const BACK_TO_TOP_AFTER: u32 = 500;

/// Scroll-bound page chrome derived from the shared offset
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct ScrollIndicators {
    pub navbar_scrolled: bool,
    pub progress_visible: bool,
    pub back_to_top_visible: bool,
    /// Fraction of the scrollable distance covered, in [0, 1]
    pub progress: f64,
}

impl ScrollIndicators {
    pub fn from_offset(offset: u32, document_height: u32, viewport_height: u32) -> Self {
        let scrollable = document_height.saturating_sub(viewport_height);
        let progress = if scrollable == 0 {
            0.0
        } else {
            (offset as f64 / scrollable as f64).clamp(0.0, 1.0)
        };

        Self {
            navbar_scrolled: offset > NAVBAR_SCROLLED_AFTER,
            progress_visible: offset > PROGRESS_VISIBLE_AFTER,
            back_to_top_visible: offset > BACK_TO_TOP_AFTER,
            progress,
        }
    }
}
