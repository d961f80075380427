use crate::parallax::ElementGeometry;

/// Tracks whether an element has scrolled far enough into view to be revealed
#[derive(Debug, Clone)]
pub struct RevealTracker {
    /// Fraction of the element that must be inside the viewport
    threshold: f64,
    /// Stay revealed after the first reveal
    once: bool,
    revealed: bool,
}

impl Default for RevealTracker {
    fn default() -> Self {
        Self::new(0.1, true)
    }
}

impl RevealTracker {
    pub fn new(threshold: f64, once: bool) -> Self {
        Self {
            threshold: threshold.clamp(0.0, 1.0),
            once,
            revealed: false,
        }
    }

    pub fn is_revealed(&self) -> bool {
        self.revealed
    }

    /// Re-evaluate against the current offset, returning the reveal state
    pub fn update(&mut self, scroll_offset: u32, geometry: &ElementGeometry) -> bool {
        if self.once && self.revealed {
            return true;
        }
        self.revealed = visible_fraction(scroll_offset, geometry) >= self.threshold
            && in_viewport(scroll_offset, geometry);
        self.revealed
    }
}

fn in_viewport(scroll_offset: u32, geometry: &ElementGeometry) -> bool {
    let view_top = scroll_offset as i64;
    let view_bottom = view_top + geometry.viewport_height as i64;
    let top = geometry.element_top;
    let bottom = top + geometry.element_height as i64;
    bottom >= view_top && top <= view_bottom
}

/// Share of the element's height currently inside the viewport
pub fn visible_fraction(scroll_offset: u32, geometry: &ElementGeometry) -> f64 {
    if geometry.element_height == 0 {
        return if in_viewport(scroll_offset, geometry) { 1.0 } else { 0.0 };
    }
    let view_top = scroll_offset as i64;
    let view_bottom = view_top + geometry.viewport_height as i64;
    let top = geometry.element_top;
    let bottom = top + geometry.element_height as i64;

    let overlap = (bottom.min(view_bottom) - top.max(view_top)).max(0);
    overlap as f64 / geometry.element_height as f64
}
