use std::ops::Range;
use std::time::Duration;

/// Viewports narrower than this are phones
pub const TABLET_MIN_WIDTH: u32 = 768;
/// Viewports at least this wide are desktops
pub const DESKTOP_MIN_WIDTH: u32 = 1024;
/// Carousel auto-advance period
pub const AUTO_ADVANCE: Duration = Duration::from_secs(5);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Breakpoint {
    Mobile,
    Tablet,
    Desktop,
}

impl Breakpoint {
    pub fn from_width(width: u32) -> Self {
        if width < TABLET_MIN_WIDTH {
            Breakpoint::Mobile
        } else if width < DESKTOP_MIN_WIDTH {
            Breakpoint::Tablet
        } else {
            Breakpoint::Desktop
        }
    }

    pub fn projects_per_slide(self) -> usize {
        match self {
            Breakpoint::Mobile => 1,
            Breakpoint::Tablet => 2,
            Breakpoint::Desktop => 3,
        }
    }
}

/// Paged view over the active projects, sized by breakpoint
#[derive(Debug, Clone)]
pub struct Carousel {
    items: usize,
    per_slide: usize,
    index: usize,
}

impl Carousel {
    pub fn new(items: usize, breakpoint: Breakpoint) -> Self {
        Self {
            items,
            per_slide: breakpoint.projects_per_slide(),
            index: 0,
        }
    }

    pub fn slides(&self) -> usize {
        self.items.div_ceil(self.per_slide)
    }

    pub fn index(&self) -> usize {
        self.index
    }

    pub fn per_slide(&self) -> usize {
        self.per_slide
    }

    /// Auto-advance only makes sense with more than one slide
    pub fn auto_advances(&self) -> bool {
        self.slides() > 1
    }

    pub fn next(&mut self) {
        let slides = self.slides();
        if slides > 0 {
            self.index = (self.index + 1) % slides;
        }
    }

    pub fn prev(&mut self) {
        let slides = self.slides();
        if slides > 0 {
            self.index = (self.index + slides - 1) % slides;
        }
    }

    /// Viewport resized; a layout change returns to the first slide
    pub fn on_resize(&mut self, width: u32) -> bool {
        let per_slide = Breakpoint::from_width(width).projects_per_slide();
        if per_slide == self.per_slide {
            return false;
        }
        self.per_slide = per_slide;
        self.index = 0;
        true
    }

    /// Item indices on the current slide
    pub fn visible_range(&self) -> Range<usize> {
        let start = (self.index * self.per_slide).min(self.items);
        let end = (start + self.per_slide).min(self.items);
        start..end
    }
}
