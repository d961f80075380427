use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use super::easing::{ease_in_out_pow, DEFAULT_EASING};

/// Direction an element drifts as the page scrolls down
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    #[default]
    Up,
    Down,
    Left,
    Right,
}

impl Direction {
    pub fn axis(self) -> Axis {
        match self {
            Direction::Up | Direction::Down => Axis::Y,
            Direction::Left | Direction::Right => Axis::X,
        }
    }

    /// Sign applied to the magnitude
    fn sign(self) -> f64 {
        match self {
            Direction::Up | Direction::Left => -1.0,
            Direction::Down | Direction::Right => 1.0,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Direction::Up => "up",
            Direction::Down => "down",
            Direction::Left => "left",
            Direction::Right => "right",
        }
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Direction {
    type Err = crate::Error;

    fn from_str(s: &str) -> crate::Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "up" => Ok(Direction::Up),
            "down" => Ok(Direction::Down),
            "left" => Ok(Direction::Left),
            "right" => Ok(Direction::Right),
            other => Err(crate::Error::Other(format!(
                "unknown parallax direction '{}', expected up, down, left or right",
                other
            ))),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Axis {
    X,
    Y,
}

/// Per-element parallax parameters
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ParallaxConfig {
    /// Multiplier on the 100px travel range
    pub speed: f64,
    pub direction: Direction,
    /// Static additive offset in pixels
    pub offset_px: f64,
    /// Exponent of the easing curve
    pub easing: f64,
    /// Pin the element: translation is always zero
    pub disabled: bool,
}

impl Default for ParallaxConfig {
    fn default() -> Self {
        Self {
            speed: 0.5,
            direction: Direction::Up,
            offset_px: 0.0,
            easing: DEFAULT_EASING,
            disabled: false,
        }
    }
}

/// Element and viewport measurements in pixels
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ElementGeometry {
    /// Document-relative top of the element
    pub element_top: i64,
    pub element_height: u32,
    pub viewport_height: u32,
}

impl ElementGeometry {
    pub fn new(element_top: i64, element_height: u32, viewport_height: u32) -> Self {
        Self {
            element_top,
            element_height,
            viewport_height,
        }
    }

    /// Nothing to travel through: zero-height element in a zero-height viewport
    pub fn is_degenerate(&self) -> bool {
        self.element_height as u64 + self.viewport_height as u64 == 0
    }
}

/// A one-dimensional translation in pixels
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Translation {
    pub axis: Axis,
    pub px: f64,
}

impl Translation {
    pub fn zero(axis: Axis) -> Self {
        Self { axis, px: 0.0 }
    }

    pub fn is_zero(&self) -> bool {
        self.px == 0.0
    }

    /// CSS transform function for this translation
    pub fn to_css(&self) -> String {
        match self.axis {
            Axis::X => format!("translateX({}px)", self.px),
            Axis::Y => format!("translateY({}px)", self.px),
        }
    }
}

/// Normalised transit of the element through the viewport
///
/// 0 when the element's bottom edge would first enter from below, 1 once its top
/// edge has left above. A degenerate geometry yields 0.
pub fn progress(scroll_offset: u32, geometry: &ElementGeometry) -> f64 {
    if geometry.is_degenerate() {
        return 0.0;
    }
    let travelled =
        scroll_offset as f64 - geometry.element_top as f64 + geometry.viewport_height as f64;
    let span = geometry.element_height as f64 + geometry.viewport_height as f64;
    (travelled / span).clamp(0.0, 1.0)
}

/// Translation for one element at a given scroll offset
///
/// Pure: identical inputs always give a bit-identical result.
pub fn compute_transform(
    scroll_offset: u32,
    geometry: &ElementGeometry,
    config: &ParallaxConfig,
) -> Translation {
    let axis = config.direction.axis();
    if config.disabled || geometry.is_degenerate() {
        return Translation::zero(axis);
    }

    let eased = ease_in_out_pow(progress(scroll_offset, geometry), config.easing);
    let magnitude = (eased - 0.5) * config.speed * 100.0 + config.offset_px;

    Translation {
        axis,
        px: config.direction.sign() * magnitude,
    }
}

/// A parallax element bound to the shared scroll offset
///
/// Geometry is captured on mount and again on every viewport resize; until it has
/// been measured the binding reports a zero translation.
#[derive(Debug, Clone)]
pub struct ParallaxBinding {
    config: ParallaxConfig,
    geometry: Option<ElementGeometry>,
}

impl ParallaxBinding {
    pub fn new(config: ParallaxConfig) -> Self {
        Self {
            config,
            geometry: None,
        }
    }

    pub fn config(&self) -> &ParallaxConfig {
        &self.config
    }

    pub fn set_config(&mut self, config: ParallaxConfig) {
        self.config = config;
    }

    pub fn geometry(&self) -> Option<&ElementGeometry> {
        self.geometry.as_ref()
    }

    /// Record a fresh measurement (mount or viewport resize)
    pub fn measure(&mut self, geometry: ElementGeometry) {
        self.geometry = Some(geometry);
    }

    /// Viewport resized without the element moving
    pub fn resize_viewport(&mut self, viewport_height: u32) {
        if let Some(ref mut geometry) = self.geometry {
            geometry.viewport_height = viewport_height;
        }
    }

    pub fn translation(&self, scroll_offset: u32) -> Translation {
        match self.geometry {
            Some(ref geometry) => compute_transform(scroll_offset, geometry, &self.config),
            None => Translation::zero(self.config.direction.axis()),
        }
    }
}
