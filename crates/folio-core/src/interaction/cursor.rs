use std::time::{Duration, Instant};

use super::viewport::Breakpoint;

/// Browsers replay touches as mouse events shortly afterwards; those are ignored
pub const COMPAT_MOUSE_WINDOW: Duration = Duration::from_millis(500);

const DOT_SIZE: f64 = 12.0;
const RING_SIZE: f64 = 32.0;
const GLOW_SIZE: f64 = 96.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputKind {
    Mouse,
    Touch,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PointerEvent {
    MouseMove { x: f64, y: f64 },
    MouseDown,
    MouseUp,
    /// Pointer entered an element; `interactive` for links, buttons and hover targets
    MouseOver { interactive: bool },
    TouchStart { x: f64, y: f64 },
    TouchMove { x: f64, y: f64 },
    TouchEnd,
    TouchCancel,
}

impl PointerEvent {
    fn is_mouse(&self) -> bool {
        matches!(
            self,
            PointerEvent::MouseMove { .. }
                | PointerEvent::MouseDown
                | PointerEvent::MouseUp
                | PointerEvent::MouseOver { .. }
        )
    }
}

/// Custom cursor state reconciled from mouse and touch input
#[derive(Debug, Clone)]
pub struct CursorState {
    x: f64,
    y: f64,
    hovering: bool,
    clicking: bool,
    input: InputKind,
    last_touch: Option<Instant>,
}

impl Default for CursorState {
    fn default() -> Self {
        Self {
            x: 0.0,
            y: 0.0,
            hovering: false,
            clicking: false,
            input: InputKind::Mouse,
            last_touch: None,
        }
    }
}

impl CursorState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn position(&self) -> (f64, f64) {
        (self.x, self.y)
    }

    pub fn is_hovering(&self) -> bool {
        self.hovering
    }

    pub fn is_clicking(&self) -> bool {
        self.clicking
    }

    pub fn input(&self) -> InputKind {
        self.input
    }

    /// Apply one input event; returns false if it was dropped as a touch replay
    pub fn apply(&mut self, event: PointerEvent, now: Instant) -> bool {
        if event.is_mouse() && self.is_compat_mouse(now) {
            return false;
        }

        match event {
            PointerEvent::MouseMove { x, y } => {
                self.x = x;
                self.y = y;
                self.input = InputKind::Mouse;
            }
            PointerEvent::MouseDown => self.clicking = true,
            PointerEvent::MouseUp => self.clicking = false,
            PointerEvent::MouseOver { interactive } => self.hovering = interactive,
            PointerEvent::TouchStart { x, y } => {
                self.x = x;
                self.y = y;
                self.clicking = true;
                self.hovering = false;
                self.input = InputKind::Touch;
                self.last_touch = Some(now);
            }
            PointerEvent::TouchMove { x, y } => {
                self.x = x;
                self.y = y;
                self.last_touch = Some(now);
            }
            PointerEvent::TouchEnd | PointerEvent::TouchCancel => {
                self.clicking = false;
                self.last_touch = Some(now);
            }
        }
        true
    }

    fn is_compat_mouse(&self, now: Instant) -> bool {
        self.last_touch
            .map(|t| now.saturating_duration_since(t) < COMPAT_MOUSE_WINDOW)
            .unwrap_or(false)
    }

    /// The custom cursor replaces the system one only for mice on wide viewports
    pub fn is_visible(&self, breakpoint: Breakpoint) -> bool {
        self.input == InputKind::Mouse && breakpoint == Breakpoint::Desktop
    }

    pub fn dot_scale(&self) -> f64 {
        if self.clicking || self.hovering {
            0.5
        } else {
            1.0
        }
    }

    pub fn ring_scale(&self) -> f64 {
        if self.hovering {
            1.5
        } else if self.clicking {
            0.8
        } else {
            1.0
        }
    }

    pub fn glow_scale(&self) -> f64 {
        if self.hovering {
            1.2
        } else if self.clicking {
            0.8
        } else {
            1.0
        }
    }

    /// Top-left corners that centre the dot, ring and glow on the pointer
    pub fn layer_origins(&self) -> [(f64, f64); 3] {
        [DOT_SIZE, RING_SIZE, GLOW_SIZE].map(|size| (self.x - size / 2.0, self.y - size / 2.0))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mouse_hover_and_click_scales() {
        let now = Instant::now();
        let mut cursor = CursorState::new();
        cursor.apply(PointerEvent::MouseMove { x: 100.0, y: 50.0 }, now);
        assert_eq!(cursor.position(), (100.0, 50.0));
        assert_eq!((cursor.dot_scale(), cursor.ring_scale(), cursor.glow_scale()), (1.0, 1.0, 1.0));

        cursor.apply(PointerEvent::MouseOver { interactive: true }, now);
        assert_eq!((cursor.dot_scale(), cursor.ring_scale(), cursor.glow_scale()), (0.5, 1.5, 1.2));

        cursor.apply(PointerEvent::MouseOver { interactive: false }, now);
        cursor.apply(PointerEvent::MouseDown, now);
        assert_eq!((cursor.dot_scale(), cursor.ring_scale(), cursor.glow_scale()), (0.5, 0.8, 0.8));

        cursor.apply(PointerEvent::MouseUp, now);
        assert!(!cursor.is_clicking());
    }

    #[test]
    fn test_layer_origins_centre_on_pointer() {
        let mut cursor = CursorState::new();
        cursor.apply(PointerEvent::MouseMove { x: 200.0, y: 100.0 }, Instant::now());
        assert_eq!(
            cursor.layer_origins(),
            [(194.0, 94.0), (184.0, 84.0), (152.0, 52.0)]
        );
    }

    #[test]
    fn test_touch_hides_cursor_and_suppresses_replayed_mouse() {
        let t0 = Instant::now();
        let mut cursor = CursorState::new();
        assert!(cursor.is_visible(Breakpoint::Desktop));

        cursor.apply(PointerEvent::TouchStart { x: 30.0, y: 40.0 }, t0);
        assert!(cursor.is_clicking());
        assert_eq!(cursor.input(), InputKind::Touch);
        assert!(!cursor.is_visible(Breakpoint::Desktop));

        cursor.apply(PointerEvent::TouchEnd, t0 + Duration::from_millis(80));
        assert!(!cursor.is_clicking());

        // Replayed mousedown/mousemove right after the touch
        assert!(!cursor.apply(PointerEvent::MouseDown, t0 + Duration::from_millis(120)));
        assert!(!cursor.apply(
            PointerEvent::MouseMove { x: 30.0, y: 40.0 },
            t0 + Duration::from_millis(130)
        ));
        assert!(!cursor.is_clicking());
        assert_eq!(cursor.input(), InputKind::Touch);

        // A real mouse later takes over again
        assert!(cursor.apply(
            PointerEvent::MouseMove { x: 300.0, y: 10.0 },
            t0 + Duration::from_secs(2)
        ));
        assert_eq!(cursor.input(), InputKind::Mouse);
        assert!(cursor.is_visible(Breakpoint::Desktop));
    }

    #[test]
    fn test_touch_cancel_releases_click() {
        let t0 = Instant::now();
        let mut cursor = CursorState::new();
        cursor.apply(PointerEvent::TouchStart { x: 1.0, y: 1.0 }, t0);
        cursor.apply(PointerEvent::TouchMove { x: 5.0, y: 9.0 }, t0);
        assert_eq!(cursor.position(), (5.0, 9.0));
        cursor.apply(PointerEvent::TouchCancel, t0);
        assert!(!cursor.is_clicking());
    }

    #[test]
    fn test_hidden_below_desktop() {
        let cursor = CursorState::new();
        assert!(!cursor.is_visible(Breakpoint::Tablet));
        assert!(!cursor.is_visible(Breakpoint::Mobile));
    }
}
