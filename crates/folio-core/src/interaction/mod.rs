//! Pointer and viewport interaction state
//!
//! - `viewport` - width breakpoints and the project carousel
//! - `cursor` - custom cursor layers reconciled from mouse and touch input

mod cursor;
mod viewport;

pub use cursor::{CursorState, InputKind, PointerEvent, COMPAT_MOUSE_WINDOW};
pub use viewport::{
    Breakpoint, Carousel, AUTO_ADVANCE, DESKTOP_MIN_WIDTH, TABLET_MIN_WIDTH,
};
