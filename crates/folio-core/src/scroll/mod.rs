//! Shared scroll state
//!
//! - `publisher` - process-wide scroll offset with coalescing fan-out
//! - `indicators` - navbar, progress bar and back-to-top state derived from the offset
//! - `reveal` - in-view reveal tracking for scroll-triggered entrances

mod indicators;
mod publisher;
mod reveal;

pub use indicators::{
    ScrollIndicators, BACK_TO_TOP_AFTER, NAVBAR_SCROLLED_AFTER, PROGRESS_VISIBLE_AFTER,
};
pub use publisher::{NoScroll, ScrollPublisher, ScrollSource, ScrollSubscription};
pub use reveal::{visible_fraction, RevealTracker};
