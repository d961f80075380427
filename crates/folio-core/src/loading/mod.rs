//! Request loading state
//!
//! `tracker` wraps the network boundary and records which endpoints have calls in
//! flight. `subscription` adapts the tracker's event stream into debounced,
//! per-consumer UI state, using the `debounce` state machine and the `message`
//! policy.

mod debounce;
mod message;
mod subscription;
mod tracker;

pub use debounce::{DisplayDebounce, DisplayState};
pub use message::StatusMessagePolicy;
pub use subscription::{EndpointFilter, LoadingStateSubscription, LoadingView};
pub use tracker::{LoadingEvent, RequestGuard, RequestTracker};
