pub mod api;
pub mod config;
pub mod error;
pub mod interaction;
pub mod loading;
pub mod parallax;
pub mod scroll;

pub use config::{AppConfig, EasingType, ScrollConfig};
pub use error::{Error, Result};
pub use loading::{LoadingStateSubscription, RequestTracker};
pub use scroll::ScrollPublisher;
