use std::collections::BTreeMap;

use regex::Regex;
use tokio::sync::broadcast::{self, error::RecvError, error::TryRecvError};
use tokio::time::Instant;

use super::debounce::DisplayDebounce;
use super::message::StatusMessagePolicy;
use super::tracker::{LoadingEvent, RequestTracker};
use crate::config::LoadingConfig;

/// Which endpoints a subscriber cares about
#[derive(Debug, Clone, Default)]
pub enum EndpointFilter {
    #[default]
    All,
    Exact(String),
    Pattern(Regex),
}

impl EndpointFilter {
    pub fn exact(endpoint: impl Into<String>) -> Self {
        EndpointFilter::Exact(endpoint.into())
    }

    pub fn pattern(pattern: &str) -> crate::Result<Self> {
        Ok(EndpointFilter::Pattern(Regex::new(pattern)?))
    }

    pub fn matches(&self, endpoint: &str) -> bool {
        match self {
            EndpointFilter::All => true,
            EndpointFilter::Exact(expected) => expected == endpoint,
            EndpointFilter::Pattern(regex) => regex.is_match(endpoint),
        }
    }
}

/// UI-facing loading state for one subscriber
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LoadingView {
    /// Raw state: a matching request is in flight right now
    pub is_loading: bool,
    /// Debounced display flag
    pub show_loading: bool,
    /// Matching in-flight endpoints
    pub active_endpoints: Vec<String>,
    pub message: Option<String>,
}

/// Turns tracker transitions into filtered, flicker-free loading state
///
/// Keeps its own per-endpoint count, mirrored from the events it receives, so
/// every transition reaches the debounce in order. A request that ends and a new
/// one that starts before the host catches up still pass through idle and
/// restart the display delay. The tracker snapshot only seeds the mirror, at
/// construction and after the receiver lags.
///
/// Owns its receiving end of the tracker's event stream; dropping the
/// subscription (or calling [`unsubscribe`](Self::unsubscribe)) detaches it.
pub struct LoadingStateSubscription {
    tracker: RequestTracker,
    rx: broadcast::Receiver<LoadingEvent>,
    filter: EndpointFilter,
    debounce: DisplayDebounce,
    policy: StatusMessagePolicy,
    /// Matching in-flight calls per endpoint
    in_flight: BTreeMap<String, usize>,
}

impl LoadingStateSubscription {
    pub fn new(tracker: RequestTracker, filter: EndpointFilter, config: &LoadingConfig) -> Self {
        let (rx, snapshot) = tracker.subscribe_with_snapshot();
        let mut subscription = Self {
            tracker,
            rx,
            filter,
            debounce: DisplayDebounce::new(config.display_delay()),
            policy: StatusMessagePolicy::new(config.messages.clone()),
            in_flight: BTreeMap::new(),
        };
        subscription.seed(snapshot, Instant::now());
        subscription
    }

    pub fn filter(&self) -> &EndpointFilter {
        &self.filter
    }

    pub fn is_loading(&self) -> bool {
        !self.in_flight.is_empty()
    }

    pub fn show_loading(&self) -> bool {
        self.debounce.is_shown()
    }

    pub fn active_endpoints(&self) -> Vec<String> {
        self.in_flight.keys().cloned().collect()
    }

    /// Whether one specific endpoint is among the matching in-flight requests
    pub fn is_endpoint_loading(&self, endpoint: &str) -> bool {
        self.in_flight.contains_key(endpoint)
    }

    pub fn view(&self) -> LoadingView {
        let active_endpoints = self.active_endpoints();
        LoadingView {
            is_loading: self.is_loading(),
            show_loading: self.debounce.is_shown(),
            message: self.policy.message_for(&active_endpoints),
            active_endpoints,
        }
    }

    /// Apply queued events and fire a due timer without waiting
    ///
    /// For hosts with their own frame loop. Returns true if the view changed.
    pub fn pump(&mut self, now: Instant) -> bool {
        let before = self.view();
        loop {
            match self.rx.try_recv() {
                Ok(event) => self.apply(&event, now),
                Err(TryRecvError::Lagged(skipped)) => {
                    tracing::debug!(skipped, "Loading subscriber lagged, resynchronising");
                    self.resync(now);
                }
                Err(TryRecvError::Empty) | Err(TryRecvError::Closed) => break,
            }
        }
        self.debounce.poll(now);
        self.view() != before
    }

    /// Wait until the view changes; `None` once the tracker is gone
    pub async fn next_change(&mut self) -> Option<LoadingView> {
        loop {
            let before = self.view();
            let deadline = self.debounce.deadline();

            tokio::select! {
                received = self.rx.recv() => {
                    match received {
                        Ok(event) => self.apply(&event, Instant::now()),
                        Err(RecvError::Lagged(skipped)) => {
                            tracing::debug!(skipped, "Loading subscriber lagged, resynchronising");
                            self.resync(Instant::now());
                        }
                        Err(RecvError::Closed) => return None,
                    }
                }
                _ = wait_until(deadline) => {
                    self.debounce.poll(Instant::now());
                }
            }

            let after = self.view();
            if after != before {
                return Some(after);
            }
        }
    }

    /// Explicit unsubscribe
    pub fn unsubscribe(self) {}

    /// Fold one transition into the mirror and feed the debounce
    fn apply(&mut self, event: &LoadingEvent, now: Instant) {
        if !self.filter.matches(&event.endpoint) {
            return;
        }
        if event.loading {
            *self.in_flight.entry(event.endpoint.clone()).or_insert(0) += 1;
        } else if let Some(count) = self.in_flight.get_mut(&event.endpoint) {
            *count -= 1;
            if *count == 0 {
                self.in_flight.remove(&event.endpoint);
            }
        }
        self.debounce.on_loading(self.is_loading(), now);
    }

    /// Start over from a fresh receiver and snapshot after missing events
    fn resync(&mut self, now: Instant) {
        let (rx, snapshot) = self.tracker.subscribe_with_snapshot();
        self.rx = rx;
        self.seed(snapshot, now);
    }

    fn seed(&mut self, snapshot: BTreeMap<String, usize>, now: Instant) {
        self.in_flight = snapshot
            .into_iter()
            .filter(|(endpoint, _)| self.filter.matches(endpoint))
            .collect();
        self.debounce.on_loading(self.is_loading(), now);
    }
}

/// Cancellable timer: pending forever when nothing is armed
async fn wait_until(deadline: Option<Instant>) {
    match deadline {
        Some(deadline) => tokio::time::sleep_until(deadline).await,
        None => std::future::pending::<()>().await,
    }
}
