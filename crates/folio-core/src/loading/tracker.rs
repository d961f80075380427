use std::collections::BTreeMap;
use std::future::Future;
use std::sync::{Arc, Mutex, MutexGuard};

use tokio::sync::broadcast;

/// One in-flight transition for an endpoint key
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoadingEvent {
    pub endpoint: String,
    /// true on begin, false on end
    pub loading: bool,
}

#[derive(Debug)]
struct Inner {
    /// Outstanding calls per endpoint key; a key is present only while its count is > 0
    active: Mutex<BTreeMap<String, usize>>,
    events: broadcast::Sender<LoadingEvent>,
}

/// Endpoint-keyed accounting of in-flight requests
///
/// Cheap to clone; all clones share the same active set. Each key carries a
/// reference count so that overlapping calls to the same endpoint keep it marked
/// until the last one settles. Every begin and end emits exactly one
/// [`LoadingEvent`], in the order the transitions happen.
#[derive(Debug, Clone)]
pub struct RequestTracker {
    inner: Arc<Inner>,
}

impl RequestTracker {
    /// Create a tracker; `capacity` bounds each subscriber's unread event backlog
    pub fn new(capacity: usize) -> Self {
        let (events, _rx) = broadcast::channel(capacity.max(1));
        Self {
            inner: Arc::new(Inner {
                active: Mutex::new(BTreeMap::new()),
                events,
            }),
        }
    }

    /// Mark `endpoint` as in flight until the returned guard is released
    pub fn begin(&self, endpoint: impl Into<String>) -> RequestGuard {
        let endpoint = endpoint.into();
        {
            let mut active = self.lock();
            let count = active.entry(endpoint.clone()).or_insert(0);
            *count += 1;
            tracing::debug!(endpoint = %endpoint, in_flight = *count, "Request started");
            // Sent under the lock so event order matches transition order
            self.notify(&endpoint, true);
        }
        RequestGuard {
            tracker: self.clone(),
            endpoint,
            released: false,
        }
    }

    fn end(&self, endpoint: &str) {
        let mut active = self.lock();
        let remaining = match active.get_mut(endpoint) {
            Some(count) => {
                *count -= 1;
                *count
            }
            None => {
                tracing::warn!(endpoint = %endpoint, "Request ended without a matching begin");
                return;
            }
        };
        if remaining == 0 {
            active.remove(endpoint);
        }
        tracing::debug!(endpoint = %endpoint, in_flight = remaining, "Request settled");
        self.notify(endpoint, false);
    }

    /// Run `fut` with `endpoint` marked in flight
    ///
    /// The marker is released when the future completes, whatever its output, and
    /// also when the future is dropped before completing. The output is returned
    /// unchanged.
    pub async fn track<F>(&self, endpoint: impl Into<String>, fut: F) -> F::Output
    where
        F: Future,
    {
        let guard = self.begin(endpoint);
        let output = fut.await;
        guard.end();
        output
    }

    /// Whether any request is in flight
    pub fn is_loading(&self) -> bool {
        !self.lock().is_empty()
    }

    /// Snapshot of in-flight endpoint keys
    pub fn active_endpoints(&self) -> Vec<String> {
        self.lock().keys().cloned().collect()
    }

    /// Outstanding calls for one key
    pub fn in_flight(&self, endpoint: &str) -> usize {
        self.lock().get(endpoint).copied().unwrap_or(0)
    }

    /// Receive every subsequent transition; dropping the receiver unsubscribes
    pub fn subscribe(&self) -> broadcast::Receiver<LoadingEvent> {
        self.inner.events.subscribe()
    }

    /// Subscribe together with the in-flight counts the receiver starts from
    ///
    /// Taken under the same lock that orders events, so every transition is
    /// either in the snapshot or delivered to the receiver, never both.
    pub fn subscribe_with_snapshot(
        &self,
    ) -> (broadcast::Receiver<LoadingEvent>, BTreeMap<String, usize>) {
        let active = self.lock();
        (self.inner.events.subscribe(), active.clone())
    }

    pub fn subscriber_count(&self) -> usize {
        self.inner.events.receiver_count()
    }

    fn notify(&self, endpoint: &str, loading: bool) {
        // No receivers is not an error: nobody is watching
        let _ = self.inner.events.send(LoadingEvent {
            endpoint: endpoint.to_string(),
            loading,
        });
    }

    fn lock(&self) -> MutexGuard<'_, BTreeMap<String, usize>> {
        self.inner
            .active
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

impl Default for RequestTracker {
    fn default() -> Self {
        Self::new(256)
    }
}

/// Scoped in-flight marker; released exactly once, on `end()` or on drop
#[derive(Debug)]
#[must_use = "dropping the guard immediately ends the request"]
pub struct RequestGuard {
    tracker: RequestTracker,
    endpoint: String,
    released: bool,
}

impl RequestGuard {
    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    /// Release the marker now
    pub fn end(mut self) {
        self.release();
    }

    fn release(&mut self) {
        if !self.released {
            self.released = true;
            self.tracker.end(&self.endpoint);
        }
    }
}

impl Drop for RequestGuard {
    fn drop(&mut self) {
        self.release();
    }
}
