use std::sync::atomic::{AtomicBool, Ordering};

use tokio::sync::watch;

/// Host capability that reports the current vertical scroll offset
///
/// `None` means the host cannot report scrolling; the publisher then holds a
/// constant zero offset.
pub trait ScrollSource: Send + Sync {
    fn scroll_offset(&self) -> Option<u32>;
}

/// A host without any scroll capability
#[derive(Debug, Clone, Copy, Default)]
pub struct NoScroll;

impl ScrollSource for NoScroll {
    fn scroll_offset(&self) -> Option<u32> {
        None
    }
}

/// Single source of truth for how far the document has been scrolled
///
/// Constructed once by the host and shared by handle. Updates are coalesced:
/// a subscriber that falls behind only observes the latest offset, never a
/// stale one.
#[derive(Debug)]
pub struct ScrollPublisher {
    tx: watch::Sender<u32>,
    attached: AtomicBool,
}

impl Default for ScrollPublisher {
    fn default() -> Self {
        Self::new()
    }
}

impl ScrollPublisher {
    pub fn new() -> Self {
        let (tx, _rx) = watch::channel(0);
        Self {
            tx,
            attached: AtomicBool::new(false),
        }
    }

    /// Attach to the host's scroll signal and capture the current offset
    ///
    /// The capture covers pages that load already scrolled (anchor navigation,
    /// history restoration).
    pub fn start(&self, source: &dyn ScrollSource) {
        let was_attached = self.attached.swap(true, Ordering::SeqCst);
        let offset = source.scroll_offset().unwrap_or(0);
        tracing::debug!(offset, restarted = was_attached, "Scroll publisher started");
        self.publish(offset);
    }

    /// Scroll event entry point; ignored while detached
    pub fn on_scroll(&self, offset: u32) {
        if self.is_attached() {
            self.publish(offset);
        }
    }

    /// Detach from the host; existing and new subscribers stop receiving updates
    pub fn stop(&self) {
        if self.attached.swap(false, Ordering::SeqCst) {
            tracing::debug!(offset = self.offset(), "Scroll publisher stopped");
        }
    }

    pub fn is_attached(&self) -> bool {
        self.attached.load(Ordering::SeqCst)
    }

    /// Latest published offset
    pub fn offset(&self) -> u32 {
        *self.tx.borrow()
    }

    pub fn subscribe(&self) -> ScrollSubscription {
        ScrollSubscription {
            rx: self.tx.subscribe(),
        }
    }

    pub fn subscriber_count(&self) -> usize {
        self.tx.receiver_count()
    }

    fn publish(&self, offset: u32) {
        self.tx.send_if_modified(|current| {
            if *current == offset {
                false
            } else {
                *current = offset;
                true
            }
        });
    }
}

/// Consumer handle for the shared scroll offset; dropping it unsubscribes
#[derive(Debug, Clone)]
pub struct ScrollSubscription {
    rx: watch::Receiver<u32>,
}

impl ScrollSubscription {
    /// Current offset, marking it as seen
    pub fn offset(&mut self) -> u32 {
        *self.rx.borrow_and_update()
    }

    /// Current offset without marking it as seen
    pub fn peek(&self) -> u32 {
        *self.rx.borrow()
    }

    /// Whether an offset newer than the last one read is available
    pub fn has_changed(&self) -> bool {
        self.rx.has_changed().unwrap_or(false)
    }

    /// Wait for the next offset; `None` once the publisher is gone
    pub async fn changed(&mut self) -> Option<u32> {
        self.rx.changed().await.ok()?;
        Some(*self.rx.borrow_and_update())
    }

    /// Explicit unsubscribe
    pub fn unsubscribe(self) {}
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    struct FixedScroll(u32);

    impl ScrollSource for FixedScroll {
        fn scroll_offset(&self) -> Option<u32> {
            Some(self.0)
        }
    }

    #[test]
    fn test_start_captures_initial_offset() {
        let publisher = ScrollPublisher::new();
        let mut sub = publisher.subscribe();
        publisher.start(&FixedScroll(640));
        assert!(sub.has_changed());
        assert_eq!(sub.offset(), 640);
        assert!(!sub.has_changed());
    }

    #[test]
    fn test_missing_capability_degrades_to_zero() {
        let publisher = ScrollPublisher::new();
        publisher.start(&NoScroll);
        assert!(publisher.is_attached());
        assert_eq!(publisher.offset(), 0);
    }

    #[test]
    fn test_updates_ignored_before_start_and_after_stop() {
        let publisher = ScrollPublisher::new();
        publisher.on_scroll(100);
        assert_eq!(publisher.offset(), 0);

        publisher.start(&NoScroll);
        publisher.on_scroll(250);
        assert_eq!(publisher.offset(), 250);

        publisher.stop();
        let mut late = publisher.subscribe();
        publisher.on_scroll(900);
        assert_eq!(publisher.offset(), 250);
        assert_eq!(late.offset(), 250);
        assert!(!late.has_changed());
    }

    #[test]
    fn test_rapid_updates_coalesce_to_latest() {
        let publisher = ScrollPublisher::new();
        let mut sub = publisher.subscribe();
        publisher.start(&NoScroll);
        for offset in [10, 20, 30, 40] {
            publisher.on_scroll(offset);
        }
        assert!(sub.has_changed());
        assert_eq!(sub.offset(), 40);
    }

    #[test]
    fn test_fan_out_to_many_subscribers() {
        let publisher = ScrollPublisher::new();
        let mut subs: Vec<_> = (0..5).map(|_| publisher.subscribe()).collect();
        assert_eq!(publisher.subscriber_count(), 5);
        publisher.start(&FixedScroll(75));
        for sub in subs.iter_mut() {
            assert_eq!(sub.offset(), 75);
        }

        subs.pop().unwrap().unsubscribe();
        assert_eq!(publisher.subscriber_count(), 4);
    }

    #[tokio::test]
    async fn test_changed_wakes_subscriber() {
        let publisher = std::sync::Arc::new(ScrollPublisher::new());
        publisher.start(&NoScroll);
        let mut sub = publisher.subscribe();

        let writer = publisher.clone();
        tokio::spawn(async move {
            tokio::time::sleep(Duration::from_millis(5)).await;
            writer.on_scroll(512);
        });

        assert_eq!(sub.changed().await, Some(512));
    }
}
