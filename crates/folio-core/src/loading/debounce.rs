//! Display debounce for the loading indicator
//!
//! ```text
//! Idle --loading--> PendingShow --deadline--> Shown
//!  ^                    |                       |
//!  +-------idle---------+---------idle----------+
//! ```

use std::time::Duration;

use tokio::time::Instant;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DisplayState {
    Idle,
    /// Loading, waiting for the timer armed at `deadline`
    PendingShow { deadline: Instant },
    Shown,
}

/// Finite-state machine deciding when a loading indicator becomes visible
///
/// Driven by explicit instants: the caller reports tracker transitions with
/// [`on_loading`](Self::on_loading) and fires the timer with
/// [`poll`](Self::poll) once [`deadline`](Self::deadline) has passed.
#[derive(Debug, Clone)]
pub struct DisplayDebounce {
    delay: Duration,
    state: DisplayState,
}

impl DisplayDebounce {
    pub fn new(delay: Duration) -> Self {
        Self {
            delay,
            state: DisplayState::Idle,
        }
    }

    pub fn state(&self) -> DisplayState {
        self.state
    }

    pub fn is_shown(&self) -> bool {
        self.state == DisplayState::Shown
    }

    /// Armed timer, if any
    pub fn deadline(&self) -> Option<Instant> {
        match self.state {
            DisplayState::PendingShow { deadline } => Some(deadline),
            _ => None,
        }
    }

    /// Report whether the tracker is currently loading
    pub fn on_loading(&mut self, loading: bool, now: Instant) {
        self.state = match (self.state, loading) {
            (DisplayState::Idle, true) if self.delay.is_zero() => DisplayState::Shown,
            (DisplayState::Idle, true) => DisplayState::PendingShow {
                deadline: now + self.delay,
            },
            // Timer keeps running while loading continues
            (pending @ DisplayState::PendingShow { .. }, true) => pending,
            (DisplayState::Shown, true) => DisplayState::Shown,
            (_, false) => DisplayState::Idle,
        };
    }

    /// Fire the timer if due; returns true on the transition to `Shown`
    pub fn poll(&mut self, now: Instant) -> bool {
        match self.state {
            DisplayState::PendingShow { deadline } if now >= deadline => {
                self.state = DisplayState::Shown;
                true
            }
            _ => false,
        }
    }
}
