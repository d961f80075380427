use std::sync::Arc;
use std::time::Duration;

use anyhow::Result;
use crossterm::event::{self, Event, KeyEvent, KeyEventKind, MouseEvent};
use folio_core::api::ProfileData;

/// Terminal event source
pub struct EventHandler {
    tick_rate: Duration,
    frame_interval: Duration,
}

/// Outcome of a background profile load
pub enum ProfileLoadResult {
    Loaded(Arc<ProfileData>),
    Failed { error: String },
}

impl EventHandler {
    pub fn new(tick_rate_ms: u64, frame_interval: Duration) -> Self {
        Self {
            tick_rate: Duration::from_millis(tick_rate_ms),
            frame_interval,
        }
    }

    /// Poll for the next event, waiting a frame interval instead of a full tick
    /// while an animation is running
    pub fn next(&self, animating: bool) -> Result<Option<AppEvent>> {
        let timeout = if animating {
            self.frame_interval
        } else {
            self.tick_rate
        };

        if !event::poll(timeout)? {
            return Ok(Some(AppEvent::Tick));
        }

        match event::read()? {
            // Release and repeat events arrive on some platforms
            Event::Key(key) if key.kind == KeyEventKind::Press => Ok(Some(AppEvent::Key(key))),
            Event::Mouse(mouse) => Ok(Some(AppEvent::Mouse(mouse))),
            Event::Resize(w, h) => Ok(Some(AppEvent::Resize(w, h))),
            _ => Ok(None),
        }
    }
}

#[derive(Debug)]
pub enum AppEvent {
    Key(KeyEvent),
    Mouse(MouseEvent),
    Resize(u16, u16),
    Tick,
}
