use std::sync::Arc;
use std::time::Instant;

use crossterm::event::{MouseButton, MouseEvent, MouseEventKind};
use folio_core::api::{ProfileData, ProfileStore};
use folio_core::interaction::{Breakpoint, Carousel, CursorState, PointerEvent, AUTO_ADVANCE};
use folio_core::loading::{EndpointFilter, LoadingStateSubscription, RequestTracker};
use folio_core::parallax::ParallaxConfig;
use folio_core::scroll::{ScrollIndicators, ScrollPublisher, ScrollSource, ScrollSubscription};
use folio_core::AppConfig;
use tokio::sync::mpsc;

use crate::event::ProfileLoadResult;
use crate::input::Action;
use crate::page::{PageLayout, Section, COL_PX, ROW_PX};
use crate::scroll::ScrollAnimator;
use crate::theme::Theme;

/// Rows taken by the navigation bar and the status bar
pub const CHROME_ROWS: u16 = 2;

impl ScrollSource for ScrollAnimator {
    fn scroll_offset(&self) -> Option<u32> {
        Some(self.current() * ROW_PX)
    }
}

/// Application state
pub struct App {
    pub config: Arc<AppConfig>,
    pub theme: Theme,
    store: Arc<ProfileStore>,
    load_tx: mpsc::UnboundedSender<ProfileLoadResult>,
    /// Loaded profile, kept across failed reloads
    pub profile: Option<Arc<ProfileData>>,
    pub load_error: Option<String>,
    pub page: PageLayout,
    pub animator: ScrollAnimator,
    publisher: Arc<ScrollPublisher>,
    scroll: ScrollSubscription,
    /// Last offset read from the publisher, in pixels
    pub offset_px: u32,
    pub indicators: ScrollIndicators,
    pub loading: LoadingStateSubscription,
    pub cursor: CursorState,
    /// Terminal cell under the mouse, if it has moved since start
    pub mouse_cell: Option<(u16, u16)>,
    pub carousel: Carousel,
    last_advance: Instant,
    pub parallax: ParallaxConfig,
    pub should_quit: bool,
    pub status_message: Option<String>,
    pub spinner_frame: usize,
}

impl App {
    pub fn new(
        config: Arc<AppConfig>,
        store: Arc<ProfileStore>,
        tracker: RequestTracker,
        publisher: Arc<ScrollPublisher>,
        load_tx: mpsc::UnboundedSender<ProfileLoadResult>,
        size: (u16, u16),
    ) -> Self {
        let parallax = ParallaxConfig::from(&config.parallax);
        let (cols, rows) = size;
        let page = PageLayout::build(None, cols, rows.saturating_sub(CHROME_ROWS), &parallax);
        let loading = LoadingStateSubscription::new(tracker, EndpointFilter::All, &config.loading);
        let scroll = publisher.subscribe();

        let mut app = Self {
            theme: Theme::default(),
            animator: ScrollAnimator::new(config.scroll.clone()),
            carousel: Carousel::new(0, page.breakpoint()),
            indicators: ScrollIndicators::from_offset(0, page.document_px(), page.viewport_px()),
            config,
            store,
            load_tx,
            profile: None,
            load_error: None,
            page,
            publisher,
            scroll,
            offset_px: 0,
            loading,
            cursor: CursorState::new(),
            mouse_cell: None,
            last_advance: Instant::now(),
            parallax,
            should_quit: false,
            status_message: None,
            spinner_frame: 0,
        };
        app.attach_scroll();
        app
    }

    /// Attach the publisher, capturing where the page currently sits
    pub fn attach_scroll(&mut self) {
        self.publisher.start(&self.animator);
        self.refresh_scroll_state();
    }

    /// Load the profile on a background task; `force` bypasses the cache
    pub fn request_load(&self, force: bool) {
        let store = self.store.clone();
        let tx = self.load_tx.clone();
        tokio::spawn(async move {
            let result = if force {
                store.refresh().await
            } else {
                store.get().await
            };
            let message = match result {
                Ok(profile) => ProfileLoadResult::Loaded(profile),
                Err(e) => ProfileLoadResult::Failed {
                    error: e.to_string(),
                },
            };
            // Receiver is gone once the UI has quit
            let _ = tx.send(message);
        });
    }

    pub fn handle_load_result(&mut self, result: ProfileLoadResult) {
        match result {
            ProfileLoadResult::Loaded(profile) => {
                tracing::info!(username = %profile.user.username, "Profile ready");
                self.load_error = None;
                self.carousel = Carousel::new(profile.active_projects().count(), self.page.breakpoint());
                self.profile = Some(profile);
                self.relayout();
            }
            ProfileLoadResult::Failed { error } => {
                tracing::warn!(%error, "Profile load failed");
                self.set_status(format!("Load failed: {}", error));
                self.load_error = Some(error);
            }
        }
    }

    pub fn resize(&mut self, cols: u16, rows: u16) {
        self.carousel.on_resize(cols as u32 * COL_PX);
        self.page.relayout(
            self.profile.as_deref(),
            cols,
            rows.saturating_sub(CHROME_ROWS),
            &self.parallax,
        );
        self.refresh_scroll_state();
    }

    fn relayout(&mut self) {
        let (cols, rows) = (self.page.viewport_cols(), self.page.viewport_rows());
        self.page
            .relayout(self.profile.as_deref(), cols, rows, &self.parallax);
        self.refresh_scroll_state();
    }

    pub fn breakpoint(&self) -> Breakpoint {
        self.page.breakpoint()
    }

    pub fn apply(&mut self, action: Action, now: Instant) {
        let max = self.page.max_scroll();
        let rows = self.page.viewport_rows();
        match action {
            Action::Quit => self.should_quit = true,
            Action::LineDown => self.animator.line_down(max),
            Action::LineUp => self.animator.line_up(max),
            Action::HalfPageDown => self.animator.half_page_down(rows, max),
            Action::HalfPageUp => self.animator.half_page_up(rows, max),
            Action::Top => self.animator.to_top(now),
            Action::Reload => {
                self.set_status("Reloading profile...");
                self.request_load(true);
            }
            Action::NextSlide => {
                self.carousel.next();
                self.last_advance = now;
            }
            Action::PrevSlide => {
                self.carousel.prev();
                self.last_advance = now;
            }
            Action::None => {}
        }
    }

    /// Translate a terminal mouse event for the cursor layer and wheel scrolling
    pub fn on_mouse(&mut self, mouse: MouseEvent, now: Instant) {
        let max = self.page.max_scroll();
        let event = match mouse.kind {
            MouseEventKind::ScrollDown => {
                self.animator.scroll_by(3, max);
                return;
            }
            MouseEventKind::ScrollUp => {
                self.animator.scroll_by(-3, max);
                return;
            }
            MouseEventKind::Moved | MouseEventKind::Drag(_) => {
                self.mouse_cell = Some((mouse.column, mouse.row));
                PointerEvent::MouseMove {
                    x: (mouse.column as u32 * COL_PX) as f64,
                    y: (mouse.row as u32 * ROW_PX) as f64,
                }
            }
            MouseEventKind::Down(MouseButton::Left) => PointerEvent::MouseDown,
            MouseEventKind::Up(MouseButton::Left) => PointerEvent::MouseUp,
            _ => return,
        };

        if self.cursor.apply(event, now) {
            let interactive = self.hovered_link(mouse.row);
            self.cursor
                .apply(PointerEvent::MouseOver { interactive }, now);
        }
    }

    /// Whether the screen row under the pointer is a link
    fn hovered_link(&self, screen_row: u16) -> bool {
        // Page area starts below the navigation bar
        let Some(page_row) = screen_row.checked_sub(1) else {
            return false;
        };
        if page_row >= self.page.viewport_rows() {
            return false;
        }
        let doc_row = self.animator.current() + page_row as u32;
        self.page
            .section_at(doc_row)
            .map(|section| section.is_link_row(doc_row))
            .unwrap_or(false)
    }

    /// Advance animations and read back shared state for this frame
    pub fn on_frame(&mut self, now: Instant) {
        let rows = self.animator.update(now, self.page.max_scroll());
        self.publisher.on_scroll(rows * ROW_PX);

        if self.scroll.has_changed() {
            self.refresh_scroll_state();
        }

        if self.loading.pump(tokio::time::Instant::now()) {
            tracing::debug!(
                show = self.loading.show_loading(),
                active = ?self.loading.active_endpoints(),
                "Loading state changed"
            );
        }

        if self.carousel.auto_advances() && now.duration_since(self.last_advance) >= AUTO_ADVANCE {
            self.carousel.next();
            self.last_advance = now;
        }
    }

    fn refresh_scroll_state(&mut self) {
        self.offset_px = self.scroll.offset();
        self.indicators = ScrollIndicators::from_offset(
            self.offset_px,
            self.page.document_px(),
            self.page.viewport_px(),
        );
        self.page.update_reveals(self.offset_px);
    }

    /// Section whose rows are at the top of the viewport
    pub fn current_section(&self) -> Option<&Section> {
        self.page.section_at(self.offset_px / ROW_PX)
    }

    /// First document row shown, as published
    pub fn scroll_row(&self) -> u32 {
        self.offset_px / ROW_PX
    }

    pub fn needs_fast_update(&self) -> bool {
        self.animator.needs_update()
    }

    pub fn tick(&mut self) {
        self.spinner_frame = self.spinner_frame.wrapping_add(1);
    }

    pub fn set_status(&mut self, message: impl Into<String>) {
        self.status_message = Some(message.into());
    }

    pub fn clear_status(&mut self) {
        self.status_message = None;
    }

    /// Detach from the shared scroll offset
    pub fn shutdown(&self) {
        self.publisher.stop();
    }
}
