mod cursor;
mod loading;
mod navbar;
mod page;
mod status_bar;

pub use cursor::CursorWidget;
pub use loading::LoadingWidget;
pub use navbar::NavbarWidget;
pub use page::PageWidget;
pub use status_bar::StatusBarWidget;

use ratatui::{
    layout::{Constraint, Direction, Layout},
    Frame,
};

use crate::app::App;

/// Draw one frame: navigation bar, page, status bar, then overlays
pub fn draw(frame: &mut Frame, app: &App) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1), // Navbar
            Constraint::Min(1),    // Page
            Constraint::Length(1), // Status bar
        ])
        .split(frame.area());

    NavbarWidget::render(frame, chunks[0], app);
    PageWidget::render(frame, chunks[1], app);
    StatusBarWidget::render(frame, chunks[2], app);

    LoadingWidget::render(frame, chunks[1], app);
    CursorWidget::render(frame, chunks[1], app);
}
