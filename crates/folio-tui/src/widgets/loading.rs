use ratatui::{
    layout::Rect,
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Clear, Paragraph},
    Frame,
};

use crate::app::App;

const SPINNER: [&str; 10] = ["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏"];

/// Debounced loading badge in the top-right corner of the page
pub struct LoadingWidget;

impl LoadingWidget {
    pub fn render(frame: &mut Frame, area: Rect, app: &App) {
        if !app.loading.show_loading() {
            return;
        }
        let theme = &app.theme;
        let message = app
            .loading
            .view()
            .message
            .unwrap_or_else(|| "Loading...".to_string());
        let text = format!(" {} {} ", SPINNER[app.spinner_frame % SPINNER.len()], message);

        let width = (text.chars().count() as u16).min(area.width);
        let badge = Rect {
            x: area.x + area.width - width,
            y: area.y,
            width,
            height: area.height.min(1),
        };

        frame.render_widget(Clear, badge);
        frame.render_widget(
            Paragraph::new(Line::from(Span::styled(
                text,
                Style::default()
                    .fg(theme.accent)
                    .bg(theme.bg1)
                    .add_modifier(Modifier::BOLD),
            ))),
            badge,
        );
    }
}
