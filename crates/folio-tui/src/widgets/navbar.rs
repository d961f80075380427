use ratatui::{
    layout::Rect,
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::Paragraph,
    Frame,
};

use crate::app::App;

pub struct NavbarWidget;

impl NavbarWidget {
    pub fn render(frame: &mut Frame, area: Rect, app: &App) {
        let theme = &app.theme;
        // Compact, filled bar once the page has scrolled
        let bg = if app.indicators.navbar_scrolled {
            theme.bg2
        } else {
            theme.bg0
        };

        let name = app
            .profile
            .as_ref()
            .map(|p| p.user.full_name())
            .unwrap_or_else(|| "folio".to_string());
        let current = app.current_section().map(|s| s.kind);

        let mut spans = vec![Span::styled(
            format!(" {} ", name),
            Style::default().fg(theme.heading).add_modifier(Modifier::BOLD),
        )];
        for section in app.page.sections() {
            let style = if Some(section.kind) == current {
                Style::default().fg(theme.accent).add_modifier(Modifier::BOLD)
            } else {
                Style::default().fg(theme.grey2)
            };
            spans.push(Span::styled(format!("  {}", section.kind.title()), style));
        }

        let paragraph = Paragraph::new(Line::from(spans)).style(Style::default().bg(bg));
        frame.render_widget(paragraph, area);
    }
}
