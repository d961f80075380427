use ratatui::{
    layout::Rect,
    style::Style,
    text::{Line, Span},
    widgets::Paragraph,
    Frame,
};

use crate::app::App;

const GAUGE_WIDTH: usize = 20;

pub struct StatusBarWidget;

impl StatusBarWidget {
    pub fn render(frame: &mut Frame, area: Rect, app: &App) {
        let theme = &app.theme;
        let bar = Style::default().bg(theme.bg2);

        let status_text = match &app.status_message {
            Some(msg) => format!(" {}", msg),
            None => format!(
                " {:?} | {}",
                app.breakpoint(),
                app.current_section().map(|s| s.kind.title()).unwrap_or("-")
            ),
        };

        let mut spans = vec![Span::styled(status_text, bar.fg(theme.fg0))];

        if app.indicators.progress_visible {
            let filled = (app.indicators.progress * GAUGE_WIDTH as f64).round() as usize;
            spans.push(Span::styled(
                format!(" {}", "━".repeat(filled)),
                bar.fg(theme.progress),
            ));
            spans.push(Span::styled(
                format!("{} {:>3}%", "─".repeat(GAUGE_WIDTH - filled.min(GAUGE_WIDTH)), (app.indicators.progress * 100.0).round()),
                bar.fg(theme.grey0),
            ));
        }
        if app.indicators.back_to_top_visible {
            spans.push(Span::styled("  ↑ g:top", bar.fg(theme.accent)));
        }

        let used: usize = spans.iter().map(|s| s.content.chars().count()).sum();
        let help_hint = " q:quit j/k:scroll ^d/^u:page h/l:projects r:reload ";
        let padding = (area.width as usize).saturating_sub(used + help_hint.chars().count());
        spans.push(Span::styled(" ".repeat(padding), bar));
        spans.push(Span::styled(help_hint, bar.fg(theme.grey2)));

        frame.render_widget(Paragraph::new(Line::from(spans)), area);
    }
}
