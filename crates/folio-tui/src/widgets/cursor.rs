use ratatui::{layout::Rect, Frame};

use crate::app::App;

/// Pointer marker drawn over the page on wide terminals
pub struct CursorWidget;

impl CursorWidget {
    pub fn render(frame: &mut Frame, area: Rect, app: &App) {
        if !app.config.ui.cursor_enabled || !app.cursor.is_visible(app.breakpoint()) {
            return;
        }
        let Some((x, y)) = app.mouse_cell else {
            return;
        };
        if !area.contains((x, y).into()) {
            return;
        }

        let theme = &app.theme;
        let (dot, color) = match (app.cursor.is_hovering(), app.cursor.is_clicking()) {
            (true, _) => ("◎", theme.hover),
            (false, true) => ("●", theme.accent),
            (false, false) => ("•", theme.fg1),
        };

        let buf = frame.buffer_mut();
        if let Some(cell) = buf.cell_mut((x, y)) {
            cell.set_symbol(dot).set_fg(color);
        }
        // The ring widens around interactive targets
        if app.cursor.ring_scale() > 1.0 {
            for (rx, glyph) in [(x.checked_sub(1), "("), (x.checked_add(1), ")")] {
                let Some(rx) = rx.filter(|rx| area.contains((*rx, y).into())) else {
                    continue;
                };
                if let Some(cell) = buf.cell_mut((rx, y)) {
                    cell.set_symbol(glyph).set_fg(color);
                }
            }
        }
    }
}
