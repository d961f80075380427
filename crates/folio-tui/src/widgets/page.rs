use folio_core::api::{ProfileData, Project};
use ratatui::{
    layout::Rect,
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::Paragraph,
    Frame,
};

use crate::app::App;
use crate::page::{content_rows, content_width, wrap, Section, SectionKind, Shift, HEADER_ROWS, MARGIN_COLS};
use crate::theme::Theme;

const ORBS: [&str; 4] = ["○", "◌", "·", "◦"];

/// Renders the visible window of the stacked sections plus their parallax layers
pub struct PageWidget;

impl PageWidget {
    pub fn render(frame: &mut Frame, area: Rect, app: &App) {
        let theme = &app.theme;
        let scroll_row = app.scroll_row();
        let hovered_row = hovered_doc_row(area, app);

        let mut lines: Vec<Line<'static>> = vec![Line::default(); area.height as usize];
        for section in app.page.sections() {
            let section_lines = section_lines(section, app, area.width, hovered_row);
            for (i, line) in section_lines.into_iter().enumerate() {
                let doc_row = section.top + i as u32;
                if let Some(y) = doc_row.checked_sub(scroll_row) {
                    if let Some(slot) = lines.get_mut(y as usize) {
                        *slot = line;
                    }
                }
            }
        }

        let paragraph = Paragraph::new(lines).style(Style::default().fg(theme.fg0).bg(theme.bg0));
        frame.render_widget(paragraph, area);

        render_layers(frame, area, app);
    }
}

fn hovered_doc_row(area: Rect, app: &App) -> Option<u32> {
    if !app.cursor.is_hovering() {
        return None;
    }
    let (_, row) = app.mouse_cell?;
    let y = row.checked_sub(area.y)?;
    (y < area.height).then(|| app.scroll_row() + y as u32)
}

/// Draw each section's floating decorations onto blank cells
fn render_layers(frame: &mut Frame, area: Rect, app: &App) {
    let scroll_row = app.scroll_row() as i64;
    let buf = frame.buffer_mut();

    for section in app.page.sections() {
        for (i, layer) in section.layers.iter().enumerate() {
            let shift = Shift::from(layer.binding.translation(app.offset_px));
            let last_row = section.top as i64 + section.height.saturating_sub(1) as i64;
            let doc_row = (section.top as i64 + layer.anchor_row as i64 + shift.rows as i64)
                .clamp(section.top as i64, last_row);
            let col = (layer.anchor_col as i64 + shift.cols as i64)
                .clamp(0, area.width.saturating_sub(1) as i64);

            let y = doc_row - scroll_row;
            if y < 0 || y >= area.height as i64 {
                continue;
            }
            let position = (area.x + col as u16, area.y + y as u16);
            if let Some(cell) = buf.cell_mut(position) {
                if cell.symbol() == " " {
                    cell.set_symbol(ORBS[i % ORBS.len()]).set_fg(app.theme.grey0);
                }
            }
        }
    }
}

fn section_lines(section: &Section, app: &App, width: u16, hovered_row: Option<u32>) -> Vec<Line<'static>> {
    let theme = &app.theme;
    let mut lines = vec![Line::default(); section.height as usize];

    if section.kind == SectionKind::Hero {
        hero_lines(&mut lines, app, width);
        return lines;
    }

    if let Some(slot) = lines.get_mut(1) {
        *slot = indent(vec![Span::styled(
            format!("── {} ──", section.kind.title()),
            Style::default().fg(theme.heading).add_modifier(Modifier::BOLD),
        )]);
    }

    // Content appears once the section has scrolled into view
    let Some(profile) = app.profile.as_deref() else {
        return lines;
    };
    if !section.reveal.is_revealed() {
        return lines;
    }

    let mut content = match section.kind {
        SectionKind::Hero => Vec::new(),
        SectionKind::About => about_lines(profile, theme, width),
        SectionKind::Skills => skills_lines(profile, theme),
        SectionKind::Experience => experience_lines(profile, theme),
        SectionKind::Projects => project_lines(profile, app, width),
        SectionKind::Contact => contact_lines(profile, theme),
    };
    content.resize(content_rows(section.kind, profile, width) as usize, Line::default());

    for (i, line) in content.into_iter().enumerate() {
        let row = HEADER_ROWS + i as u32;
        let line = if hovered_row == Some(section.top + row) && section.link_rows.contains(&row) {
            let hover = Style::default().fg(theme.hover).add_modifier(Modifier::UNDERLINED);
            Line::from(
                line.spans
                    .into_iter()
                    .map(|span| span.patch_style(hover))
                    .collect::<Vec<_>>(),
            )
        } else {
            line
        };
        if let Some(slot) = lines.get_mut(row as usize) {
            *slot = line;
        }
    }
    lines
}

fn hero_lines(lines: &mut [Line<'static>], app: &App, width: u16) {
    let theme = &app.theme;
    let middle = lines.len() / 2;

    let (title, subtitle, subtitle_style) = match (app.profile.as_deref(), app.load_error.as_deref()) {
        (Some(profile), _) => (
            profile.user.full_name(),
            wrap(&profile.user.bio, content_width(width))
                .into_iter()
                .next()
                .unwrap_or_default(),
            Style::default().fg(theme.fg1),
        ),
        (None, Some(error)) => (
            "Profile unavailable".to_string(),
            format!("{} (r to retry)", error),
            Style::default().fg(theme.error),
        ),
        (None, None) => (String::new(), String::new(), Style::default()),
    };

    let rows = [
        (middle.saturating_sub(2), Line::styled(title, Style::default().fg(theme.heading).add_modifier(Modifier::BOLD))),
        (middle, Line::styled(subtitle, subtitle_style)),
        (middle + 2, Line::styled("j/k to scroll", Style::default().fg(theme.grey0))),
    ];
    for (row, line) in rows {
        if let Some(slot) = lines.get_mut(row) {
            *slot = line.centered();
        }
    }
}

fn indent(mut spans: Vec<Span<'static>>) -> Line<'static> {
    spans.insert(0, Span::raw(" ".repeat(MARGIN_COLS as usize)));
    Line::from(spans)
}

/// Pad or truncate to exactly `width` characters
fn fit(text: &str, width: usize) -> String {
    let mut out: String = text.chars().take(width).collect();
    let len = out.chars().count();
    out.extend(std::iter::repeat(' ').take(width - len));
    out
}

fn about_lines(profile: &ProfileData, theme: &Theme, width: u16) -> Vec<Line<'static>> {
    let mut lines: Vec<Line> = wrap(&profile.user.bio, content_width(width))
        .into_iter()
        .map(|l| indent(vec![Span::raw(l)]))
        .collect();
    lines.push(Line::default());
    lines.push(indent(vec![Span::styled(
        format!(
            "{} projects · {} positions · {} skill groups",
            profile.active_projects().count(),
            profile.work_experience.len(),
            profile.skills.len()
        ),
        Style::default().fg(theme.accent),
    )]));
    lines
}

fn skills_lines(profile: &ProfileData, theme: &Theme) -> Vec<Line<'static>> {
    profile
        .skills
        .iter()
        .flat_map(|skill| {
            [
                indent(vec![Span::styled(
                    skill.category.name.clone(),
                    Style::default().fg(theme.accent).add_modifier(Modifier::BOLD),
                )]),
                indent(vec![Span::raw(skill.skills_list.join(" · "))]),
            ]
        })
        .collect()
}

fn experience_lines(profile: &ProfileData, theme: &Theme) -> Vec<Line<'static>> {
    profile
        .work_experience
        .iter()
        .flat_map(|job| {
            let end = match (job.is_current, job.end_date) {
                (true, _) | (false, None) => "Present".to_string(),
                (false, Some(date)) => date.format("%b %Y").to_string(),
            };
            [
                indent(vec![
                    Span::styled(job.position.clone(), Style::default().fg(theme.fg1).add_modifier(Modifier::BOLD)),
                    Span::styled(format!(" @ {}", job.company), Style::default().fg(theme.accent)),
                ]),
                indent(vec![Span::styled(
                    format!("{} - {}", job.start_date.format("%b %Y"), end),
                    Style::default().fg(theme.grey2),
                )]),
                indent(vec![Span::raw(job.technologies_used.join(", "))]),
                Line::default(),
            ]
        })
        .collect()
}

fn project_lines(profile: &ProfileData, app: &App, width: u16) -> Vec<Line<'static>> {
    let theme = &app.theme;
    let projects: Vec<_> = profile.active_projects().collect();
    if projects.is_empty() {
        return vec![indent(vec![Span::styled("No projects yet", Style::default().fg(theme.grey0))])];
    }

    let visible = projects.get(app.carousel.visible_range()).unwrap_or(&[]);
    let card = content_width(width) / app.carousel.per_slide().max(1);
    let inner = card.saturating_sub(2);

    vec![
        card_row(visible, inner, Style::default().fg(theme.heading).add_modifier(Modifier::BOLD), |p| {
            p.title.clone()
        }),
        card_row(visible, inner, Style::default().fg(theme.accent), |p| p.role.clone()),
        card_row(visible, inner, Style::default().fg(theme.fg0), |p| p.description.clone()),
        card_row(visible, inner, Style::default().fg(theme.grey2), |p| p.technologies.join(", ")),
        card_row(visible, inner, Style::default().fg(theme.link), |p| {
            p.github_url.clone().or_else(|| p.project_url.clone()).unwrap_or_default()
        }),
        Line::default(),
        indent(vec![Span::styled(
            format!("‹ {}/{} ›  h/l", app.carousel.index() + 1, app.carousel.slides()),
            Style::default().fg(theme.grey2),
        )]),
    ]
}

/// One row across the visible project cards
fn card_row(projects: &[&Project], inner: usize, style: Style, cell: impl Fn(&Project) -> String) -> Line<'static> {
    indent(
        projects
            .iter()
            .map(|p| Span::styled(fit(&cell(p), inner) + "  ", style))
            .collect(),
    )
}

fn contact_lines(profile: &ProfileData, theme: &Theme) -> Vec<Line<'static>> {
    let link = Style::default().fg(theme.link);
    let mut lines = vec![indent(vec![
        Span::styled(fit("email", 10), Style::default().fg(theme.grey2)),
        Span::styled(profile.user.email.clone(), link),
    ])];
    lines.extend(profile.active_social_links().map(|l| {
        indent(vec![
            Span::styled(fit(&l.platform, 10), Style::default().fg(theme.grey2)),
            Span::styled(l.url.clone(), link),
        ])
    }));
    lines
}
