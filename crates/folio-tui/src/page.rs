//! Page geometry for the terminal viewer
//!
//! The page is a vertical stack of sections measured in terminal rows. Scroll
//! offsets and parallax geometry are expressed in pixels by treating one cell as
//! `COL_PX` x `ROW_PX`, so breakpoints and scroll thresholds keep their meaning.

use folio_core::api::ProfileData;
use folio_core::interaction::Breakpoint;
use folio_core::parallax::{Axis, Direction, ElementGeometry, ParallaxBinding, ParallaxConfig, Translation};
use folio_core::scroll::RevealTracker;

pub const ROW_PX: u32 = 16;
pub const COL_PX: u32 = 8;

/// Rows above a section's content: blank, heading, blank
pub const HEADER_ROWS: u32 = 3;
const FOOTER_ROWS: u32 = 1;
/// Rows used by the project carousel: five card rows, a gap and the pager
pub const PROJECT_ROWS: u32 = 7;
/// Horizontal margin on each side of section content
pub const MARGIN_COLS: u16 = 4;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SectionKind {
    Hero,
    About,
    Skills,
    Experience,
    Projects,
    Contact,
}

impl SectionKind {
    pub const ALL: [SectionKind; 6] = [
        SectionKind::Hero,
        SectionKind::About,
        SectionKind::Skills,
        SectionKind::Experience,
        SectionKind::Projects,
        SectionKind::Contact,
    ];

    pub fn title(self) -> &'static str {
        match self {
            SectionKind::Hero => "Home",
            SectionKind::About => "About",
            SectionKind::Skills => "Skills",
            SectionKind::Experience => "Experience",
            SectionKind::Projects => "Projects",
            SectionKind::Contact => "Contact",
        }
    }

    /// Decorative layers: speed, direction, and anchor as fractions of the section
    fn layers(self) -> &'static [(f64, Direction, f64, f64)] {
        use Direction::*;
        match self {
            SectionKind::Hero => &[
                (0.3, Up, 0.2, 0.15),
                (0.5, Down, 0.8, 0.85),
                (0.2, Left, 0.5, 0.25),
                (0.4, Right, 0.35, 0.75),
            ],
            SectionKind::About | SectionKind::Experience | SectionKind::Contact => &[
                (0.2, Up, 0.1, 0.9),
                (0.3, Left, 0.5, 0.05),
                (0.4, Right, 0.9, 0.95),
            ],
            SectionKind::Skills => &[
                (0.2, Up, 0.1, 0.1),
                (0.3, Down, 0.9, 0.9),
                (0.4, Left, 0.5, 0.95),
            ],
            SectionKind::Projects => &[],
        }
    }
}

/// A floating decoration bound to the shared scroll offset
#[derive(Debug, Clone)]
pub struct Layer {
    pub binding: ParallaxBinding,
    /// Resting position relative to the section
    pub anchor_row: u32,
    pub anchor_col: u16,
}

/// Cell displacement for a translation
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Shift {
    pub rows: i32,
    pub cols: i32,
}

impl From<Translation> for Shift {
    fn from(t: Translation) -> Self {
        match t.axis {
            Axis::Y => Shift {
                rows: (t.px / ROW_PX as f64).round() as i32,
                cols: 0,
            },
            Axis::X => Shift {
                rows: 0,
                cols: (t.px / COL_PX as f64).round() as i32,
            },
        }
    }
}

#[derive(Debug, Clone)]
pub struct Section {
    pub kind: SectionKind,
    /// Document row of the first line
    pub top: u32,
    pub height: u32,
    pub layers: Vec<Layer>,
    pub reveal: RevealTracker,
    /// Rows (relative to `top`) that hold links
    pub link_rows: Vec<u32>,
}

impl Section {
    pub fn geometry(&self, viewport_rows: u16) -> ElementGeometry {
        ElementGeometry::new(
            (self.top * ROW_PX) as i64,
            self.height * ROW_PX,
            viewport_rows as u32 * ROW_PX,
        )
    }

    pub fn contains(&self, doc_row: u32) -> bool {
        doc_row >= self.top && doc_row < self.top + self.height
    }

    pub fn is_link_row(&self, doc_row: u32) -> bool {
        self.contains(doc_row) && self.link_rows.contains(&(doc_row - self.top))
    }
}

/// Split `text` into lines of at most `width` characters on word boundaries
pub fn wrap(text: &str, width: usize) -> Vec<String> {
    let width = width.max(1);
    let mut lines = Vec::new();
    for paragraph in text.lines() {
        let mut line = String::new();
        for word in paragraph.split_whitespace() {
            let needed = if line.is_empty() { 0 } else { 1 } + word.chars().count();
            if !line.is_empty() && line.chars().count() + needed > width {
                lines.push(std::mem::take(&mut line));
            }
            if !line.is_empty() {
                line.push(' ');
            }
            line.push_str(word);
        }
        lines.push(line);
    }
    if lines.is_empty() {
        lines.push(String::new());
    }
    lines
}

/// Width available to section content
pub fn content_width(cols: u16) -> usize {
    cols.saturating_sub(MARGIN_COLS * 2).max(1) as usize
}

/// Number of content rows a section needs; also the count its widget renders
pub fn content_rows(kind: SectionKind, profile: &ProfileData, cols: u16) -> u32 {
    match kind {
        SectionKind::Hero => 0,
        SectionKind::About => wrap(&profile.user.bio, content_width(cols)).len() as u32 + 2,
        SectionKind::Skills => (profile.skills.len() as u32 * 2).max(1),
        SectionKind::Experience => (profile.work_experience.len() as u32 * 4).max(1),
        SectionKind::Projects => {
            if profile.active_projects().next().is_some() {
                PROJECT_ROWS
            } else {
                1
            }
        }
        SectionKind::Contact => 1 + profile.active_social_links().count() as u32,
    }
}

fn link_rows(kind: SectionKind, profile: &ProfileData) -> Vec<u32> {
    match kind {
        SectionKind::Contact => {
            let links = 1 + profile.active_social_links().count() as u32;
            (HEADER_ROWS..HEADER_ROWS + links).collect()
        }
        _ => Vec::new(),
    }
}

/// Vertical layout of every section for one terminal size
#[derive(Debug, Clone)]
pub struct PageLayout {
    sections: Vec<Section>,
    cols: u16,
    rows: u16,
    document_rows: u32,
}

impl PageLayout {
    /// Lay out the page; without a profile only the hero is shown
    pub fn build(profile: Option<&ProfileData>, cols: u16, rows: u16, base: &ParallaxConfig) -> Self {
        let kinds: &[SectionKind] = match profile {
            Some(_) => &SectionKind::ALL,
            None => &[SectionKind::Hero],
        };

        let mut sections = Vec::with_capacity(kinds.len());
        let mut top = 0;
        for &kind in kinds {
            let height = match (kind, profile) {
                (SectionKind::Hero, _) => (rows as u32).max(HEADER_ROWS + 4),
                (_, Some(profile)) => HEADER_ROWS + content_rows(kind, profile, cols) + FOOTER_ROWS,
                (_, None) => 0,
            };
            let layers = kind
                .layers()
                .iter()
                .map(|&(speed, direction, row, col)| Layer {
                    binding: ParallaxBinding::new(ParallaxConfig {
                        speed,
                        direction,
                        ..*base
                    }),
                    anchor_row: (row * height.saturating_sub(1) as f64).round() as u32,
                    anchor_col: (col * cols.saturating_sub(1) as f64).round() as u16,
                })
                .collect();

            sections.push(Section {
                kind,
                top,
                height,
                layers,
                reveal: RevealTracker::default(),
                link_rows: profile.map(|p| link_rows(kind, p)).unwrap_or_default(),
            });
            top += height;
        }

        let mut layout = Self {
            sections,
            cols,
            rows,
            document_rows: top,
        };
        layout.measure();
        layout
    }

    /// Rebuild for a new size or profile, carrying reveal state over
    pub fn relayout(&mut self, profile: Option<&ProfileData>, cols: u16, rows: u16, base: &ParallaxConfig) {
        let mut next = Self::build(profile, cols, rows, base);
        for section in &mut next.sections {
            if let Some(old) = self.section(section.kind) {
                section.reveal = old.reveal.clone();
            }
        }
        *self = next;
    }

    fn measure(&mut self) {
        let rows = self.rows;
        for section in &mut self.sections {
            let geometry = section.geometry(rows);
            for layer in &mut section.layers {
                layer.binding.measure(geometry);
            }
        }
    }

    pub fn sections(&self) -> &[Section] {
        &self.sections
    }

    pub fn section(&self, kind: SectionKind) -> Option<&Section> {
        self.sections.iter().find(|s| s.kind == kind)
    }

    pub fn section_at(&self, doc_row: u32) -> Option<&Section> {
        self.sections.iter().find(|s| s.contains(doc_row))
    }

    pub fn viewport_rows(&self) -> u16 {
        self.rows
    }

    pub fn viewport_cols(&self) -> u16 {
        self.cols
    }

    pub fn breakpoint(&self) -> Breakpoint {
        Breakpoint::from_width(self.cols as u32 * COL_PX)
    }

    pub fn document_rows(&self) -> u32 {
        self.document_rows
    }

    pub fn max_scroll(&self) -> u32 {
        self.document_rows.saturating_sub(self.rows as u32)
    }

    pub fn document_px(&self) -> u32 {
        self.document_rows * ROW_PX
    }

    pub fn viewport_px(&self) -> u32 {
        self.rows as u32 * ROW_PX
    }

    /// Re-evaluate scroll reveals at a pixel offset
    pub fn update_reveals(&mut self, offset_px: u32) {
        let rows = self.rows;
        for section in &mut self.sections {
            let geometry = section.geometry(rows);
            section.reveal.update(offset_px, &geometry);
        }
    }
}
