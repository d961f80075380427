use ratatui::style::Color;

/// Colours used by the viewer
#[derive(Debug, Clone)]
pub struct Theme {
    // Background colors
    pub bg0: Color,
    pub bg1: Color,
    pub bg2: Color,

    // Foreground colors
    pub fg0: Color,
    pub fg1: Color,
    pub grey0: Color,
    pub grey2: Color,

    // Semantic colors
    pub heading: Color,
    pub accent: Color,
    pub link: Color,
    pub hover: Color,
    pub error: Color,
    pub progress: Color,
}

impl Default for Theme {
    fn default() -> Self {
        // Gruvbox Material dark
        Self {
            bg0: Color::Rgb(0x28, 0x28, 0x28),
            bg1: Color::Rgb(0x32, 0x30, 0x2f),
            bg2: Color::Rgb(0x45, 0x40, 0x3d),
            fg0: Color::Rgb(0xd4, 0xbe, 0x98),
            fg1: Color::Rgb(0xdd, 0xc7, 0xa1),
            grey0: Color::Rgb(0x7c, 0x6f, 0x64),
            grey2: Color::Rgb(0xa8, 0x99, 0x84),
            heading: Color::Rgb(0xd8, 0xa6, 0x57),
            accent: Color::Rgb(0x89, 0xb4, 0x82),
            link: Color::Rgb(0x7d, 0xae, 0xa3),
            hover: Color::Rgb(0xd3, 0x86, 0x9b),
            error: Color::Rgb(0xea, 0x69, 0x62),
            progress: Color::Rgb(0xa9, 0xb6, 0x65),
        }
    }
}
