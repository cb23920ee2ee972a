use ratatui::style::Color;
use sectionlock_core::Tone;

/// Palette for one background tone
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Theme {
    // Background colors
    pub bg0: Color,
    pub bg1: Color,
    pub bg2: Color,

    // Foreground colors
    pub fg0: Color,
    pub fg1: Color,
    pub grey0: Color,
    pub grey1: Color,

    // Semantic colors
    pub accent: Color,
    pub accent_dim: Color,
    pub highlight: Color,
    pub warning: Color,
}

impl Default for Theme {
    fn default() -> Self {
        Self::dark()
    }
}

impl Theme {
    pub fn dark() -> Self {
        Self {
            bg0: Color::Rgb(0x14, 0x14, 0x14),
            bg1: Color::Rgb(0x2a, 0x2a, 0x2a),
            bg2: Color::Rgb(0x3a, 0x38, 0x36),
            fg0: Color::Rgb(0xe5, 0xe1, 0xdc),
            fg1: Color::Rgb(0xf4, 0xf1, 0xec),
            grey0: Color::Rgb(0x6e, 0x6a, 0x66),
            grey1: Color::Rgb(0x9a, 0x95, 0x90),
            accent: Color::Rgb(0x00, 0xff, 0xff),
            accent_dim: Color::Rgb(0x00, 0x4d, 0x4d),
            highlight: Color::Rgb(0x40, 0x3c, 0x38),
            warning: Color::Rgb(0xe7, 0x8a, 0x4e),
        }
    }

    pub fn bright() -> Self {
        Self {
            bg0: Color::Rgb(0xe5, 0xe1, 0xdc),
            bg1: Color::Rgb(0xd6, 0xd1, 0xca),
            bg2: Color::Rgb(0xc4, 0xbe, 0xb6),
            fg0: Color::Rgb(0x2a, 0x2a, 0x2a),
            fg1: Color::Rgb(0x14, 0x14, 0x14),
            grey0: Color::Rgb(0x9a, 0x95, 0x90),
            grey1: Color::Rgb(0x6e, 0x6a, 0x66),
            accent: Color::Rgb(0x00, 0x80, 0x80),
            accent_dim: Color::Rgb(0x9c, 0xc9, 0xc9),
            highlight: Color::Rgb(0xb8, 0xb1, 0xa8),
            warning: Color::Rgb(0xb8, 0x5a, 0x1e),
        }
    }

    pub fn for_tone(tone: Tone) -> Self {
        match tone {
            Tone::Dark => Self::dark(),
            Tone::Bright => Self::bright(),
        }
    }
}
