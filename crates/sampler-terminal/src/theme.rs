//! Dashboard color themes.
//!
//! A theme supplies the chrome colors (text, axes, grid, border) and the
//! series palette used for items that do not name a color.

use sampler_core::Color;
use serde::Deserialize;

/// Theme selector as written in the configuration file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ThemeKind {
    /// Light text on a dark terminal.
    #[default]
    Dark,
    /// Dark text on a light terminal.
    Light,
}

/// Theme configuration for the dashboard.
#[derive(Debug, Clone, PartialEq)]
pub struct Theme {
    /// Theme name.
    pub name: &'static str,
    /// Text, axes and legend figures.
    pub foreground: Color,
    /// Dashed vertical grid lines.
    pub grid: Color,
    /// Block border and title.
    pub border: Color,
    /// Series colors, cycled in item order.
    pub palette: [Color; 8],
}

impl Default for Theme {
    fn default() -> Self {
        Self::dark()
    }
}

impl Theme {
    /// Theme for the given selector.
    #[must_use]
    pub fn from_kind(kind: ThemeKind) -> Self {
        match kind {
            ThemeKind::Dark => Self::dark(),
            ThemeKind::Light => Self::light(),
        }
    }

    /// Dark theme.
    #[must_use]
    pub fn dark() -> Self {
        Self {
            name: "dark",
            foreground: hex(0xe4e4e4),
            grid: hex(0x4e4e4e),
            border: hex(0x8a8a8a),
            palette: [
                hex(0x5fd7ff),
                hex(0xd7005f),
                hex(0x5fd75f),
                hex(0xffaf00),
                hex(0xd7afff),
                hex(0x0087d7),
                hex(0xff5f00),
                hex(0x87d7d7),
            ],
        }
    }

    /// Light theme.
    #[must_use]
    pub fn light() -> Self {
        Self {
            name: "light",
            foreground: hex(0x262626),
            grid: hex(0xbcbcbc),
            border: hex(0x585858),
            palette: [
                hex(0x005faf),
                hex(0xaf0000),
                hex(0x008700),
                hex(0xaf5f00),
                hex(0x5f00af),
                hex(0x008787),
                hex(0xd75f00),
                hex(0x5f5f87),
            ],
        }
    }

    /// Palette color for the item at `index`, wrapping around.
    #[must_use]
    pub fn series_color(&self, index: usize) -> Color {
        self.palette[index % self.palette.len()]
    }
}

fn hex(rgb: u32) -> Color {
    Color::from_rgb8((rgb >> 16) as u8, (rgb >> 8) as u8, rgb as u8)
}
