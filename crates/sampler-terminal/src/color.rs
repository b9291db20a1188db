//! Terminal color capability detection and conversion.

use crossterm::style::Color as CrosstermColor;
use sampler_core::Color;

/// Terminal color capability mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ColorMode {
    /// 24-bit true color.
    #[default]
    TrueColor,
    /// 256 color palette.
    Color256,
    /// 16 ANSI colors.
    Color16,
    /// Monochrome (no color).
    Mono,
}

/// The 16 ANSI colors with their conventional xterm RGB values.
const ANSI16: [(CrosstermColor, [u8; 3]); 16] = [
    (CrosstermColor::Black, [0, 0, 0]),
    (CrosstermColor::DarkRed, [205, 0, 0]),
    (CrosstermColor::DarkGreen, [0, 205, 0]),
    (CrosstermColor::DarkYellow, [205, 205, 0]),
    (CrosstermColor::DarkBlue, [0, 0, 238]),
    (CrosstermColor::DarkMagenta, [205, 0, 205]),
    (CrosstermColor::DarkCyan, [0, 205, 205]),
    (CrosstermColor::Grey, [229, 229, 229]),
    (CrosstermColor::DarkGrey, [127, 127, 127]),
    (CrosstermColor::Red, [255, 0, 0]),
    (CrosstermColor::Green, [0, 255, 0]),
    (CrosstermColor::Yellow, [255, 255, 0]),
    (CrosstermColor::Blue, [92, 92, 255]),
    (CrosstermColor::Magenta, [255, 0, 255]),
    (CrosstermColor::Cyan, [0, 255, 255]),
    (CrosstermColor::White, [255, 255, 255]),
];

impl ColorMode {
    /// Detect terminal color capabilities from the process environment.
    #[must_use]
    pub fn detect() -> Self {
        Self::detect_with_env(
            std::env::var("NO_COLOR").ok().as_deref(),
            std::env::var("COLORTERM").ok().as_deref(),
            std::env::var("TERM").ok().as_deref(),
        )
    }

    /// Detect color mode from environment variable values.
    #[must_use]
    pub fn detect_with_env(
        no_color: Option<&str>,
        colorterm: Option<&str>,
        term: Option<&str>,
    ) -> Self {
        if no_color.is_some_and(|v| !v.is_empty()) {
            return Self::Mono;
        }
        if matches!(colorterm, Some("truecolor" | "24bit")) {
            return Self::TrueColor;
        }
        match term {
            Some(t) if t.contains("256color") => Self::Color256,
            Some("dumb") | None => Self::Mono,
            Some(_) => Self::Color16,
        }
    }

    /// Convert a color for this mode.
    ///
    /// Fully transparent colors map to `Reset` so unpainted cells keep the
    /// terminal's own background.
    #[must_use]
    pub fn to_crossterm(&self, color: Color) -> CrosstermColor {
        if color.a == 0.0 {
            return CrosstermColor::Reset;
        }
        let rgb = [
            (color.r * 255.0).round() as u8,
            (color.g * 255.0).round() as u8,
            (color.b * 255.0).round() as u8,
        ];
        match self {
            Self::TrueColor => CrosstermColor::Rgb {
                r: rgb[0],
                g: rgb[1],
                b: rgb[2],
            },
            Self::Color256 => CrosstermColor::AnsiValue(rgb_to_256(rgb)),
            Self::Color16 => rgb_to_16(rgb),
            Self::Mono => CrosstermColor::Reset,
        }
    }
}

/// Map to the xterm 256 palette: grey ramp for neutral colors, 6×6×6 cube otherwise.
fn rgb_to_256([r, g, b]: [u8; 3]) -> u8 {
    if r == g && g == b {
        return match r {
            0..=7 => 16,
            249..=255 => 231,
            v => 232 + ((v - 8) / 10).min(23),
        };
    }
    let level = |v: u8| ((u16::from(v) * 5 + 127) / 255) as u8;
    16 + 36 * level(r) + 6 * level(g) + level(b)
}

/// Nearest ANSI color by squared RGB distance.
fn rgb_to_16(rgb: [u8; 3]) -> CrosstermColor {
    let distance = |other: &[u8; 3]| -> u32 {
        rgb.iter()
            .zip(other)
            .map(|(a, b)| {
                let d = i32::from(*a) - i32::from(*b);
                (d * d) as u32
            })
            .sum()
    };
    ANSI16
        .iter()
        .min_by_key(|(_, value)| distance(value))
        .map_or(CrosstermColor::Reset, |(color, _)| *color)
}
