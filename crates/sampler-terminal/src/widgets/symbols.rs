//! Glyphs used by the chart chrome.

/// Corner where the y axis meets the x axis.
pub const AXIS_ORIGIN: &str = "└";

/// Dashed horizontal stroke for the x axis.
pub const HORIZONTAL_DASH: &str = "┈";

/// Dashed vertical stroke for the y axis and grid lines.
pub const VERTICAL_DASH: &str = "┊";

/// Series marker in the legend.
pub const LEGEND_DOT: &str = "•";

/// Marker for a failed sample on the x axis.
pub const ERROR_MARK: &str = "×";

/// Rounded box-drawing characters for block borders.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BorderGlyphs {
    /// Top left corner.
    pub top_left: &'static str,
    /// Top right corner.
    pub top_right: &'static str,
    /// Bottom left corner.
    pub bottom_left: &'static str,
    /// Bottom right corner.
    pub bottom_right: &'static str,
    /// Top and bottom edges.
    pub horizontal: &'static str,
    /// Left and right edges.
    pub vertical: &'static str,
}

/// Rounded corners: ╭─╮│╰─╯
pub const ROUNDED: BorderGlyphs = BorderGlyphs {
    top_left: "╭",
    top_right: "╮",
    bottom_left: "╰",
    bottom_right: "╯",
    horizontal: "─",
    vertical: "│",
};

#[cfg(test)]
mod tests {
    use super::*;
    use unicode_width::UnicodeWidthStr;

    #[test]
    fn test_chrome_glyphs_are_single_width() {
        for glyph in [
            AXIS_ORIGIN,
            HORIZONTAL_DASH,
            VERTICAL_DASH,
            LEGEND_DOT,
            ERROR_MARK,
            ROUNDED.top_left,
            ROUNDED.top_right,
            ROUNDED.bottom_left,
            ROUNDED.bottom_right,
            ROUNDED.horizontal,
            ROUNDED.vertical,
        ] {
            assert_eq!(UnicodeWidthStr::width(glyph), 1, "{glyph} must occupy one cell");
        }
    }
}
