//! Block chrome: an optional rounded border with an embedded title.

use super::symbols::{BorderGlyphs, ROUNDED};
use sampler_core::{Canvas, Color, FontWeight, Point, Rect, TextStyle};

/// Columns between the left corner and the title.
const TITLE_OFFSET: f32 = 2.0;

/// Frame drawn around a component's viewport.
#[derive(Debug, Clone, PartialEq)]
pub struct Block {
    title: Option<String>,
    border: bool,
    glyphs: BorderGlyphs,
    color: Color,
    title_color: Color,
}

impl Default for Block {
    fn default() -> Self {
        Self {
            title: None,
            border: true,
            glyphs: ROUNDED,
            color: Color::GREY,
            title_color: Color::WHITE,
        }
    }
}

impl Block {
    /// Create a bordered block without a title.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the title shown in the top edge.
    #[must_use]
    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        let title = title.into();
        self.title = (!title.is_empty()).then_some(title);
        self
    }

    /// Enable or disable the border.
    #[must_use]
    pub fn with_border(mut self, border: bool) -> Self {
        self.border = border;
        self
    }

    /// Set border and title colors.
    #[must_use]
    pub fn with_colors(mut self, border: Color, title: Color) -> Self {
        self.color = border;
        self.title_color = title;
        self
    }

    /// Whether the border is drawn.
    #[must_use]
    pub const fn has_border(&self) -> bool {
        self.border
    }

    /// Working area left inside `viewport`.
    #[must_use]
    pub fn inner(&self, viewport: Rect) -> Rect {
        if self.border {
            viewport.inset(1.0)
        } else {
            viewport
        }
    }

    /// Draw the frame and return the working area.
    pub fn draw(&self, canvas: &mut dyn Canvas, viewport: Rect) -> Rect {
        let inner = self.inner(viewport);
        let width = viewport.width.round() as usize;
        let height = viewport.height.round() as usize;
        if !self.border || width < 2 || height < 2 {
            return inner;
        }

        let g = &self.glyphs;
        let style = TextStyle::colored(self.color);
        let edge = g.horizontal.repeat(width - 2);
        let (left, top) = (viewport.x, viewport.y);
        let right = left + (width - 1) as f32;
        let bottom = top + (height - 1) as f32;

        canvas.draw_text(&format!("{}{edge}{}", g.top_left, g.top_right), Point::new(left, top), &style);
        for row in 1..height - 1 {
            let y = top + row as f32;
            canvas.draw_text(g.vertical, Point::new(left, y), &style);
            canvas.draw_text(g.vertical, Point::new(right, y), &style);
        }
        canvas.draw_text(
            &format!("{}{edge}{}", g.bottom_left, g.bottom_right),
            Point::new(left, bottom),
            &style,
        );

        if let Some(title) = &self.title {
            let room = width.saturating_sub(2 * TITLE_OFFSET as usize);
            let shown: String = format!(" {title} ").chars().take(room).collect();
            let title_style = TextStyle {
                color: self.title_color,
                weight: FontWeight::Bold,
            };
            canvas.draw_text(&shown, Point::new(left + TITLE_OFFSET - 1.0, top), &title_style);
        }
        inner
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::direct::{CellBuffer, DirectTerminalCanvas};

    fn render(block: &Block, width: u16, height: u16) -> (CellBuffer, Rect) {
        let mut buf = CellBuffer::new(width, height);
        let inner = {
            let mut canvas = DirectTerminalCanvas::new(&mut buf);
            block.draw(
                &mut canvas,
                Rect::new(0.0, 0.0, f32::from(width), f32::from(height)),
            )
        };
        (buf, inner)
    }

    #[test]
    fn test_bordered_block_with_title() {
        let (buf, inner) = render(&Block::new().with_title("cpu"), 12, 4);
        assert_eq!(buf.row_text(0), "╭ cpu ─────╮");
        assert_eq!(buf.row_text(1), "│          │");
        assert_eq!(buf.row_text(3), "╰──────────╯");
        assert_eq!(inner, Rect::new(1.0, 1.0, 10.0, 2.0));
    }

    #[test]
    fn test_long_title_truncated() {
        let (buf, _) = render(&Block::new().with_title("a very long title"), 10, 3);
        assert_eq!(buf.row_text(0), "╭ a ver──╮");
    }

    #[test]
    fn test_borderless_uses_full_viewport() {
        let block = Block::new().with_title("hidden").with_border(false);
        let (buf, inner) = render(&block, 8, 3);
        assert_eq!(inner, Rect::new(0.0, 0.0, 8.0, 3.0));
        assert_eq!(buf.row_text(0), "        ");
    }

    #[test]
    fn test_tiny_viewport_skips_frame() {
        let (buf, inner) = render(&Block::new(), 1, 1);
        assert_eq!(buf.row_text(0), " ");
        assert_eq!(inner.width, 0.0);
    }

    #[test]
    fn test_empty_title_ignored() {
        let (buf, _) = render(&Block::new().with_title(""), 6, 2);
        assert_eq!(buf.row_text(0), "╭────╮");
    }
}
