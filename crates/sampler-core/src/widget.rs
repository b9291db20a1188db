//! Widget and Canvas traits.
//!
//! Widgets follow a verify-measure-layout-paint cycle:
//!
//! 1. **Verify**: Check all Brick assertions pass
//! 2. **Measure**: Compute intrinsic size given constraints
//! 3. **Layout**: Position self within allocated bounds
//! 4. **Paint**: Issue draw calls against a [`Canvas`] (only if verified)
//!
//! # Examples
//!
//! ```
//! use sampler_core::{Color, FontWeight, TextStyle};
//!
//! let label = TextStyle {
//!     color: Color::CYAN,
//!     weight: FontWeight::Bold,
//! };
//! assert_ne!(label, TextStyle::default());
//! ```

use crate::brick_types::Brick;
use crate::constraints::Constraints;
use crate::geometry::{Point, Rect, Size};
use crate::Color;
use serde::{Deserialize, Serialize};

/// Result of laying out a widget.
#[derive(Debug, Clone, Copy, Default)]
pub struct LayoutResult {
    /// Computed size after layout
    pub size: Size,
}

/// Core widget trait that all UI elements implement.
pub trait Widget: Brick + Send + Sync {
    /// Compute intrinsic size constraints.
    fn measure(&self, constraints: Constraints) -> Size;

    /// Position the widget within allocated bounds.
    fn layout(&mut self, bounds: Rect) -> LayoutResult;

    /// Generate draw commands for rendering.
    fn paint(&self, canvas: &mut dyn Canvas);

    /// Get the current bounds of this widget.
    fn bounds(&self) -> Rect {
        Rect::default()
    }
}

/// Canvas trait for paint operations.
///
/// A minimal abstraction over the rendering backend. Coordinates are in
/// cells; integral coordinates address whole cells.
pub trait Canvas {
    /// Draw a filled rectangle.
    fn fill_rect(&mut self, rect: Rect, color: Color);

    /// Draw a stroked rectangle.
    fn stroke_rect(&mut self, rect: Rect, color: Color, width: f32);

    /// Draw text.
    fn draw_text(&mut self, text: &str, position: Point, style: &TextStyle);

    /// Draw a line between two cell positions.
    fn draw_line(&mut self, from: Point, to: Point, color: Color, width: f32);

    /// Draw a straight segment between two sub-cell positions.
    ///
    /// The fractional part of each coordinate addresses a position inside a
    /// cell. The backend picks its own supersampling granularity; backends
    /// without sub-cell addressing fall back to [`Canvas::draw_line`].
    fn draw_segment(&mut self, from: Point, to: Point, color: Color) {
        self.draw_line(from, to, color, 1.0);
    }

    /// Push a clip region.
    fn push_clip(&mut self, rect: Rect);

    /// Pop the clip region.
    fn pop_clip(&mut self);
}

/// Text style for rendering.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TextStyle {
    /// Text color
    pub color: Color,
    /// Font weight
    pub weight: FontWeight,
}

impl Default for TextStyle {
    fn default() -> Self {
        Self {
            color: Color::WHITE,
            weight: FontWeight::Normal,
        }
    }
}

impl TextStyle {
    /// Plain text in the given color.
    #[must_use]
    pub fn colored(color: Color) -> Self {
        Self {
            color,
            ..Self::default()
        }
    }
}

/// Font weight.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum FontWeight {
    /// Normal (400)
    Normal,
    /// Bold (700)
    Bold,
}

#[cfg(test)]
mod tests {
    use super::*;

    struct LineRecorder {
        lines: Vec<(Point, Point)>,
    }

    impl Canvas for LineRecorder {
        fn fill_rect(&mut self, _rect: Rect, _color: Color) {}
        fn stroke_rect(&mut self, _rect: Rect, _color: Color, _width: f32) {}
        fn draw_text(&mut self, _text: &str, _position: Point, _style: &TextStyle) {}
        fn draw_line(&mut self, from: Point, to: Point, _color: Color, _width: f32) {
            self.lines.push((from, to));
        }
        fn push_clip(&mut self, _rect: Rect) {}
        fn pop_clip(&mut self) {}
    }

    #[test]
    fn test_text_style_default() {
        let style = TextStyle::default();
        assert_eq!(style.color, Color::WHITE);
        assert_eq!(style.weight, FontWeight::Normal);
    }

    #[test]
    fn test_text_style_colored() {
        let style = TextStyle::colored(Color::RED);
        assert_eq!(style.color, Color::RED);
        assert_eq!(style.weight, FontWeight::Normal);
    }

    #[test]
    fn test_draw_segment_falls_back_to_draw_line() {
        let mut canvas = LineRecorder { lines: vec![] };
        canvas.draw_segment(Point::new(0.5, 0.25), Point::new(3.5, 1.75), Color::RED);
        assert_eq!(
            canvas.lines,
            vec![(Point::new(0.5, 0.25), Point::new(3.5, 1.75))]
        );
    }

    #[test]
    fn test_layout_result_default() {
        assert_eq!(LayoutResult::default().size, Size::ZERO);
    }
}
