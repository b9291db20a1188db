//! Direct terminal canvas implementing the Canvas trait.
//!
//! Writes straight into a [`CellBuffer`], which the [`DiffRenderer`]
//! then flushes. Sub-cell segments are rasterized onto a 2×4 braille dot
//! grid per cell.
//!
//! [`DiffRenderer`]: super::DiffRenderer

use super::cell_buffer::{CellBuffer, Modifiers};
use sampler_core::{Canvas, Color, FontWeight, Point, Rect, TextStyle};
use unicode_segmentation::UnicodeSegmentation;
use unicode_width::UnicodeWidthStr;

/// Braille dot bits indexed by `[row][column]` within a cell.
const BRAILLE_DOTS: [[u8; 2]; 4] = [[0x01, 0x08], [0x02, 0x10], [0x04, 0x20], [0x40, 0x80]];

/// Dot columns per cell.
const DOTS_X: i32 = 2;
/// Dot rows per cell.
const DOTS_Y: i32 = 4;

/// Half-open clip rectangle in cell coordinates.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
struct ClipRect {
    x0: i32,
    y0: i32,
    x1: i32,
    y1: i32,
}

impl ClipRect {
    fn from_rect(rect: Rect) -> Self {
        let x0 = rect.x.round() as i32;
        let y0 = rect.y.round() as i32;
        Self {
            x0,
            y0,
            x1: x0 + rect.width.round().max(0.0) as i32,
            y1: y0 + rect.height.round().max(0.0) as i32,
        }
    }

    const fn contains(self, x: i32, y: i32) -> bool {
        x >= self.x0 && x < self.x1 && y >= self.y0 && y < self.y1
    }

    fn intersect(self, other: Self) -> Self {
        let x0 = self.x0.max(other.x0);
        let y0 = self.y0.max(other.y0);
        Self {
            x0,
            y0,
            x1: self.x1.min(other.x1).max(x0),
            y1: self.y1.min(other.y1).max(y0),
        }
    }
}

/// Terminal canvas writing into a borrowed cell buffer.
pub struct DirectTerminalCanvas<'a> {
    buffer: &'a mut CellBuffer,
    clip_stack: Vec<ClipRect>,
}

impl<'a> DirectTerminalCanvas<'a> {
    /// Create a canvas covering the whole buffer.
    #[must_use]
    pub fn new(buffer: &'a mut CellBuffer) -> Self {
        Self {
            clip_stack: vec![ClipRect {
                x0: 0,
                y0: 0,
                x1: i32::from(buffer.width()),
                y1: i32::from(buffer.height()),
            }],
            buffer,
        }
    }

    /// Get the buffer width.
    #[must_use]
    pub fn width(&self) -> u16 {
        self.buffer.width()
    }

    /// Get the buffer height.
    #[must_use]
    pub fn height(&self) -> u16 {
        self.buffer.height()
    }

    fn clip(&self) -> ClipRect {
        self.clip_stack.last().copied().unwrap_or(ClipRect {
            x0: 0,
            y0: 0,
            x1: 0,
            y1: 0,
        })
    }

    /// Visible cell position, or `None` when clipped away.
    fn visible(&self, x: i32, y: i32) -> Option<(u16, u16)> {
        if !self.clip().contains(x, y) {
            return None;
        }
        Some((u16::try_from(x).ok()?, u16::try_from(y).ok()?))
    }

    fn set_cell(&mut self, x: i32, y: i32, symbol: &str, fg: Color, bg: Color, modifiers: Modifiers) {
        let Some((cx, cy)) = self.visible(x, y) else {
            return;
        };
        self.buffer.update(cx, cy, symbol, fg, bg, modifiers);
        if UnicodeWidthStr::width(symbol) > 1 {
            if let Some((nx, ny)) = self.visible(x + 1, y) {
                if let Some(cell) = self.buffer.get_mut(nx, ny) {
                    cell.make_continuation();
                }
            }
        }
    }

    fn plot_dot(&mut self, dx: i32, dy: i32, color: Color) {
        let cell_x = dx.div_euclid(DOTS_X);
        let cell_y = dy.div_euclid(DOTS_Y);
        let Some((cx, cy)) = self.visible(cell_x, cell_y) else {
            return;
        };
        let bit = BRAILLE_DOTS[dy.rem_euclid(DOTS_Y) as usize][dx.rem_euclid(DOTS_X) as usize];
        self.buffer.merge_braille(cx, cy, bit, color);
    }
}

/// Integer points of the Bresenham line from `(x0, y0)` to `(x1, y1)` inclusive.
fn bresenham(x0: i32, y0: i32, x1: i32, y1: i32) -> impl Iterator<Item = (i32, i32)> {
    let dx = (x1 - x0).abs();
    let dy = -(y1 - y0).abs();
    let sx = if x0 < x1 { 1 } else { -1 };
    let sy = if y0 < y1 { 1 } else { -1 };
    let mut err = dx + dy;
    let (mut x, mut y) = (x0, y0);
    let mut done = false;
    std::iter::from_fn(move || {
        if done {
            return None;
        }
        let current = (x, y);
        if x == x1 && y == y1 {
            done = true;
        } else {
            let e2 = 2 * err;
            if e2 >= dy {
                err += dy;
                x += sx;
            }
            if e2 <= dx {
                err += dx;
                y += sy;
            }
        }
        Some(current)
    })
}

impl Canvas for DirectTerminalCanvas<'_> {
    fn fill_rect(&mut self, rect: Rect, color: Color) {
        let r = ClipRect::from_rect(rect).intersect(self.clip());
        for y in r.y0..r.y1 {
            for x in r.x0..r.x1 {
                self.set_cell(x, y, " ", color, color, Modifiers::NONE);
            }
        }
    }

    fn stroke_rect(&mut self, rect: Rect, color: Color, _width: f32) {
        let r = ClipRect::from_rect(rect);
        if r.x1 <= r.x0 || r.y1 <= r.y0 {
            return;
        }
        let (right, bottom) = (r.x1 - 1, r.y1 - 1);
        let bg = Color::TRANSPARENT;
        for x in r.x0..=right {
            self.set_cell(x, r.y0, "─", color, bg, Modifiers::NONE);
            self.set_cell(x, bottom, "─", color, bg, Modifiers::NONE);
        }
        for y in r.y0..=bottom {
            self.set_cell(r.x0, y, "│", color, bg, Modifiers::NONE);
            self.set_cell(right, y, "│", color, bg, Modifiers::NONE);
        }
        self.set_cell(r.x0, r.y0, "┌", color, bg, Modifiers::NONE);
        self.set_cell(right, r.y0, "┐", color, bg, Modifiers::NONE);
        self.set_cell(r.x0, bottom, "└", color, bg, Modifiers::NONE);
        self.set_cell(right, bottom, "┘", color, bg, Modifiers::NONE);
    }

    fn draw_text(&mut self, text: &str, position: Point, style: &TextStyle) {
        let mut x = position.x.round() as i32;
        let y = position.y.round() as i32;
        let clip = self.clip();
        if y < clip.y0 || y >= clip.y1 {
            return;
        }
        let modifiers = match style.weight {
            FontWeight::Bold => Modifiers::BOLD,
            FontWeight::Normal => Modifiers::NONE,
        };
        for grapheme in text.graphemes(true) {
            if x >= clip.x1 {
                break;
            }
            self.set_cell(x, y, grapheme, style.color, Color::TRANSPARENT, modifiers);
            x += UnicodeWidthStr::width(grapheme) as i32;
        }
    }

    fn draw_line(&mut self, from: Point, to: Point, color: Color, _width: f32) {
        let (x0, y0) = (from.x.floor() as i32, from.y.floor() as i32);
        let (x1, y1) = (to.x.floor() as i32, to.y.floor() as i32);
        let glyph = if y0 == y1 {
            "─"
        } else if x0 == x1 {
            "│"
        } else if (x1 > x0) == (y1 > y0) {
            "╲"
        } else {
            "╱"
        };
        for (x, y) in bresenham(x0, y0, x1, y1) {
            self.set_cell(x, y, glyph, color, Color::TRANSPARENT, Modifiers::NONE);
        }
    }

    fn draw_segment(&mut self, from: Point, to: Point, color: Color) {
        let dot = |p: Point| {
            (
                (p.x * DOTS_X as f32).floor() as i32,
                (p.y * DOTS_Y as f32).floor() as i32,
            )
        };
        let ((x0, y0), (x1, y1)) = (dot(from), dot(to));
        for (dx, dy) in bresenham(x0, y0, x1, y1) {
            self.plot_dot(dx, dy, color);
        }
    }

    fn push_clip(&mut self, rect: Rect) {
        let clip = ClipRect::from_rect(rect).intersect(self.clip());
        self.clip_stack.push(clip);
    }

    fn pop_clip(&mut self) {
        if self.clip_stack.len() > 1 {
            self.clip_stack.pop();
        }
    }
}
