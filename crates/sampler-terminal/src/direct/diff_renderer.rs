//! Differential renderer.
//!
//! Emits only dirty cells, batches all escape sequences into one buffered
//! write, and skips cursor moves and style changes the terminal already has.

use super::cell_buffer::{CellBuffer, Modifiers};
use crate::color::ColorMode;
use crossterm::cursor::MoveTo;
use crossterm::style::{
    Attribute, Print, ResetColor, SetAttribute, SetBackgroundColor, SetForegroundColor,
};
use crossterm::{queue, QueueableCommand};
use sampler_core::Color;
use std::io::{self, BufWriter, Write};

#[derive(Clone, Copy, Debug, PartialEq)]
struct StyleState {
    fg: Color,
    bg: Color,
    modifiers: Modifiers,
}

impl Default for StyleState {
    fn default() -> Self {
        Self {
            fg: Color::WHITE,
            bg: Color::TRANSPARENT,
            modifiers: Modifiers::NONE,
        }
    }
}

/// Counters describing the last flush.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct FlushStats {
    /// Cells printed.
    pub cells_written: usize,
    /// Explicit cursor repositionings.
    pub cursor_moves: usize,
    /// Style switches.
    pub style_changes: usize,
}

/// Differential renderer that minimizes terminal I/O.
#[derive(Debug)]
pub struct DiffRenderer {
    color_mode: ColorMode,
    /// Last known cursor position, `None` when unknown.
    cursor: Option<(u16, u16)>,
    last_style: StyleState,
    stats: FlushStats,
}

impl Default for DiffRenderer {
    fn default() -> Self {
        Self::with_color_mode(ColorMode::detect())
    }
}

impl DiffRenderer {
    /// Create a renderer with a specific color mode.
    #[must_use]
    pub fn with_color_mode(color_mode: ColorMode) -> Self {
        Self {
            color_mode,
            cursor: None,
            last_style: StyleState::default(),
            stats: FlushStats::default(),
        }
    }

    /// Get the color mode.
    #[must_use]
    pub const fn color_mode(&self) -> ColorMode {
        self.color_mode
    }

    /// Forget cursor and style state (after resize or clear).
    pub fn reset(&mut self) {
        self.cursor = None;
        self.last_style = StyleState::default();
        self.stats = FlushStats::default();
    }

    /// Statistics of the last flush.
    #[must_use]
    pub const fn stats(&self) -> FlushStats {
        self.stats
    }

    /// Flush dirty cells to the writer and clear their dirty bits.
    ///
    /// Returns the number of cells written.
    ///
    /// # Errors
    ///
    /// Returns an error if writing to the writer fails.
    pub fn flush<W: Write>(&mut self, buffer: &mut CellBuffer, writer: &mut W) -> io::Result<usize> {
        self.stats = FlushStats::default();
        let mut out = BufWriter::with_capacity(8192, writer);

        queue!(out, ResetColor)?;
        self.last_style = StyleState::default();

        let width = buffer.width();
        for idx in buffer.iter_dirty() {
            let Some(cell) = buffer.cells().get(idx) else {
                continue;
            };
            if cell.is_continuation() {
                continue;
            }

            let (x, y) = buffer.coords(idx);
            if self.cursor != Some((x, y)) {
                queue!(out, MoveTo(x, y))?;
                self.stats.cursor_moves += 1;
            }

            let style = StyleState {
                fg: cell.fg,
                bg: cell.bg,
                modifiers: cell.modifiers,
            };
            if style != self.last_style {
                self.apply_style(&mut out, style)?;
                self.last_style = style;
                self.stats.style_changes += 1;
            }

            queue!(out, Print(&cell.symbol))?;
            let next_x = x.saturating_add(u16::from(cell.width()));
            self.cursor = (next_x < width).then_some((next_x, y));
            self.stats.cells_written += 1;
        }

        buffer.clear_dirty();
        out.flush()?;
        Ok(self.stats.cells_written)
    }

    fn apply_style<W: Write>(&self, writer: &mut W, style: StyleState) -> io::Result<()> {
        writer.queue(SetAttribute(Attribute::Reset))?;
        writer.queue(SetForegroundColor(self.color_mode.to_crossterm(style.fg)))?;
        writer.queue(SetBackgroundColor(self.color_mode.to_crossterm(style.bg)))?;
        if style.modifiers.contains(Modifiers::BOLD) {
            writer.queue(SetAttribute(Attribute::Bold))?;
        }
        if style.modifiers.contains(Modifiers::DIM) {
            writer.queue(SetAttribute(Attribute::Dim))?;
        }
        Ok(())
    }

    /// Render a full frame (marks all dirty then flushes).
    ///
    /// # Errors
    ///
    /// Returns an error if writing to the writer fails.
    pub fn render_full<W: Write>(
        &mut self,
        buffer: &mut CellBuffer,
        writer: &mut W,
    ) -> io::Result<usize> {
        buffer.mark_all_dirty();
        self.cursor = None;
        self.flush(buffer, writer)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn renderer() -> DiffRenderer {
        DiffRenderer::with_color_mode(ColorMode::TrueColor)
    }

    #[test]
    fn test_flush_nothing_dirty() {
        let mut buf = CellBuffer::new(10, 5);
        let mut out = Vec::new();
        assert_eq!(renderer().flush(&mut buf, &mut out).unwrap(), 0);
    }

    #[test]
    fn test_flush_writes_dirty_cells_and_clears() {
        let mut buf = CellBuffer::new(10, 5);
        buf.update(2, 1, "A", Color::RED, Color::BLACK, Modifiers::NONE);
        buf.update(3, 1, "B", Color::RED, Color::BLACK, Modifiers::NONE);
        let mut r = renderer();
        let mut out = Vec::new();
        assert_eq!(r.flush(&mut buf, &mut out).unwrap(), 2);
        assert_eq!(buf.dirty_count(), 0);
        let text = String::from_utf8_lossy(&out);
        assert!(text.contains('A') && text.contains('B'));
    }

    #[test]
    fn test_adjacent_cells_share_cursor_move_and_style() {
        let mut buf = CellBuffer::new(10, 5);
        for x in 0..4 {
            buf.update(x, 0, "x", Color::GREEN, Color::BLACK, Modifiers::NONE);
        }
        let mut r = renderer();
        r.flush(&mut buf, &mut Vec::new()).unwrap();
        let stats = r.stats();
        assert_eq!(stats.cells_written, 4);
        assert_eq!(stats.cursor_moves, 1);
        assert_eq!(stats.style_changes, 1);
    }

    #[test]
    fn test_render_full_writes_everything() {
        let mut buf = CellBuffer::new(4, 3);
        let mut r = renderer();
        assert_eq!(r.render_full(&mut buf, &mut Vec::new()).unwrap(), 12);
    }

    #[test]
    fn test_continuation_cells_skipped() {
        let mut buf = CellBuffer::new(4, 1);
        buf.update(0, 0, "日", Color::WHITE, Color::BLACK, Modifiers::NONE);
        if let Some(cell) = buf.get_mut(1, 0) {
            cell.make_continuation();
        }
        let mut r = renderer();
        assert_eq!(r.flush(&mut buf, &mut Vec::new()).unwrap(), 1);
    }

    #[test]
    fn test_bold_emits_attribute() {
        let mut buf = CellBuffer::new(2, 1);
        buf.update(0, 0, "b", Color::WHITE, Color::BLACK, Modifiers::BOLD);
        let mut out = Vec::new();
        renderer().flush(&mut buf, &mut out).unwrap();
        assert!(String::from_utf8_lossy(&out).contains("\x1b[1m"));
    }

    #[test]
    fn test_reset_clears_stats() {
        let mut buf = CellBuffer::new(2, 1);
        let mut r = renderer();
        r.render_full(&mut buf, &mut Vec::new()).unwrap();
        r.reset();
        assert_eq!(r.stats(), FlushStats::default());
    }
}
