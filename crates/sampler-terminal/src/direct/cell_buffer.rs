//! Cell buffer with dirty tracking.
//!
//! Uses `CompactString` to inline graphemes so steady-state frames do not
//! allocate, and one dirty bit per cell so the diff renderer only emits the
//! cells a frame actually touched.

use bitvec::prelude::*;
use compact_str::CompactString;
use sampler_core::Color;
use unicode_width::UnicodeWidthStr;

/// First code point of the Unicode braille block.
pub const BRAILLE_BASE: u32 = 0x2800;

/// Text modifiers for terminal cells.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Modifiers(u8);

impl Modifiers {
    /// No modifiers.
    pub const NONE: Self = Self(0);
    /// Bold text.
    pub const BOLD: Self = Self(1 << 0);
    /// Dim/faint text.
    pub const DIM: Self = Self(1 << 1);

    /// Check if modifiers is empty.
    #[must_use]
    pub const fn is_empty(self) -> bool {
        self.0 == 0
    }

    /// Check if a specific modifier is set.
    #[must_use]
    pub const fn contains(self, other: Self) -> bool {
        (self.0 & other.0) == other.0
    }
}

impl std::ops::BitOr for Modifiers {
    type Output = Self;

    fn bitor(self, rhs: Self) -> Self::Output {
        Self(self.0 | rhs.0)
    }
}

/// A single terminal cell.
#[derive(Clone, Debug, PartialEq)]
pub struct Cell {
    /// The grapheme displayed in this cell.
    pub symbol: CompactString,
    /// Foreground color.
    pub fg: Color,
    /// Background color.
    pub bg: Color,
    /// Text modifiers.
    pub modifiers: Modifiers,
    /// Display width of the symbol (1 normal, 2 wide, 0 continuation).
    width: u8,
}

impl Default for Cell {
    fn default() -> Self {
        Self {
            symbol: CompactString::const_new(" "),
            fg: Color::WHITE,
            bg: Color::TRANSPARENT,
            modifiers: Modifiers::NONE,
            width: 1,
        }
    }
}

impl Cell {
    /// Create a new cell with the given content.
    #[must_use]
    pub fn new(symbol: &str, fg: Color, bg: Color, modifiers: Modifiers) -> Self {
        let mut cell = Self::default();
        cell.update(symbol, fg, bg, modifiers);
        cell
    }

    /// Replace the cell content in place.
    pub fn update(&mut self, symbol: &str, fg: Color, bg: Color, modifiers: Modifiers) {
        self.symbol.clear();
        self.symbol.push_str(symbol);
        self.fg = fg;
        self.bg = bg;
        self.modifiers = modifiers;
        self.width = UnicodeWidthStr::width(symbol).clamp(1, 255) as u8;
    }

    /// Mark this cell as the trailing half of a wide character.
    pub fn make_continuation(&mut self) {
        self.symbol.clear();
        self.width = 0;
    }

    /// Check if this is a continuation cell.
    #[must_use]
    pub const fn is_continuation(&self) -> bool {
        self.width == 0
    }

    /// Get the display width of this cell.
    #[must_use]
    pub const fn width(&self) -> u8 {
        self.width
    }

    /// Dot pattern of the braille glyph in this cell, if it holds one.
    #[must_use]
    pub fn braille_bits(&self) -> Option<u8> {
        let mut chars = self.symbol.chars();
        let ch = chars.next()?;
        if chars.next().is_some() {
            return None;
        }
        let offset = (ch as u32).checked_sub(BRAILLE_BASE)?;
        u8::try_from(offset).ok()
    }

    /// Reset to a blank space on a transparent background.
    pub fn reset(&mut self) {
        self.update(" ", Color::WHITE, Color::TRANSPARENT, Modifiers::NONE);
    }
}

/// Grid of terminal cells with one dirty bit per cell.
#[derive(Debug)]
pub struct CellBuffer {
    cells: Vec<Cell>,
    width: u16,
    height: u16,
    dirty: BitVec,
}

impl CellBuffer {
    /// Create a new buffer with the given dimensions.
    #[must_use]
    pub fn new(width: u16, height: u16) -> Self {
        let size = (width as usize) * (height as usize);
        Self {
            cells: vec![Cell::default(); size],
            width,
            height,
            dirty: bitvec![0; size],
        }
    }

    /// Get the buffer width.
    #[must_use]
    pub const fn width(&self) -> u16 {
        self.width
    }

    /// Get the buffer height.
    #[must_use]
    pub const fn height(&self) -> u16 {
        self.height
    }

    /// Get total cell count.
    #[must_use]
    pub fn len(&self) -> usize {
        self.cells.len()
    }

    /// Check if buffer is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    /// Convert (x, y) to linear index.
    #[must_use]
    pub fn index(&self, x: u16, y: u16) -> usize {
        (y as usize) * (self.width as usize) + (x as usize)
    }

    /// Convert linear index to (x, y).
    #[must_use]
    pub fn coords(&self, idx: usize) -> (u16, u16) {
        let width = (self.width as usize).max(1);
        ((idx % width) as u16, (idx / width) as u16)
    }

    /// Get a cell reference.
    #[must_use]
    pub fn get(&self, x: u16, y: u16) -> Option<&Cell> {
        if x < self.width && y < self.height {
            self.cells.get(self.index(x, y))
        } else {
            None
        }
    }

    /// Get a mutable cell reference and mark the cell dirty.
    pub fn get_mut(&mut self, x: u16, y: u16) -> Option<&mut Cell> {
        if x < self.width && y < self.height {
            let idx = self.index(x, y);
            self.dirty.set(idx, true);
            self.cells.get_mut(idx)
        } else {
            None
        }
    }

    /// Update a cell's content and mark it dirty.
    pub fn update(
        &mut self,
        x: u16,
        y: u16,
        symbol: &str,
        fg: Color,
        bg: Color,
        modifiers: Modifiers,
    ) {
        if let Some(cell) = self.get_mut(x, y) {
            cell.update(symbol, fg, bg, modifiers);
        }
    }

    /// OR braille dots into a cell.
    ///
    /// A cell already holding a braille glyph keeps its dots; any other
    /// content is replaced. The foreground becomes `fg` (last writer wins).
    pub fn merge_braille(&mut self, x: u16, y: u16, bits: u8, fg: Color) {
        let Some(cell) = self.get_mut(x, y) else {
            return;
        };
        let merged = cell.braille_bits().unwrap_or(0) | bits;
        let ch = char::from_u32(BRAILLE_BASE + u32::from(merged)).unwrap_or(' ');
        let mut buf = [0u8; 4];
        let bg = cell.bg;
        cell.update(ch.encode_utf8(&mut buf), fg, bg, Modifiers::NONE);
    }

    /// Mark all cells as dirty (for full redraw).
    pub fn mark_all_dirty(&mut self) {
        self.dirty.fill(true);
    }

    /// Clear dirty flags.
    pub fn clear_dirty(&mut self) {
        self.dirty.fill(false);
    }

    /// Count dirty cells.
    #[must_use]
    pub fn dirty_count(&self) -> usize {
        self.dirty.count_ones()
    }

    /// Iterate over dirty cell indices.
    pub fn iter_dirty(&self) -> impl Iterator<Item = usize> + '_ {
        self.dirty.iter_ones()
    }

    /// Get cells slice.
    #[must_use]
    pub fn cells(&self) -> &[Cell] {
        &self.cells
    }

    /// Resize the buffer (clears all content).
    pub fn resize(&mut self, width: u16, height: u16) {
        let size = (width as usize) * (height as usize);
        self.width = width;
        self.height = height;
        self.cells.clear();
        self.cells.resize(size, Cell::default());
        self.dirty = bitvec![1; size];
    }

    /// Reset every cell and mark the whole buffer dirty.
    pub fn clear(&mut self) {
        for cell in &mut self.cells {
            cell.reset();
        }
        self.mark_all_dirty();
    }

    /// Reset every cell to blank, marking only cells whose content changes.
    ///
    /// Used between frames so that unchanged blank space is not resent.
    pub fn blank(&mut self) {
        let blank = Cell::default();
        for (idx, cell) in self.cells.iter_mut().enumerate() {
            if *cell != blank {
                *cell = blank.clone();
                self.dirty.set(idx, true);
            }
        }
    }

    /// Fill a rectangular region with blanks in the given colors.
    pub fn fill_rect(&mut self, x: u16, y: u16, width: u16, height: u16, fg: Color, bg: Color) {
        let x_end = x.saturating_add(width).min(self.width);
        let y_end = y.saturating_add(height).min(self.height);
        for cy in y..y_end {
            for cx in x..x_end {
                self.update(cx, cy, " ", fg, bg, Modifiers::NONE);
            }
        }
    }

    /// Text content of one row, continuation cells skipped.
    #[must_use]
    pub fn row_text(&self, y: u16) -> String {
        (0..self.width)
            .filter_map(|x| self.get(x, y))
            .filter(|cell| !cell.is_continuation())
            .map(|cell| cell.symbol.as_str())
            .collect()
    }
}
