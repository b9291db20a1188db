//! Direct terminal backend.
//!
//! ```text
//! Canvas trait → DirectTerminalCanvas → CellBuffer → DiffRenderer → crossterm
//! ```
//!
//! - Cells inline their grapheme in a `CompactString`
//! - Only dirty cells are emitted, batched into a single write per frame
//! - Sub-cell segments become braille dots merged into existing cells

mod cell_buffer;
mod diff_renderer;
mod direct_canvas;

pub use cell_buffer::{Cell, CellBuffer, Modifiers, BRAILLE_BASE};
pub use diff_renderer::{DiffRenderer, FlushStats};
pub use direct_canvas::DirectTerminalCanvas;
