//! Layout oracle: the seam between byte offsets and on-screen X coordinates.
//!
//! The core never shapes glyphs itself — a real host wires in its own text
//! shaper (font metrics, ligatures, bidi) behind [`LayoutOracle`]. What's
//! here is the trait plus [`MonospaceOracle`], a reference implementation
//! good enough for headless use and tests, built on the same
//! `unicode_width` column query a render-width lookup would make.

use unicode_segmentation::UnicodeSegmentation;
use unicode_width::UnicodeWidthChar;

use crate::constants::layout::{DEFAULT_REFERENCE_CELL_WIDTH, DEFAULT_TAB_WIDTH};

/// A pluggable text-shaping oracle. All positions are byte offsets *within
/// a single line's text*, not document-wide offsets — callers resolve the
/// line first via [`crate::line_index::LineIndex`].
pub trait LayoutOracle {
    /// The X coordinate (in the host's visual units) at which byte offset
    /// `byte_in_line` sits, measured from the start of the line.
    fn x_in_line(&self, line: &str, byte_in_line: usize) -> f32;

    /// The byte offset within `line` whose cell contains X coordinate `x`,
    /// snapped to the nearest grapheme-cluster boundary.
    fn offset_in_line_from_x(&self, line: &str, x: f32) -> usize;

    /// Step one grapheme cluster forward (`forward = true`) or backward
    /// from `byte_in_line`, clamped to `[0, line.len()]`.
    fn grapheme_step(&self, line: &str, byte_in_line: usize, forward: bool) -> usize;

    /// The width of a "reference cell" — used to place a caret in virtual
    /// space past the end of a line (spec's virtual-space model).
    fn reference_cell_width(&self) -> f32;
}

/// Derived helpers shared by every oracle implementation.
pub fn x_of(oracle: &dyn LayoutOracle, line: &str, byte_in_line: usize) -> f32 {
    oracle.x_in_line(line, byte_in_line)
}

/// Inverse of [`x_of`]: the byte offset whose cell contains `x`.
pub fn pos_from(oracle: &dyn LayoutOracle, line: &str, x: f32) -> usize {
    oracle.offset_in_line_from_x(line, x)
}

/// Host-supplied layout configuration, constructed once and handed to
/// whichever oracle the host wires in. A plain struct rather than a
/// registry: this crate has exactly two knobs worth tuning, so there's no
/// descriptor/lookup machinery to build.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LayoutConfig {
    pub reference_cell_width: f32,
    pub tab_width: usize,
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            reference_cell_width: DEFAULT_REFERENCE_CELL_WIDTH,
            tab_width: DEFAULT_TAB_WIDTH,
        }
    }
}

/// A monospace reference oracle: every grapheme cluster occupies exactly
/// `reference_cell_width` columns' worth of pixels, except tabs, which
/// advance to the next tab stop.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MonospaceOracle {
    pub cell_width: f32,
    pub tab_width: usize,
}

impl MonospaceOracle {
    #[must_use]
    pub fn new(cell_width: f32, tab_width: usize) -> Self {
        Self { cell_width, tab_width }
    }

    #[must_use]
    pub fn from_config(config: LayoutConfig) -> Self {
        Self::new(config.reference_cell_width, config.tab_width)
    }

    fn cell_columns(&self, ch: char, col: usize) -> usize {
        if ch == '\t' {
            self.tab_width - (col % self.tab_width)
        } else {
            UnicodeWidthChar::width(ch).unwrap_or(0)
        }
    }
}

impl Default for MonospaceOracle {
    fn default() -> Self {
        Self::new(DEFAULT_REFERENCE_CELL_WIDTH, DEFAULT_TAB_WIDTH)
    }
}

impl LayoutOracle for MonospaceOracle {
    fn x_in_line(&self, line: &str, byte_in_line: usize) -> f32 {
        let mut col = 0usize;
        for g in line.grapheme_indices(true) {
            let (byte_offset, cluster) = g;
            if byte_offset >= byte_in_line {
                break;
            }
            let ch = cluster.chars().next().unwrap_or(' ');
            col += self.cell_columns(ch, col);
        }
        col as f32 * self.cell_width
    }

    fn offset_in_line_from_x(&self, line: &str, x: f32) -> usize {
        if x <= 0.0 {
            return 0;
        }
        let target_col = (x / self.cell_width).round() as usize;
        let mut col = 0usize;
        let mut last_offset = 0usize;
        for (byte_offset, cluster) in line.grapheme_indices(true) {
            if col >= target_col {
                return byte_offset;
            }
            let ch = cluster.chars().next().unwrap_or(' ');
            col += self.cell_columns(ch, col);
            last_offset = byte_offset + cluster.len();
        }
        last_offset
    }

    fn grapheme_step(&self, line: &str, byte_in_line: usize, forward: bool) -> usize {
        let byte_in_line = byte_in_line.min(line.len());
        if forward {
            line[byte_in_line..]
                .grapheme_indices(true)
                .nth(1)
                .map_or(line.len(), |(off, _)| byte_in_line + off)
        } else {
            line[..byte_in_line]
                .grapheme_indices(true)
                .next_back()
                .map_or(0, |(off, _)| off)
        }
    }

    fn reference_cell_width(&self) -> f32 {
        self.cell_width
    }
}
