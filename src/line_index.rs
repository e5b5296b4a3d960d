//! Line index: byte offsets where each line begins.
//!
//! Rebuilt by a single pass over the piece table after each committed
//! mutation (see `crate::edit::engine`) rather than patched incrementally —
//! the editing core favors a simple, obviously-correct rebuild since the
//! line index is cheap relative to the edit itself and this avoids a whole
//! class of incremental-patch bugs.

use crate::piece_table::PieceTable;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LineIndex {
    /// Byte offset of the start of each line. Always starts with 0.
    line_starts: Vec<usize>,
}

impl LineIndex {
    #[must_use]
    pub fn new() -> Self {
        Self { line_starts: vec![0] }
    }

    /// Rebuild from scratch by scanning every piece's bytes in order.
    pub fn rebuild(&mut self, table: &PieceTable) {
        self.line_starts.clear();
        self.line_starts.push(0);
        let mut offset = 0usize;
        for piece in table.pieces() {
            // PieceTable keeps its buffers private; read each piece's span
            // back out through `range` rather than reaching in directly.
            let bytes = table.range(offset, piece.len);
            for (i, &b) in bytes.iter().enumerate() {
                if b == b'\n' {
                    self.line_starts.push(offset + i + 1);
                }
            }
            offset += piece.len;
        }
    }

    #[must_use]
    pub fn line_count(&self) -> usize {
        self.line_starts.len()
    }

    #[must_use]
    pub fn starts(&self) -> &[usize] {
        &self.line_starts
    }

    /// The line containing byte offset `p`: upper-bound of `p` minus one,
    /// clamped to `[0, len - 1]`.
    #[must_use]
    pub fn line_of(&self, p: usize) -> usize {
        match self.line_starts.binary_search(&p) {
            Ok(i) => i,
            Err(i) => i.saturating_sub(1),
        }
        .min(self.line_starts.len() - 1)
    }

    /// `[start, end)` for line `i`. The trailing `\n` (and any preceding
    /// `\r`) is part of the range; callers wanting the visible text trim
    /// it themselves.
    #[must_use]
    pub fn line_range(&self, i: usize, doc_len: usize) -> (usize, usize) {
        let start = self.line_starts[i];
        let end = self.line_starts.get(i + 1).copied().unwrap_or(doc_len);
        (start, end)
    }
}

impl Default for LineIndex {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    fn index_for(bytes: &[u8]) -> (LineIndex, PieceTable) {
        let table = PieceTable::from_original(Arc::from(bytes));
        let mut idx = LineIndex::new();
        idx.rebuild(&table);
        (idx, table)
    }

    #[test]
    fn empty_document_has_one_line() {
        let (idx, _) = index_for(b"");
        assert_eq!(idx.line_count(), 1);
        assert_eq!(idx.starts(), &[0]);
    }

    #[test]
    fn counts_newlines() {
        let (idx, _) = index_for(b"a\nb\nc\n");
        assert_eq!(idx.line_count(), 4);
        assert_eq!(idx.starts(), &[0, 2, 4, 6]);
    }

    #[test]
    fn no_trailing_newline_still_has_final_line() {
        let (idx, table) = index_for(b"a\nbb");
        assert_eq!(idx.line_count(), 2);
        assert_eq!(idx.line_range(1, table.length()), (2, 4));
    }

    #[test]
    fn line_of_is_monotonic_and_clamped() {
        let (idx, _) = index_for(b"a\nbb\nccc");
        assert_eq!(idx.line_of(0), 0);
        assert_eq!(idx.line_of(1), 0);
        assert_eq!(idx.line_of(2), 1);
        assert_eq!(idx.line_of(4), 1);
        assert_eq!(idx.line_of(5), 2);
        assert_eq!(idx.line_of(100), 2);
    }

    #[test]
    fn rebuild_after_mutation_reflects_new_content() {
        let mut table = PieceTable::from_original(Arc::from(&b"one\ntwo"[..]));
        let mut idx = LineIndex::new();
        idx.rebuild(&table);
        assert_eq!(idx.line_count(), 2);

        table.insert(3, b"\nand a half");
        idx.rebuild(&table);
        assert_eq!(idx.line_count(), 3);
        assert_eq!(idx.starts(), &[0, 4, 15]);
    }

    #[test]
    fn first_entry_is_always_zero_and_strictly_increasing() {
        let (idx, _) = index_for(b"\n\n\n");
        assert_eq!(idx.starts()[0], 0);
        for w in idx.starts().windows(2) {
            assert!(w[0] < w[1]);
        }
    }
}
