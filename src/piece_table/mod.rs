//! Piece table: the text buffer.
//!
//! Holds an immutable, non-owned "original" byte region (typically a
//! memory-mapped file) and a growable append-only "add" buffer. The
//! document itself is an ordered sequence of [`Piece`]s, each pointing into
//! one of the two buffers. Edits never copy the original bytes; they only
//! ever append to the add buffer and splice the piece sequence.
//!
//! Offsets throughout this module are raw byte offsets into the *logical*
//! document, not code points or grapheme clusters — that mapping lives in
//! [`crate::line_index`] and [`crate::layout`].

use std::sync::Arc;


#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Source {
    Original,
    Added,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Piece {
    pub source: Source,
    pub start: usize,
    pub len: usize,
}

/// An append-only text buffer over (original mapping ∪ add buffer).
pub struct PieceTable {
    original: Arc<[u8]>,
    add: Vec<u8>,
    pieces: Vec<Piece>,
}

impl PieceTable {
    /// A piece table with no original mapping and no content.
    #[must_use]
    pub fn empty() -> Self {
        Self {
            original: Arc::from(&[][..]),
            add: Vec::new(),
            pieces: Vec::new(),
        }
    }

    /// A piece table seeded with an original byte region (e.g. a file
    /// mapping). The region is never mutated; all edits land in the add
    /// buffer.
    #[must_use]
    pub fn from_original(original: Arc<[u8]>) -> Self {
        let len = original.len();
        let pieces = if len == 0 {
            Vec::new()
        } else {
            vec![Piece {
                source: Source::Original,
                start: 0,
                len,
            }]
        };
        Self {
            original,
            add: Vec::new(),
            pieces,
        }
    }

    #[must_use]
    pub fn length(&self) -> usize {
        self.pieces.iter().map(|p| p.len).sum()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.pieces.is_empty()
    }

    #[must_use]
    pub fn piece_count(&self) -> usize {
        self.pieces.len()
    }

    #[must_use]
    pub fn pieces(&self) -> &[Piece] {
        &self.pieces
    }

    fn source_bytes(&self, source: Source) -> &[u8] {
        match source {
            Source::Original => &self.original,
            Source::Added => &self.add,
        }
    }

    /// The byte at logical position `p`. `p` must be `< length()`.
    #[must_use]
    pub fn byte_at(&self, p: usize) -> u8 {
        let mut cursor = 0usize;
        for piece in &self.pieces {
            if p < cursor + piece.len {
                let offset = piece.start + (p - cursor);
                return self.source_bytes(piece.source)[offset];
            }
            cursor += piece.len;
        }
        panic!("byte_at: position {p} out of bounds (len {})", self.length());
    }

    /// Copy up to `n` bytes starting at `p`, crossing piece boundaries.
    /// Clamps `n` to `length() - p`.
    #[must_use]
    pub fn range(&self, p: usize, n: usize) -> Vec<u8> {
        let len = self.length();
        let p = p.min(len);
        let n = n.min(len - p);
        let mut out = Vec::with_capacity(n);
        if n == 0 {
            return out;
        }
        let mut cursor = 0usize;
        let end = p + n;
        for piece in &self.pieces {
            let piece_start = cursor;
            let piece_end = cursor + piece.len;
            cursor = piece_end;
            if piece_end <= p || piece_start >= end {
                continue;
            }
            let lo = p.max(piece_start) - piece_start;
            let hi = end.min(piece_end) - piece_start;
            let bytes = self.source_bytes(piece.source);
            out.extend_from_slice(&bytes[piece.start + lo..piece.start + hi]);
            if cursor >= end {
                break;
            }
        }
        out
    }

    /// The whole document, materialized. Used for save and for the other
    /// whole-document passes (find/replace, line index rebuild).
    #[must_use]
    pub fn to_bytes(&self) -> Vec<u8> {
        self.range(0, self.length())
    }

    /// Locate the piece index and in-piece byte offset for logical
    /// position `p`. Returns `(pieces.len(), 0)` if `p` is at or past the
    /// document end (append point).
    fn locate(&self, p: usize) -> (usize, usize) {
        let mut cursor = 0usize;
        for (i, piece) in self.pieces.iter().enumerate() {
            if p < cursor + piece.len {
                return (i, p - cursor);
            }
            cursor += piece.len;
        }
        (self.pieces.len(), 0)
    }

    /// Insert `bytes` at logical position `p`. Inserting at `length()`
    /// appends. Empty inserts are no-ops.
    pub fn insert(&mut self, p: usize, bytes: &[u8]) {
        if bytes.is_empty() {
            return;
        }
        let p = p.min(self.length());

        let add_start = self.add.len();
        self.add.extend_from_slice(bytes);
        let new_piece = Piece {
            source: Source::Added,
            start: add_start,
            len: bytes.len(),
        };

        let (idx, offset) = self.locate(p);

        if idx == self.pieces.len() {
            // Append, but try to coalesce onto a trailing Added piece whose
            // add-buffer span is exactly contiguous with this insert.
            if let Some(last) = self.pieces.last_mut() {
                if last.source == Source::Added && last.start + last.len == add_start {
                    last.len += bytes.len();
                    return;
                }
            }
            self.pieces.push(new_piece);
            return;
        }

        if offset == 0 {
            // Inserting exactly at a piece boundary: try to coalesce with
            // the previous piece first, else splice in before `idx`.
            if idx > 0 {
                let prev = &mut self.pieces[idx - 1];
                if prev.source == Source::Added && prev.start + prev.len == add_start {
                    prev.len += bytes.len();
                    return;
                }
            }
            self.pieces.insert(idx, new_piece);
            return;
        }

        // Strictly interior: split pieces[idx] into [start, start+offset)
        // and [start+offset, start+len).
        let piece = self.pieces[idx].clone();
        let left = Piece {
            source: piece.source,
            start: piece.start,
            len: offset,
        };
        let right = Piece {
            source: piece.source,
            start: piece.start + offset,
            len: piece.len - offset,
        };
        self.pieces
            .splice(idx..=idx, [left, new_piece, right]);
    }

    /// Erase `n` bytes starting at `p`. Erasing past `length()` clamps; a
    /// zero-length erase is a no-op.
    pub fn erase(&mut self, p: usize, n: usize) {
        let len = self.length();
        let p = p.min(len);
        let n = n.min(len - p);
        if n == 0 {
            return;
        }
        let end = p + n;

        let (start_idx, start_offset) = self.locate(p);
        let (end_idx, end_offset) = self.locate(end);

        // Collect surviving fragments of the boundary pieces, then splice
        // the whole affected range out in one go.
        let mut replacement = Vec::new();
        if start_offset > 0 {
            let piece = &self.pieces[start_idx];
            replacement.push(Piece {
                source: piece.source,
                start: piece.start,
                len: start_offset,
            });
        }
        if end_idx < self.pieces.len() && end_offset > 0 {
            let piece = &self.pieces[end_idx];
            replacement.push(Piece {
                source: piece.source,
                start: piece.start + end_offset,
                len: piece.len - end_offset,
            });
        }

        let splice_end = if end_offset > 0 { end_idx + 1 } else { end_idx };
        self.pieces.splice(start_idx..splice_end, replacement);
    }
}
