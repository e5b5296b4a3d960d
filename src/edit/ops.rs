//! Atomic edit operations and batches — the undo log's unit of work.

use crate::cursor::CursorSet;
use crate::piece_table::PieceTable;

/// A single primitive mutation of the piece table. `Erase` carries the
/// bytes it removed so it can be inverted without re-reading the table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EditOp {
    Insert { pos: usize, bytes: Vec<u8> },
    Erase { pos: usize, bytes: Vec<u8> },
}

impl EditOp {
    #[must_use]
    pub fn inverse(&self) -> EditOp {
        match self {
            EditOp::Insert { pos, bytes } => EditOp::Erase { pos: *pos, bytes: bytes.clone() },
            EditOp::Erase { pos, bytes } => EditOp::Insert { pos: *pos, bytes: bytes.clone() },
        }
    }

    pub fn apply(&self, table: &mut PieceTable) {
        match self {
            EditOp::Insert { pos, bytes } => table.insert(*pos, bytes),
            EditOp::Erase { pos, bytes } => table.erase(*pos, bytes.len()),
        }
    }

    #[must_use]
    pub fn len_delta(&self) -> isize {
        match self {
            EditOp::Insert { bytes, .. } => bytes.len() as isize,
            EditOp::Erase { bytes, .. } => -(bytes.len() as isize),
        }
    }
}

/// An atomic group of ops plus the cursor sets before and after — the unit
/// pushed onto [`crate::edit::undo::UndoLog`].
#[derive(Debug, Clone)]
pub struct EditBatch {
    pub ops: Vec<EditOp>,
    pub before: CursorSet,
    pub after: CursorSet,
}

impl EditBatch {
    #[must_use]
    pub fn new(before: CursorSet) -> Self {
        Self { ops: Vec::new(), before: before.clone(), after: before }
    }

    pub fn push(&mut self, op: EditOp) {
        self.ops.push(op);
    }

    pub fn finish(&mut self, after: CursorSet) {
        self.after = after;
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.ops.is_empty()
    }

    /// Replay ops forward (redo direction).
    pub fn apply_forward(&self, table: &mut PieceTable) {
        for op in &self.ops {
            op.apply(table);
        }
    }

    /// Replay ops in reverse, inverted (undo direction).
    pub fn apply_inverse(&self, table: &mut PieceTable) {
        for op in self.ops.iter().rev() {
            op.inverse().apply(table);
        }
    }
}
