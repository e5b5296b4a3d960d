//! Two-stack undo/redo log with save-point tracking.
//!
//! Simpler than a branching undo tree: every committed batch pushes onto
//! `undo` and clears `redo`. `save_point` is the `undo` length at the last
//! successful save; once undone past and superseded by a new edit, it
//! becomes unreachable and is replaced with the `None` sentinel so
//! `is_modified` stays true even if the stack length happens to realign.

use crate::edit::ops::EditBatch;

pub struct UndoLog {
    undo: Vec<EditBatch>,
    redo: Vec<EditBatch>,
    save_point: Option<usize>,
}

impl UndoLog {
    #[must_use]
    pub fn new() -> Self {
        Self { undo: Vec::new(), redo: Vec::new(), save_point: Some(0) }
    }

    /// Push a newly committed batch, clearing redo. If the save point was
    /// only reachable via the now-discarded redo stack, it becomes
    /// permanently unreachable.
    pub fn push(&mut self, batch: EditBatch) {
        if let Some(sp) = self.save_point {
            if sp > self.undo.len() {
                self.save_point = None;
            }
        }
        self.undo.push(batch);
        self.redo.clear();
    }

    /// Pop the most recent batch for the caller to invert and apply.
    pub fn undo(&mut self) -> Option<EditBatch> {
        let batch = self.undo.pop()?;
        self.redo.push(batch.clone());
        Some(batch)
    }

    /// Pop the most recently undone batch for the caller to replay forward.
    pub fn redo(&mut self) -> Option<EditBatch> {
        let batch = self.redo.pop()?;
        self.undo.push(batch.clone());
        Some(batch)
    }

    #[must_use]
    pub fn is_modified(&self) -> bool {
        match self.save_point {
            Some(sp) => self.undo.len() != sp,
            None => true,
        }
    }

    /// Mark the current undo-stack depth as matching on-disk bytes.
    pub fn mark_saved(&mut self) {
        self.save_point = Some(self.undo.len());
    }

    /// Clear both stacks and reset the save point to zero — used on
    /// document open/new.
    pub fn reset(&mut self) {
        self.undo.clear();
        self.redo.clear();
        self.save_point = Some(0);
    }

    #[must_use]
    pub fn undo_depth(&self) -> usize {
        self.undo.len()
    }

    #[must_use]
    pub fn can_undo(&self) -> bool {
        !self.undo.is_empty()
    }

    #[must_use]
    pub fn can_redo(&self) -> bool {
        !self.redo.is_empty()
    }
}

impl Default for UndoLog {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cursor::CursorSet;

    fn batch() -> EditBatch {
        EditBatch::new(CursorSet::single(0))
    }

    #[test]
    fn fresh_log_is_not_modified() {
        let log = UndoLog::new();
        assert!(!log.is_modified());
    }

    #[test]
    fn push_marks_modified_until_saved() {
        let mut log = UndoLog::new();
        log.push(batch());
        assert!(log.is_modified());
        log.mark_saved();
        assert!(!log.is_modified());
    }

    #[test]
    fn undo_then_redo_restores_modified_state() {
        let mut log = UndoLog::new();
        log.push(batch());
        log.mark_saved();
        assert!(log.undo().is_some());
        assert!(log.is_modified());
        assert!(log.redo().is_some());
        assert!(!log.is_modified());
    }

    #[test]
    fn push_clears_redo_stack() {
        let mut log = UndoLog::new();
        log.push(batch());
        log.undo();
        assert!(log.can_redo());
        log.push(batch());
        assert!(!log.can_redo());
    }

    #[test]
    fn save_point_becomes_unreachable_after_undo_then_new_edit() {
        let mut log = UndoLog::new();
        log.push(batch());
        log.mark_saved(); // save point at depth 1
        log.undo(); // back to depth 0, save point at 1 is now only reachable via redo
        log.push(batch()); // new edit discards redo — depth back to 1, but not the saved one
        assert!(log.is_modified(), "stack depth coincidentally matches save point but content differs");
    }

    #[test]
    fn reset_clears_everything() {
        let mut log = UndoLog::new();
        log.push(batch());
        log.mark_saved();
        log.push(batch());
        log.reset();
        assert!(!log.is_modified());
        assert!(!log.can_undo());
        assert!(!log.can_redo());
    }
}
