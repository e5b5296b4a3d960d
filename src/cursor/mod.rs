//! Cursor set: the multi-caret / rectangular selection model.
//!
//! A [`Cursor`] carries a logical byte range (`head`/`anchor`), the visual
//! X it "wants" to be at (`desired_x`), and whether it currently sits past
//! the physical end of its line (`virtual_space`). A [`CursorSet`] is an
//! ordered, non-empty collection of cursors; a boolean on the set — not on
//! any individual cursor — records whether the set was created as a
//! rectangular selection, since the cursors alone can't tell independent
//! multi-cursor edits and a rectangular block apart.

#[cfg(test)]
#[path = "tests.rs"]
mod tests;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Cursor {
    pub head: usize,
    pub anchor: usize,
    pub desired_x: f32,
    pub original_anchor_x: f32,
    pub virtual_space: bool,
}

impl Cursor {
    #[must_use]
    pub fn at(pos: usize) -> Self {
        Self {
            head: pos,
            anchor: pos,
            desired_x: 0.0,
            original_anchor_x: 0.0,
            virtual_space: false,
        }
    }

    #[must_use]
    pub fn has_selection(&self) -> bool {
        self.head != self.anchor
    }

    #[must_use]
    pub fn start(&self) -> usize {
        self.head.min(self.anchor)
    }

    #[must_use]
    pub fn end(&self) -> usize {
        self.head.max(self.anchor)
    }

    #[must_use]
    pub fn is_forward(&self) -> bool {
        self.head >= self.anchor
    }

    /// Collapse the selection to `head`, clearing virtual-space state.
    pub fn collapse_to_head(&mut self) {
        self.anchor = self.head;
        self.virtual_space = false;
    }
}

/// Shift a single offset across an edit of `delta` bytes at `pos`.
/// `delta` is positive for an insert (its length) and negative for an
/// erase (minus its length).
#[must_use]
pub fn shift_offset(offset: usize, pos: usize, delta: isize) -> usize {
    if delta >= 0 {
        if offset > pos {
            offset + delta as usize
        } else {
            offset
        }
    } else {
        let erase_len = (-delta) as usize;
        if offset > pos + erase_len {
            offset - erase_len
        } else if offset > pos {
            pos
        } else {
            offset
        }
    }
}

/// Non-empty, ordered collection of cursors.
#[derive(Debug, Clone)]
pub struct CursorSet {
    cursors: Vec<Cursor>,
    /// Set at creation time by the gesture that produced it: `true` for an
    /// Alt-drag / Alt-Shift-arrow rectangular selection, `false` for plain
    /// multi-cursor (including the single-caret case). Drives clipboard
    /// copy/paste semantics.
    rectangular: bool,
}

impl CursorSet {
    #[must_use]
    pub fn single(pos: usize) -> Self {
        Self {
            cursors: vec![Cursor::at(pos)],
            rectangular: false,
        }
    }

    /// # Panics
    /// Panics if `cursors` is empty — a `CursorSet` is never empty.
    #[must_use]
    pub fn new(cursors: Vec<Cursor>, rectangular: bool) -> Self {
        assert!(!cursors.is_empty(), "CursorSet must be non-empty");
        Self { cursors, rectangular }
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.cursors.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        false
    }

    #[must_use]
    pub fn is_multi(&self) -> bool {
        self.cursors.len() > 1
    }

    /// Whether this set should be treated as a rectangular block. Only
    /// meaningful (and only ever `true`) in multi-caret mode.
    #[must_use]
    pub fn is_rectangular(&self) -> bool {
        self.rectangular && self.is_multi()
    }

    pub fn set_rectangular(&mut self, rectangular: bool) {
        self.rectangular = rectangular;
    }

    #[must_use]
    pub fn cursors(&self) -> &[Cursor] {
        &self.cursors
    }

    pub fn cursors_mut(&mut self) -> &mut Vec<Cursor> {
        &mut self.cursors
    }

    #[must_use]
    pub fn primary(&self) -> &Cursor {
        &self.cursors[0]
    }

    pub fn replace_all(&mut self, cursors: Vec<Cursor>, rectangular: bool) {
        assert!(!cursors.is_empty());
        self.cursors = cursors;
        self.rectangular = rectangular;
    }

    /// Indices into `cursors()` ordered by descending start position, so
    /// that applying edits in this order never perturbs a not-yet-applied
    /// cursor's position.
    #[must_use]
    pub fn descending_indices(&self) -> Vec<usize> {
        let mut idx: Vec<usize> = (0..self.cursors.len()).collect();
        idx.sort_by(|&a, &b| self.cursors[b].start().cmp(&self.cursors[a].start()));
        idx
    }

    /// Sort by head ascending, then coalesce overlapping/adjacent ranges,
    /// preserving the surviving cursor's directionality.
    pub fn merge_overlapping(&mut self) {
        if self.cursors.len() < 2 {
            return;
        }
        self.cursors.sort_by_key(Cursor::start);
        let mut merged: Vec<Cursor> = Vec::with_capacity(self.cursors.len());
        for c in self.cursors.drain(..) {
            let should_merge = merged
                .last()
                .is_some_and(|last: &Cursor| c.start() <= last.end());
            if should_merge {
                let last = merged.last_mut().unwrap();
                let new_start = last.start().min(c.start());
                let new_end = last.end().max(c.end());
                if last.is_forward() {
                    last.anchor = new_start;
                    last.head = new_end;
                } else {
                    last.head = new_start;
                    last.anchor = new_end;
                }
                continue;
            }
            merged.push(c);
        }
        self.cursors = merged;
    }

    /// Apply the shift policy after an edit of `delta` bytes at `pos`,
    /// owned by `owner_idx` (whose head/anchor are instead pinned to the
    /// edit's exact outcome).
    pub fn shift_for_edit(
        &mut self,
        owner_idx: usize,
        pos: usize,
        delta: isize,
        owner_new_head: usize,
        owner_new_anchor: usize,
    ) {
        for (i, c) in self.cursors.iter_mut().enumerate() {
            if i == owner_idx {
                c.head = owner_new_head;
                c.anchor = owner_new_anchor;
                continue;
            }
            c.head = shift_offset(c.head, pos, delta);
            c.anchor = shift_offset(c.anchor, pos, delta);
        }
    }

    /// Shift every cursor (no owner exception) — used when an edit is
    /// applied externally to all cursors uniformly, e.g. padding inserted
    /// ahead of every cursor in a rectangular paste.
    pub fn shift_all(&mut self, pos: usize, delta: isize) {
        for c in self.cursors.iter_mut() {
            c.head = shift_offset(c.head, pos, delta);
            c.anchor = shift_offset(c.anchor, pos, delta);
        }
    }
}
