//! Edit engine: the component that turns intents into [`EditBatch`]es.
//!
//! Every public method here borrows the four pieces of document state it
//! needs for the duration of one call — the piece table, the line index,
//! the cursor set, and the undo log — plus a [`LayoutOracle`] for anything
//! that needs a visual X. No state lives on `EditEngine` itself between
//! calls except the drag gesture, which the host threads through
//! [`DragState`].

use std::collections::BTreeSet;

use regex::RegexBuilder;

use crate::constants::errors;
use crate::cursor::{shift_offset, Cursor, CursorSet};
use crate::edit::classify::is_word_byte;
use crate::edit::ops::{EditBatch, EditOp};
use crate::edit::undo::UndoLog;
use crate::error::{CoreError, ErrorKind};
use crate::layout::LayoutOracle;
use crate::line_index::LineIndex;
use crate::piece_table::PieceTable;

#[cfg(test)]
#[path = "tests.rs"]
mod tests;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CaseDirection {
    Upper,
    Lower,
}

/// Drag-over-selection gesture state, threaded through by the host between
/// pointer events.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DragState {
    #[default]
    Idle,
    PendingMove { anchor_pos: usize },
    Moving { anchor_pos: usize, current_pos: usize },
}

/// The small set of intents the engine understands. Translating raw
/// key/pointer events into these is a host concern.
pub enum EditIntent<'a> {
    InsertAtCursors(&'a [u8]),
    RectangularPaste(&'a str),
    Backspace,
    DeleteForward,
    DeleteLines,
    MoveLines { down: bool },
    DuplicateLines { down: bool },
    ConvertCase(CaseDirection),
    Undo,
    Redo,
}

pub struct EditEngine<'a> {
    table: &'a mut PieceTable,
    lines: &'a mut LineIndex,
    cursors: &'a mut CursorSet,
    undo: &'a mut UndoLog,
    oracle: &'a dyn LayoutOracle,
}

impl<'a> EditEngine<'a> {
    pub fn new(
        table: &'a mut PieceTable,
        lines: &'a mut LineIndex,
        cursors: &'a mut CursorSet,
        undo: &'a mut UndoLog,
        oracle: &'a dyn LayoutOracle,
    ) -> Self {
        Self { table, lines, cursors, undo, oracle }
    }

    /// Dispatch a single intent, returning the batch it produced (`None`
    /// for pure-navigation intents, or a find/replace with zero matches).
    pub fn dispatch(&mut self, intent: EditIntent<'_>) -> Option<EditBatch> {
        match intent {
            EditIntent::InsertAtCursors(bytes) => Some(self.insert_at_cursors(bytes)),
            EditIntent::RectangularPaste(text) => Some(self.rectangular_paste(text)),
            EditIntent::Backspace => self.backspace(),
            EditIntent::DeleteForward => self.delete_forward(),
            EditIntent::DeleteLines => Some(self.delete_lines()),
            EditIntent::MoveLines { down } => Some(self.move_lines(down)),
            EditIntent::DuplicateLines { down } => Some(self.duplicate_lines(down)),
            EditIntent::ConvertCase(dir) => self.convert_case(dir),
            EditIntent::Undo => self.undo_once(),
            EditIntent::Redo => self.redo_once(),
        }
    }

    // -- layout helpers -----------------------------------------------

    fn line_text(&self, line_idx: usize) -> String {
        let len = self.table.length();
        let (s, e) = self.lines.line_range(line_idx, len);
        String::from_utf8_lossy(&self.table.range(s, e - s)).into_owned()
    }

    /// The byte offset of the end of the visible text on `line_idx`,
    /// i.e. before any trailing `\r\n`/`\n`.
    fn visible_line_end(&self, line_idx: usize) -> usize {
        let len = self.table.length();
        let (s, e) = self.lines.line_range(line_idx, len);
        if e > s && self.table.byte_at(e - 1) == b'\n' {
            if e - 1 > s && self.table.byte_at(e - 2) == b'\r' {
                return e - 2;
            }
            return e - 1;
        }
        e
    }

    fn x_of_pos(&self, pos: usize) -> f32 {
        let line_idx = self.lines.line_of(pos);
        let (line_start, _) = self.lines.line_range(line_idx, self.table.length());
        self.oracle.x_in_line(&self.line_text(line_idx), pos - line_start)
    }

    fn pos_from_line_x(&self, line_idx: usize, x: f32) -> usize {
        let (line_start, _) = self.lines.line_range(line_idx, self.table.length());
        line_start + self.oracle.offset_in_line_from_x(&self.line_text(line_idx), x)
    }

    // -- insert / replace at cursors -----------------------------------

    pub fn insert_at_cursors(&mut self, payload: &[u8]) -> EditBatch {
        let before = self.cursors.clone();
        let mut batch = EditBatch::new(before);
        let order = self.cursors.descending_indices();

        for idx in order {
            let mut c = self.cursors.cursors()[idx];

            if c.has_selection() {
                let start = c.start();
                let len = c.end() - start;
                let erased = self.table.range(start, len);
                self.table.erase(start, len);
                batch.push(EditOp::Erase { pos: start, bytes: erased });
                self.cursors.shift_for_edit(idx, start, -(len as isize), start, start);
                c = self.cursors.cursors()[idx];
            }

            if c.virtual_space {
                let line_idx = self.lines.line_of(c.head);
                let line_end = self.visible_line_end(line_idx);
                let line_end_x = self.x_of_pos(line_end);
                let cell = self.oracle.reference_cell_width();
                if c.desired_x - line_end_x > cell / 2.0 {
                    let spaces = ((c.desired_x - line_end_x) / cell).round().max(0.0) as usize;
                    if spaces > 0 {
                        let pad = vec![b' '; spaces];
                        self.table.insert(line_end, &pad);
                        batch.push(EditOp::Insert { pos: line_end, bytes: pad.clone() });
                        let new_pos = line_end + pad.len();
                        self.cursors.shift_for_edit(idx, line_end, pad.len() as isize, new_pos, new_pos);
                        c = self.cursors.cursors()[idx];
                    }
                }
            }

            let pos = c.head;
            self.table.insert(pos, payload);
            batch.push(EditOp::Insert { pos, bytes: payload.to_vec() });
            let new_pos = pos + payload.len();
            self.cursors.shift_for_edit(idx, pos, payload.len() as isize, new_pos, new_pos);

            let dx = self.x_of_pos(new_pos);
            let cm = &mut self.cursors.cursors_mut()[idx];
            cm.desired_x = dx;
            cm.original_anchor_x = dx;
            cm.virtual_space = false;
        }

        self.lines.rebuild(self.table);
        batch.finish(self.cursors.clone());
        self.undo.push(batch.clone());
        batch
    }

    // -- rectangular block paste ----------------------------------------

    pub fn rectangular_paste(&mut self, payload: &str) -> EditBatch {
        let before = self.cursors.clone();
        let mut batch = EditBatch::new(before);

        let payload_lines: Vec<&str> = payload.split('\n').collect();
        let base = *self
            .cursors
            .cursors()
            .iter()
            .min_by_key(|c| c.head)
            .unwrap_or_else(|| self.cursors.primary());
        let base_line = self.lines.line_of(base.head);
        let base_x = self.x_of_pos(base.head);

        let needed_lines = base_line + payload_lines.len();
        if needed_lines > self.lines.line_count() {
            let missing = needed_lines - self.lines.line_count();
            let pad = vec![b'\n'; missing];
            let insert_pos = self.table.length();
            self.table.insert(insert_pos, &pad);
            batch.push(EditOp::Insert { pos: insert_pos, bytes: pad });
            self.lines.rebuild(self.table);
        }

        let mut new_cursors = Vec::with_capacity(payload_lines.len());
        for (i, line_text) in payload_lines.iter().enumerate() {
            let line_idx = base_line + i;
            let doc_len = self.table.length();
            let (_, line_end) = self.lines.line_range(line_idx, doc_len);
            let visible_end = self.visible_line_end(line_idx);
            let target_pos = self.pos_from_line_x(line_idx, base_x);

            let mut bytes_to_insert = Vec::new();
            let insert_pos = if target_pos > visible_end {
                let line_end_x = self.x_of_pos(visible_end);
                let cell = self.oracle.reference_cell_width();
                let spaces = ((base_x - line_end_x) / cell).round().max(0.0) as usize;
                bytes_to_insert.extend(std::iter::repeat(b' ').take(spaces));
                visible_end
            } else {
                target_pos.min(line_end)
            };
            bytes_to_insert.extend_from_slice(line_text.as_bytes());

            self.table.insert(insert_pos, &bytes_to_insert);
            batch.push(EditOp::Insert { pos: insert_pos, bytes: bytes_to_insert.clone() });
            new_cursors.push(Cursor::at(insert_pos + bytes_to_insert.len()));
            self.lines.rebuild(self.table);
        }

        self.cursors.replace_all(new_cursors, false);
        batch.finish(self.cursors.clone());
        self.undo.push(batch.clone());
        batch
    }

    // -- backspace / delete-forward --------------------------------------

    /// Returns `None` when every affected cursor was in virtual space (no
    /// text mutated, nothing pushed to the undo log).
    pub fn backspace(&mut self) -> Option<EditBatch> {
        let before = self.cursors.clone();
        let mut batch = EditBatch::new(before);
        let order = self.cursors.descending_indices();

        for idx in order {
            let c = self.cursors.cursors()[idx];
            if c.has_selection() {
                let start = c.start();
                let len = c.end() - start;
                let erased = self.table.range(start, len);
                self.table.erase(start, len);
                batch.push(EditOp::Erase { pos: start, bytes: erased });
                self.cursors.shift_for_edit(idx, start, -(len as isize), start, start);
            } else if c.virtual_space {
                let line_idx = self.lines.line_of(c.head);
                let line_end_x = self.x_of_pos(self.visible_line_end(line_idx));
                let cell = self.oracle.reference_cell_width();
                let cm = &mut self.cursors.cursors_mut()[idx];
                cm.desired_x = (cm.desired_x - cell).max(line_end_x);
                if cm.desired_x <= line_end_x {
                    cm.virtual_space = false;
                }
            } else if c.head > 0 {
                let line_idx = self.lines.line_of(c.head);
                let (line_start, _) = self.lines.line_range(line_idx, self.table.length());
                let text = self.line_text(line_idx);
                let byte_in_line = c.head - line_start;
                let new_byte_in_line = if byte_in_line == 0 {
                    // Crossing into the previous line: erase exactly the
                    // preceding newline (and CR, if present).
                    0
                } else {
                    self.oracle.grapheme_step(&text, byte_in_line, false)
                };
                let erase_start = if byte_in_line == 0 {
                    let prev_end = line_start;
                    let mut s = prev_end - 1;
                    if s > 0 && self.table.byte_at(s - 1) == b'\r' {
                        s -= 1;
                    }
                    s
                } else {
                    line_start + new_byte_in_line
                };
                let len = c.head - erase_start;
                let erased = self.table.range(erase_start, len);
                self.table.erase(erase_start, len);
                batch.push(EditOp::Erase { pos: erase_start, bytes: erased });
                self.cursors.shift_for_edit(idx, erase_start, -(len as isize), erase_start, erase_start);
            }

            let cm = &mut self.cursors.cursors_mut()[idx];
            if !cm.has_selection() {
                cm.virtual_space = false;
            }
        }

        if batch.is_empty() {
            return None;
        }
        self.lines.rebuild(self.table);
        batch.finish(self.cursors.clone());
        self.undo.push(batch.clone());
        Some(batch)
    }

    pub fn delete_forward(&mut self) -> Option<EditBatch> {
        let before = self.cursors.clone();
        let mut batch = EditBatch::new(before);
        let order = self.cursors.descending_indices();

        for idx in order {
            let c = self.cursors.cursors()[idx];
            if c.has_selection() {
                let start = c.start();
                let len = c.end() - start;
                let erased = self.table.range(start, len);
                self.table.erase(start, len);
                batch.push(EditOp::Erase { pos: start, bytes: erased });
                self.cursors.shift_for_edit(idx, start, -(len as isize), start, start);
            } else if c.head < self.table.length() {
                let line_idx = self.lines.line_of(c.head);
                let (line_start, line_end) = self.lines.line_range(line_idx, self.table.length());
                let byte_in_line = c.head - line_start;
                let text = self.line_text(line_idx);
                let erase_end = if c.head >= line_end {
                    c.head
                } else if byte_in_line >= text.len() {
                    line_end
                } else {
                    line_start + self.oracle.grapheme_step(&text, byte_in_line, true)
                };
                let len = erase_end - c.head;
                if len > 0 {
                    let erased = self.table.range(c.head, len);
                    self.table.erase(c.head, len);
                    batch.push(EditOp::Erase { pos: c.head, bytes: erased });
                    self.cursors.shift_for_edit(idx, c.head, -(len as isize), c.head, c.head);
                }
            }
        }

        for c in self.cursors.cursors_mut() {
            c.virtual_space = false;
        }

        if batch.is_empty() {
            return None;
        }
        self.lines.rebuild(self.table);
        batch.finish(self.cursors.clone());
        self.undo.push(batch.clone());
        Some(batch)
    }

    // -- line operations --------------------------------------------------

    fn covered_lines(&self) -> BTreeSet<usize> {
        let doc_len = self.table.length();
        let mut set = BTreeSet::new();
        for c in self.cursors.cursors() {
            let (s, e) = (c.start(), c.end());
            let start_line = self.lines.line_of(s);
            let end_line = if e > s {
                let el = self.lines.line_of(e);
                let (line_start, _) = self.lines.line_range(el, doc_len);
                if e == line_start && el > start_line { el - 1 } else { el }
            } else {
                start_line
            };
            for l in start_line..=end_line {
                set.insert(l);
            }
        }
        set
    }

    pub fn delete_lines(&mut self) -> EditBatch {
        let before = self.cursors.clone();
        let covered = self.covered_lines();
        let mut batch = EditBatch::new(before);

        for &idx in covered.iter().rev() {
            let doc_len = self.table.length();
            let (s, e) = self.lines.line_range(idx, doc_len);
            let (erase_start, erase_end) = if s == e && idx > 0 {
                let mut es = s;
                if es > 0 && self.table.byte_at(es - 1) == b'\n' {
                    es -= 1;
                    if es > 0 && self.table.byte_at(es - 1) == b'\r' {
                        es -= 1;
                    }
                }
                (es, s)
            } else {
                (s, e)
            };
            if erase_end > erase_start {
                let bytes = self.table.range(erase_start, erase_end - erase_start);
                self.table.erase(erase_start, erase_end - erase_start);
                batch.push(EditOp::Erase { pos: erase_start, bytes });
                self.cursors.shift_all(erase_start, -((erase_end - erase_start) as isize));
            }
            self.lines.rebuild(self.table);
        }

        batch.finish(self.cursors.clone());
        self.undo.push(batch.clone());
        batch
    }

    pub fn move_lines(&mut self, down: bool) -> EditBatch {
        let before = self.cursors.clone();
        let mut batch = EditBatch::new(before);

        let doc_len = self.table.length();
        if doc_len > 0 && self.table.byte_at(doc_len - 1) != b'\n' {
            self.table.insert(doc_len, b"\n");
            batch.push(EditOp::Insert { pos: doc_len, bytes: b"\n".to_vec() });
            self.lines.rebuild(self.table);
        }

        let covered = self.covered_lines();
        let mut blocks = contiguous_blocks(&covered);
        if down {
            blocks.reverse();
        }

        for (b_start, b_end) in blocks {
            let doc_len = self.table.length();
            let line_count = self.lines.line_count();
            if down && b_end + 1 >= line_count {
                continue;
            }
            if !down && b_start == 0 {
                continue;
            }
            let neighbor = if down { b_end + 1 } else { b_start - 1 };

            let (block_start, _) = self.lines.line_range(b_start, doc_len);
            let (_, block_end) = self.lines.line_range(b_end, doc_len);
            let (neighbor_start, neighbor_end) = self.lines.line_range(neighbor, doc_len);

            let (swap_start, swap_end) = if down {
                (block_start, neighbor_end)
            } else {
                (neighbor_start, block_end)
            };

            let block_bytes = self.table.range(block_start, block_end - block_start);
            let neighbor_bytes = self.table.range(neighbor_start, neighbor_end - neighbor_start);
            let old_region = self.table.range(swap_start, swap_end - swap_start);

            let mut new_region = Vec::with_capacity(old_region.len());
            if down {
                new_region.extend_from_slice(&neighbor_bytes);
                new_region.extend_from_slice(&block_bytes);
            } else {
                new_region.extend_from_slice(&block_bytes);
                new_region.extend_from_slice(&neighbor_bytes);
            }

            self.table.erase(swap_start, swap_end - swap_start);
            batch.push(EditOp::Erase { pos: swap_start, bytes: old_region });
            self.table.insert(swap_start, &new_region);
            batch.push(EditOp::Insert { pos: swap_start, bytes: new_region });

            let block_len = block_bytes.len();
            let neighbor_len = neighbor_bytes.len();
            let remap = |p: usize| -> usize {
                if down {
                    if p < block_start {
                        p
                    } else if p < block_start + block_len {
                        block_start + neighbor_len + (p - block_start)
                    } else if p < neighbor_end {
                        block_start + (p - (block_start + block_len))
                    } else {
                        p
                    }
                } else if p < neighbor_start {
                    p
                } else if p < neighbor_start + neighbor_len {
                    neighbor_start + block_len + (p - neighbor_start)
                } else if p < block_end {
                    neighbor_start + (p - (neighbor_start + neighbor_len))
                } else {
                    p
                }
            };

            for c in self.cursors.cursors_mut() {
                c.head = remap(c.head);
                c.anchor = remap(c.anchor);
            }
            self.lines.rebuild(self.table);
        }

        batch.finish(self.cursors.clone());
        self.undo.push(batch.clone());
        batch
    }

    pub fn duplicate_lines(&mut self, down: bool) -> EditBatch {
        let before = self.cursors.clone();
        let mut batch = EditBatch::new(before);

        let covered = self.covered_lines();
        let mut blocks = contiguous_blocks(&covered);
        blocks.sort_by(|a, b| b.0.cmp(&a.0));

        for (b_start, b_end) in blocks {
            let doc_len = self.table.length();
            let (block_start, _) = self.lines.line_range(b_start, doc_len);
            let (_, block_end) = self.lines.line_range(b_end, doc_len);

            let mut copy = self.table.range(block_start, block_end - block_start);
            if copy.last() != Some(&b'\n') {
                copy.push(b'\n');
            }
            let copy_len = copy.len();

            let insert_pos = if down { block_end } else { block_start };
            self.table.insert(insert_pos, &copy);
            batch.push(EditOp::Insert { pos: insert_pos, bytes: copy });

            let remap = |p: usize| -> usize {
                if p < block_start {
                    p
                } else if p < block_end {
                    if down { block_end + (p - block_start) } else { p }
                } else {
                    p + copy_len
                }
            };
            for c in self.cursors.cursors_mut() {
                c.head = remap(c.head);
                c.anchor = remap(c.anchor);
            }
            self.lines.rebuild(self.table);
        }

        batch.finish(self.cursors.clone());
        self.undo.push(batch.clone());
        batch
    }

    // -- case conversion ---------------------------------------------------

    pub fn convert_case(&mut self, dir: CaseDirection) -> Option<EditBatch> {
        let before = self.cursors.clone();
        let mut batch = EditBatch::new(before);
        let order = self.cursors.descending_indices();

        for idx in order {
            let c = self.cursors.cursors()[idx];
            if !c.has_selection() {
                continue;
            }
            let start = c.start();
            let len = c.end() - start;
            let original = self.table.range(start, len);
            let text = String::from_utf8_lossy(&original);
            let converted = match dir {
                CaseDirection::Upper => text.to_uppercase(),
                CaseDirection::Lower => text.to_lowercase(),
            };
            if converted.as_bytes() == original.as_slice() {
                continue;
            }
            self.table.erase(start, len);
            batch.push(EditOp::Erase { pos: start, bytes: original });
            let new_bytes = converted.into_bytes();
            self.table.insert(start, &new_bytes);
            batch.push(EditOp::Insert { pos: start, bytes: new_bytes.clone() });
            let delta = new_bytes.len() as isize - len as isize;
            self.cursors.shift_for_edit(idx, start, delta, start, start + new_bytes.len());
        }

        if batch.is_empty() {
            return None;
        }
        self.lines.rebuild(self.table);
        batch.finish(self.cursors.clone());
        self.undo.push(batch.clone());
        Some(batch)
    }

    // -- find / replace -----------------------------------------------------

    pub fn find(
        &self,
        start: usize,
        query: &str,
        forward: bool,
        match_case: bool,
        whole_word: bool,
        use_regex: bool,
    ) -> Result<Option<usize>, CoreError> {
        if query.is_empty() {
            return Ok(None);
        }
        let text = String::from_utf8_lossy(&self.table.to_bytes()).into_owned();
        let byte_start = text
            .char_indices()
            .map(|(i, _)| i)
            .find(|&i| i >= start.min(text.len()))
            .unwrap_or(text.len());
        if use_regex {
            find_regex(&text, query, byte_start, forward, match_case)
        } else {
            Ok(find_literal(&text, query, byte_start, forward, match_case, whole_word))
        }
    }

    pub fn replace_all(
        &mut self,
        query: &str,
        replacement: &str,
        match_case: bool,
        whole_word: bool,
        use_regex: bool,
    ) -> Result<Option<EditBatch>, CoreError> {
        if query.is_empty() {
            return Ok(None);
        }
        let text = String::from_utf8_lossy(&self.table.to_bytes()).into_owned();
        let mut matches: Vec<(usize, usize, String)> = Vec::new();

        if use_regex {
            let re = RegexBuilder::new(query).case_insensitive(!match_case).build().map_err(|e| {
                CoreError::new(ErrorKind::RegexInvalid, errors::REGEX_COMPILE_ERROR, e.to_string())
            })?;
            for caps in re.captures_iter(&text) {
                let m = caps.get(0).unwrap();
                let mut expanded = String::new();
                caps.expand(replacement, &mut expanded);
                matches.push((m.start(), m.end(), expanded));
            }
        } else {
            let hb = text.as_bytes();
            let qb = query.as_bytes();
            let mut i = 0;
            while qb.len() <= hb.len() && i + qb.len() <= hb.len() {
                if text.is_char_boundary(i) && bytes_eq_case(&hb[i..i + qb.len()], qb, match_case) {
                    let ok = !whole_word || {
                        let before_ok = i == 0 || !is_word_byte(hb[i - 1]);
                        let after = i + qb.len();
                        let after_ok = after >= hb.len() || !is_word_byte(hb[after]);
                        before_ok && after_ok
                    };
                    if ok {
                        matches.push((i, i + qb.len(), replacement.to_string()));
                        i += qb.len();
                        continue;
                    }
                }
                i += 1;
            }
        }

        if matches.is_empty() {
            return Ok(None);
        }

        let before = self.cursors.clone();
        let mut batch = EditBatch::new(before);
        for (start, end, rep) in matches.into_iter().rev() {
            let old_bytes = self.table.range(start, end - start);
            self.table.erase(start, end - start);
            batch.push(EditOp::Erase { pos: start, bytes: old_bytes });
            self.table.insert(start, rep.as_bytes());
            batch.push(EditOp::Insert { pos: start, bytes: rep.as_bytes().to_vec() });
            let delta = rep.len() as isize - (end - start) as isize;
            self.cursors.shift_all(start, delta);
        }

        self.lines.rebuild(self.table);
        batch.finish(self.cursors.clone());
        self.undo.push(batch.clone());
        Ok(Some(batch))
    }

    /// Pure selection operation: expands the primary cursor to the word at
    /// its head, or appends a new cursor at the next occurrence of the
    /// current selection's text. Never merges the result.
    pub fn select_next_occurrence(&mut self) {
        let primary = *self.cursors.primary();
        let doc_bytes = self.table.to_bytes();

        if !primary.has_selection() {
            let mut start = primary.head.min(doc_bytes.len());
            let mut end = start;
            while start > 0 && is_word_byte(doc_bytes[start - 1]) {
                start -= 1;
            }
            while end < doc_bytes.len() && is_word_byte(doc_bytes[end]) {
                end += 1;
            }
            if start == end {
                return;
            }
            let cm = &mut self.cursors.cursors_mut()[0];
            cm.anchor = start;
            cm.head = end;
            return;
        }

        let needle = &doc_bytes[primary.start()..primary.end()];
        if needle.is_empty() {
            return;
        }
        let search_from = primary.end();
        let mut found = None;
        if search_from + needle.len() <= doc_bytes.len() {
            for i in search_from..=doc_bytes.len() - needle.len() {
                if &doc_bytes[i..i + needle.len()] == needle {
                    found = Some(i);
                    break;
                }
            }
        }
        let Some(match_start) = found else { return };
        let match_end = match_start + needle.len();
        let already_covered = self
            .cursors
            .cursors()
            .iter()
            .any(|c| c.start() == match_start && c.end() == match_end);
        if already_covered {
            return;
        }
        self.cursors.cursors_mut().push(Cursor { head: match_end, anchor: match_start, ..Cursor::at(match_start) });
    }

    // -- undo / redo ---------------------------------------------------------

    pub fn undo_once(&mut self) -> Option<EditBatch> {
        let batch = self.undo.undo()?;
        batch.apply_inverse(self.table);
        *self.cursors = batch.before.clone();
        self.lines.rebuild(self.table);
        Some(batch)
    }

    pub fn redo_once(&mut self) -> Option<EditBatch> {
        let batch = self.undo.redo()?;
        batch.apply_forward(self.table);
        *self.cursors = batch.after.clone();
        self.lines.rebuild(self.table);
        Some(batch)
    }

    // -- virtual space / font change ------------------------------------

    pub fn reconcile_font_change(&mut self, old_ref_width: f32, new_ref_width: f32) {
        if old_ref_width <= 0.0 {
            return;
        }
        let scale = new_ref_width / old_ref_width;
        for c in self.cursors.cursors_mut() {
            c.desired_x *= scale;
            c.original_anchor_x *= scale;
        }
    }

    // -- drag gesture -------------------------------------------------------

    pub fn handle_mouse_down(&self, pos: usize) -> DragState {
        let primary = self.cursors.primary();
        if primary.has_selection() && pos >= primary.start() && pos < primary.end() {
            DragState::PendingMove { anchor_pos: pos }
        } else {
            DragState::Idle
        }
    }

    pub fn handle_mouse_move(&self, state: DragState, pos: usize, moved_px: f32) -> DragState {
        match state {
            DragState::PendingMove { anchor_pos } if moved_px >= 5.0 => {
                DragState::Moving { anchor_pos, current_pos: pos }
            }
            DragState::Moving { anchor_pos, .. } => DragState::Moving { anchor_pos, current_pos: pos },
            other => other,
        }
    }

    pub fn handle_mouse_up(&mut self, state: DragState, pos: usize) -> Option<EditBatch> {
        match state {
            DragState::Moving { .. } => Some(self.commit_drag_move(pos)),
            DragState::PendingMove { .. } | DragState::Idle => {
                let at = if matches!(state, DragState::PendingMove { .. }) { anchor_pos_or(state, pos) } else { pos };
                self.cursors.replace_all(vec![Cursor::at(at)], false);
                None
            }
        }
    }

    fn commit_drag_move(&mut self, dest: usize) -> EditBatch {
        let before = self.cursors.clone();
        let primary = *self.cursors.primary();
        let (start, end) = (primary.start(), primary.end());
        let bytes = self.table.range(start, end - start);

        self.table.erase(start, end - start);
        let mut batch = EditBatch::new(before);
        batch.push(EditOp::Erase { pos: start, bytes: bytes.clone() });

        let adj_dest = shift_offset(dest, start, -((end - start) as isize));
        self.table.insert(adj_dest, &bytes);
        batch.push(EditOp::Insert { pos: adj_dest, bytes: bytes.clone() });

        let new_head = adj_dest + bytes.len();
        self.cursors.replace_all(vec![Cursor { head: new_head, anchor: adj_dest, ..Cursor::at(0) }], false);
        self.lines.rebuild(self.table);
        batch.finish(self.cursors.clone());
        self.undo.push(batch.clone());
        batch
    }
}

fn anchor_pos_or(state: DragState, fallback: usize) -> usize {
    match state {
        DragState::PendingMove { anchor_pos } => anchor_pos,
        _ => fallback,
    }
}

fn contiguous_blocks(lines: &BTreeSet<usize>) -> Vec<(usize, usize)> {
    let mut blocks = Vec::new();
    let mut iter = lines.iter().copied();
    if let Some(first) = iter.next() {
        let mut start = first;
        let mut end = first;
        for l in iter {
            if l == end + 1 {
                end = l;
            } else {
                blocks.push((start, end));
                start = l;
                end = l;
            }
        }
        blocks.push((start, end));
    }
    blocks
}

fn bytes_eq_case(a: &[u8], b: &[u8], match_case: bool) -> bool {
    if a.len() != b.len() {
        return false;
    }
    if match_case {
        a == b
    } else {
        a.eq_ignore_ascii_case(b)
    }
}

fn find_literal(
    haystack: &str,
    query: &str,
    start: usize,
    forward: bool,
    match_case: bool,
    whole_word: bool,
) -> Option<usize> {
    let hb = haystack.as_bytes();
    let qb = query.as_bytes();
    if qb.is_empty() || qb.len() > hb.len() {
        return None;
    }
    let mut candidates = Vec::new();
    for i in 0..=(hb.len() - qb.len()) {
        if !haystack.is_char_boundary(i) {
            continue;
        }
        if !bytes_eq_case(&hb[i..i + qb.len()], qb, match_case) {
            continue;
        }
        if whole_word {
            let before_ok = i == 0 || !is_word_byte(hb[i - 1]);
            let after = i + qb.len();
            let after_ok = after >= hb.len() || !is_word_byte(hb[after]);
            if !before_ok || !after_ok {
                continue;
            }
        }
        candidates.push(i);
    }
    pick_wrapped(&candidates, start, forward)
}

fn find_regex(
    haystack: &str,
    pattern: &str,
    start: usize,
    forward: bool,
    match_case: bool,
) -> Result<Option<usize>, CoreError> {
    let re = RegexBuilder::new(pattern)
        .case_insensitive(!match_case)
        .build()
        .map_err(|e| CoreError::new(ErrorKind::RegexInvalid, errors::REGEX_COMPILE_ERROR, e.to_string()))?;
    let candidates: Vec<usize> = re.find_iter(haystack).map(|m| m.start()).collect();
    Ok(pick_wrapped(&candidates, start, forward))
}

fn pick_wrapped(candidates: &[usize], start: usize, forward: bool) -> Option<usize> {
    if candidates.is_empty() {
        return None;
    }
    if forward {
        candidates.iter().copied().find(|&i| i >= start).or_else(|| candidates.first().copied())
    } else {
        candidates.iter().rev().copied().find(|&i| i < start).or_else(|| candidates.last().copied())
    }
}
