//! File binding: opens a file into a piece table, saves it back atomically.
//!
//! Owns the full stack of per-document state — the piece table, line
//! index, cursor set, and undo log — so a host only ever has to hold one
//! `Document` per open buffer.

pub mod encoding;

#[cfg(test)]
#[path = "tests.rs"]
mod tests;

use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use memmap2::Mmap;

use crate::constants::{errors, paths};
use crate::cursor::CursorSet;
use crate::edit::{EditEngine, UndoLog};
use crate::error::{CoreError, ErrorKind, Result};
use crate::layout::LayoutOracle;
use crate::line_index::LineIndex;
use crate::piece_table::PieceTable;
use encoding::Encoding;

pub struct Document {
    table: PieceTable,
    lines: LineIndex,
    cursors: CursorSet,
    undo: UndoLog,
    path: Option<PathBuf>,
    encoding: Encoding,
}

impl Document {
    /// A new, empty, unnamed document.
    #[must_use]
    pub fn empty() -> Self {
        let table = PieceTable::empty();
        let mut lines = LineIndex::new();
        lines.rebuild(&table);
        Self {
            table,
            lines,
            cursors: CursorSet::single(0),
            undo: UndoLog::new(),
            path: None,
            encoding: Encoding::Utf8,
        }
    }

    /// An in-memory document seeded with `text` and no path — mainly for
    /// tests and the `save_as` golden path.
    #[must_use]
    pub fn from_text(text: &str) -> Self {
        let table = PieceTable::from_original(Arc::from(text.as_bytes()));
        let mut lines = LineIndex::new();
        lines.rebuild(&table);
        Self {
            table,
            lines,
            cursors: CursorSet::single(0),
            undo: UndoLog::new(),
            path: None,
            encoding: Encoding::Utf8,
        }
    }

    /// Open a file by memory-mapping it (falling back to a plain read if
    /// mapping fails, e.g. for a zero-length file), sniffing its encoding,
    /// and converting it to UTF-8 for the piece table's original buffer.
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let file = fs::File::open(path)
            .map_err(|e| CoreError::new(ErrorKind::OpenFailed, errors::LOAD_FAILED, e.to_string()).with_path(path))?;

        let raw: Vec<u8> = match unsafe { Mmap::map(&file) } {
            Ok(mmap) => mmap.as_ref().to_vec(),
            Err(_) => fs::read(path)
                .map_err(|e| CoreError::new(ErrorKind::OpenFailed, errors::LOAD_FAILED, e.to_string()).with_path(path))?,
        };

        let detected = encoding::detect(&raw);
        let text = encoding::decode(&raw, detected);
        let table = PieceTable::from_original(Arc::from(text.into_bytes().into_boxed_slice()));
        let mut lines = LineIndex::new();
        lines.rebuild(&table);

        Ok(Self {
            table,
            lines,
            cursors: CursorSet::single(0),
            undo: UndoLog::new(),
            path: Some(path.to_path_buf()),
            encoding: detected,
        })
    }

    /// Save to the document's current path.
    pub fn save(&mut self) -> Result<()> {
        let path = self
            .path
            .clone()
            .ok_or_else(|| CoreError::new(ErrorKind::InvalidPath, errors::NO_PATH, errors::MSG_NO_FILE_NAME))?;
        self.write_to(&path)
    }

    /// Save to `path`, adopting it as the document's path on success.
    pub fn save_as(&mut self, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref().to_path_buf();
        self.write_to(&path)
    }

    /// Write-temp-then-rename: write the encoded bytes to a sibling temp
    /// file, fsync, then atomically rename onto the destination. The
    /// temp file only ever exists next to a fully written document.
    fn write_to(&mut self, path: &Path) -> Result<()> {
        let text = String::from_utf8_lossy(&self.table.to_bytes()).into_owned();
        let bytes = encoding::encode(&text, self.encoding);

        let parent = path.parent().unwrap_or_else(|| Path::new("."));
        let file_name = path.file_name().and_then(|n| n.to_str()).unwrap_or("file");
        let tmp_path = parent.join(format!("{}{file_name}{}", paths::TMP_PREFIX, paths::TMP_SUFFIX));

        {
            let mut f = fs::File::create(&tmp_path)
                .map_err(|e| CoreError::new(ErrorKind::TempCreateFailed, errors::TEMP_CREATE_FAILED, e.to_string()).with_path(&tmp_path))?;
            f.write_all(&bytes)
                .map_err(|e| CoreError::new(ErrorKind::WriteFailed, errors::WRITE_FAILED, e.to_string()).with_path(&tmp_path))?;
            f.sync_all()
                .map_err(|e| CoreError::new(ErrorKind::WriteFailed, errors::WRITE_FAILED, e.to_string()).with_path(&tmp_path))?;
        }
        fs::rename(&tmp_path, path)
            .map_err(|e| CoreError::new(ErrorKind::RenameFailed, errors::RENAME_FAILED, e.to_string()).with_path(path))?;

        self.path = Some(path.to_path_buf());
        self.undo.mark_saved();
        Ok(())
    }

    /// Borrow an [`EditEngine`] over this document's state for the
    /// duration of one intent.
    pub fn engine<'a>(&'a mut self, oracle: &'a dyn LayoutOracle) -> EditEngine<'a> {
        EditEngine::new(&mut self.table, &mut self.lines, &mut self.cursors, &mut self.undo, oracle)
    }

    #[must_use]
    pub fn is_dirty(&self) -> bool {
        self.undo.is_modified()
    }

    #[must_use]
    pub fn has_path(&self) -> bool {
        self.path.is_some()
    }

    #[must_use]
    pub fn display_name(&self) -> &str {
        self.path
            .as_ref()
            .and_then(|p| p.file_name())
            .and_then(|n| n.to_str())
            .unwrap_or("[No Name]")
    }

    #[must_use]
    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    #[must_use]
    pub fn encoding(&self) -> Encoding {
        self.encoding
    }

    #[must_use]
    pub fn table(&self) -> &PieceTable {
        &self.table
    }

    #[must_use]
    pub fn lines(&self) -> &LineIndex {
        &self.lines
    }

    #[must_use]
    pub fn cursors(&self) -> &CursorSet {
        &self.cursors
    }

    pub fn cursors_mut(&mut self) -> &mut CursorSet {
        &mut self.cursors
    }

    #[must_use]
    pub fn undo_log(&self) -> &UndoLog {
        &self.undo
    }
}
