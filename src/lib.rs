//! Editing core for a large-file text editor: piece table, line index,
//! cursor/selection model, undo log, edit engine, layout coordinate
//! mapping, and file binding.

pub mod clipboard;
pub mod constants;
pub mod cursor;
pub mod document;
pub mod edit;
pub mod error;
pub mod layout;
pub mod line_index;
pub mod piece_table;
