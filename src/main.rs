//! Smoke-test entry point for the editing core.
//!
//! This crate is a library meant to be embedded by a host that owns the
//! actual terminal/GUI surface. This binary just opens (or creates) a
//! document from an optional path argument and reports its line count,
//! proving the open/encoding-detection path works end to end.

use std::path::PathBuf;

use vellum_core::document::Document;

fn main() {
    let path = std::env::args().nth(1).map(PathBuf::from);

    let doc = match path {
        Some(path) => match Document::open(&path) {
            Ok(doc) => doc,
            Err(e) => {
                eprintln!("failed to open {}: {e}", path.display());
                std::process::exit(1);
            }
        },
        None => Document::empty(),
    };

    println!(
        "{}: {} lines, {} bytes",
        doc.display_name(),
        doc.lines().line_count(),
        doc.table().length()
    );
}
