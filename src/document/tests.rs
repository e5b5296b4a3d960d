//! Tests for the document module

use super::*;
use std::fs;
use tempfile::TempDir;

#[test]
fn empty_document_has_no_path_and_is_clean() {
    let doc = Document::empty();
    assert!(!doc.is_dirty());
    assert!(!doc.has_path());
    assert_eq!(doc.display_name(), "[No Name]");
    assert_eq!(doc.table().length(), 0);
}

#[test]
fn open_reads_file_contents_into_piece_table() {
    let temp_dir = TempDir::new().unwrap();
    let file_path = temp_dir.path().join("test.txt");
    fs::write(&file_path, b"Hello, world!").unwrap();

    let doc = Document::open(&file_path).unwrap();
    assert!(!doc.is_dirty());
    assert!(doc.has_path());
    assert_eq!(doc.display_name(), "test.txt");
    assert_eq!(doc.path(), Some(file_path.as_path()));
    assert_eq!(doc.table().to_bytes(), b"Hello, world!");
    assert_eq!(doc.encoding(), encoding::Encoding::Utf8);
}

#[test]
fn open_missing_file_fails() {
    let temp_dir = TempDir::new().unwrap();
    let missing = temp_dir.path().join("nope.txt");
    assert!(Document::open(&missing).is_err());
}

#[test]
fn open_sniffs_utf8_bom() {
    let temp_dir = TempDir::new().unwrap();
    let file_path = temp_dir.path().join("bom.txt");
    let mut bytes = vec![0xEF, 0xBB, 0xBF];
    bytes.extend_from_slice(b"hi there");
    fs::write(&file_path, &bytes).unwrap();

    let doc = Document::open(&file_path).unwrap();
    assert_eq!(doc.encoding(), encoding::Encoding::Utf8Bom);
    assert_eq!(doc.table().to_bytes(), b"hi there");
}

#[test]
fn save_as_writes_bytes_and_leaves_no_temp_file() {
    let temp_dir = TempDir::new().unwrap();
    let file_path = temp_dir.path().join("test.txt");

    let mut doc = Document::from_text("Hello, world!");
    doc.save_as(&file_path).unwrap();

    assert_eq!(fs::read_to_string(&file_path).unwrap(), "Hello, world!");
    assert!(!doc.is_dirty());
    assert!(doc.has_path());

    let tmp = temp_dir.path().join(format!(
        "{}test.txt{}",
        crate::constants::paths::TMP_PREFIX,
        crate::constants::paths::TMP_SUFFIX
    ));
    assert!(!tmp.exists(), "temp file must not survive a successful save");
}

#[test]
fn save_without_path_fails() {
    let mut doc = Document::from_text("content");
    let err = doc.save().unwrap_err();
    assert_eq!(err.kind, crate::error::ErrorKind::InvalidPath);
}

#[test]
fn save_after_save_as_reuses_adopted_path() {
    let temp_dir = TempDir::new().unwrap();
    let file_path = temp_dir.path().join("test.txt");

    let mut doc = Document::from_text("v1");
    doc.save_as(&file_path).unwrap();
    assert_eq!(fs::read_to_string(&file_path).unwrap(), "v1");

    doc.save().unwrap();
    assert_eq!(fs::read_to_string(&file_path).unwrap(), "v1");
}

#[test]
fn display_name_is_final_path_component() {
    let temp_dir = TempDir::new().unwrap();
    let file_path = temp_dir.path().join("nested").join("file.txt");
    fs::create_dir_all(file_path.parent().unwrap()).unwrap();
    fs::write(&file_path, b"x").unwrap();

    let doc = Document::open(&file_path).unwrap();
    assert_eq!(doc.display_name(), "file.txt");
}

#[test]
fn save_preserves_bom_on_round_trip() {
    let temp_dir = TempDir::new().unwrap();
    let file_path = temp_dir.path().join("bom.txt");
    let mut bytes = vec![0xEF, 0xBB, 0xBF];
    bytes.extend_from_slice(b"hi");
    fs::write(&file_path, &bytes).unwrap();

    let mut doc = Document::open(&file_path).unwrap();
    doc.save().unwrap();

    let saved = fs::read(&file_path).unwrap();
    assert!(saved.starts_with(&[0xEF, 0xBB, 0xBF]));
}
