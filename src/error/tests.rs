use super::*;
use std::io;

#[test]
fn test_error_severity_display() {
    assert_eq!(format!("{}", ErrorSeverity::Info), "INFO");
    assert_eq!(format!("{}", ErrorSeverity::Warning), "WARN");
    assert_eq!(format!("{}", ErrorSeverity::Error), "ERROR");
    assert_eq!(format!("{}", ErrorSeverity::Critical), "CRITICAL");
}

#[test]
fn test_error_severity_ordering() {
    assert!(ErrorSeverity::Info < ErrorSeverity::Warning);
    assert!(ErrorSeverity::Warning < ErrorSeverity::Error);
    assert!(ErrorSeverity::Error < ErrorSeverity::Critical);
    assert!(ErrorSeverity::Critical > ErrorSeverity::Info);
}

#[test]
fn test_error_kind_display() {
    assert_eq!(format!("{}", ErrorKind::InvalidPath), "InvalidPath");
    assert_eq!(format!("{}", ErrorKind::RegexInvalid), "RegexInvalid");
    assert_eq!(format!("{}", ErrorKind::ClipboardUnavailable), "ClipboardUnavailable");
}

#[test]
fn test_core_error_new() {
    let err = CoreError::new(ErrorKind::OpenFailed, "E001", "test msg");
    assert_eq!(err.severity, ErrorSeverity::Error);
    assert_eq!(err.kind, ErrorKind::OpenFailed);
    assert_eq!(err.code, "E001");
    assert_eq!(err.message, "test msg");
    assert!(err.path.is_none());
}

#[test]
fn test_core_error_critical() {
    let err = CoreError::critical(ErrorKind::Internal, "PANIC", "system crash");
    assert_eq!(err.severity, ErrorSeverity::Critical);
    assert_eq!(err.kind, ErrorKind::Internal);
}

#[test]
fn test_core_error_with_path() {
    let err = CoreError::new(ErrorKind::InvalidPath, "E", "bad path").with_path("/tmp/x.txt");
    assert_eq!(err.path.as_deref(), Some(std::path::Path::new("/tmp/x.txt")));
    assert!(format!("{err}").contains("/tmp/x.txt"));
}

#[test]
fn test_core_error_display() {
    let err = CoreError::new(ErrorKind::OpenFailed, "E001", "test msg");
    assert_eq!(format!("{}", err), "[ERROR] OpenFailed(E001): test msg");
}

#[test]
fn test_core_error_contains_msg() {
    let err = CoreError::new(ErrorKind::Internal, "E", "the quick brown fox");
    assert!(err.contains_msg("quick"));
    assert!(!err.contains_msg("lazy"));
}

#[test]
fn test_result_alias() {
    fn produce_error() -> Result<()> {
        Err(CoreError::new(ErrorKind::Internal, "FAIL", "reason"))
    }

    let res = produce_error();
    assert!(res.is_err());
    assert_eq!(res.unwrap_err().code, "FAIL");
}

#[test]
fn test_from_io_error() {
    let io_err = io::Error::new(io::ErrorKind::NotFound, "not found");
    let err: CoreError = io_err.into();
    assert_eq!(err.kind, ErrorKind::OpenFailed);
    assert_eq!(err.code, "IO_ERROR");
    assert!(err.message.contains("not found"));
}

#[test]
fn test_core_error_traits() {
    let err1 = CoreError::new(ErrorKind::OpenFailed, "E1", "msg");
    let err2 = CoreError::new(ErrorKind::OpenFailed, "E1", "msg");
    let err3 = CoreError::new(ErrorKind::OpenFailed, "E2", "msg");

    assert_eq!(err1, err2);
    assert_ne!(err1, err3);

    let std_err: &dyn std::error::Error = &err1;
    assert_eq!(format!("{}", std_err), "[ERROR] OpenFailed(E1): msg");
}

#[test]
fn test_error_manager_collects_entries() {
    let mut mgr = manager::ErrorManager::new();
    mgr.handle(CoreError::new(ErrorKind::OpenFailed, "E1", "io error"));

    let mut warn = CoreError::new(ErrorKind::RegexInvalid, "W1", "warn");
    warn.severity = ErrorSeverity::Warning;
    mgr.handle(warn);

    assert_eq!(mgr.entries().len(), 2);
    assert_eq!(mgr.entries()[0].severity, ErrorSeverity::Error);
    assert_eq!(mgr.entries()[1].severity, ErrorSeverity::Warning);
}
