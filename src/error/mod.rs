//! Centralized error handling for the editing core
//! Defines error types, severity levels, and error codes

use std::fmt;

pub mod manager;

/// Severity level of an error
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum ErrorSeverity {
    /// Informational message (not really an error)
    Info,
    /// Warning - something might be wrong but the editor can continue
    Warning,
    /// Standard error - operation failed but the editor can continue
    Error,
    /// Critical error - may lead to data loss
    Critical,
}

impl fmt::Display for ErrorSeverity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Info => write!(f, "INFO"),
            Self::Warning => write!(f, "WARN"),
            Self::Error => write!(f, "ERROR"),
            Self::Critical => write!(f, "CRITICAL"),
        }
    }
}

/// Category of the error, mirroring the kinds enumerated in the error
/// handling design: file binding, regex compilation, and clipboard
/// unavailability each get their own tag so a host can branch on them.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// The path passed to open a document was invalid or unreadable.
    InvalidPath,
    /// Opening the file mapping failed.
    OpenFailed,
    /// Writing the temp file failed.
    TempCreateFailed,
    /// Writing bytes to the temp file failed.
    WriteFailed,
    /// The atomic rename onto the destination path failed.
    RenameFailed,
    /// A find/replace regex failed to compile.
    RegexInvalid,
    /// The host clipboard could not be reached.
    ClipboardUnavailable,
    /// Internal invariant violation.
    Internal,
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::InvalidPath => "InvalidPath",
            Self::OpenFailed => "OpenFailed",
            Self::TempCreateFailed => "TempCreateFailed",
            Self::WriteFailed => "WriteFailed",
            Self::RenameFailed => "RenameFailed",
            Self::RegexInvalid => "RegexInvalid",
            Self::ClipboardUnavailable => "ClipboardUnavailable",
            Self::Internal => "Internal",
        };
        write!(f, "{s}")
    }
}

/// A structured error produced by the editing core.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CoreError {
    pub severity: ErrorSeverity,
    pub kind: ErrorKind,
    pub code: String,
    pub message: String,
    /// Path the error concerns, if any (e.g. the attempted open/save path).
    pub path: Option<std::path::PathBuf>,
}

impl CoreError {
    pub fn new(kind: ErrorKind, code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            severity: ErrorSeverity::Error,
            kind,
            code: code.into(),
            message: message.into(),
            path: None,
        }
    }

    pub fn critical(kind: ErrorKind, code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            severity: ErrorSeverity::Critical,
            kind,
            code: code.into(),
            message: message.into(),
            path: None,
        }
    }

    pub fn with_path(mut self, path: impl Into<std::path::PathBuf>) -> Self {
        self.path = Some(path.into());
        self
    }

    /// Check if the message contains a substring (useful for tests).
    pub fn contains_msg(&self, sub: &str) -> bool {
        self.message.contains(sub)
    }
}

impl fmt::Display for CoreError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] {}({}): {}", self.severity, self.kind, self.code, self.message)?;
        if let Some(path) = &self.path {
            write!(f, " (path: {})", path.display())?;
        }
        Ok(())
    }
}

impl std::error::Error for CoreError {}

impl From<std::io::Error> for CoreError {
    fn from(err: std::io::Error) -> Self {
        Self::new(ErrorKind::OpenFailed, "IO_ERROR", err.to_string())
    }
}

/// Result alias for editing-core operations.
pub type Result<T> = std::result::Result<T, CoreError>;

#[cfg(test)]
#[path = "tests.rs"]
mod tests;
