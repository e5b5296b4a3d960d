//! Global constants for the editing core

pub mod paths {
    /// Name used for the temp file written before an atomic rename-save.
    pub const TMP_PREFIX: &str = ".";
    pub const TMP_SUFFIX: &str = ".tmp";
}

pub mod errors {
    pub const LOAD_FAILED: &str = "LOAD_FAILED";
    pub const NO_PATH: &str = "NO_PATH";
    pub const TEMP_CREATE_FAILED: &str = "TEMP_CREATE_FAILED";
    pub const WRITE_FAILED: &str = "WRITE_FAILED";
    pub const RENAME_FAILED: &str = "RENAME_FAILED";
    pub const REGEX_COMPILE_ERROR: &str = "REGEX_COMPILE_ERROR";
    pub const CLIPBOARD_UNAVAILABLE: &str = "CLIPBOARD_UNAVAILABLE";

    pub const MSG_NO_FILE_NAME: &str = "No file name associated with this document";
}

pub mod layout {
    /// Default reference cell width in pixels, used when a host has not
    /// yet queried its shaper (e.g. for tests run without a real font).
    pub const DEFAULT_REFERENCE_CELL_WIDTH: f32 = 8.0;
    /// Default tab width in columns.
    pub const DEFAULT_TAB_WIDTH: usize = 4;
}
