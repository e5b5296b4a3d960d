//! Clipboard interface: the core never touches the system clipboard
//! directly. A host implements [`ClipboardHost`] over whatever platform
//! API it has (X11 selection, Windows clipboard, a headless test double)
//! and hands payloads across this boundary.

use crate::constants::errors;
use crate::error::{CoreError, ErrorKind};

/// Text copied or cut from the editing core, tagged with whether it came
/// from a rectangular (block) selection — the host must round-trip this
/// bit through its own transport (e.g. a private clipboard format) since
/// plain UTF-8 text has nowhere else to carry it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClipboardPayload {
    pub text: String,
    pub rectangular: bool,
}

impl ClipboardPayload {
    #[must_use]
    pub fn new(text: impl Into<String>, rectangular: bool) -> Self {
        Self { text: text.into(), rectangular }
    }

    #[must_use]
    pub fn linear(text: impl Into<String>) -> Self {
        Self::new(text, false)
    }
}

/// What a host must provide so the core can copy to and paste from the
/// system clipboard. A host with no clipboard available (headless,
/// permission denied) can implement this as a pure no-op; per the error
/// design, a clipboard miss is never fatal to an edit.
pub trait ClipboardHost {
    fn write(&mut self, payload: ClipboardPayload);
    fn read(&mut self) -> Option<ClipboardPayload>;
}

/// The error a [`ClipboardHost`] raises when the platform clipboard can't
/// be reached (permission denied, no display server, compositor refused
/// the selection). Never produced by the core itself.
#[must_use]
pub fn clipboard_unavailable(message: impl Into<String>) -> CoreError {
    CoreError::new(ErrorKind::ClipboardUnavailable, errors::CLIPBOARD_UNAVAILABLE, message)
}

/// An in-memory clipboard, useful for tests and as the default when no
/// platform clipboard is wired up.
#[derive(Debug, Clone, Default)]
pub struct MemoryClipboard {
    slot: Option<ClipboardPayload>,
}

impl ClipboardHost for MemoryClipboard {
    fn write(&mut self, payload: ClipboardPayload) {
        self.slot = Some(payload);
    }

    fn read(&mut self) -> Option<ClipboardPayload> {
        self.slot.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn memory_clipboard_round_trips() {
        let mut clip = MemoryClipboard::default();
        assert!(clip.read().is_none());
        clip.write(ClipboardPayload::new("abc\ndef", true));
        let payload = clip.read().unwrap();
        assert_eq!(payload.text, "abc\ndef");
        assert!(payload.rectangular);
    }

    #[test]
    fn linear_payload_defaults_to_non_rectangular() {
        let payload = ClipboardPayload::linear("hello");
        assert!(!payload.rectangular);
    }

    #[test]
    fn clipboard_unavailable_carries_the_right_kind() {
        let err = clipboard_unavailable("no display server");
        assert_eq!(err.kind, crate::error::ErrorKind::ClipboardUnavailable);
        assert!(err.contains_msg("no display server"));
    }
}
