//! BOM-sniffed encoding detection and conversion to/from UTF-8.
//!
//! The piece table only ever holds UTF-8 bytes; this module is the seam
//! between that and whatever bytes actually sit on disk.

use encoding_rs::{UTF_16BE, UTF_16LE, WINDOWS_1252};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Encoding {
    Utf8,
    Utf8Bom,
    Utf16Le,
    Utf16Be,
    /// No BOM and not valid UTF-8: treated as Windows-1252 (ANSI), the
    /// common single-byte fallback rather than strict ISO-8859-1.
    Latin1,
}

/// Sniff the encoding of a raw byte buffer by its BOM, falling back to
/// UTF-8 if the bytes already validate, else Latin1.
#[must_use]
pub fn detect(bytes: &[u8]) -> Encoding {
    if bytes.starts_with(&[0xEF, 0xBB, 0xBF]) {
        Encoding::Utf8Bom
    } else if bytes.starts_with(&[0xFF, 0xFE]) {
        Encoding::Utf16Le
    } else if bytes.starts_with(&[0xFE, 0xFF]) {
        Encoding::Utf16Be
    } else if std::str::from_utf8(bytes).is_ok() {
        Encoding::Utf8
    } else {
        Encoding::Latin1
    }
}

/// Decode raw bytes (including any BOM) into a UTF-8 `String`.
#[must_use]
pub fn decode(bytes: &[u8], encoding: Encoding) -> String {
    match encoding {
        Encoding::Utf8 => String::from_utf8_lossy(bytes).into_owned(),
        Encoding::Utf8Bom => String::from_utf8_lossy(&bytes[3..]).into_owned(),
        Encoding::Utf16Le => UTF_16LE.decode(bytes).0.into_owned(),
        Encoding::Utf16Be => UTF_16BE.decode(bytes).0.into_owned(),
        Encoding::Latin1 => WINDOWS_1252.decode(bytes).0.into_owned(),
    }
}

/// Encode a UTF-8 `str` back into the bytes the document should be saved
/// as, reinstating any BOM the source file carried.
#[must_use]
pub fn encode(text: &str, encoding: Encoding) -> Vec<u8> {
    match encoding {
        Encoding::Utf8 => text.as_bytes().to_vec(),
        Encoding::Utf8Bom => {
            let mut out = vec![0xEF, 0xBB, 0xBF];
            out.extend_from_slice(text.as_bytes());
            out
        }
        Encoding::Utf16Le => UTF_16LE.encode(text).0.into_owned(),
        Encoding::Utf16Be => UTF_16BE.encode(text).0.into_owned(),
        Encoding::Latin1 => WINDOWS_1252.encode(text).0.into_owned(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn detects_utf8_bom() {
        let mut bytes = vec![0xEF, 0xBB, 0xBF];
        bytes.extend_from_slice(b"hi");
        assert_eq!(detect(&bytes), Encoding::Utf8Bom);
    }

    #[test]
    fn detects_utf16_boms() {
        assert_eq!(detect(&[0xFF, 0xFE, b'h', 0]), Encoding::Utf16Le);
        assert_eq!(detect(&[0xFE, 0xFF, 0, b'h']), Encoding::Utf16Be);
    }

    #[test]
    fn plain_ascii_is_utf8() {
        assert_eq!(detect(b"hello"), Encoding::Utf8);
    }

    #[test]
    fn invalid_utf8_falls_back_to_latin1() {
        assert_eq!(detect(&[0xFF, 0x00, 0x80]), Encoding::Latin1);
    }

    #[test]
    fn utf8_bom_round_trips() {
        let original = "café";
        let encoded = encode(original, Encoding::Utf8Bom);
        assert_eq!(detect(&encoded), Encoding::Utf8Bom);
        assert_eq!(decode(&encoded, Encoding::Utf8Bom), original);
    }

    #[test]
    fn utf16le_round_trips() {
        let original = "hello world";
        let encoded = encode(original, Encoding::Utf16Le);
        assert_eq!(decode(&encoded, Encoding::Utf16Le), original);
    }

    #[test]
    fn latin1_round_trips_high_bytes() {
        let original = "caf\u{e9}"; // é, representable in Windows-1252
        let encoded = encode(original, Encoding::Latin1);
        assert_eq!(decode(&encoded, Encoding::Latin1), original);
    }
}
