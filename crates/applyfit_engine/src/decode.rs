use chardetng::EncodingDetector;
use encoding_rs::{Encoding, UTF_8};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DecodedText {
    pub text: String,
    pub encoding_label: String,
}

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum DecodeError {
    #[error("failed to decode bytes with {encoding}: {message}")]
    DecodeFailure { encoding: String, message: String },
}

/// Decode raw file bytes into UTF-8 using: BOM -> strict UTF-8 -> chardetng fallback.
pub fn decode_text(bytes: &[u8]) -> Result<DecodedText, DecodeError> {
    // 1) BOM aware decode; encoding_rs strips the BOM
    if let Some((encoding, _)) = Encoding::for_bom(bytes) {
        return decode_with(bytes, encoding);
    }

    // 2) Plain UTF-8 passes through untouched
    if let Ok(text) = std::str::from_utf8(bytes) {
        return Ok(DecodedText {
            text: text.to_owned(),
            encoding_label: UTF_8.name().to_string(),
        });
    }

    // 3) chardetng detection over the whole buffer
    let mut detector = EncodingDetector::new();
    detector.feed(bytes, true);
    let enc = detector.guess(None, true);
    decode_with(bytes, enc)
}

fn decode_with(bytes: &[u8], enc: &'static Encoding) -> Result<DecodedText, DecodeError> {
    let (text, _, had_errors) = enc.decode(bytes);
    if had_errors {
        return Err(DecodeError::DecodeFailure {
            encoding: enc.name().to_string(),
            message: "malformed byte sequence".into(),
        });
    }
    Ok(DecodedText {
        text: text.into_owned(),
        encoding_label: enc.name().to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn utf8_round_trips() {
        let decoded = decode_text("Zoë, Rust engineer\n".as_bytes()).unwrap();
        assert_eq!(decoded.text, "Zoë, Rust engineer\n");
        assert_eq!(decoded.encoding_label, "UTF-8");
    }

    #[test]
    fn bom_is_stripped() {
        let decoded = decode_text(b"\xEF\xBB\xBFhello").unwrap();
        assert_eq!(decoded.text, "hello");
    }

    #[test]
    fn utf16_bom_is_honoured() {
        let decoded = decode_text(b"\xFF\xFEh\x00i\x00").unwrap();
        assert_eq!(decoded.text, "hi");
        assert_eq!(decoded.encoding_label, "UTF-16LE");
    }

    #[test]
    fn latin1_falls_back_to_detection() {
        let decoded = decode_text(b"Caf\xE9 au lait, cr\xE8me br\xFBl\xE9e").unwrap();
        assert_ne!(decoded.encoding_label, "UTF-8");
        assert!(decoded.text.starts_with("Caf"));
        assert!(decoded.text.contains(" au lait, cr"));
    }

    #[test]
    fn truncated_utf16_is_a_failure() {
        let err = decode_text(b"\xFF\xFEh\x00\x00\xD8").unwrap_err();
        assert!(matches!(err, DecodeError::DecodeFailure { .. }));
    }
}
