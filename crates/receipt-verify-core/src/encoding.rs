//! Base64 handling for keys and signatures.
//!
//! Billing consoles hand out keys wrapped over several lines and some clients
//! drop the trailing padding, so decoding skips ASCII whitespace and accepts
//! padded or unpadded input. Anything else outside the standard alphabet is
//! still an error.

use std::borrow::Cow;

use base64::alphabet;
use base64::engine::general_purpose::{GeneralPurpose, GeneralPurposeConfig};
use base64::engine::DecodePaddingMode;
use base64::Engine;

const LENIENT: GeneralPurpose = GeneralPurpose::new(
    &alphabet::STANDARD,
    GeneralPurposeConfig::new()
        .with_decode_padding_mode(DecodePaddingMode::Indifferent)
        .with_decode_allow_trailing_bits(true),
);

/// Decode standard-alphabet base64, ignoring embedded whitespace.
pub(crate) fn decode_lenient(text: &str) -> Result<Vec<u8>, base64::DecodeError> {
    let compact: Cow<'_, str> = if text.bytes().any(|b| b.is_ascii_whitespace()) {
        Cow::Owned(text.chars().filter(|c| !c.is_ascii_whitespace()).collect())
    } else {
        Cow::Borrowed(text)
    };
    LENIENT.decode(compact.as_bytes())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decode_padded_and_unpadded() {
        assert_eq!(decode_lenient("aGk=").unwrap(), b"hi");
        assert_eq!(decode_lenient("aGk").unwrap(), b"hi");
    }

    #[test]
    fn test_decode_skips_line_breaks() {
        assert_eq!(decode_lenient("aGVs\r\nbG8g\n d29y\tbGQ=").unwrap(), b"hello world");
    }

    #[test]
    fn test_decode_rejects_foreign_characters() {
        assert!(decode_lenient("not-valid-base64!!").is_err());
        assert!(decode_lenient("aGk_").is_err());
    }

    #[test]
    fn test_decode_empty_is_empty() {
        assert!(decode_lenient("").unwrap().is_empty());
        assert!(decode_lenient(" \n").unwrap().is_empty());
    }
}
