//! Base64 stage
//!
//! Tokens are written with the standard alphabet and `=` padding. Reading is
//! as forgiving as a browser's `atob`: ASCII whitespace is skipped, padding
//! may be left off and unused trailing bits are ignored.

use base64::alphabet;
use base64::engine::general_purpose::{GeneralPurpose, GeneralPurposeConfig, STANDARD};
use base64::engine::DecodePaddingMode;
use base64::Engine;

use crate::error::DecodeError;

const FORGIVING: GeneralPurpose = GeneralPurpose::new(
    &alphabet::STANDARD,
    GeneralPurposeConfig::new()
        .with_decode_padding_mode(DecodePaddingMode::Indifferent)
        .with_decode_allow_trailing_bits(true),
);

pub(crate) fn to_token(bytes: &[u8]) -> String {
    STANDARD.encode(bytes)
}

pub(crate) fn from_token(token: &str) -> Result<Vec<u8>, DecodeError> {
    if token.bytes().any(|b| b.is_ascii_whitespace()) {
        let compact: String = token.chars().filter(|c| !c.is_ascii_whitespace()).collect();
        return Ok(FORGIVING.decode(compact)?);
    }
    Ok(FORGIVING.decode(token)?)
}

/// True for characters that can appear in an encoded token.
pub fn is_token_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || matches!(c, '+' | '/' | '=')
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_padded_output() {
        assert_eq!(to_token(b"T"), "VA==");
        assert_eq!(from_token("VA==").unwrap(), b"T");
    }

    #[test]
    fn test_missing_padding_accepted() {
        assert_eq!(from_token("VA").unwrap(), b"T");
    }

    #[test]
    fn test_whitespace_ignored() {
        assert_eq!(from_token(" VGVz\ndA==\t").unwrap(), b"Test");
    }

    #[test]
    fn test_foreign_characters_rejected() {
        assert!(matches!(
            from_token("VG!z"),
            Err(DecodeError::MalformedBase64(_))
        ));
        // URL-safe alphabet is not part of the token alphabet
        assert!(matches!(
            from_token("-_-_"),
            Err(DecodeError::MalformedBase64(_))
        ));
    }

    #[test]
    fn test_impossible_length_rejected() {
        assert!(matches!(
            from_token("VGVzd"),
            Err(DecodeError::MalformedBase64(_))
        ));
    }

    #[test]
    fn test_token_chars() {
        assert!(to_token(&[0xfb, 0xff, 0xbf]).chars().all(is_token_char));
        assert!(!is_token_char('-'));
        assert!(!is_token_char(' '));
    }
}
