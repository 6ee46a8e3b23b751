//! Share Token Codec
//!
//! Turns playground source text into a compact token for a URL query
//! parameter and back. A token is the text's UTF-16 code units laid out as
//! little-endian bytes, deflated with zlib framing and written as standard
//! base64, so tokens stay interchangeable with those produced by the
//! browser playground.

pub mod compress;
pub mod text;
pub mod token;

use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};

use crate::error::DecodeError;

pub use text::Text;
pub use token::is_token_char;

/// Highest zlib compression level.
pub const MAX_LEVEL: u32 = 9;

/// Codec tuning
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CodecOptions {
    /// zlib compression level, 0 (stored) to 9 (smallest)
    pub level: u32,
    /// Reject tokens that inflate past this many bytes
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_decoded_bytes: Option<usize>,
}

impl Default for CodecOptions {
    fn default() -> Self {
        Self {
            level: MAX_LEVEL,
            max_decoded_bytes: None,
        }
    }
}

/// Stateless encoder/decoder for share tokens.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ShareCodec {
    options: CodecOptions,
}

impl ShareCodec {
    pub fn new(options: CodecOptions) -> Self {
        Self {
            options: CodecOptions {
                level: options.level.min(MAX_LEVEL),
                ..options
            },
        }
    }

    pub fn options(&self) -> &CodecOptions {
        &self.options
    }

    /// Encode text into a token.
    pub fn encode(&self, text: &str) -> String {
        self.encode_units(&text.encode_utf16().collect::<Vec<_>>())
    }

    /// Encode raw code units, unpaired surrogates included.
    pub fn encode_units(&self, units: &[u16]) -> String {
        let bytes = text::units_to_le_bytes(units);
        let compressed = compress::deflate(&bytes, self.options.level);
        let token = token::to_token(&compressed);

        tracing::debug!(
            units = units.len(),
            compressed = compressed.len(),
            token = token.len(),
            "Encoded share token"
        );
        token
    }

    /// Encode a [`Text`].
    pub fn encode_text(&self, text: &Text) -> String {
        self.encode_units(text.as_units())
    }

    /// Decode a token back into text.
    ///
    /// Code units are restored exactly; no Unicode validation is applied.
    pub fn decode(&self, token: &str) -> Result<Text, DecodeError> {
        let compressed = token::from_token(token)?;
        let bytes = compress::inflate(&compressed, self.options.max_decoded_bytes)?;

        if bytes.len() % 2 != 0 {
            return Err(DecodeError::TruncatedUnits { len: bytes.len() });
        }

        let text = Text::from_units(text::le_bytes_to_units(&bytes));
        tracing::debug!(
            token = token.len(),
            compressed = compressed.len(),
            units = text.len(),
            "Decoded share token"
        );
        Ok(text)
    }

    /// Decode a token, falling back to empty text when it is invalid.
    pub fn decode_or_default(&self, token: &str) -> Text {
        match self.decode(token) {
            Ok(text) => text,
            Err(e) => {
                tracing::warn!("Share link is invalid or from an incompatible version: {}", e);
                Text::new()
            }
        }
    }
}

/// Shared codec with default options (best compression, no decode limit).
pub static DEFAULT_CODEC: Lazy<ShareCodec> = Lazy::new(ShareCodec::default);

/// Encode text with the default codec.
pub fn encode(text: &str) -> String {
    DEFAULT_CODEC.encode(text)
}

/// Encode raw code units with the default codec.
pub fn encode_units(units: &[u16]) -> String {
    DEFAULT_CODEC.encode_units(units)
}

/// Decode a token with the default codec.
pub fn decode(token: &str) -> Result<Text, DecodeError> {
    DEFAULT_CODEC.decode(token)
}

/// Decode a token with the default codec, or return empty text.
pub fn decode_or_default(token: &str) -> Text {
    DEFAULT_CODEC.decode_or_default(token)
}
