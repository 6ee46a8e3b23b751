use thiserror::Error;

/// Failure to turn a share token back into text.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DecodeError {
    #[error("Malformed base64: {0}")]
    MalformedBase64(#[from] base64::DecodeError),

    #[error("Corrupt compressed data: {0}")]
    CorruptData(String),

    #[error("Decompressed length {len} is not a whole number of 16-bit units")]
    TruncatedUnits { len: usize },

    #[error("Decompressed data exceeds the {limit} byte limit")]
    OutputTooLarge { limit: usize },
}

#[derive(Error, Debug)]
pub enum ShareError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Share link has no `code` parameter")]
    MissingCode,

    #[error(transparent)]
    Decode(#[from] DecodeError),
}

pub type Result<T> = std::result::Result<T, ShareError>;
