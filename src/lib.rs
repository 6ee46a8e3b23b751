pub mod codec;
pub mod error;
pub mod link;

pub use codec::{
    decode, decode_or_default, encode, encode_units, is_token_char, CodecOptions, ShareCodec,
    Text, DEFAULT_CODEC, MAX_LEVEL,
};
pub use error::{DecodeError, Result, ShareError};
pub use link::{share_url, token_from_url, ShareLink, CODE_PARAM};
