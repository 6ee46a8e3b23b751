//! Share Links
//!
//! Places a token in a playground URL as the `code` query parameter and
//! reads it back out.

use url::Url;

use crate::codec::{ShareCodec, Text};
use crate::error::{Result, ShareError};

/// Query parameter that carries the token.
pub const CODE_PARAM: &str = "code";

/// Build a share URL from `base`, replacing any existing `code` parameter.
///
/// Other query pairs are kept; the fragment is dropped.
pub fn share_url(base: &Url, token: &str) -> Url {
    let mut url = base.clone();
    let kept: Vec<(String, String)> = base
        .query_pairs()
        .filter(|(key, _)| key != CODE_PARAM)
        .map(|(key, value)| (key.into_owned(), value.into_owned()))
        .collect();

    url.set_fragment(None);
    url.set_query(None);
    {
        let mut pairs = url.query_pairs_mut();
        for (key, value) in &kept {
            pairs.append_pair(key, value);
        }
        pairs.append_pair(CODE_PARAM, token);
    }
    url
}

/// The percent-decoded `code` parameter of `url`, if present.
///
/// A token pasted without escaping has its `+` form-decoded to a space;
/// spaces never occur in tokens, so they are turned back into `+`.
pub fn token_from_url(url: &Url) -> Option<String> {
    url.query_pairs()
        .find(|(key, _)| key == CODE_PARAM)
        .map(|(_, value)| value.replace(' ', "+"))
}

/// Share link builder bound to a playground address and a codec.
#[derive(Debug, Clone)]
pub struct ShareLink {
    base: Url,
    codec: ShareCodec,
}

impl ShareLink {
    pub fn new(base: Url, codec: ShareCodec) -> Self {
        Self { base, codec }
    }

    /// Parse the playground address.
    pub fn parse(base: &str, codec: ShareCodec) -> Result<Self> {
        Ok(Self::new(Url::parse(base)?, codec))
    }

    pub fn base(&self) -> &Url {
        &self.base
    }

    /// Link that opens the playground with `text` loaded.
    pub fn encode(&self, text: &Text) -> Url {
        share_url(&self.base, &self.codec.encode_text(text))
    }

    /// Text carried by a share link.
    pub fn decode(&self, url: &Url) -> Result<Text> {
        let token = token_from_url(url).ok_or(ShareError::MissingCode)?;
        Ok(self.codec.decode(&token)?)
    }

    /// Like [`ShareLink::decode`] but takes the link as a string.
    pub fn decode_str(&self, url: &str) -> Result<Text> {
        self.decode(&Url::parse(url)?)
    }
}
