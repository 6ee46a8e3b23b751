//! Integration tests for share links.

use share_codec::{
    encode, share_url, token_from_url, ShareCodec, ShareError, ShareLink, Text, CODE_PARAM,
};
use url::Url;

const PLAYGROUND: &str = "https://example.org/playground/";

#[test]
fn test_link_carries_token() {
    let base = Url::parse(PLAYGROUND).unwrap();
    let token = encode("1;\n2;\n3;");

    let url = share_url(&base, &token);
    assert!(url.as_str().starts_with("https://example.org/playground/?code="));
    assert_eq!(token_from_url(&url), Some(token));
}

#[test]
fn test_link_round_trip_keeps_other_params() {
    let link = ShareLink::parse(
        "https://example.org/playground/?theme=dark",
        ShareCodec::default(),
    )
    .unwrap();
    let text = Text::from("fn main() {\n\tprintln!(\"+/=&?#\");\n}\n");

    let url = link.encode(&text);
    let params: Vec<(String, String)> = url
        .query_pairs()
        .map(|(k, v)| (k.into_owned(), v.into_owned()))
        .collect();
    assert_eq!(params[0], ("theme".to_string(), "dark".to_string()));
    assert_eq!(params[1].0, CODE_PARAM);

    assert_eq!(link.decode(&url).unwrap(), text);
}

#[test]
fn test_encode_uri_component_style_link() {
    // `encodeURIComponent` output for a token containing '+', '/' and '='
    let token = ShareCodec::default().encode(&"?".repeat(300));
    let escaped = token
        .replace('+', "%2B")
        .replace('/', "%2F")
        .replace('=', "%3D");
    let url = format!("{}?code={}", PLAYGROUND, escaped);

    let link = ShareLink::parse(PLAYGROUND, ShareCodec::default()).unwrap();
    assert_eq!(link.decode_str(&url).unwrap(), "?".repeat(300).as_str());
}

#[test]
fn test_link_without_code() {
    let link = ShareLink::parse(PLAYGROUND, ShareCodec::default()).unwrap();
    assert!(matches!(
        link.decode_str(PLAYGROUND),
        Err(ShareError::MissingCode)
    ));
}

#[test]
fn test_link_with_broken_code() {
    let link = ShareLink::parse(PLAYGROUND, ShareCodec::default()).unwrap();
    let err = link
        .decode_str("https://example.org/playground/?code=AAAA")
        .unwrap_err();
    assert!(matches!(err, ShareError::Decode(_)));
}
