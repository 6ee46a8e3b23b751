use std::fs;
use std::io::{self, Read};
use std::path::{Path, PathBuf};

use clap::{Parser, Subcommand};
use serde::Serialize;

use share_codec::error::{Result, ShareError};
use share_codec::{token_from_url, CodecOptions, ShareCodec, ShareLink, Text, MAX_LEVEL};
use url::Url;

#[derive(Parser)]
#[command(name = "share-codec")]
#[command(about = "Encode playground source into share tokens and back")]
#[command(version)]
#[command(after_long_help = r#"
EXAMPLES:
    # Encode a file into a token
    share-codec encode program.txt

    # Encode stdin into a full share link
    cat program.txt | share-codec encode --base https://example.org/playground/

    # Decode a token
    share-codec decode "$TOKEN"

    # Load the code behind a share link, printing nothing if the link is broken
    share-codec open "https://example.org/playground/?code=..." --fallback
"#)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// zlib compression level for new tokens (0-9)
    #[arg(
        long,
        global = true,
        env = "SHARE_CODEC_LEVEL",
        default_value_t = MAX_LEVEL,
        value_parser = clap::value_parser!(u32).range(0..=9)
    )]
    pub level: u32,

    /// Refuse tokens that inflate past this many bytes
    #[arg(long, global = true, env = "SHARE_CODEC_MAX_DECODED_BYTES")]
    pub max_decoded_bytes: Option<usize>,
}

impl Cli {
    pub fn codec(&self) -> ShareCodec {
        ShareCodec::new(CodecOptions {
            level: self.level,
            max_decoded_bytes: self.max_decoded_bytes,
        })
    }
}

#[derive(Subcommand)]
pub enum Commands {
    /// Encode source text into a share token
    Encode {
        /// File to read (stdin when omitted)
        file: Option<PathBuf>,

        /// Playground URL; prints a full share link instead of the bare token
        #[arg(long)]
        base: Option<String>,
    },

    /// Decode a share token back into source text
    Decode {
        /// Token to decode (stdin when omitted)
        token: Option<String>,

        /// Print empty text and a warning instead of failing
        #[arg(long)]
        fallback: bool,

        /// Output format (text or json)
        #[arg(long, default_value = "text")]
        format: String,
    },

    /// Decode the source text carried by a share link
    Open {
        /// Full share link
        url: String,

        /// Print empty text and a warning instead of failing
        #[arg(long)]
        fallback: bool,

        /// Output format (text or json)
        #[arg(long, default_value = "text")]
        format: String,
    },
}

#[derive(Serialize)]
struct DecodedOutput<'a> {
    text: &'a Text,
    units: usize,
    lossless: bool,
}

fn read_input(file: Option<&Path>) -> Result<String> {
    match file {
        Some(path) => Ok(fs::read_to_string(path)?),
        None => {
            let mut input = String::new();
            io::stdin().read_to_string(&mut input)?;
            Ok(input)
        }
    }
}

fn print_text(text: &Text, format: &str) -> Result<()> {
    if !text.is_well_formed() {
        tracing::warn!("Decoded text has unpaired surrogates; they are shown as U+FFFD");
    }

    match format {
        "json" => {
            let output = DecodedOutput {
                text,
                units: text.len(),
                lossless: text.is_well_formed(),
            };
            println!("{}", serde_json::to_string_pretty(&output)?);
        }
        _ => print!("{}", text),
    }

    Ok(())
}

pub fn encode_source(codec: &ShareCodec, file: Option<&Path>, base: Option<&str>) -> Result<()> {
    let source = read_input(file)?;

    match base {
        Some(base) => {
            let link = ShareLink::parse(base, *codec)?;
            println!("{}", link.encode(&Text::from(source)));
        }
        None => println!("{}", codec.encode(&source)),
    }

    Ok(())
}

pub fn decode_token(
    codec: &ShareCodec,
    token: Option<&str>,
    fallback: bool,
    format: &str,
) -> Result<()> {
    let token = match token {
        Some(token) => token.to_string(),
        None => read_input(None)?.trim().to_string(),
    };

    let text = if fallback {
        codec.decode_or_default(&token)
    } else {
        codec.decode(&token)?
    };

    print_text(&text, format)
}

pub fn open_link(codec: &ShareCodec, url: &str, fallback: bool, format: &str) -> Result<()> {
    let url = Url::parse(url)?;

    let text = match token_from_url(&url) {
        Some(token) if fallback => codec.decode_or_default(&token),
        Some(token) => codec.decode(&token)?,
        None if fallback => {
            tracing::warn!("Share link has no code, starting from an empty editor");
            Text::new()
        }
        None => return Err(ShareError::MissingCode),
    };

    print_text(&text, format)
}
