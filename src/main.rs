mod cli;

use clap::Parser;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use crate::cli::{Cli, Commands};

fn main() -> anyhow::Result<()> {
    // stdout carries tokens and decoded text, so logs go to stderr
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "share_codec=info".into()),
        )
        .with(
            tracing_subscriber::fmt::layer()
                .with_target(false)
                .with_writer(std::io::stderr),
        )
        .init();

    let cli = Cli::parse();
    let codec = cli.codec();

    match cli.command {
        Commands::Encode { file, base } => {
            cli::encode_source(&codec, file.as_deref(), base.as_deref())?;
        }
        Commands::Decode {
            token,
            fallback,
            format,
        } => {
            cli::decode_token(&codec, token.as_deref(), fallback, &format)?;
        }
        Commands::Open {
            url,
            fallback,
            format,
        } => {
            cli::open_link(&codec, &url, fallback, &format)?;
        }
    }

    Ok(())
}
