//! seadkit binary entry point.
//!
//! Parses arguments, initializes logging, then hands off to
//! [`seadkit_cli::run`].

use anyhow::Result;
use seadkit_cli::Cli;
use tracing_subscriber::EnvFilter;

fn main() -> Result<()> {
    let cli = Cli::from_args();

    // RUST_LOG wins over --log-level
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(cli.log_level.as_filter())),
        )
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    seadkit_cli::run(&cli)
}
