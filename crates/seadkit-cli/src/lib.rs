//! Command-line tool for SARC archives.
//!
//! The binary is a thin wrapper; everything it does is available here so
//! it can be driven from tests.
//!
//! # Commands
//!
//! - `extract`: write every entry of an archive to a directory
//! - `create`: build an archive from files and directories
//! - `list`: show the entries of an archive as text or JSON
//!
//! # Example
//!
//! ```no_run
//! use seadkit_cli::{Cli, run};
//!
//! fn main() -> anyhow::Result<()> {
//!     let cli = Cli::from_args();
//!     run(&cli)
//! }
//! ```

#![warn(missing_docs)]
#![cfg_attr(test, allow(clippy::unwrap_used))]

pub mod commands;
pub mod config;
pub mod error;
pub mod files;
pub mod output;

pub use config::{Cli, Command, CreateArgs, ExtractArgs, ListArgs, LogLevel};
pub use error::CliError;
pub use output::OutputFormat;

/// Execute the parsed command line.
pub fn run(cli: &Cli) -> anyhow::Result<()> {
    match &cli.command {
        Command::Extract(args) => {
            commands::extract::run(args)?;
        }
        Command::Create(args) => {
            commands::create::run(args)?;
        }
        Command::List(args) => {
            let stdout = std::io::stdout();
            commands::list::run(args, &mut stdout.lock())?;
        }
    }
    Ok(())
}
