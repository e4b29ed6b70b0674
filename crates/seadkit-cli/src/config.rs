//! Command-line configuration.
//!
//! Arguments can also be supplied through the environment:
//! - `SEADKIT_LOG_LEVEL`: default log level
//! - `SEADKIT_BYTE_ORDER`: byte order for `create`
//! - `SEADKIT_COMPRESSION_LEVEL`: zlib level for `create --zlib`
//!
//! `RUST_LOG` overrides the log level entirely.

use crate::error::CliError;
use crate::output::OutputFormat;
use clap::{Args, Parser, Subcommand};
use seadkit_formats::byte_order::ByteOrder;
use seadkit_formats::compression::{CompressionSettings, DEFAULT_LEVEL};
use seadkit_formats::sarc::{AlignmentTable, BuildOptions};
use std::path::PathBuf;

/// Top-level command line.
#[derive(Debug, Clone, Parser)]
#[command(
    name = "seadkit",
    about = "Extract, build and inspect SARC archives",
    version
)]
pub struct Cli {
    /// Log level, overridden by RUST_LOG
    #[arg(
        long,
        value_enum,
        global = true,
        env = "SEADKIT_LOG_LEVEL",
        default_value = "info"
    )]
    pub log_level: LogLevel,

    /// Subcommand to run
    #[command(subcommand)]
    pub command: Command,
}

impl Cli {
    /// Parse configuration from command-line arguments.
    #[must_use]
    pub fn from_args() -> Self {
        Self::parse()
    }
}

/// Available subcommands.
#[derive(Debug, Clone, Subcommand)]
pub enum Command {
    /// Extract every file from an archive
    Extract(ExtractArgs),
    /// Build an archive from files and directories
    Create(CreateArgs),
    /// List the contents of an archive
    List(ListArgs),
}

/// Logging verbosity.
#[derive(clap::ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
pub enum LogLevel {
    /// Everything, including per-entry detail
    Trace,
    /// Parse and build summaries
    Debug,
    /// Progress messages
    Info,
    /// Warnings only
    Warn,
    /// Errors only
    Error,
}

impl LogLevel {
    /// Directive for `tracing_subscriber::EnvFilter`.
    pub const fn as_filter(self) -> &'static str {
        match self {
            Self::Trace => "trace",
            Self::Debug => "debug",
            Self::Info => "info",
            Self::Warn => "warn",
            Self::Error => "error",
        }
    }
}

/// Arguments for `extract`.
#[derive(Debug, Clone, Args)]
pub struct ExtractArgs {
    /// Archive to read
    pub archive: PathBuf,

    /// Output directory (defaults to the archive name without extension)
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Treat the input as zlib-compressed instead of detecting it
    #[arg(short = 'z', long)]
    pub zlib: bool,

    /// Replace files that already exist
    #[arg(long)]
    pub force: bool,
}

impl ExtractArgs {
    /// Directory entries are written under.
    pub fn output_dir(&self) -> PathBuf {
        if let Some(output) = &self.output {
            return output.clone();
        }
        let stem = self
            .archive
            .file_stem()
            .map_or_else(|| PathBuf::from("extracted"), PathBuf::from);
        match self.archive.parent() {
            Some(parent) => parent.join(stem),
            None => stem,
        }
    }
}

/// Arguments for `create`.
#[derive(Debug, Clone, Args)]
pub struct CreateArgs {
    /// Archive to write
    pub archive: PathBuf,

    /// Files and directories to add
    #[arg(required = true)]
    pub inputs: Vec<PathBuf>,

    /// Byte order of the archive (big or little)
    #[arg(long, env = "SEADKIT_BYTE_ORDER", default_value = "little")]
    pub byte_order: ByteOrder,

    /// Compress the archive with zlib
    #[arg(short = 'z', long)]
    pub zlib: bool,

    /// zlib compression level (0-9), only with `--zlib`
    #[arg(
        long,
        env = "SEADKIT_COMPRESSION_LEVEL",
        default_value_t = DEFAULT_LEVEL,
        requires = "zlib"
    )]
    pub level: u32,

    /// Alignment override for an extension, e.g. `bflim=0x2000`
    #[arg(long = "align", value_name = "EXT=N")]
    pub alignments: Vec<String>,

    /// Replace the archive if it already exists
    #[arg(long)]
    pub force: bool,
}

impl CreateArgs {
    /// Validate configuration and derive the build options.
    ///
    /// # Errors
    ///
    /// Returns `CliError` if an input is missing, an alignment override is
    /// malformed, or the compression level is out of range.
    pub fn validate(&self) -> Result<BuildOptions, CliError> {
        if let Some(missing) = self.inputs.iter().find(|input| !input.exists()) {
            return Err(CliError::InputNotFound(missing.clone()));
        }
        self.build_options()
    }

    /// Build options described by these arguments.
    pub fn build_options(&self) -> Result<BuildOptions, CliError> {
        let mut table = AlignmentTable::new();
        for value in &self.alignments {
            let (extension, alignment) = parse_alignment(value)?;
            table = table.with_override(&extension, alignment)?;
        }

        let mut options = BuildOptions::new()
            .with_byte_order(self.byte_order)
            .with_alignment(table);

        if self.zlib {
            let settings = CompressionSettings::new(self.level)
                .map_err(seadkit_formats::sarc::SarcError::from)?;
            options = options.with_compression(settings);
        }

        Ok(options)
    }
}

/// Arguments for `list`.
#[derive(Debug, Clone, Args)]
pub struct ListArgs {
    /// Archive to read
    pub archive: PathBuf,

    /// Treat the input as zlib-compressed instead of detecting it
    #[arg(short = 'z', long)]
    pub zlib: bool,

    /// Output format
    #[arg(long, value_enum, default_value = "text")]
    pub format: OutputFormat,
}

/// Parse an `EXT=N` alignment override; `N` may be decimal or `0x` hex.
pub fn parse_alignment(arg: &str) -> Result<(String, usize), CliError> {
    let invalid = |reason: &str| CliError::InvalidAlignment {
        value: arg.to_string(),
        reason: reason.to_string(),
    };

    let (extension, value) = arg
        .split_once('=')
        .ok_or_else(|| invalid("expected EXT=N"))?;
    let extension = extension.trim().trim_start_matches('.');
    if extension.is_empty() {
        return Err(invalid("extension is empty"));
    }

    let value = value.trim();
    let alignment = match value
        .strip_prefix("0x")
        .or_else(|| value.strip_prefix("0X"))
    {
        Some(hex) => usize::from_str_radix(hex, 16),
        None => value.parse(),
    }
    .map_err(|_| invalid("alignment is not a number"))?;

    Ok((extension.to_string(), alignment))
}

#[cfg(test)]
#[allow(clippy::expect_used, clippy::unwrap_used, clippy::panic)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_alignment() {
        assert_eq!(parse_alignment("bflim=0x2000").unwrap(), ("bflim".to_string(), 0x2000));
        assert_eq!(parse_alignment(".txt = 16").unwrap(), ("txt".to_string(), 16));
        assert!(parse_alignment("bflim").is_err());
        assert!(parse_alignment("=4").is_err());
        assert!(parse_alignment("bin=four").is_err());
    }

    #[test]
    fn test_create_args_parse() {
        let cli = Cli::try_parse_from([
            "seadkit",
            "create",
            "out.sarc",
            "assets",
            "--byte-order",
            "big",
            "-z",
            "--level",
            "9",
            "--align",
            "dat=0x100",
        ])
        .unwrap();

        let Command::Create(args) = cli.command else {
            panic!("expected create");
        };
        let options = args.build_options().unwrap();
        assert_eq!(options.byte_order, ByteOrder::Big);
        assert_eq!(options.compression.map(CompressionSettings::level), Some(9));
        assert_eq!(options.alignment.alignment_for("a.dat"), 0x100);
    }

    #[test]
    fn test_create_args_reject_bad_values() {
        let cli = Cli::try_parse_from(["seadkit", "create", "out.sarc", "in", "-z", "--level", "12"])
            .unwrap();
        let Command::Create(args) = cli.command else {
            panic!("expected create");
        };
        assert!(matches!(args.build_options(), Err(CliError::InvalidOptions(_))));

        let cli = Cli::try_parse_from(["seadkit", "create", "out.sarc", "in", "--align", "txt=3"])
            .unwrap();
        let Command::Create(args) = cli.command else {
            panic!("expected create");
        };
        assert!(matches!(args.build_options(), Err(CliError::InvalidOptions(_))));
    }

    #[test]
    fn test_level_requires_zlib() {
        let err = Cli::try_parse_from(["seadkit", "create", "out.sarc", "in", "--level", "9"])
            .unwrap_err();
        assert_eq!(err.kind(), clap::error::ErrorKind::MissingRequiredArgument);

        let cli = Cli::try_parse_from(["seadkit", "create", "out.sarc", "in"]).unwrap();
        let Command::Create(args) = cli.command else {
            panic!("expected create");
        };
        assert_eq!(args.level, DEFAULT_LEVEL);
        assert!(args.build_options().unwrap().compression.is_none());
    }

    #[test]
    fn test_validate_returns_options() {
        let dir = std::env::temp_dir();
        let input = dir.to_str().unwrap();
        let cli = Cli::try_parse_from(["seadkit", "create", "out.sarc", input, "-z"]).unwrap();
        let Command::Create(args) = cli.command else {
            panic!("expected create");
        };
        let options = args.validate().unwrap();
        assert_eq!(
            options.compression.map(CompressionSettings::level),
            Some(DEFAULT_LEVEL)
        );
    }

    #[test]
    fn test_extract_default_output_dir() {
        let cli = Cli::try_parse_from(["seadkit", "extract", "data/Layout.sarc"]).unwrap();
        let Command::Extract(args) = cli.command else {
            panic!("expected extract");
        };
        assert_eq!(args.output_dir(), PathBuf::from("data/Layout"));
        assert_eq!(cli.log_level, LogLevel::Info);
    }
}
