//! Error types for the command-line tool.

use std::path::PathBuf;
use thiserror::Error;

/// Argument and configuration errors.
#[derive(Debug, Error)]
pub enum CliError {
    /// Malformed `--align EXT=N` value
    #[error("Invalid alignment '{value}': {reason}")]
    InvalidAlignment {
        /// The value as given
        value: String,
        /// Reason for invalidity
        reason: String,
    },

    /// Rejected build settings
    #[error("Invalid build options: {0}")]
    InvalidOptions(#[from] seadkit_formats::sarc::SarcError),

    /// An output already exists and `--force` was not given
    #[error("Output already exists: {} (use --force to replace)", .0.display())]
    OutputExists(PathBuf),

    /// An input path does not exist
    #[error("Input not found: {}", .0.display())]
    InputNotFound(PathBuf),

    /// A path cannot be represented inside an archive
    #[error("Path is not valid UTF-8: {}", .0.display())]
    NonUtf8Path(PathBuf),

    /// Two destinations overlap, or one lies below an existing file
    #[error("Path conflicts with another output: {}", .0.display())]
    PathConflict(PathBuf),

    /// An entry name would resolve outside the output directory
    #[error("Entry '{0}' would be written outside the output directory")]
    UnsafeEntryPath(String),
}
