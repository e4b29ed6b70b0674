//! `seadkit extract`

use super::load_archive;
use crate::config::ExtractArgs;
use crate::error::CliError;
use crate::files::{check_targets, safe_join, write_atomic};
use tracing::info;

/// What an extraction wrote.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExtractSummary {
    /// Number of files written
    pub files: usize,
    /// Total payload bytes written
    pub bytes: usize,
}

/// Extract every entry of the archive.
///
/// All destinations are resolved and checked before the first file is
/// written, so an unsafe entry name, a file/directory clash, or an existing
/// file without `--force` leaves the output directory untouched.
pub fn run(args: &ExtractArgs) -> anyhow::Result<ExtractSummary> {
    let archive = load_archive(&args.archive, args.zlib)?;
    let output_dir = args.output_dir();

    let targets = archive
        .extract_all()
        .into_iter()
        .map(|(path, data)| -> Result<_, CliError> { Ok((safe_join(&output_dir, path)?, data)) })
        .collect::<Result<Vec<_>, CliError>>()?;

    let paths: Vec<_> = targets.iter().map(|(target, _)| target.clone()).collect();
    check_targets(&output_dir, &paths)?;

    if !args.force
        && let Some((existing, _)) = targets.iter().find(|(target, _)| target.exists())
    {
        return Err(CliError::OutputExists(existing.clone()).into());
    }

    let mut summary = ExtractSummary { files: 0, bytes: 0 };
    for (target, data) in targets {
        write_atomic(&target, data, args.force)?;
        tracing::trace!(path = %target.display(), size = data.len(), "extracted");
        summary.files += 1;
        summary.bytes += data.len();
    }

    info!(
        "Extracted {} files ({} bytes) to {}",
        summary.files,
        summary.bytes,
        output_dir.display()
    );
    Ok(summary)
}
