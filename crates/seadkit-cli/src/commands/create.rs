//! `seadkit create`

use crate::config::CreateArgs;
use crate::error::CliError;
use crate::files::{collect_inputs, write_atomic};
use anyhow::Context;
use seadkit_formats::sarc::SarcBuilder;
use tracing::{info, warn};

/// What a build produced.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CreateSummary {
    /// Number of files stored
    pub files: usize,
    /// Size of the written archive
    pub archive_size: usize,
}

/// Build an archive from the inputs and write it.
pub fn run(args: &CreateArgs) -> anyhow::Result<CreateSummary> {
    let options = args.validate()?;
    if !args.force && args.archive.exists() {
        return Err(CliError::OutputExists(args.archive.clone()).into());
    }

    let inputs = collect_inputs(&args.inputs, Some(&args.archive))?;
    if inputs.is_empty() {
        warn!("No input files found, writing an empty archive");
    }

    let mut builder = SarcBuilder::with_options(options);
    for input in &inputs {
        let data = std::fs::read(&input.source)
            .with_context(|| format!("Failed to read {}", input.source.display()))?;
        builder
            .add_file(&input.archive_path, data)
            .with_context(|| format!("Cannot add {}", input.source.display()))?;
    }

    let bytes = builder.build().context("Failed to build archive")?;
    write_atomic(&args.archive, &bytes, args.force)?;

    info!(
        "Wrote {} ({} files, {} bytes, {} endian{})",
        args.archive.display(),
        builder.len(),
        bytes.len(),
        builder.options().byte_order,
        if args.zlib { ", zlib" } else { "" }
    );
    Ok(CreateSummary {
        files: builder.len(),
        archive_size: bytes.len(),
    })
}
