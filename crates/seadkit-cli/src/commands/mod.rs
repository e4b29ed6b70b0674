//! Subcommand implementations.

pub mod create;
pub mod extract;
pub mod list;

use anyhow::Context;
use seadkit_formats::sarc::SarcArchive;
use std::path::Path;

/// Read and parse the archive at `path`.
///
/// With `zlib` the input must be compressed; otherwise compression is
/// detected from the content.
pub fn load_archive(path: &Path, zlib: bool) -> anyhow::Result<SarcArchive> {
    let bytes =
        std::fs::read(path).with_context(|| format!("Failed to read {}", path.display()))?;

    let archive = if zlib {
        SarcArchive::parse_compressed(&bytes)
    } else {
        SarcArchive::parse_auto(&bytes)
    }
    .with_context(|| format!("Failed to parse {}", path.display()))?;

    tracing::debug!(
        path = %path.display(),
        entries = archive.len(),
        byte_order = %archive.byte_order(),
        "loaded archive"
    );
    Ok(archive)
}
