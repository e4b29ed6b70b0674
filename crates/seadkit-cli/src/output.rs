//! Listing output in text and JSON form.

use seadkit_formats::sarc::SarcArchive;
use serde::Serialize;
use std::io::Write;

/// Output format for `list`.
#[derive(clap::ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
pub enum OutputFormat {
    /// Plain text table
    Text,
    /// Pretty-printed JSON
    Json,
}

/// Serializable summary of an archive.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct ArchiveListing {
    /// "big" or "little"
    pub byte_order: String,
    /// Filename hash multiplier
    pub hash_multiplier: u32,
    /// Entries in index order
    pub entries: Vec<ListingEntry>,
}

/// One row of a listing.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct ListingEntry {
    /// Path inside the archive
    pub path: String,
    /// Payload size in bytes
    pub size: usize,
    /// Filename hash
    pub hash: u32,
}

impl ArchiveListing {
    /// Summarize `archive`.
    pub fn new(archive: &SarcArchive) -> Self {
        Self {
            byte_order: archive.byte_order().to_string(),
            hash_multiplier: archive.hash_multiplier(),
            entries: archive
                .iter()
                .map(|entry| ListingEntry {
                    path: entry.path().to_string(),
                    size: entry.len(),
                    hash: entry.hash(),
                })
                .collect(),
        }
    }

    /// Total payload bytes.
    pub fn total_size(&self) -> usize {
        self.entries.iter().map(|entry| entry.size).sum()
    }

    /// Write the listing to `out` in `format`.
    pub fn write_to(&self, out: &mut impl Write, format: OutputFormat) -> anyhow::Result<()> {
        match format {
            OutputFormat::Text => {
                writeln!(out, "{:<8}  {:>10}  PATH", "HASH", "SIZE")?;
                for entry in &self.entries {
                    writeln!(out, "{:08x}  {:>10}  {}", entry.hash, entry.size, entry.path)?;
                }
                writeln!(
                    out,
                    "{} files, {} bytes ({} endian)",
                    self.entries.len(),
                    self.total_size(),
                    self.byte_order
                )?;
            }
            OutputFormat::Json => {
                serde_json::to_writer_pretty(&mut *out, self)?;
                writeln!(out)?;
            }
        }
        Ok(())
    }
}
