//! SARC archive builder

use std::collections::HashSet;

use crate::byte_order::ByteOrder;
use crate::compression::{CompressionSettings, compress};
use crate::sarc::archive::SarcArchive;
use crate::sarc::data_section::AlignmentTable;
use crate::sarc::entry::SarcEntry;
use crate::sarc::error::{SarcError, SarcResult};
use crate::sarc::hash::DEFAULT_HASH_MULTIPLIER;
use crate::sarc::header::{
    NODES_OFFSET, SFNT_HEADER_LEN, SarcHeader, SfatHeader, SfntHeader, write_to,
};
use crate::sarc::node_index::{NODE_LEN, NodeIndex};

/// Settings for serializing an archive
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BuildOptions {
    /// Byte order for every multi-byte field
    pub byte_order: ByteOrder,
    /// Multiplier for the filename hash
    pub hash_multiplier: u32,
    /// Extension to alignment policy for payloads
    pub alignment: AlignmentTable,
    /// Wrap the result in a compressed container when set
    pub compression: Option<CompressionSettings>,
}

impl BuildOptions {
    /// Little-endian, default hash, built-in alignments, uncompressed
    pub fn new() -> Self {
        Self {
            byte_order: ByteOrder::default(),
            hash_multiplier: DEFAULT_HASH_MULTIPLIER,
            alignment: AlignmentTable::new(),
            compression: None,
        }
    }

    /// Set the byte order
    #[must_use]
    pub fn with_byte_order(mut self, byte_order: ByteOrder) -> Self {
        self.byte_order = byte_order;
        self
    }

    /// Set the hash multiplier
    #[must_use]
    pub fn with_hash_multiplier(mut self, multiplier: u32) -> Self {
        self.hash_multiplier = multiplier;
        self
    }

    /// Replace the alignment table
    #[must_use]
    pub fn with_alignment(mut self, alignment: AlignmentTable) -> Self {
        self.alignment = alignment;
        self
    }

    /// Compress the output with the given settings
    #[must_use]
    pub fn with_compression(mut self, compression: CompressionSettings) -> Self {
        self.compression = Some(compression);
        self
    }
}

impl Default for BuildOptions {
    fn default() -> Self {
        Self::new()
    }
}

/// Serialize `entries` into a SARC container
///
/// Entries may be supplied in any order; the output is identical for every
/// permutation of the same set. Fails without producing output on duplicate
/// paths or when the archive cannot be addressed with 32-bit offsets.
pub fn build(entries: &[SarcEntry], options: &BuildOptions) -> SarcResult<Vec<u8>> {
    let index = NodeIndex::build(entries, options.hash_multiplier, &options.alignment)?;

    let node_count = index.records.len();
    let nodes_end = NODES_OFFSET + node_count * NODE_LEN;
    let names_end = nodes_end + SFNT_HEADER_LEN + index.names.len();
    let data_start = index.layout.section_start(names_end);
    let total = index.layout.total_len(data_start);

    let too_large = || SarcError::ArchiveTooLarge(total as u64);
    let file_size = u32::try_from(total).map_err(|_| too_large())?;
    let data_offset = u32::try_from(data_start).map_err(|_| too_large())?;
    // NodeIndex::build already capped the entry count
    let count = u16::try_from(node_count).map_err(|_| SarcError::TooManyEntries(node_count))?;

    let order = options.byte_order;
    let mut out = Vec::with_capacity(total);
    write_to(&SarcHeader::new(file_size, data_offset), &mut out, order)?;
    write_to(&SfatHeader::new(count, options.hash_multiplier), &mut out, order)?;
    for record in &index.records {
        write_to(&record.to_node(), &mut out, order)?;
    }
    write_to(&SfntHeader::new(), &mut out, order)?;
    out.extend_from_slice(index.names.as_bytes());
    out.resize(data_start, 0);

    index
        .layout
        .write_payloads(&mut out, index.order.iter().map(|&i| entries[i].data()));
    debug_assert_eq!(out.len(), total);

    tracing::debug!(
        byte_order = %order,
        entries = node_count,
        total,
        data_offset = data_start,
        alignment = index.layout.section_alignment,
        "built SARC archive"
    );

    match options.compression {
        Some(settings) => Ok(compress(&out, settings.level())?),
        None => Ok(out),
    }
}

/// Incremental archive builder
///
/// Paths are normalized and checked for duplicates as they are added, so
/// `build` only fails on size limits.
///
/// # Example
///
/// ```
/// use seadkit_formats::sarc::{SarcArchive, SarcBuilder};
///
/// let mut builder = SarcBuilder::new();
/// builder.add_file("file1.txt", b"AAAA".to_vec())?;
/// builder.add_file("subdir/file3.txt", b"BBBB".to_vec())?;
/// let bytes = builder.build()?;
///
/// let archive = SarcArchive::parse(&bytes)?;
/// assert_eq!(archive.get("subdir/file3.txt")?, b"BBBB");
/// # Ok::<(), seadkit_formats::sarc::SarcError>(())
/// ```
#[derive(Debug, Clone, Default)]
pub struct SarcBuilder {
    options: BuildOptions,
    entries: Vec<SarcEntry>,
    paths: HashSet<String>,
}

impl SarcBuilder {
    /// Empty builder with default options
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder using `options`
    pub fn with_options(options: BuildOptions) -> Self {
        Self {
            options,
            ..Self::default()
        }
    }

    /// Set the byte order
    #[must_use]
    pub fn with_byte_order(mut self, byte_order: ByteOrder) -> Self {
        self.options.byte_order = byte_order;
        self
    }

    /// Set the hash multiplier
    #[must_use]
    pub fn with_hash_multiplier(mut self, multiplier: u32) -> Self {
        self.options.hash_multiplier = multiplier;
        self
    }

    /// Override the alignment for one extension
    pub fn with_alignment(mut self, extension: &str, alignment: usize) -> SarcResult<Self> {
        self.options.alignment = self.options.alignment.with_override(extension, alignment)?;
        Ok(self)
    }

    /// Compress the output
    #[must_use]
    pub fn with_compression(mut self, compression: CompressionSettings) -> Self {
        self.options.compression = Some(compression);
        self
    }

    /// Current options
    pub fn options(&self) -> &BuildOptions {
        &self.options
    }

    /// Add a file, rejecting invalid or duplicate paths
    pub fn add_file(&mut self, path: impl AsRef<str>, data: impl Into<Vec<u8>>) -> SarcResult<()> {
        let entry = SarcEntry::with_multiplier(path, data, self.options.hash_multiplier)?;
        self.add_entry(entry)
    }

    /// Add a prepared entry
    pub fn add_entry(&mut self, entry: SarcEntry) -> SarcResult<()> {
        if !self.paths.insert(entry.path().to_string()) {
            return Err(SarcError::DuplicateEntry(entry.path().to_string()));
        }
        self.entries.push(entry);
        Ok(())
    }

    /// Number of files added
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether no files were added
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Serialize the added files
    pub fn build(&self) -> SarcResult<Vec<u8>> {
        build(&self.entries, &self.options)
    }

    /// Collect the added files into an in-memory archive
    pub fn build_archive(self) -> SarcResult<SarcArchive> {
        SarcArchive::from_entries(self.options.byte_order, self.options.hash_multiplier, self.entries)
    }
}
