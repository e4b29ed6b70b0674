//! In-memory SARC archive

use crate::byte_order::ByteOrder;
use crate::compression::{decompress, is_compressed};
use crate::sarc::builder::{BuildOptions, build};
use crate::sarc::entry::{SarcEntry, normalize_path};
use crate::sarc::error::{SarcError, SarcResult};
use crate::sarc::hash::{DEFAULT_HASH_MULTIPLIER, hash_path};
use crate::sarc::header::SARC_MAGIC;
use crate::sarc::view::SarcView;

/// A SARC archive held in memory
///
/// Entries are owned by the archive and kept in `(hash, path)` order, the
/// same order the node index uses on disk, so lookups binary search the
/// entry list directly.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SarcArchive {
    byte_order: ByteOrder,
    hash_multiplier: u32,
    entries: Vec<SarcEntry>,
}

impl SarcArchive {
    /// Empty archive with the given byte order and the default hash
    pub fn new(byte_order: ByteOrder) -> Self {
        Self::with_hash_multiplier(byte_order, DEFAULT_HASH_MULTIPLIER)
    }

    /// Empty archive using a specific hash multiplier
    pub fn with_hash_multiplier(byte_order: ByteOrder, hash_multiplier: u32) -> Self {
        Self {
            byte_order,
            hash_multiplier,
            entries: Vec::new(),
        }
    }

    /// Archive from prepared entries
    ///
    /// Entries are rehashed with `hash_multiplier` and sorted. Duplicate
    /// paths fail with [`SarcError::DuplicateEntry`].
    pub fn from_entries(
        byte_order: ByteOrder,
        hash_multiplier: u32,
        entries: impl IntoIterator<Item = SarcEntry>,
    ) -> SarcResult<Self> {
        let mut entries: Vec<SarcEntry> = entries
            .into_iter()
            .map(|mut entry| {
                entry.rehash(hash_multiplier);
                entry
            })
            .collect();
        entries.sort_by(|a, b| a.sort_key().cmp(&b.sort_key()));

        if let Some(pair) = entries.windows(2).find(|pair| pair[0].path() == pair[1].path()) {
            return Err(SarcError::DuplicateEntry(pair[0].path().to_string()));
        }

        Ok(Self {
            byte_order,
            hash_multiplier,
            entries,
        })
    }

    /// Parse an uncompressed archive
    ///
    /// The whole structure is validated before anything is copied; on error
    /// no archive is returned.
    pub fn parse(bytes: &[u8]) -> SarcResult<Self> {
        let view = SarcView::new(bytes)?;
        let entries = view
            .iter()
            .zip(view.records())
            .map(|((path, data), record)| SarcEntry::from_parsed(path, data, record.hash))
            .collect();

        Ok(Self {
            byte_order: view.byte_order(),
            hash_multiplier: view.hash_multiplier(),
            entries,
        })
    }

    /// Decompress, then parse
    pub fn parse_compressed(bytes: &[u8]) -> SarcResult<Self> {
        let inflated = decompress(bytes)?;
        Self::parse(&inflated)
    }

    /// Parse raw or compressed input, sniffing the `SARC` magic
    pub fn parse_auto(bytes: &[u8]) -> SarcResult<Self> {
        if !bytes.starts_with(&SARC_MAGIC) && is_compressed(bytes) {
            tracing::debug!(len = bytes.len(), "input looks compressed");
            return Self::parse_compressed(bytes);
        }
        Self::parse(bytes)
    }

    /// Byte order used when serializing
    pub fn byte_order(&self) -> ByteOrder {
        self.byte_order
    }

    /// Filename hash multiplier
    pub fn hash_multiplier(&self) -> u32 {
        self.hash_multiplier
    }

    /// Entries in `(hash, path)` order
    pub fn entries(&self) -> &[SarcEntry] {
        &self.entries
    }

    /// Iterate over entries in `(hash, path)` order
    pub fn iter(&self) -> std::slice::Iter<'_, SarcEntry> {
        self.entries.iter()
    }

    /// Number of entries
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the archive holds no entries
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    fn position(&self, path: &str) -> Result<usize, usize> {
        let key = (hash_path(path, self.hash_multiplier), path);
        self.entries
            .binary_search_by(|entry| entry.sort_key().cmp(&key))
    }

    /// Entry stored under `path`
    pub fn entry(&self, path: &str) -> SarcResult<&SarcEntry> {
        self.position(path)
            .map(|i| &self.entries[i])
            .map_err(|_| SarcError::NotFound(path.to_string()))
    }

    /// Payload stored under `path`
    pub fn get(&self, path: &str) -> SarcResult<&[u8]> {
        self.entry(path).map(SarcEntry::data)
    }

    /// Whether an entry exists under `path`
    pub fn contains(&self, path: &str) -> bool {
        self.position(path).is_ok()
    }

    /// Insert an entry, rehashing it with the archive's multiplier
    pub fn insert(&mut self, mut entry: SarcEntry) -> SarcResult<()> {
        entry.rehash(self.hash_multiplier);
        match self.position(entry.path()) {
            Ok(_) => Err(SarcError::DuplicateEntry(entry.path().to_string())),
            Err(at) => {
                self.entries.insert(at, entry);
                Ok(())
            }
        }
    }

    /// Add a file under a normalized `path`
    pub fn add_file(&mut self, path: impl AsRef<str>, data: impl Into<Vec<u8>>) -> SarcResult<()> {
        let entry = SarcEntry::with_multiplier(path, data, self.hash_multiplier)?;
        self.insert(entry)
    }

    /// Remove and return the entry stored under `path`
    pub fn remove(&mut self, path: &str) -> SarcResult<SarcEntry> {
        let at = self
            .position(path)
            .map_err(|_| SarcError::NotFound(path.to_string()))?;
        Ok(self.entries.remove(at))
    }

    /// Move the entry at `from` to `to`, recomputing its hash
    pub fn rename(&mut self, from: &str, to: &str) -> SarcResult<()> {
        let target = normalize_path(to)?;
        if self.contains(&target) {
            return Err(SarcError::DuplicateEntry(target));
        }

        let mut entry = self.remove(from)?;
        entry.set_path(&target, self.hash_multiplier)?;
        self.insert(entry)
    }

    /// `(path, payload)` pairs for every entry
    pub fn extract_all(&self) -> Vec<(&str, &[u8])> {
        self.entries
            .iter()
            .map(|entry| (entry.path(), entry.data()))
            .collect()
    }

    /// Options reproducing this archive's byte order and hash
    pub fn build_options(&self) -> BuildOptions {
        BuildOptions::new()
            .with_byte_order(self.byte_order)
            .with_hash_multiplier(self.hash_multiplier)
    }

    /// Serialize with the archive's own byte order and hash
    pub fn to_bytes(&self) -> SarcResult<Vec<u8>> {
        self.to_bytes_with(&self.build_options())
    }

    /// Serialize with explicit options
    pub fn to_bytes_with(&self, options: &BuildOptions) -> SarcResult<Vec<u8>> {
        build(&self.entries, options)
    }
}

impl<'a> IntoIterator for &'a SarcArchive {
    type Item = &'a SarcEntry;
    type IntoIter = std::slice::Iter<'a, SarcEntry>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}
