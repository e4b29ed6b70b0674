//! Archive entries

use crate::sarc::error::{SarcError, SarcResult};
use crate::sarc::hash::{DEFAULT_HASH_MULTIPLIER, hash_path};

/// Normalize a caller-supplied relative path
///
/// Backslashes become forward slashes and leading separators are dropped.
/// Empty paths, NUL bytes, and empty, `.` or `..` components are rejected.
pub fn normalize_path(path: &str) -> SarcResult<String> {
    let invalid = |reason| SarcError::InvalidPath {
        path: path.to_string(),
        reason,
    };

    let normalized = path.replace('\\', "/");
    let normalized = normalized.trim_start_matches('/');

    if normalized.is_empty() {
        return Err(invalid("path is empty"));
    }
    if normalized.contains('\0') {
        return Err(invalid("path contains a NUL byte"));
    }
    for component in normalized.split('/') {
        match component {
            "" => return Err(invalid("path contains an empty component")),
            "." | ".." => return Err(invalid("path contains a relative component")),
            _ => {}
        }
    }

    Ok(normalized.to_string())
}

/// A named payload stored in, or destined for, a SARC archive
///
/// The hash is derived from the path and recomputed whenever the path
/// changes; it cannot be set independently.
#[derive(Clone, PartialEq, Eq)]
pub struct SarcEntry {
    path: String,
    data: Vec<u8>,
    hash: u32,
}

impl SarcEntry {
    /// Create an entry, normalizing its path
    pub fn new(path: impl AsRef<str>, data: impl Into<Vec<u8>>) -> SarcResult<Self> {
        Self::with_multiplier(path, data, DEFAULT_HASH_MULTIPLIER)
    }

    /// Create an entry hashed with a specific multiplier
    pub fn with_multiplier(
        path: impl AsRef<str>,
        data: impl Into<Vec<u8>>,
        multiplier: u32,
    ) -> SarcResult<Self> {
        let path = normalize_path(path.as_ref())?;
        Ok(Self {
            hash: hash_path(&path, multiplier),
            path,
            data: data.into(),
        })
    }

    /// Entry read from an archive, path kept verbatim
    pub(crate) fn from_parsed(path: &str, data: &[u8], hash: u32) -> Self {
        Self {
            path: path.to_string(),
            data: data.to_vec(),
            hash,
        }
    }

    /// Relative path inside the archive
    pub fn path(&self) -> &str {
        &self.path
    }

    /// Payload bytes
    pub fn data(&self) -> &[u8] {
        &self.data
    }

    /// Consume the entry, returning its payload
    pub fn into_data(self) -> Vec<u8> {
        self.data
    }

    /// Filename hash
    pub fn hash(&self) -> u32 {
        self.hash
    }

    /// Payload length
    pub fn len(&self) -> usize {
        self.data.len()
    }

    /// Whether the payload is empty
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Replace the path and recompute the hash
    pub(crate) fn set_path(&mut self, path: &str, multiplier: u32) -> SarcResult<()> {
        self.path = normalize_path(path)?;
        self.hash = hash_path(&self.path, multiplier);
        Ok(())
    }

    /// Recompute the hash for another multiplier
    pub(crate) fn rehash(&mut self, multiplier: u32) {
        self.hash = hash_path(&self.path, multiplier);
    }

    /// Sort key used by the node index
    pub(crate) fn sort_key(&self) -> (u32, &str) {
        (self.hash, &self.path)
    }
}

impl std::fmt::Debug for SarcEntry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SarcEntry")
            .field("path", &self.path)
            .field("hash", &format_args!("{:#010x}", self.hash))
            .field("len", &self.data.len())
            .finish()
    }
}
