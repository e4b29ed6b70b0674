//! Error types for SARC operations

use thiserror::Error;

use crate::byte_order::ByteOrderError;
use crate::compression::CompressionError;

/// SARC operation result type
pub type SarcResult<T> = Result<T, SarcError>;

/// Errors raised while parsing or building SARC archives
#[derive(Debug, Error)]
pub enum SarcError {
    /// Section magic did not match
    #[error("invalid {section} magic: expected {expected:02X?}, got {actual:02X?}")]
    BadMagic {
        /// Section being validated (`SARC`, `SFAT` or `SFNT`)
        section: &'static str,
        /// Expected magic bytes
        expected: [u8; 4],
        /// Magic bytes found
        actual: [u8; 4],
    },

    /// Version field is not supported
    #[error("unsupported SARC version: 0x{0:04X}")]
    UnsupportedVersion(u16),

    /// Byte-order mark matches neither known value
    #[error("unknown byte-order mark: 0x{0:04X}")]
    UnknownByteOrder(u16),

    /// A declared offset or length lies beyond the buffer
    #[error("truncated archive: {context} needs {needed} bytes, buffer has {available}")]
    Truncated {
        /// What was being read
        context: &'static str,
        /// Bytes required
        needed: u64,
        /// Bytes available
        available: u64,
    },

    /// Node payload range ends before it begins
    #[error("invalid data range for node 0x{hash:08X}: 0x{begin:X}..0x{end:X}")]
    InvalidDataRange {
        /// Hash of the offending node
        hash: u32,
        /// Start offset within the data section
        begin: u32,
        /// End offset within the data section
        end: u32,
    },

    /// Header size field has an unexpected value
    #[error("invalid {section} header size: expected 0x{expected:X}, got 0x{actual:X}")]
    InvalidHeaderSize {
        /// Section being validated
        section: &'static str,
        /// Expected header size
        expected: u16,
        /// Header size found
        actual: u16,
    },

    /// Data section offset lies outside the archive
    #[error("invalid data offset 0x{offset:X}: must lie within 0x{min:X}..=0x{max:X}")]
    InvalidDataOffset {
        /// Data offset from the header
        offset: u64,
        /// End of the filename table header
        min: u64,
        /// Total archive length
        max: u64,
    },

    /// Two entries share the same path
    #[error("duplicate entry: {0}")]
    DuplicateEntry(String),

    /// No entry with the requested path
    #[error("entry not found: {0}")]
    NotFound(String),

    /// Path is empty, contains a NUL byte, escapes its root, or is not UTF-8
    #[error("invalid path {path:?}: {reason}")]
    InvalidPath {
        /// The offending path (lossy for non-UTF-8 names)
        path: String,
        /// Why it was rejected
        reason: &'static str,
    },

    /// Alignment is zero or not a power of two
    #[error("invalid alignment {0:#x}: must be a non-zero power of two")]
    InvalidAlignment(usize),

    /// More entries than the node count field can hold
    #[error("too many entries: {0} (maximum 65535)")]
    TooManyEntries(usize),

    /// Serialized archive would not fit 32-bit offsets
    #[error("archive too large: {0} bytes exceeds 32-bit offsets")]
    ArchiveTooLarge(u64),

    /// Node index is not ordered by `(hash, name)`
    #[error("node index not sorted at record {0}")]
    UnsortedIndex(usize),

    /// Stored hash does not match the hash of the stored name
    #[error("hash mismatch for {path}: stored 0x{stored:08X}, computed 0x{computed:08X}")]
    HashMismatch {
        /// Entry path
        path: String,
        /// Hash stored in the node index
        stored: u32,
        /// Hash computed from the name
        computed: u32,
    },

    /// Node without a name table reference
    #[error("node 0x{0:08X} has no name")]
    UnnamedEntry(u32),

    /// Byte-order codec failure
    #[error("codec error: {0}")]
    Codec(#[from] ByteOrderError),

    /// Compression layer failure
    #[error("compression error: {0}")]
    Compression(#[from] CompressionError),

    /// Binary read/write error
    #[error("binary format error: {0}")]
    BinRw(#[from] binrw::Error),
}

impl SarcError {
    /// Shorthand for a [`SarcError::Truncated`] error
    pub(crate) fn truncated(context: &'static str, needed: u64, available: usize) -> Self {
        Self::Truncated {
            context,
            needed,
            available: available as u64,
        }
    }

    /// Check if this error describes a malformed container
    pub fn is_format_error(&self) -> bool {
        matches!(
            self,
            Self::BadMagic { .. }
                | Self::UnsupportedVersion(_)
                | Self::UnknownByteOrder(_)
                | Self::Truncated { .. }
                | Self::InvalidHeaderSize { .. }
                | Self::InvalidDataOffset { .. }
                | Self::InvalidDataRange { .. }
                | Self::UnsortedIndex(_)
                | Self::HashMismatch { .. }
                | Self::UnnamedEntry(_)
                | Self::Codec(_)
                | Self::BinRw(_)
        ) || self.is_corrupt_stream()
    }

    /// Check if this error was caused by caller-supplied build input
    pub fn is_input_error(&self) -> bool {
        matches!(
            self,
            Self::DuplicateEntry(_)
                | Self::InvalidPath { .. }
                | Self::InvalidAlignment(_)
                | Self::TooManyEntries(_)
                | Self::ArchiveTooLarge(_)
                | Self::Compression(CompressionError::InvalidLevel(_))
        )
    }

    /// Check if the compression layer rejected its input
    pub fn is_corrupt_stream(&self) -> bool {
        matches!(
            self,
            Self::Compression(CompressionError::CorruptStream(_))
        )
    }

    /// Check if this is a truncation error
    pub fn is_truncated(&self) -> bool {
        matches!(self, Self::Truncated { .. })
    }
}

#[cfg(test)]
#[allow(clippy::expect_used, clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_classification() {
        let truncated = SarcError::truncated("header", 20, 8);
        assert!(truncated.is_truncated());
        assert!(truncated.is_format_error());
        assert!(!truncated.is_input_error());

        let duplicate = SarcError::DuplicateEntry("a.txt".to_string());
        assert!(duplicate.is_input_error());
        assert!(!duplicate.is_format_error());

        let corrupt = SarcError::from(CompressionError::CorruptStream("bad".to_string()));
        assert!(corrupt.is_corrupt_stream());
        assert!(corrupt.is_format_error());
    }

    #[test]
    fn test_display() {
        let err = SarcError::BadMagic {
            section: "SARC",
            expected: *b"SARC",
            actual: *b"Yaz0",
        };
        assert_eq!(
            err.to_string(),
            "invalid SARC magic: expected [53, 41, 52, 43], got [59, 61, 7A, 30]"
        );
        assert_eq!(
            SarcError::UnknownByteOrder(0x1234).to_string(),
            "unknown byte-order mark: 0x1234"
        );
    }
}
