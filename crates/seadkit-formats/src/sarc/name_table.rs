//! SFNT filename table
//!
//! Names are stored NUL-terminated in node order, each padded to a 4-byte
//! boundary so the node attributes can address them in words.

use crate::byte_order::align_up;
use crate::sarc::error::{SarcError, SarcResult};

/// Alignment of every name in the table
pub const NAME_ALIGNMENT: usize = 4;

/// Serialized filename table
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NameTable {
    bytes: Vec<u8>,
    offsets: Vec<u32>,
}

impl NameTable {
    /// Serialize `paths` in the given order
    pub fn serialize<'a, I>(paths: I) -> Self
    where
        I: IntoIterator<Item = &'a str>,
    {
        let mut bytes = Vec::new();
        let mut offsets = Vec::new();

        for path in paths {
            offsets.push(bytes.len() as u32);
            bytes.extend_from_slice(path.as_bytes());
            bytes.push(0);
            bytes.resize(align_up(bytes.len(), NAME_ALIGNMENT), 0);
        }

        Self { bytes, offsets }
    }

    /// Table bytes, including padding
    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes
    }

    /// Byte offset of each name, in serialization order
    pub fn offsets(&self) -> &[u32] {
        &self.offsets
    }

    /// Serialized length in bytes
    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    /// Whether the table holds no names
    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }
}

/// Read the NUL-terminated name starting at `offset` within `table`
pub fn read_name(table: &[u8], offset: usize) -> SarcResult<&str> {
    let tail = table
        .get(offset..)
        .ok_or_else(|| SarcError::truncated("name offset", offset as u64 + 1, table.len()))?;

    let end = tail.iter().position(|&b| b == 0).ok_or_else(|| {
        SarcError::truncated("name terminator", table.len() as u64 + 1, table.len())
    })?;

    std::str::from_utf8(&tail[..end]).map_err(|_| SarcError::InvalidPath {
        path: String::from_utf8_lossy(&tail[..end]).into_owned(),
        reason: "name is not valid UTF-8",
    })
}

#[cfg(test)]
#[allow(clippy::expect_used, clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_serialize_pads_each_name() {
        let table = NameTable::serialize(["a.txt", "dir/bc.bin", "xyz"]);
        assert_eq!(table.offsets(), &[0, 8, 20]);
        assert_eq!(table.len(), 24);
        assert_eq!(&table.as_bytes()[0..8], b"a.txt\0\0\0");
        assert_eq!(&table.as_bytes()[20..24], b"xyz\0");
    }

    #[test]
    fn test_read_back() {
        let table = NameTable::serialize(["first", "second/file.msbt"]);
        for (offset, expected) in table.offsets().iter().zip(["first", "second/file.msbt"]) {
            assert_eq!(read_name(table.as_bytes(), *offset as usize).unwrap(), expected);
        }
    }

    #[test]
    fn test_empty_table() {
        let table = NameTable::serialize(std::iter::empty());
        assert!(table.is_empty());
        assert!(table.offsets().is_empty());
    }

    #[test]
    fn test_missing_terminator() {
        assert!(read_name(b"abc", 0).unwrap_err().is_truncated());
        assert!(read_name(b"abc\0", 8).unwrap_err().is_truncated());
    }

    #[test]
    fn test_invalid_utf8() {
        assert!(matches!(
            read_name(b"\xFF\xFE\0", 0),
            Err(SarcError::InvalidPath { .. })
        ));
    }
}
