//! SARC, SFAT and SFNT header structures

use binrw::{BinRead, BinWrite};
use std::io::Cursor;

use crate::byte_order::{BOM, ByteOrder};
use crate::sarc::error::{SarcError, SarcResult};

/// SARC magic bytes
pub const SARC_MAGIC: [u8; 4] = *b"SARC";
/// SFAT magic bytes
pub const SFAT_MAGIC: [u8; 4] = *b"SFAT";
/// SFNT magic bytes
pub const SFNT_MAGIC: [u8; 4] = *b"SFNT";

/// Size of the SARC header
pub const SARC_HEADER_LEN: usize = 0x14;
/// Size of the SFAT header
pub const SFAT_HEADER_LEN: usize = 0x0C;
/// Size of the SFNT header
pub const SFNT_HEADER_LEN: usize = 0x08;
/// Offset of the first SFAT node
pub const NODES_OFFSET: usize = SARC_HEADER_LEN + SFAT_HEADER_LEN;

/// Only supported format version
pub const SARC_VERSION: u16 = 0x0100;

/// SARC file header (0x14 bytes)
#[derive(Debug, Clone, PartialEq, Eq, BinRead, BinWrite)]
pub struct SarcHeader {
    /// Magic bytes: "SARC"
    pub magic: [u8; 4],
    /// Header size (0x14)
    pub header_size: u16,
    /// Byte-order mark, 0xFEFF when read in the archive's byte order
    pub bom: u16,
    /// Total archive length in bytes
    pub file_size: u32,
    /// Absolute offset of the data section
    pub data_offset: u32,
    /// Format version (0x0100)
    pub version: u16,
    /// Reserved, zero
    pub reserved: u16,
}

impl SarcHeader {
    /// Create a header for an archive of `file_size` bytes
    pub fn new(file_size: u32, data_offset: u32) -> Self {
        Self {
            magic: SARC_MAGIC,
            header_size: SARC_HEADER_LEN as u16,
            bom: BOM,
            file_size,
            data_offset,
            version: SARC_VERSION,
            reserved: 0,
        }
    }

    /// Validate the header size and version
    pub fn validate(&self) -> SarcResult<()> {
        check_magic("SARC", SARC_MAGIC, self.magic)?;
        check_header_size("SARC", SARC_HEADER_LEN, self.header_size)?;
        if self.version != SARC_VERSION {
            return Err(SarcError::UnsupportedVersion(self.version));
        }
        Ok(())
    }
}

/// SFAT (file allocation table) header (0x0C bytes)
#[derive(Debug, Clone, PartialEq, Eq, BinRead, BinWrite)]
pub struct SfatHeader {
    /// Magic bytes: "SFAT"
    pub magic: [u8; 4],
    /// Header size (0x0C)
    pub header_size: u16,
    /// Number of nodes that follow
    pub node_count: u16,
    /// Multiplier used for filename hashes
    pub hash_multiplier: u32,
}

impl SfatHeader {
    /// Create an SFAT header
    pub fn new(node_count: u16, hash_multiplier: u32) -> Self {
        Self {
            magic: SFAT_MAGIC,
            header_size: SFAT_HEADER_LEN as u16,
            node_count,
            hash_multiplier,
        }
    }

    /// Validate magic and header size
    pub fn validate(&self) -> SarcResult<()> {
        check_magic("SFAT", SFAT_MAGIC, self.magic)?;
        check_header_size("SFAT", SFAT_HEADER_LEN, self.header_size)
    }
}

/// SFNT (filename table) header (0x08 bytes)
#[derive(Debug, Clone, PartialEq, Eq, BinRead, BinWrite)]
pub struct SfntHeader {
    /// Magic bytes: "SFNT"
    pub magic: [u8; 4],
    /// Header size (0x08)
    pub header_size: u16,
    /// Reserved, zero
    pub reserved: u16,
}

impl SfntHeader {
    /// Create an SFNT header
    pub fn new() -> Self {
        Self {
            magic: SFNT_MAGIC,
            header_size: SFNT_HEADER_LEN as u16,
            reserved: 0,
        }
    }

    /// Validate magic and header size
    pub fn validate(&self) -> SarcResult<()> {
        check_magic("SFNT", SFNT_MAGIC, self.magic)?;
        check_header_size("SFNT", SFNT_HEADER_LEN, self.header_size)
    }
}

impl Default for SfntHeader {
    fn default() -> Self {
        Self::new()
    }
}

fn check_magic(section: &'static str, expected: [u8; 4], actual: [u8; 4]) -> SarcResult<()> {
    if actual != expected {
        return Err(SarcError::BadMagic {
            section,
            expected,
            actual,
        });
    }
    Ok(())
}

fn check_header_size(section: &'static str, expected: usize, actual: u16) -> SarcResult<()> {
    if usize::from(actual) != expected {
        return Err(SarcError::InvalidHeaderSize {
            section,
            expected: expected as u16,
            actual,
        });
    }
    Ok(())
}

/// Read a fixed-size record at `offset`
///
/// Callers check bounds first so short buffers surface as
/// [`SarcError::Truncated`] rather than binrw EOF errors.
pub(crate) fn read_at<T>(bytes: &[u8], offset: usize, order: ByteOrder) -> SarcResult<T>
where
    T: for<'a> BinRead<Args<'a> = ()>,
{
    let mut cursor = Cursor::new(bytes);
    cursor.set_position(offset as u64);
    Ok(T::read_options(&mut cursor, order.into(), ())?)
}

/// Append a fixed-size record to `out`
pub(crate) fn write_to<T>(value: &T, out: &mut Vec<u8>, order: ByteOrder) -> SarcResult<()>
where
    T: for<'a> BinWrite<Args<'a> = ()>,
{
    let position = out.len() as u64;
    let mut cursor = Cursor::new(out);
    cursor.set_position(position);
    value.write_options(&mut cursor, order.into(), ())?;
    Ok(())
}
