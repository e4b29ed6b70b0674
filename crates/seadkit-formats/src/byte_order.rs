//! Byte-order codec for fixed-width integers
//!
//! Every multi-byte field in the supported containers is stored in a single
//! archive-wide byte order. The order is chosen when building and detected
//! from the byte-order mark when parsing.

use thiserror::Error;

/// Byte-order mark value as written in the archive's own byte order
pub const BOM: u16 = 0xFEFF;

/// Errors raised by the byte-order codec
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ByteOrderError {
    /// A read would run past the end of the buffer
    #[error("read of {width} bytes at offset {offset} exceeds buffer of {len} bytes")]
    OutOfBounds {
        /// Offset of the attempted read
        offset: usize,
        /// Width of the attempted read in bytes
        width: usize,
        /// Length of the buffer
        len: usize,
    },
}

/// Byte order of all multi-byte fields in a container
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum ByteOrder {
    /// Big-endian (Wii U and older content)
    Big,
    /// Little-endian (Switch and 3DS content)
    #[default]
    Little,
}

impl ByteOrder {
    /// Detect the byte order from the two BOM bytes interpreted big-endian.
    ///
    /// Returns `None` when the mark matches neither known value.
    pub const fn from_bom(raw: u16) -> Option<Self> {
        match raw {
            0xFEFF => Some(Self::Big),
            0xFFFE => Some(Self::Little),
            _ => None,
        }
    }

    /// The two BOM bytes as they appear on disk for this byte order
    pub const fn bom_bytes(self) -> [u8; 2] {
        match self {
            Self::Big => BOM.to_be_bytes(),
            Self::Little => BOM.to_le_bytes(),
        }
    }

    /// Short lowercase name, used for display and CLI parsing
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Big => "big",
            Self::Little => "little",
        }
    }
}

impl std::fmt::Display for ByteOrder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for ByteOrder {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "big" | "be" => Ok(Self::Big),
            "little" | "le" => Ok(Self::Little),
            other => Err(format!("unknown byte order '{other}' (expected big or little)")),
        }
    }
}

impl From<ByteOrder> for binrw::Endian {
    fn from(order: ByteOrder) -> Self {
        match order {
            ByteOrder::Big => Self::Big,
            ByteOrder::Little => Self::Little,
        }
    }
}

fn window<const N: usize>(buf: &[u8], offset: usize) -> Result<[u8; N], ByteOrderError> {
    let out_of_bounds = || ByteOrderError::OutOfBounds {
        offset,
        width: N,
        len: buf.len(),
    };
    let end = offset.checked_add(N).ok_or_else(out_of_bounds)?;
    buf.get(offset..end)
        .and_then(|bytes| bytes.try_into().ok())
        .ok_or_else(out_of_bounds)
}

/// Read a `u16` at `offset`
pub fn read_u16(buf: &[u8], offset: usize, order: ByteOrder) -> Result<u16, ByteOrderError> {
    let bytes = window::<2>(buf, offset)?;
    Ok(match order {
        ByteOrder::Big => u16::from_be_bytes(bytes),
        ByteOrder::Little => u16::from_le_bytes(bytes),
    })
}

/// Read a `u32` at `offset`
pub fn read_u32(buf: &[u8], offset: usize, order: ByteOrder) -> Result<u32, ByteOrderError> {
    let bytes = window::<4>(buf, offset)?;
    Ok(match order {
        ByteOrder::Big => u32::from_be_bytes(bytes),
        ByteOrder::Little => u32::from_le_bytes(bytes),
    })
}

/// Encode a `u16`
pub const fn write_u16(value: u16, order: ByteOrder) -> [u8; 2] {
    match order {
        ByteOrder::Big => value.to_be_bytes(),
        ByteOrder::Little => value.to_le_bytes(),
    }
}

/// Encode a `u32`
pub const fn write_u32(value: u32, order: ByteOrder) -> [u8; 4] {
    match order {
        ByteOrder::Big => value.to_be_bytes(),
        ByteOrder::Little => value.to_le_bytes(),
    }
}

/// Round `value` up to the next multiple of `alignment` (a power of two)
pub const fn align_up(value: usize, alignment: usize) -> usize {
    (value + alignment - 1) & !(alignment - 1)
}
