//! Whole-container zlib compression
//!
//! Compressed containers are framed as a 4-byte big-endian uncompressed
//! length followed by a zlib stream:
//!
//! ```text
//! [u32 BE decompressed size][zlib stream ...]
//! ```

use flate2::Compression;
use flate2::read::{ZlibDecoder, ZlibEncoder};
use std::io::Read;
use thiserror::Error;

/// Maximum allowed decompression size (256 MB)
///
/// Limits decompression output so a forged size prefix or a compression bomb
/// cannot exhaust memory.
pub const MAX_DECOMPRESSION_SIZE: usize = 256 * 1024 * 1024;

/// Highest supported zlib level
pub const MAX_LEVEL: u32 = 9;

/// Default zlib level
pub const DEFAULT_LEVEL: u32 = 6;

/// Size of the uncompressed length prefix
pub const SIZE_PREFIX_LEN: usize = 4;

/// Compression layer errors
#[derive(Debug, Error)]
pub enum CompressionError {
    /// Input is not a valid compressed container
    #[error("corrupt compressed stream: {0}")]
    CorruptStream(String),

    /// Compression level outside `0..=9`
    #[error("invalid compression level {0} (expected 0-{MAX_LEVEL})")]
    InvalidLevel(u32),

    /// Input too large to be described by the size prefix
    #[error("input of {0} bytes is too large to compress")]
    InputTooLarge(usize),
}

/// Result type for compression operations
pub type CompressionResult<T> = Result<T, CompressionError>;

/// Compression settings threaded into archive builds
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CompressionSettings {
    level: u32,
}

impl CompressionSettings {
    /// Create settings for the given zlib level
    pub const fn new(level: u32) -> CompressionResult<Self> {
        if level > MAX_LEVEL {
            return Err(CompressionError::InvalidLevel(level));
        }
        Ok(Self { level })
    }

    /// The zlib level
    pub const fn level(self) -> u32 {
        self.level
    }
}

impl Default for CompressionSettings {
    fn default() -> Self {
        Self {
            level: DEFAULT_LEVEL,
        }
    }
}

/// Compress `data` at `level`, prefixing the uncompressed length
pub fn compress(data: &[u8], level: u32) -> CompressionResult<Vec<u8>> {
    let settings = CompressionSettings::new(level)?;
    let size = u32::try_from(data.len()).map_err(|_| CompressionError::InputTooLarge(data.len()))?;

    let mut output = Vec::with_capacity(SIZE_PREFIX_LEN + data.len() / 2);
    output.extend_from_slice(&size.to_be_bytes());

    let mut encoder = ZlibEncoder::new(data, Compression::new(settings.level()));
    encoder
        .read_to_end(&mut output)
        .map_err(|e| CompressionError::CorruptStream(format!("zlib compression failed: {e}")))?;

    tracing::trace!(
        input = data.len(),
        output = output.len(),
        level,
        "compressed container"
    );
    Ok(output)
}

/// Decompress a length-prefixed zlib container
pub fn decompress(data: &[u8]) -> CompressionResult<Vec<u8>> {
    let (prefix, stream) = data.split_at_checked(SIZE_PREFIX_LEN).ok_or_else(|| {
        CompressionError::CorruptStream("missing uncompressed size prefix".to_string())
    })?;

    let mut size_bytes = [0u8; SIZE_PREFIX_LEN];
    size_bytes.copy_from_slice(prefix);
    let expected = u32::from_be_bytes(size_bytes) as usize;

    if expected > MAX_DECOMPRESSION_SIZE {
        return Err(CompressionError::CorruptStream(format!(
            "declared size {expected} exceeds limit of {MAX_DECOMPRESSION_SIZE} bytes"
        )));
    }

    let mut decoder = ZlibDecoder::new(stream);
    // Untrusted prefix: reserve at most 4x the stream and grow from there
    let mut decompressed = Vec::with_capacity(expected.min(stream.len().saturating_mul(4)));

    // Read in chunks to enforce the declared size
    let mut buffer = [0u8; 8192];
    loop {
        let bytes_read = decoder
            .read(&mut buffer)
            .map_err(|e| CompressionError::CorruptStream(format!("zlib decompression failed: {e}")))?;

        if bytes_read == 0 {
            break;
        }

        if decompressed.len() + bytes_read > expected {
            return Err(CompressionError::CorruptStream(format!(
                "stream inflates past declared size of {expected} bytes"
            )));
        }

        decompressed.extend_from_slice(&buffer[..bytes_read]);
    }

    if decompressed.len() != expected {
        return Err(CompressionError::CorruptStream(format!(
            "size mismatch: expected {expected}, got {}",
            decompressed.len()
        )));
    }

    Ok(decompressed)
}

/// Check whether `data` looks like a length-prefixed zlib container
///
/// Inspects the zlib header (CMF/FLG) after the size prefix.
pub fn is_compressed(data: &[u8]) -> bool {
    match data.get(SIZE_PREFIX_LEN..SIZE_PREFIX_LEN + 2) {
        Some(&[cmf, flg]) => cmf & 0x0F == 8 && (u16::from(cmf) << 8 | u16::from(flg)) % 31 == 0,
        _ => false,
    }
}
