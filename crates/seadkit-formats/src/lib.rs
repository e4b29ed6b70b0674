//! Container formats for Nintendo SEAD game assets
//!
#![allow(clippy::cast_possible_truncation)] // Intentional for binary format parsing
#![allow(clippy::cast_lossless)] // Sometimes clearer than From
#![allow(clippy::doc_markdown)] // Format names don't need backticks
#![allow(clippy::module_name_repetitions)] // Clear naming is preferred
#![allow(clippy::return_self_not_must_use)] // Builder patterns
#![allow(clippy::missing_errors_doc)] // Error types document their variants
//! This crate provides symmetric (parser and builder) implementations of the
//! SARC archive container and the zlib wrapper it is commonly shipped in.
//!
//! # Supported Formats
//!
//! - **SARC**: hash-indexed archive of named files, little or big endian
//! - **Compressed SARC**: SARC wrapped in a length-prefixed zlib stream
//!
//! # Design Principles
//!
//! - **Symmetric Operations**: Both parsing and building supported
//! - **Zero-Copy Parsing**: [`sarc::SarcView`] borrows the input buffer
//! - **Type Safety**: Entries carry validated paths and derived hashes
//! - **Round-Trip Guarantee**: build(parse(data)) == data for archives built
//!   with the same options
//!
//! # Example
//!
//! ```
//! use seadkit_formats::byte_order::ByteOrder;
//! use seadkit_formats::sarc::{SarcArchive, SarcBuilder};
//!
//! let mut builder = SarcBuilder::new().with_byte_order(ByteOrder::Big);
//! builder.add_file("Layout/Main.bflyt", vec![0u8; 16])?;
//! let bytes = builder.build()?;
//!
//! let archive = SarcArchive::parse(&bytes)?;
//! assert_eq!(archive.byte_order(), ByteOrder::Big);
//! assert_eq!(archive.len(), 1);
//! # Ok::<(), seadkit_formats::sarc::SarcError>(())
//! ```

#![warn(missing_docs)]

/// Endian-parameterized integer codec shared by every format
pub mod byte_order;
/// Whole-container zlib compression
pub mod compression;
/// SARC archive container
///
/// See the [`sarc`] module for the on-disk layout and usage.
pub mod sarc;

// Test utilities module
#[cfg(test)]
#[allow(clippy::expect_used, clippy::unwrap_used)]
pub(crate) mod test_utils;

/// Common format trait that all formats implement
pub trait SeadFormat: Sized {
    /// Parse from bytes
    fn parse(data: &[u8]) -> Result<Self, Box<dyn std::error::Error>>;

    /// Build to bytes
    fn build(&self) -> Result<Vec<u8>, Box<dyn std::error::Error>>;

    /// Verify round-trip correctness
    fn verify_round_trip(data: &[u8]) -> Result<(), Box<dyn std::error::Error>> {
        let parsed = Self::parse(data)?;
        let rebuilt = parsed.build()?;
        if data != rebuilt.as_slice() {
            return Err("Round-trip verification failed".into());
        }
        Ok(())
    }
}

impl SeadFormat for sarc::SarcArchive {
    fn parse(data: &[u8]) -> Result<Self, Box<dyn std::error::Error>> {
        Ok(Self::parse(data)?)
    }

    fn build(&self) -> Result<Vec<u8>, Box<dyn std::error::Error>> {
        Ok(self.to_bytes()?)
    }
}
