//! SARC (SEAD archive) format implementation
//!
//! SARC bundles named files into a single container with a hash-sorted
//! index. All multi-byte fields share one byte order, detected from the
//! byte-order mark when parsing.
//!
//! # Layout
//!
//! ```text
//! 0x00  SARC header   magic, header size, BOM, file size, data offset, version
//! 0x14  SFAT header   magic, header size, node count, hash multiplier
//! 0x20  SFAT nodes    node count x 16 bytes, sorted by (hash, name)
//!       SFNT header   magic, header size
//!       name table    NUL-terminated names, each padded to 4 bytes
//!       padding       up to the data section alignment
//!       data section  payloads, each aligned by file extension
//!       padding       up to the data section alignment
//! ```
//!
//! # Features
//!
//! - Zero-copy [`SarcView`] and owning [`SarcArchive`]
//! - Little and big endian archives
//! - Collision-safe lookup by `(hash, name)`
//! - Extension-driven payload alignment with overrides
//! - Optional whole-archive zlib compression
//! - Bit-exact round trip for archives built with the same options

mod archive;
mod builder;
mod data_section;
mod entry;
mod error;
mod hash;
mod header;
mod name_table;
mod node_index;
mod view;

pub use archive::SarcArchive;
pub use builder::{BuildOptions, SarcBuilder, build};
pub use data_section::{
    AlignmentTable, DEFAULT_ALIGNMENT, DataLayout, DataSlot, MIN_SECTION_ALIGNMENT, extension,
};
pub use entry::{SarcEntry, normalize_path};
pub use error::{SarcError, SarcResult};
pub use hash::{DEFAULT_HASH_MULTIPLIER, hash_bytes, hash_path};
pub use header::{
    NODES_OFFSET, SARC_HEADER_LEN, SARC_MAGIC, SARC_VERSION, SFAT_HEADER_LEN, SFAT_MAGIC,
    SFNT_HEADER_LEN, SFNT_MAGIC, SarcHeader, SfatHeader, SfntHeader,
};
pub use name_table::{NAME_ALIGNMENT, NameTable, read_name};
pub use node_index::{NODE_LEN, NodeIndex, NodeRecord, SfatNode};
pub use view::SarcView;
