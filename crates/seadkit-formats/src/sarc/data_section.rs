//! Data section layout and alignment policy
//!
//! Payloads are laid out in node order. Each payload starts on a boundary
//! chosen from its file extension; gaps are filled with zero bytes.

use std::collections::BTreeMap;

use crate::byte_order::align_up;
use crate::sarc::error::{SarcError, SarcResult};

/// Alignment for extensions missing from the table
pub const DEFAULT_ALIGNMENT: usize = 4;

/// Lower bound for the data section's own alignment
pub const MIN_SECTION_ALIGNMENT: usize = 4;

/// Built-in extension alignments
const BUILTIN_ALIGNMENTS: &[(&str, usize)] = &[
    // Textures, models, fonts and nested archives
    ("bflim", 0x2000),
    ("bfres", 0x2000),
    ("bffnt", 0x2000),
    ("sarc", 0x2000),
    ("szs", 0x2000),
    ("pack", 0x2000),
    ("bntx", 0x1000),
    ("bfsha", 0x1000),
    // Audio
    ("bars", 0x80),
    ("bfstm", 0x80),
    ("bfwav", 0x80),
    ("bcstm", 0x80),
    ("bcwav", 0x80),
    ("bfsar", 0x20),
    ("bfgrp", 0x20),
    // Message and parameter data
    ("msbt", 8),
    ("msbp", 8),
    ("byml", 8),
    ("bgyml", 8),
    ("bin", 8),
];

fn validate_alignment(alignment: usize) -> SarcResult<usize> {
    if alignment == 0 || !alignment.is_power_of_two() {
        return Err(SarcError::InvalidAlignment(alignment));
    }
    Ok(alignment)
}

/// Extension of a path's final component, if any
pub fn extension(path: &str) -> Option<&str> {
    let file_name = path.rsplit('/').next().unwrap_or(path);
    file_name
        .rsplit_once('.')
        .map(|(_, ext)| ext)
        .filter(|ext| !ext.is_empty())
}

/// Case-insensitive mapping from file extension to payload alignment
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AlignmentTable {
    overrides: BTreeMap<String, usize>,
    default: usize,
}

impl AlignmentTable {
    /// Table with the built-in alignments
    pub fn new() -> Self {
        Self {
            overrides: BTreeMap::new(),
            default: DEFAULT_ALIGNMENT,
        }
    }

    /// Set the alignment for an extension (without the leading dot)
    pub fn with_override(mut self, extension: &str, alignment: usize) -> SarcResult<Self> {
        let alignment = validate_alignment(alignment)?;
        let key = extension.trim_start_matches('.').to_ascii_lowercase();
        self.overrides.insert(key, alignment);
        Ok(self)
    }

    /// Set the alignment used for unknown extensions
    pub fn with_default(mut self, alignment: usize) -> SarcResult<Self> {
        self.default = validate_alignment(alignment)?;
        Ok(self)
    }

    /// Alignment for the given path
    pub fn alignment_for(&self, path: &str) -> usize {
        let Some(ext) = extension(path) else {
            return self.default;
        };
        let ext = ext.to_ascii_lowercase();

        if let Some(&alignment) = self.overrides.get(&ext) {
            return alignment;
        }

        BUILTIN_ALIGNMENTS
            .iter()
            .find(|(known, _)| *known == ext)
            .map_or(self.default, |&(_, alignment)| alignment)
    }
}

impl Default for AlignmentTable {
    fn default() -> Self {
        Self::new()
    }
}

/// Placement of one payload within the data section
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DataSlot {
    /// Offset relative to the data section start
    pub offset: usize,
    /// Payload length
    pub length: usize,
    /// Alignment the offset satisfies
    pub alignment: usize,
}

impl DataSlot {
    /// Offset one past the payload's last byte
    pub fn end(&self) -> usize {
        self.offset + self.length
    }
}

/// Layout of the whole data section
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DataLayout {
    /// One slot per payload, in input order
    pub slots: Vec<DataSlot>,
    /// Alignment of the section start and of the archive's total length
    pub section_alignment: usize,
    /// Unpadded length of the payload bytes
    pub content_len: usize,
}

impl DataLayout {
    /// Compute the layout for `(path, payload length)` pairs already in
    /// node order
    pub fn compute<'a, I>(entries: I, table: &AlignmentTable) -> Self
    where
        I: IntoIterator<Item = (&'a str, usize)>,
    {
        let mut slots = Vec::new();
        let mut cursor = 0usize;
        let mut section_alignment = MIN_SECTION_ALIGNMENT;

        for (path, length) in entries {
            let alignment = table.alignment_for(path);
            section_alignment = section_alignment.max(alignment);

            let offset = align_up(cursor, alignment);
            slots.push(DataSlot {
                offset,
                length,
                alignment,
            });
            cursor = offset + length;
        }

        Self {
            slots,
            section_alignment,
            content_len: cursor,
        }
    }

    /// Absolute data section start for a given end of the name table
    pub fn section_start(&self, names_end: usize) -> usize {
        align_up(names_end, self.section_alignment)
    }

    /// Total archive length given the data section start
    pub fn total_len(&self, section_start: usize) -> usize {
        align_up(section_start + self.content_len, self.section_alignment)
    }

    /// Write the payloads into `out`, which must end at the section start
    pub fn write_payloads<'a, I>(&self, out: &mut Vec<u8>, payloads: I)
    where
        I: IntoIterator<Item = &'a [u8]>,
    {
        let section_start = out.len();
        for (slot, payload) in self.slots.iter().zip(payloads) {
            out.resize(section_start + slot.offset, 0);
            out.extend_from_slice(payload);
        }
        out.resize(self.total_len(section_start), 0);
    }
}

#[cfg(test)]
#[allow(clippy::expect_used, clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_extension() {
        assert_eq!(extension("a/b/c.bflim"), Some("bflim"));
        assert_eq!(extension("archive.tar.gz"), Some("gz"));
        assert_eq!(extension("dir.d/file"), None);
        assert_eq!(extension("trailing."), None);
        assert_eq!(extension(".hidden"), Some("hidden"));
    }

    #[test]
    fn test_builtin_lookup_is_case_insensitive() {
        let table = AlignmentTable::new();
        assert_eq!(table.alignment_for("Tex/Button.bflim"), 0x2000);
        assert_eq!(table.alignment_for("Tex/Button.BFLIM"), 0x2000);
        assert_eq!(table.alignment_for("Message/Menu.msbt"), 8);
        assert_eq!(table.alignment_for("readme.txt"), DEFAULT_ALIGNMENT);
        assert_eq!(table.alignment_for("no_extension"), DEFAULT_ALIGNMENT);
    }

    #[test]
    fn test_overrides() {
        let table = AlignmentTable::new()
            .with_override(".TXT", 0x100)
            .unwrap()
            .with_override("bflim", 0x80)
            .unwrap()
            .with_default(16)
            .unwrap();
        assert_eq!(table.alignment_for("a.txt"), 0x100);
        assert_eq!(table.alignment_for("a.bflim"), 0x80);
        assert_eq!(table.alignment_for("a.unknown"), 16);

        assert!(matches!(
            AlignmentTable::new().with_override("txt", 3),
            Err(SarcError::InvalidAlignment(3))
        ));
        assert!(AlignmentTable::new().with_default(0).is_err());
    }

    #[test]
    fn test_layout_aligns_each_entry() {
        let table = AlignmentTable::new();
        let layout = DataLayout::compute(
            [("a.txt", 5), ("b.bflim", 3), ("c.msbt", 1)],
            &table,
        );

        assert_eq!(layout.slots[0].offset, 0);
        assert_eq!(layout.slots[1].offset, 0x2000);
        assert_eq!(layout.slots[2].offset, 0x2008);
        assert_eq!(layout.content_len, 0x2009);
        assert_eq!(layout.section_alignment, 0x2000);

        for slot in &layout.slots {
            assert_eq!(slot.offset % slot.alignment, 0);
        }
    }

    #[test]
    fn test_empty_layout() {
        let layout = DataLayout::compute(std::iter::empty(), &AlignmentTable::new());
        assert!(layout.slots.is_empty());
        assert_eq!(layout.section_alignment, MIN_SECTION_ALIGNMENT);
        assert_eq!(layout.section_start(0x28), 0x28);
        assert_eq!(layout.total_len(0x28), 0x28);
    }

    #[test]
    fn test_write_payloads_pads_with_zeroes() {
        let layout = DataLayout::compute([("a.txt", 2), ("b.txt", 3)], &AlignmentTable::new());
        let mut out = vec![0xAA; 4];
        layout.write_payloads(&mut out, [&b"xy"[..], &b"abc"[..]]);

        assert_eq!(out, [0xAA, 0xAA, 0xAA, 0xAA, b'x', b'y', 0, 0, b'a', b'b', b'c', 0]);
    }
}
