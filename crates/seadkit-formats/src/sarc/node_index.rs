//! SFAT node index
//!
//! One 16-byte node per entry, sorted by `(hash, name)` so lookups can
//! binary search on the hash and disambiguate collisions by name.

use binrw::{BinRead, BinWrite};

use crate::sarc::data_section::{AlignmentTable, DataLayout};
use crate::sarc::entry::SarcEntry;
use crate::sarc::error::{SarcError, SarcResult};
use crate::sarc::hash::hash_path;
use crate::sarc::name_table::{NAME_ALIGNMENT, NameTable, read_name};

/// Size of one SFAT node
pub const NODE_LEN: usize = 0x10;

/// Attribute flag marking a node with a name table entry
pub const NAME_PRESENT_FLAG: u32 = 0x0100_0000;

/// Mask for the name table word offset inside the attributes
pub const NAME_OFFSET_MASK: u32 = 0x00FF_FFFF;

/// On-disk SFAT node (0x10 bytes)
#[derive(Debug, Clone, Copy, PartialEq, Eq, BinRead, BinWrite)]
pub struct SfatNode {
    /// Filename hash
    pub name_hash: u32,
    /// `0x01000000 | (name_offset / 4)`, or 0 for unnamed nodes
    pub name_attributes: u32,
    /// Payload start, relative to the data section
    pub data_begin: u32,
    /// Payload end (exclusive), relative to the data section
    pub data_end: u32,
}

/// Decoded node index record
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NodeRecord {
    /// Filename hash
    pub hash: u32,
    /// Byte offset of the name within the name table
    pub name_offset: u32,
    /// Payload offset relative to the data section
    pub data_offset: u32,
    /// Payload length
    pub data_length: u32,
}

impl NodeRecord {
    /// Decode an on-disk node
    pub fn from_node(node: &SfatNode) -> SarcResult<Self> {
        if node.name_attributes & NAME_PRESENT_FLAG == 0 {
            return Err(SarcError::UnnamedEntry(node.name_hash));
        }
        if node.data_end < node.data_begin {
            return Err(SarcError::InvalidDataRange {
                hash: node.name_hash,
                begin: node.data_begin,
                end: node.data_end,
            });
        }

        Ok(Self {
            hash: node.name_hash,
            name_offset: (node.name_attributes & NAME_OFFSET_MASK) * NAME_ALIGNMENT as u32,
            data_offset: node.data_begin,
            data_length: node.data_end - node.data_begin,
        })
    }

    /// Encode as an on-disk node
    pub fn to_node(&self) -> SfatNode {
        SfatNode {
            name_hash: self.hash,
            name_attributes: NAME_PRESENT_FLAG | (self.name_offset / NAME_ALIGNMENT as u32),
            data_begin: self.data_offset,
            data_end: self.data_offset + self.data_length,
        }
    }

    /// Payload end offset relative to the data section
    pub fn data_end(&self) -> u64 {
        u64::from(self.data_offset) + u64::from(self.data_length)
    }
}

/// Node index built from a set of entries, with the derived name table and
/// data layout
#[derive(Debug, Clone)]
pub struct NodeIndex {
    /// Input positions in node order
    pub order: Vec<usize>,
    /// One record per entry, in node order
    pub records: Vec<NodeRecord>,
    /// Serialized name table
    pub names: NameTable,
    /// Data section layout
    pub layout: DataLayout,
}

impl NodeIndex {
    /// Sort `entries` by `(hash, path)` and lay out names and payloads
    pub fn build(
        entries: &[SarcEntry],
        multiplier: u32,
        alignment: &AlignmentTable,
    ) -> SarcResult<Self> {
        if entries.len() > usize::from(u16::MAX) {
            return Err(SarcError::TooManyEntries(entries.len()));
        }

        let hashes: Vec<u32> = entries
            .iter()
            .map(|entry| hash_path(entry.path(), multiplier))
            .collect();

        let mut order: Vec<usize> = (0..entries.len()).collect();
        order.sort_by(|&a, &b| {
            (hashes[a], entries[a].path()).cmp(&(hashes[b], entries[b].path()))
        });

        // Equal paths hash equally, so duplicates end up adjacent
        if let Some(pair) = order
            .windows(2)
            .find(|pair| entries[pair[0]].path() == entries[pair[1]].path())
        {
            return Err(SarcError::DuplicateEntry(entries[pair[0]].path().to_string()));
        }

        let names = NameTable::serialize(order.iter().map(|&i| entries[i].path()));
        if names.len() / NAME_ALIGNMENT > NAME_OFFSET_MASK as usize {
            return Err(SarcError::ArchiveTooLarge(names.len() as u64));
        }

        let layout = DataLayout::compute(
            order.iter().map(|&i| (entries[i].path(), entries[i].len())),
            alignment,
        );

        let records = order
            .iter()
            .zip(names.offsets())
            .zip(&layout.slots)
            .map(|((&i, &name_offset), slot)| -> SarcResult<NodeRecord> {
                let too_large = || SarcError::ArchiveTooLarge(slot.end() as u64);
                Ok(NodeRecord {
                    hash: hashes[i],
                    name_offset,
                    data_offset: u32::try_from(slot.offset).map_err(|_| too_large())?,
                    data_length: u32::try_from(slot.length).map_err(|_| too_large())?,
                })
            })
            .collect::<SarcResult<Vec<_>>>()?;

        Ok(Self {
            order,
            records,
            names,
            layout,
        })
    }

    /// Find the record for `target_path`
    ///
    /// Binary searches to the first record with `target_hash`, then compares
    /// names across the run of equal hashes. Returns the record's position.
    pub fn lookup(
        records: &[NodeRecord],
        target_hash: u32,
        name_table: &[u8],
        target_path: &str,
    ) -> SarcResult<usize> {
        let start = records.partition_point(|record| record.hash < target_hash);

        for (position, record) in records.iter().enumerate().skip(start) {
            if record.hash != target_hash {
                break;
            }
            if read_name(name_table, record.name_offset as usize)? == target_path {
                return Ok(position);
            }
        }

        Err(SarcError::NotFound(target_path.to_string()))
    }

    /// Check that `names` (one per record) are ordered by `(hash, name)`
    pub fn verify_sorted(records: &[NodeRecord], names: &[&str]) -> SarcResult<()> {
        let keys: Vec<(u32, &str)> = records
            .iter()
            .zip(names)
            .map(|(record, name)| (record.hash, *name))
            .collect();

        match keys.windows(2).position(|pair| pair[0] >= pair[1]) {
            Some(position) => Err(SarcError::UnsortedIndex(position + 1)),
            None => Ok(()),
        }
    }
}

#[cfg(test)]
#[allow(clippy::expect_used, clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::sarc::hash::DEFAULT_HASH_MULTIPLIER;

    fn entries(paths: &[&str]) -> Vec<SarcEntry> {
        paths
            .iter()
            .map(|path| SarcEntry::new(path, path.as_bytes().to_vec()).unwrap())
            .collect()
    }

    #[test]
    fn test_node_encoding() {
        let record = NodeRecord {
            hash: 0x1234_5678,
            name_offset: 0x20,
            data_offset: 0x100,
            data_length: 0x10,
        };
        let node = record.to_node();
        assert_eq!(node.name_attributes, 0x0100_0008);
        assert_eq!(node.data_end, 0x110);
        assert_eq!(NodeRecord::from_node(&node).unwrap(), record);
        assert_eq!(record.data_end(), 0x110);
    }

    #[test]
    fn test_unnamed_and_inverted_nodes() {
        let unnamed = SfatNode {
            name_hash: 7,
            name_attributes: 0,
            data_begin: 0,
            data_end: 0,
        };
        assert!(matches!(
            NodeRecord::from_node(&unnamed),
            Err(SarcError::UnnamedEntry(7))
        ));

        let inverted = SfatNode {
            name_hash: 7,
            name_attributes: NAME_PRESENT_FLAG,
            data_begin: 8,
            data_end: 4,
        };
        let err = NodeRecord::from_node(&inverted).unwrap_err();
        assert!(matches!(
            err,
            SarcError::InvalidDataRange {
                hash: 7,
                begin: 8,
                end: 4
            }
        ));
        assert!(err.is_format_error());
        assert!(!err.is_truncated());
    }

    #[test]
    fn test_build_sorts_by_hash() {
        let input = entries(&["zeta.txt", "alpha.txt", "dir/mid.bin"]);
        let index = NodeIndex::build(&input, DEFAULT_HASH_MULTIPLIER, &AlignmentTable::new())
            .unwrap();

        assert!(index.records.windows(2).all(|w| w[0].hash < w[1].hash));
        for (record, &i) in index.records.iter().zip(&index.order) {
            assert_eq!(record.hash, input[i].hash());
            assert_eq!(
                read_name(index.names.as_bytes(), record.name_offset as usize).unwrap(),
                input[i].path()
            );
            assert_eq!(record.data_length as usize, input[i].len());
        }
    }

    #[test]
    fn test_build_rejects_duplicates() {
        let input = entries(&["a.txt", "b.txt", "a.txt"]);
        assert!(matches!(
            NodeIndex::build(&input, DEFAULT_HASH_MULTIPLIER, &AlignmentTable::new()),
            Err(SarcError::DuplicateEntry(path)) if path == "a.txt"
        ));
    }

    #[test]
    fn test_collisions_ordered_by_path_and_resolved_by_name() {
        // Multiplier 1 makes the hash a byte sum, so these three collide
        let input: Vec<SarcEntry> = ["ba", "ab", "c`"]
            .iter()
            .map(|p| SarcEntry::with_multiplier(p, p.as_bytes().to_vec(), 1).unwrap())
            .collect();
        let index = NodeIndex::build(&input, 1, &AlignmentTable::new()).unwrap();

        let names: Vec<&str> = index
            .records
            .iter()
            .map(|r| read_name(index.names.as_bytes(), r.name_offset as usize).unwrap())
            .collect();
        assert_eq!(names, ["ab", "ba", "c`"]);
        NodeIndex::verify_sorted(&index.records, &names).unwrap();

        let hash = hash_path("ba", 1);
        for (expected, path) in names.iter().enumerate() {
            let found =
                NodeIndex::lookup(&index.records, hash, index.names.as_bytes(), path).unwrap();
            assert_eq!(found, expected);
        }

        assert!(matches!(
            NodeIndex::lookup(&index.records, hash, index.names.as_bytes(), "zz"),
            Err(SarcError::NotFound(_))
        ));
    }

    #[test]
    fn test_empty_index() {
        let index =
            NodeIndex::build(&[], DEFAULT_HASH_MULTIPLIER, &AlignmentTable::new()).unwrap();
        assert!(index.records.is_empty());
        assert!(index.names.is_empty());
        assert!(matches!(
            NodeIndex::lookup(&index.records, 0, index.names.as_bytes(), "a"),
            Err(SarcError::NotFound(_))
        ));
    }

    #[test]
    fn test_verify_sorted_detects_disorder() {
        let record = |hash| NodeRecord {
            hash,
            name_offset: 0,
            data_offset: 0,
            data_length: 0,
        };
        let records = [record(1), record(3), record(2)];
        assert!(matches!(
            NodeIndex::verify_sorted(&records, &["a", "b", "c"]),
            Err(SarcError::UnsortedIndex(2))
        ));

        let records = [record(1), record(1)];
        assert!(NodeIndex::verify_sorted(&records, &["b", "a"]).is_err());
        assert!(NodeIndex::verify_sorted(&records, &["a", "a"]).is_err());
        assert!(NodeIndex::verify_sorted(&records, &["a", "b"]).is_ok());
    }
}
