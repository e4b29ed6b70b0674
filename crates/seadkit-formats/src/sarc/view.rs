//! Zero-copy, read-only view over a serialized SARC archive

use crate::byte_order::{ByteOrder, read_u16};
use crate::sarc::error::{SarcError, SarcResult};
use crate::sarc::hash::hash_path;
use crate::sarc::header::{
    NODES_OFFSET, SARC_HEADER_LEN, SARC_MAGIC, SFNT_HEADER_LEN, SarcHeader, SfatHeader,
    SfntHeader, read_at,
};
use crate::sarc::name_table::read_name;
use crate::sarc::node_index::{NODE_LEN, NodeIndex, NodeRecord, SfatNode};

/// Validated view over archive bytes
///
/// Construction checks the whole structure eagerly: headers, node bounds,
/// names, hashes and ordering. Accessors never fail afterwards except for
/// lookup misses.
#[derive(Debug, Clone)]
pub struct SarcView<'a> {
    byte_order: ByteOrder,
    header: SarcHeader,
    hash_multiplier: u32,
    records: Vec<NodeRecord>,
    names: Vec<&'a str>,
    name_table: &'a [u8],
    data: &'a [u8],
}

impl<'a> SarcView<'a> {
    /// Parse and validate `bytes`
    pub fn new(bytes: &'a [u8]) -> SarcResult<Self> {
        let magic = bytes
            .get(..SARC_MAGIC.len())
            .ok_or_else(|| SarcError::truncated("SARC magic", 4, bytes.len()))?;
        if magic != SARC_MAGIC {
            let mut actual = [0u8; 4];
            actual.copy_from_slice(magic);
            return Err(SarcError::BadMagic {
                section: "SARC",
                expected: SARC_MAGIC,
                actual,
            });
        }

        if bytes.len() < SARC_HEADER_LEN {
            return Err(SarcError::truncated(
                "SARC header",
                SARC_HEADER_LEN as u64,
                bytes.len(),
            ));
        }

        let bom = read_u16(bytes, 6, ByteOrder::Big)?;
        let byte_order = ByteOrder::from_bom(bom).ok_or(SarcError::UnknownByteOrder(bom))?;

        let header: SarcHeader = read_at(bytes, 0, byte_order)?;
        header.validate()?;

        let total = header.file_size as usize;
        if total > bytes.len() {
            return Err(SarcError::truncated("archive", u64::from(header.file_size), bytes.len()));
        }
        if total < bytes.len() {
            tracing::debug!(
                declared = total,
                actual = bytes.len(),
                "ignoring bytes past declared archive length"
            );
        }
        let bytes = &bytes[..total];

        if total < NODES_OFFSET {
            return Err(SarcError::truncated("SFAT header", NODES_OFFSET as u64, total));
        }
        let sfat: SfatHeader = read_at(bytes, SARC_HEADER_LEN, byte_order)?;
        sfat.validate()?;

        let node_count = usize::from(sfat.node_count);
        let nodes_end = NODES_OFFSET + node_count * NODE_LEN;
        let names_start = nodes_end + SFNT_HEADER_LEN;
        if names_start > total {
            return Err(SarcError::truncated("node index", names_start as u64, total));
        }

        let records = (0..node_count)
            .map(|i| {
                let node: SfatNode = read_at(bytes, NODES_OFFSET + i * NODE_LEN, byte_order)?;
                NodeRecord::from_node(&node)
            })
            .collect::<SarcResult<Vec<_>>>()?;

        let sfnt: SfntHeader = read_at(bytes, nodes_end, byte_order)?;
        sfnt.validate()?;

        let data_offset = header.data_offset as usize;
        if data_offset < names_start || data_offset > total {
            return Err(SarcError::InvalidDataOffset {
                offset: u64::from(header.data_offset),
                min: names_start as u64,
                max: total as u64,
            });
        }

        let name_table = &bytes[names_start..data_offset];
        let data = &bytes[data_offset..];

        let mut names = Vec::with_capacity(node_count);
        for record in &records {
            if record.data_end() > data.len() as u64 {
                return Err(SarcError::truncated(
                    "node data",
                    data_offset as u64 + record.data_end(),
                    total,
                ));
            }

            let name = read_name(name_table, record.name_offset as usize)?;
            let computed = hash_path(name, sfat.hash_multiplier);
            if computed != record.hash {
                return Err(SarcError::HashMismatch {
                    path: name.to_string(),
                    stored: record.hash,
                    computed,
                });
            }
            names.push(name);
        }

        NodeIndex::verify_sorted(&records, &names)?;

        tracing::debug!(
            byte_order = %byte_order,
            entries = node_count,
            total,
            data_offset,
            "parsed SARC archive"
        );

        Ok(Self {
            byte_order,
            header,
            hash_multiplier: sfat.hash_multiplier,
            records,
            names,
            name_table,
            data,
        })
    }

    /// Byte order of the archive
    pub fn byte_order(&self) -> ByteOrder {
        self.byte_order
    }

    /// The SARC header as read
    pub fn header(&self) -> &SarcHeader {
        &self.header
    }

    /// Hash multiplier from the SFAT header
    pub fn hash_multiplier(&self) -> u32 {
        self.hash_multiplier
    }

    /// Node records in on-disk order
    pub fn records(&self) -> &[NodeRecord] {
        &self.records
    }

    /// Number of entries
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Whether the archive holds no entries
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    fn payload(&self, record: &NodeRecord) -> &'a [u8] {
        let data: &'a [u8] = self.data;
        let start = record.data_offset as usize;
        &data[start..start + record.data_length as usize]
    }

    /// Payload for `path`
    pub fn lookup(&self, path: &str) -> SarcResult<&'a [u8]> {
        let hash = hash_path(path, self.hash_multiplier);
        let position = NodeIndex::lookup(&self.records, hash, self.name_table, path)?;
        Ok(self.payload(&self.records[position]))
    }

    /// `(path, payload)` pairs in on-disk order
    pub fn iter(&self) -> impl Iterator<Item = (&'a str, &'a [u8])> + '_ {
        self.names
            .iter()
            .zip(&self.records)
            .map(|(&name, record)| (name, self.payload(record)))
    }
}
