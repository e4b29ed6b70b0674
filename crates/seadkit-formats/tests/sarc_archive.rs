//! Integration tests for SARC archives built and parsed through the public API

#![allow(clippy::expect_used, clippy::unwrap_used, clippy::panic)]

use pretty_assertions::assert_eq;
use seadkit_formats::SeadFormat;
use seadkit_formats::byte_order::ByteOrder;
use seadkit_formats::compression::CompressionSettings;
use seadkit_formats::sarc::{
    AlignmentTable, BuildOptions, DEFAULT_HASH_MULTIPLIER, NODES_OFFSET, SFNT_HEADER_LEN,
    SarcArchive, SarcBuilder, SarcEntry, SarcError, SarcView, build, hash_path,
};

fn example_entries() -> Vec<SarcEntry> {
    vec![
        SarcEntry::new("file1.txt", b"AAAA".to_vec()).unwrap(),
        SarcEntry::new("subdir/file3.txt", b"BBBB".to_vec()).unwrap(),
    ]
}

#[test]
fn example_scenario_little_endian() {
    let bytes = build(&example_entries(), &BuildOptions::new()).unwrap();
    let archive = SarcArchive::parse(&bytes).unwrap();

    let mut pairs = archive.extract_all();
    pairs.sort();
    assert_eq!(
        pairs,
        vec![
            ("file1.txt", &b"AAAA"[..]),
            ("subdir/file3.txt", &b"BBBB"[..])
        ]
    );
    assert_eq!(archive.get("subdir/file3.txt").unwrap(), b"BBBB");

    let view = SarcView::new(&bytes).unwrap();
    assert_eq!(view.lookup("subdir/file3.txt").unwrap(), b"BBBB");
}

#[test]
fn empty_archive_is_well_formed() {
    for order in [ByteOrder::Little, ByteOrder::Big] {
        let bytes = build(&[], &BuildOptions::new().with_byte_order(order)).unwrap();
        assert_eq!(bytes.len(), NODES_OFFSET + SFNT_HEADER_LEN);

        let view = SarcView::new(&bytes).unwrap();
        assert_eq!(view.len(), 0);
        assert_eq!(view.header().file_size as usize, bytes.len());

        let archive = SarcArchive::parse(&bytes).unwrap();
        assert!(archive.is_empty());
        assert!(matches!(
            archive.get("anything"),
            Err(SarcError::NotFound(_))
        ));
    }
}

#[test]
fn byte_orders_differ_only_in_encoding() {
    let little = build(&example_entries(), &BuildOptions::new()).unwrap();
    let big = build(
        &example_entries(),
        &BuildOptions::new().with_byte_order(ByteOrder::Big),
    )
    .unwrap();

    assert_eq!(little.len(), big.len());
    assert_ne!(little, big);
    assert_eq!(
        SarcArchive::parse(&little).unwrap().extract_all(),
        SarcArchive::parse(&big).unwrap().extract_all()
    );
}

#[test]
fn rebuild_reproduces_original_bytes() {
    let mut builder = SarcBuilder::new()
        .with_byte_order(ByteOrder::Big)
        .with_alignment("bflyt", 0x40)
        .unwrap();
    builder.add_file("blyt/Main.bflyt", vec![0x11; 70]).unwrap();
    builder.add_file("timg/Main.bflim", vec![0x22; 300]).unwrap();
    builder.add_file("anim/Main_In.bflan", vec![0x33; 9]).unwrap();
    let bytes = builder.build().unwrap();

    let archive = SarcArchive::parse(&bytes).unwrap();
    let options = archive
        .build_options()
        .with_alignment(AlignmentTable::new().with_override("bflyt", 0x40).unwrap());
    assert_eq!(archive.to_bytes_with(&options).unwrap(), bytes);
}

#[test]
fn verify_round_trip_through_format_trait() {
    let archive = SarcArchive::from_entries(
        ByteOrder::Little,
        DEFAULT_HASH_MULTIPLIER,
        example_entries(),
    )
    .unwrap();
    let bytes = SeadFormat::build(&archive).unwrap();
    SarcArchive::verify_round_trip(&bytes).unwrap();
}

#[test]
fn compressed_archive_is_sniffed() {
    let options = BuildOptions::new().with_compression(CompressionSettings::new(1).unwrap());
    let packed = build(&example_entries(), &options).unwrap();

    assert!(matches!(
        SarcArchive::parse(&packed),
        Err(SarcError::BadMagic { .. })
    ));
    let archive = SarcArchive::parse_auto(&packed).unwrap();
    assert_eq!(archive.get("file1.txt").unwrap(), b"AAAA");
}

#[test]
fn colliding_paths_resolve_to_their_own_payloads() {
    // Multiplier 1 sums the bytes, so all three names share a hash
    let paths = ["ab", "ba", "c`"];
    assert!(paths.iter().all(|p| hash_path(p, 1) == hash_path("ab", 1)));

    let mut builder = SarcBuilder::new().with_hash_multiplier(1);
    for path in paths {
        builder.add_file(path, path.to_uppercase()).unwrap();
    }
    let bytes = builder.build().unwrap();

    let view = SarcView::new(&bytes).unwrap();
    for path in paths {
        assert_eq!(view.lookup(path).unwrap(), path.to_uppercase().as_bytes());
    }
    assert!(matches!(view.lookup("zz"), Err(SarcError::NotFound(_))));
}

#[test]
fn unsorted_index_is_rejected() {
    let bytes = build(&example_entries(), &BuildOptions::new()).unwrap();

    // Swap the two 16-byte nodes; hashes still match their names
    let mut swapped = bytes.clone();
    let (first, second) = (NODES_OFFSET, NODES_OFFSET + 0x10);
    swapped[first..first + 0x10].copy_from_slice(&bytes[second..second + 0x10]);
    swapped[second..second + 0x10].copy_from_slice(&bytes[first..first + 0x10]);

    assert!(matches!(
        SarcArchive::parse(&swapped),
        Err(SarcError::UnsortedIndex(1))
    ));
}

#[test]
fn wrong_header_size_is_rejected() {
    let mut bytes = build(&example_entries(), &BuildOptions::new()).unwrap();
    bytes[4] = 0x18;
    assert!(matches!(
        SarcArchive::parse(&bytes),
        Err(SarcError::InvalidHeaderSize {
            section: "SARC",
            ..
        })
    ));
}

#[test]
fn truncation_at_every_offset() {
    let bytes = build(&example_entries(), &BuildOptions::new()).unwrap();
    for cut in 0..bytes.len() {
        let err = SarcArchive::parse(&bytes[..cut]).unwrap_err();
        assert!(err.is_truncated(), "cut at {cut}: {err}");
    }
}
