//! Test utilities for format round-trip testing

use crate::SeadFormat;
use crate::byte_order::ByteOrder;
use crate::sarc::SarcBuilder;
use std::fmt::Debug;

/// Build `original`, parse it back and compare
pub fn test_round_trip<T>(original: &T) -> Result<(), Box<dyn std::error::Error>>
where
    T: SeadFormat + PartialEq + Debug,
{
    let data = original.build()?;
    let parsed = T::parse(&data)?;

    if original != &parsed {
        return Err(format!(
            "Round-trip verification failed:\nOriginal: {:?}\nParsed: {:?}",
            original, parsed
        )
        .into());
    }

    Ok(())
}

/// Check that parsing `invalid_data` fails
pub fn test_invalid_data_rejected<T>(invalid_data: &[u8]) -> Result<(), Box<dyn std::error::Error>>
where
    T: SeadFormat,
{
    match T::parse(invalid_data) {
        Ok(_) => Err("Expected parsing to fail for invalid data, but it succeeded".into()),
        Err(_) => Ok(()),
    }
}

/// Serialized archive holding `files` in the given byte order
pub fn sample_archive(order: ByteOrder, files: &[(&str, &[u8])]) -> Vec<u8> {
    let mut builder = SarcBuilder::new().with_byte_order(order);
    for (path, data) in files {
        builder
            .add_file(path, data.to_vec())
            .expect("sample paths are valid");
    }
    builder.build().expect("sample archive builds")
}

/// Helper to assert round-trip works for a format
#[macro_export]
macro_rules! assert_round_trip {
    ($value:expr) => {
        $crate::test_utils::test_round_trip(&$value).expect("Round-trip should succeed")
    };
}

#[cfg(test)]
#[allow(clippy::expect_used, clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::sarc::SarcArchive;

    const FILES: &[(&str, &[u8])] = &[
        ("file1.txt", b"AAAA"),
        ("subdir/file3.txt", b"BBBB"),
        ("Tex/Button.bflim", &[0x42; 40]),
    ];

    #[test]
    fn test_archive_round_trip() {
        for order in [ByteOrder::Little, ByteOrder::Big] {
            let bytes = sample_archive(order, FILES);
            SarcArchive::verify_round_trip(&bytes).expect("bit-exact rebuild");

            let archive = SarcArchive::parse(&bytes).unwrap();
            assert_round_trip!(archive);
        }
    }

    #[test]
    fn test_invalid_archives_rejected() {
        let bytes = sample_archive(ByteOrder::Little, FILES);
        test_invalid_data_rejected::<SarcArchive>(&bytes[..bytes.len() - 1]).unwrap();
        test_invalid_data_rejected::<SarcArchive>(b"SARC").unwrap();
        test_invalid_data_rejected::<SarcArchive>(&[]).unwrap();
    }
}
