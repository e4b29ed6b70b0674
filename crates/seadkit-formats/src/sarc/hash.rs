//! SFAT filename hashing
//!
//! Each byte of the path is sign-extended before accumulating, which keeps
//! hashes compatible with archives containing non-ASCII names.

/// Hash multiplier used by every known SARC producer
pub const DEFAULT_HASH_MULTIPLIER: u32 = 0x65;

/// Hash a path with the given multiplier
pub fn hash_path(path: &str, multiplier: u32) -> u32 {
    hash_bytes(path.as_bytes(), multiplier)
}

/// Hash raw name bytes with the given multiplier
pub fn hash_bytes(name: &[u8], multiplier: u32) -> u32 {
    name.iter().fold(0u32, |hash, &byte| {
        hash.wrapping_mul(multiplier)
            .wrapping_add(i32::from(byte.cast_signed()).cast_unsigned())
    })
}

#[cfg(test)]
#[allow(clippy::expect_used, clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_known_values() {
        assert_eq!(hash_path("", DEFAULT_HASH_MULTIPLIER), 0);
        assert_eq!(hash_path("a", DEFAULT_HASH_MULTIPLIER), 0x61);
        // 'a' * 101 + 'b'
        assert_eq!(hash_path("ab", DEFAULT_HASH_MULTIPLIER), 97 * 101 + 98);
    }

    #[test]
    fn test_sign_extension() {
        // 0xC3 0xA9 ("é") contributes negative values
        let expected = 0u32
            .wrapping_mul(101)
            .wrapping_add(-61i32 as u32)
            .wrapping_mul(101)
            .wrapping_add(-87i32 as u32);
        assert_eq!(hash_path("é", DEFAULT_HASH_MULTIPLIER), expected);
    }

    #[test]
    fn test_high_bytes_wrap() {
        assert_eq!(hash_bytes(&[0xFF], DEFAULT_HASH_MULTIPLIER), u32::MAX);
        assert_eq!(hash_bytes(&[0x80], 1), 0xFFFF_FF80);
    }

    #[test]
    fn test_deterministic_and_multiplier_dependent() {
        let path = "Layout/Common/Button.bflyt";
        assert_eq!(
            hash_path(path, DEFAULT_HASH_MULTIPLIER),
            hash_path(path, DEFAULT_HASH_MULTIPLIER)
        );
        assert_ne!(hash_path(path, DEFAULT_HASH_MULTIPLIER), hash_path(path, 31));
    }

    #[test]
    fn test_collisions_are_possible() {
        // With a multiplier of 1 the hash is a byte sum
        assert_eq!(hash_path("ab", 1), hash_path("ba", 1));
    }
}
