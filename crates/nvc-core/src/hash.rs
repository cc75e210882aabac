//! Path hashing used as the archive's entry key.
//!
//! Member names are never stored in an NVC archive. Each member is keyed by
//! the 64-bit FNV-1a hash of its logical path, so a reader needs the original
//! path (for example from a path list) to recover a member's name.

use std::fmt;
use std::str::FromStr;

use crate::NvcError;

const FNV_OFFSET_BASIS: u64 = 0xcbf2_9ce4_8422_2325;
const FNV_PRIME: u64 = 0x0100_0000_01b3;

/// 64-bit FNV-1a digest of a logical path.
///
/// Collisions between distinct paths are possible and are not detected.
/// Displays as 16 lowercase, zero-padded hexadecimal digits.
///
/// # Examples
///
/// ```
/// use nvc_core::Hash;
/// use nvc_core::hash_of;
///
/// let hash = hash_of("/path/to/file");
/// let text = hash.to_string();
/// assert_eq!(text.len(), 16);
/// assert_eq!(text.parse::<Hash>().unwrap(), hash);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
pub struct Hash(u64);

impl Hash {
    /// Hashes `path` with FNV-1a.
    #[must_use]
    pub fn of(path: impl AsRef<[u8]>) -> Self {
        let state = path
            .as_ref()
            .iter()
            .fold(FNV_OFFSET_BASIS, |state, &byte| {
                (state ^ u64::from(byte)).wrapping_mul(FNV_PRIME)
            });
        Self(state)
    }

    /// Returns the raw 64-bit value.
    #[must_use]
    pub const fn as_u64(self) -> u64 {
        self.0
    }
}

/// Hashes a logical path into an entry key.
///
/// Pure and deterministic; the path is hashed byte for byte, so `"a/b"` and
/// `"a\\b"` are different keys.
///
/// # Examples
///
/// ```
/// use nvc_core::hash_of;
///
/// assert_eq!(hash_of("").as_u64(), 0xcbf29ce484222325);
/// assert_eq!(hash_of("a").to_string(), "af63dc4c8601ec8c");
/// ```
#[must_use]
pub fn hash_of(path: impl AsRef<[u8]>) -> Hash {
    Hash::of(path)
}

impl From<u64> for Hash {
    fn from(value: u64) -> Self {
        Self(value)
    }
}

impl From<Hash> for u64 {
    fn from(hash: Hash) -> Self {
        hash.0
    }
}

impl fmt::Display for Hash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:016x}", self.0)
    }
}

impl FromStr for Hash {
    type Err = NvcError;

    /// Parses exactly 16 hexadecimal digits (either case).
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.len() != 16 || !s.bytes().all(|b| b.is_ascii_hexdigit()) {
            return Err(NvcError::invalid_parameter(
                "hash",
                format!("expected 16 hex digits, got {s:?}"),
            ));
        }
        u64::from_str_radix(s, 16)
            .map(Self)
            .map_err(|e| NvcError::invalid_parameter("hash", e.to_string()))
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_known_vectors() {
        // Reference values for 64-bit FNV-1a.
        assert_eq!(hash_of("").as_u64(), 0xcbf2_9ce4_8422_2325);
        assert_eq!(hash_of("a").as_u64(), 0xaf63_dc4c_8601_ec8c);
        assert_eq!(hash_of("foobar").as_u64(), 0x8594_4171_f739_67e8);
    }

    #[test]
    fn test_order_sensitive() {
        assert_ne!(hash_of("ab"), hash_of("ba"));
        assert_ne!(hash_of("data/a.png"), hash_of("data\\a.png"));
    }

    #[test]
    fn test_str_and_bytes_agree() {
        assert_eq!(hash_of("/path/to/file"), hash_of(b"/path/to/file"));
        assert_eq!(Hash::of("x"), hash_of("x"));
    }

    #[test]
    fn test_display_zero_padded() {
        assert_eq!(Hash::from(0).to_string(), "0000000000000000");
        assert_eq!(Hash::from(0xff).to_string(), "00000000000000ff");
        assert_eq!(Hash::from(u64::MAX).to_string(), "ffffffffffffffff");
    }

    #[test]
    fn test_parse_round_trip() {
        let hash = hash_of("data/textures/sky.png");
        assert_eq!(hash.to_string().parse::<Hash>().unwrap(), hash);
        assert_eq!(
            "AF63DC4C8601EC8C".parse::<Hash>().unwrap(),
            Hash::from(0xaf63_dc4c_8601_ec8c)
        );
    }

    #[test]
    fn test_parse_rejects_bad_input() {
        assert!("".parse::<Hash>().is_err());
        assert!("123".parse::<Hash>().is_err());
        assert!("zzzzzzzzzzzzzzzz".parse::<Hash>().is_err());
        assert!("+fffffffffffffff".parse::<Hash>().is_err());
        assert!("00000000000000000".parse::<Hash>().is_err());
    }
}
