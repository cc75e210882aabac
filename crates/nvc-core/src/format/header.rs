//! Archive header: magic, entry count and the ToC that follows them.

use crate::format::entry::TOC_ENTRY_LEN;
use crate::format::entry::TocEntry;

/// NVC magic bytes.
pub const MAGIC: [u8; 8] = *b"nvc1d\0\0\0";

/// Length of the magic in bytes.
pub const MAGIC_LEN: usize = MAGIC.len();

/// Length of the entry count field in bytes.
pub const COUNT_LEN: usize = 4;

/// Length of magic plus entry count.
pub const HEADER_PREFIX_LEN: usize = MAGIC_LEN + COUNT_LEN;

/// Returns the length of the full header (magic, count and ToC) for `count`
/// entries. This is also the offset of the first payload byte.
///
/// # Examples
///
/// ```
/// use nvc_core::format::header_len;
///
/// assert_eq!(header_len(0), 12);
/// assert_eq!(header_len(1), 36);
/// ```
#[must_use]
pub const fn header_len(count: u32) -> u64 {
    HEADER_PREFIX_LEN as u64 + TOC_ENTRY_LEN as u64 * count as u64
}

/// Encodes the complete header for `entries`.
///
/// The count field is `entries.len()`; the caller guarantees it fits a `u32`.
#[must_use]
pub fn encode_header(entries: &[TocEntry]) -> Vec<u8> {
    let mut buf = Vec::with_capacity(HEADER_PREFIX_LEN + TOC_ENTRY_LEN * entries.len());
    buf.extend_from_slice(&MAGIC);
    #[allow(clippy::cast_possible_truncation)]
    buf.extend_from_slice(&(entries.len() as u32).to_le_bytes());
    for entry in entries {
        buf.extend_from_slice(&entry.to_bytes());
    }
    buf
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::format::EntryFlags;
    use crate::hash::Hash;

    #[test]
    fn test_magic_bytes() {
        assert_eq!(MAGIC, [0x6e, 0x76, 0x63, 0x31, 0x64, 0x00, 0x00, 0x00]);
    }

    #[test]
    fn test_header_len() {
        assert_eq!(header_len(0), 12);
        assert_eq!(header_len(2), 60);
        assert_eq!(header_len(u32::MAX), 12 + 24 * u64::from(u32::MAX));
    }

    #[test]
    fn test_encode_empty_header() {
        let bytes = encode_header(&[]);
        assert_eq!(bytes.len(), 12);
        assert_eq!(&bytes[..8], &MAGIC);
        assert_eq!(&bytes[8..], &[0, 0, 0, 0]);
    }

    #[test]
    fn test_encode_header_with_entries() {
        let entries = [
            TocEntry {
                hash: Hash::from(1),
                offset: 60,
                raw_length: 3,
                stored_length: 3,
                flags: EntryFlags::NoCompression,
            },
            TocEntry {
                hash: Hash::from(2),
                offset: 63,
                raw_length: 100,
                stored_length: 11,
                flags: EntryFlags::ZlibCompression,
            },
        ];
        let bytes = encode_header(&entries);
        assert_eq!(bytes.len() as u64, header_len(2));
        assert_eq!(&bytes[8..12], &[2, 0, 0, 0]);
        assert_eq!(&bytes[12..36], &entries[0].to_bytes());
        assert_eq!(&bytes[36..60], &entries[1].to_bytes());
    }
}
