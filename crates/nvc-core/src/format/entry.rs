//! Table of contents entries.

use std::fmt;

use crate::hash::Hash;

/// Size of one encoded ToC entry in bytes.
pub const TOC_ENTRY_LEN: usize = 24;

/// Storage transform applied to a member's payload.
///
/// Decoding never fails: values without a defined meaning are kept as
/// `Unknown` so the ToC can still be listed. Only `NoCompression` and
/// `ZlibCompression` can be read back.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum EntryFlags {
    /// Payload is stored as-is.
    #[default]
    NoCompression,
    /// Payload is a zlib stream.
    ZlibCompression,
    /// Payload is encrypted. Reserved by the format, never implemented.
    Encrypted,
    /// Any other value, including the undefined value 2.
    Unknown(u32),
}

impl EntryFlags {
    /// Decodes the raw on-disk value.
    ///
    /// # Examples
    ///
    /// ```
    /// use nvc_core::EntryFlags;
    ///
    /// assert_eq!(EntryFlags::from_raw(1), EntryFlags::ZlibCompression);
    /// assert_eq!(EntryFlags::from_raw(2), EntryFlags::Unknown(2));
    /// assert_eq!(EntryFlags::from_raw(3).to_raw(), 3);
    /// ```
    #[must_use]
    pub const fn from_raw(value: u32) -> Self {
        match value {
            0 => Self::NoCompression,
            1 => Self::ZlibCompression,
            3 => Self::Encrypted,
            other => Self::Unknown(other),
        }
    }

    /// Returns the raw on-disk value.
    #[must_use]
    pub const fn to_raw(self) -> u32 {
        match self {
            Self::NoCompression => 0,
            Self::ZlibCompression => 1,
            Self::Encrypted => 3,
            Self::Unknown(other) => other,
        }
    }

    /// Returns a short human-readable name.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::NoCompression => "stored",
            Self::ZlibCompression => "zlib",
            Self::Encrypted => "encrypted",
            Self::Unknown(_) => "unknown",
        }
    }
}

/// Metadata for one archive member.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct TocEntry {
    /// FNV-1a hash of the member's logical path.
    pub hash: Hash,
    /// Byte offset of the payload from the start of the archive.
    pub offset: u32,
    /// Length of the member after decompression.
    pub raw_length: u32,
    /// Length of the payload as stored in the archive.
    pub stored_length: u32,
    /// Storage transform of the payload.
    pub flags: EntryFlags,
}

impl TocEntry {
    /// Encodes the entry into its fixed 24-byte little-endian form.
    #[must_use]
    pub fn to_bytes(&self) -> [u8; TOC_ENTRY_LEN] {
        let mut buf = [0u8; TOC_ENTRY_LEN];
        buf[0..8].copy_from_slice(&self.hash.as_u64().to_le_bytes());
        buf[8..12].copy_from_slice(&self.offset.to_le_bytes());
        buf[12..16].copy_from_slice(&self.raw_length.to_le_bytes());
        buf[16..20].copy_from_slice(&self.stored_length.to_le_bytes());
        buf[20..24].copy_from_slice(&self.flags.to_raw().to_le_bytes());
        buf
    }

    /// Decodes an entry from its fixed 24-byte little-endian form.
    #[must_use]
    pub fn from_bytes(buf: &[u8; TOC_ENTRY_LEN]) -> Self {
        let u32_at =
            |at: usize| u32::from_le_bytes([buf[at], buf[at + 1], buf[at + 2], buf[at + 3]]);
        let mut hash = [0u8; 8];
        hash.copy_from_slice(&buf[0..8]);

        Self {
            hash: Hash::from(u64::from_le_bytes(hash)),
            offset: u32_at(8),
            raw_length: u32_at(12),
            stored_length: u32_at(16),
            flags: EntryFlags::from_raw(u32_at(20)),
        }
    }

    /// Returns `true` if the payload is stored compressed.
    #[must_use]
    pub fn is_compressed(&self) -> bool {
        self.flags == EntryFlags::ZlibCompression
    }
}

impl fmt::Display for TocEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} offset={} {}B ({}B on disk) flags={}",
            self.hash,
            self.offset,
            self.raw_length,
            self.stored_length,
            self.flags.to_raw()
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> TocEntry {
        TocEntry {
            hash: Hash::from(0x0102_0304_0506_0708),
            offset: 0x1122_3344,
            raw_length: 0x10,
            stored_length: 0x0c,
            flags: EntryFlags::ZlibCompression,
        }
    }

    #[test]
    fn test_encode_layout() {
        let bytes = sample().to_bytes();
        assert_eq!(&bytes[0..8], &[0x08, 0x07, 0x06, 0x05, 0x04, 0x03, 0x02, 0x01]);
        assert_eq!(&bytes[8..12], &[0x44, 0x33, 0x22, 0x11]);
        assert_eq!(&bytes[12..16], &[0x10, 0, 0, 0]);
        assert_eq!(&bytes[16..20], &[0x0c, 0, 0, 0]);
        assert_eq!(&bytes[20..24], &[1, 0, 0, 0]);
    }

    #[test]
    fn test_decode_encoded() {
        let entry = sample();
        assert_eq!(TocEntry::from_bytes(&entry.to_bytes()), entry);
    }

    #[test]
    fn test_decode_keeps_undefined_flags() {
        let mut bytes = sample().to_bytes();
        bytes[20] = 2;
        let entry = TocEntry::from_bytes(&bytes);
        assert_eq!(entry.flags, EntryFlags::Unknown(2));
        assert_eq!(entry.to_bytes(), bytes);
    }

    #[test]
    fn test_flags_raw_values() {
        assert_eq!(EntryFlags::NoCompression.to_raw(), 0);
        assert_eq!(EntryFlags::ZlibCompression.to_raw(), 1);
        assert_eq!(EntryFlags::Encrypted.to_raw(), 3);
        assert_eq!(EntryFlags::from_raw(0xdead), EntryFlags::Unknown(0xdead));
        assert_eq!(EntryFlags::default(), EntryFlags::NoCompression);
    }

    #[test]
    fn test_display() {
        let entry = TocEntry {
            hash: Hash::from(0xab),
            offset: 36,
            raw_length: 8,
            stored_length: 8,
            flags: EntryFlags::NoCompression,
        };
        assert_eq!(
            entry.to_string(),
            "00000000000000ab offset=36 8B (8B on disk) flags=0"
        );
    }

    #[test]
    fn test_default_is_zeroed() {
        assert_eq!(TocEntry::default().to_bytes(), [0u8; TOC_ENTRY_LEN]);
    }
}
