//! Test utilities for building NVC archives in memory.
//!
//! `RawArchive` lays the bytes out by hand, independent of [`crate::Writer`],
//! so reader tests do not depend on the writer being correct. It can also
//! produce archives the writer refuses to make: duplicate hashes, reserved
//! flags and payloads that do not match their ToC entry.
//!
//! # Panics
//!
//! All functions in this module may panic on I/O errors since they are
//! designed for test use only where panics are acceptable.

#![allow(clippy::unwrap_used, clippy::missing_panics_doc)]

use std::io::Cursor;
use std::io::Write;

use flate2::Compression;
use flate2::write::ZlibEncoder;

use crate::Writer;
use crate::format::EntryFlags;
use crate::format::TocEntry;
use crate::format::encode_header;
use crate::format::header_len;
use crate::hash::Hash;
use crate::hash::hash_of;

/// Creates an in-memory archive with [`crate::Writer`] from `(path, content)`
/// pairs, storing every member uncompressed.
///
/// # Examples
///
/// ```
/// use nvc_core::test_utils::create_test_archive;
///
/// let data = create_test_archive(vec![("a.txt", b"hello"), ("dir/b.txt", b"world")]);
/// assert_eq!(&data[..5], b"nvc1d");
/// ```
#[must_use]
pub fn create_test_archive(entries: Vec<(&str, &[u8])>) -> Vec<u8> {
    let mut writer = Writer::new(Cursor::new(Vec::new()), entries.len() as u32).unwrap();
    for (path, data) in entries {
        writer.create(data, hash_of(path)).unwrap();
    }
    writer.finalize().unwrap().into_inner()
}

/// Builder for hand-assembled archives.
///
/// Payloads are laid out back to back after the header in the order they
/// were added.
///
/// # Examples
///
/// ```
/// use nvc_core::hash_of;
/// use nvc_core::test_utils::RawArchive;
///
/// let data = RawArchive::new()
///     .member(hash_of("plain"), b"content")
///     .compressed_member(hash_of("packed"), b"content content content")
///     .member_with_flags(hash_of("locked"), b"????", 3)
///     .build();
/// ```
#[derive(Debug, Default)]
pub struct RawArchive {
    members: Vec<RawMember>,
}

#[derive(Debug)]
struct RawMember {
    hash: Hash,
    raw_length: u32,
    flags: u32,
    payload: Vec<u8>,
}

impl RawArchive {
    /// Creates an empty builder.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds an uncompressed member.
    #[must_use]
    pub fn member(self, hash: Hash, data: &[u8]) -> Self {
        self.member_with_flags(hash, data, EntryFlags::NoCompression.to_raw())
    }

    /// Adds a member compressed with zlib at the best level.
    #[must_use]
    pub fn compressed_member(mut self, hash: Hash, data: &[u8]) -> Self {
        let mut encoder = ZlibEncoder::new(Vec::new(), Compression::best());
        encoder.write_all(data).unwrap();
        self.members.push(RawMember {
            hash,
            raw_length: data.len() as u32,
            flags: EntryFlags::ZlibCompression.to_raw(),
            payload: encoder.finish().unwrap(),
        });
        self
    }

    /// Adds a member whose payload is stored verbatim under arbitrary raw
    /// `flags`, with `raw_length` set to the payload length.
    #[must_use]
    pub fn member_with_flags(mut self, hash: Hash, data: &[u8], flags: u32) -> Self {
        self.members.push(RawMember {
            hash,
            raw_length: data.len() as u32,
            flags,
            payload: data.to_vec(),
        });
        self
    }

    /// Lays out header, ToC and payloads.
    #[must_use]
    pub fn build(self) -> Vec<u8> {
        let mut offset = header_len(self.members.len() as u32) as u32;
        let mut entries = Vec::with_capacity(self.members.len());
        for member in &self.members {
            let stored_length = member.payload.len() as u32;
            entries.push(TocEntry {
                hash: member.hash,
                offset,
                raw_length: member.raw_length,
                stored_length,
                flags: EntryFlags::from_raw(member.flags),
            });
            offset += stored_length;
        }

        let mut data = encode_header(&entries);
        for member in self.members {
            data.extend_from_slice(&member.payload);
        }
        data
    }
}
