//! Property-based tests for the archive codec.
//!
//! These tests use proptest to generate arbitrary paths and contents and
//! check that what goes into an archive comes back out unchanged.

#![allow(clippy::expect_used)]

use nvc_core::Archive;
use nvc_core::Hash;
use nvc_core::NvcError;
use nvc_core::Writer;
use nvc_core::hash_of;
use proptest::prelude::*;
use std::collections::HashSet;
use std::io::Cursor;

fn write_members(members: &[(String, Vec<u8>)], level: Option<u32>) -> Vec<u8> {
    let count = u32::try_from(members.len()).expect("member count fits u32");
    let mut writer = Writer::new(Cursor::new(Vec::new()), count).expect("writer");
    for (path, content) in members {
        match level {
            Some(level) => writer
                .create_compressed(&content[..], hash_of(path), level)
                .expect("create_compressed"),
            None => writer.create(&content[..], hash_of(path)).expect("create"),
        };
    }
    writer.finalize().expect("finalize").into_inner()
}

proptest! {
    /// Uncompressed members read back byte for byte.
    #[test]
    fn prop_round_trip_uncompressed(
        path in "[a-z0-9_/.]{1,40}",
        content in prop::collection::vec(any::<u8>(), 0..4096),
    ) {
        let bytes = write_members(&[(path.clone(), content.clone())], None);
        prop_assert_eq!(bytes.len(), 36 + content.len());

        let mut archive = Archive::parse(Cursor::new(bytes)).expect("parse");
        prop_assert_eq!(archive.file(hash_of(&path)).expect("file"), content);
    }

    /// Compressed members read back byte for byte at every level.
    #[test]
    fn prop_round_trip_compressed(
        path in "[a-z0-9_/.]{1,40}",
        content in prop::collection::vec(any::<u8>(), 0..4096),
        level in 0u32..=9,
    ) {
        let bytes = write_members(&[(path.clone(), content.clone())], Some(level));
        let mut archive = Archive::parse(Cursor::new(bytes)).expect("parse");
        let entry = *archive.entry(hash_of(&path)).expect("entry");
        prop_assert_eq!(entry.raw_length as usize, content.len());
        prop_assert_eq!(archive.file(hash_of(&path)).expect("file"), content);
    }

    /// The ToC keeps write order and payload offsets strictly increase.
    #[test]
    fn prop_entry_order_matches_write_order(
        paths in prop::collection::hash_set("[a-z]{1,12}", 1..24),
        compress in any::<bool>(),
    ) {
        let members: Vec<(String, Vec<u8>)> = paths
            .into_iter()
            .map(|path| {
                let content = path.repeat(3).into_bytes();
                (path, content)
            })
            .collect();
        let hashes: Vec<Hash> = members.iter().map(|(path, _)| hash_of(path)).collect();
        let distinct: HashSet<Hash> = hashes.iter().copied().collect();
        prop_assume!(distinct.len() == hashes.len());

        let bytes = write_members(&members, compress.then_some(6));
        let mut archive = Archive::parse(Cursor::new(bytes)).expect("parse");

        prop_assert_eq!(archive.entry_order().collect::<Vec<_>>(), hashes);
        let entries = archive.entries().to_vec();
        prop_assert!(entries.windows(2).all(|w| w[0].offset < w[1].offset));

        for (path, content) in &members {
            prop_assert_eq!(&archive.file(hash_of(path)).expect("file"), content);
        }
    }

    /// Anything not starting with the magic is rejected with MagicMismatch.
    #[test]
    fn prop_bad_magic_rejected(data in prop::collection::vec(any::<u8>(), 8..256)) {
        prop_assume!(&data[..8] != b"nvc1d\0\0\0");
        let err = Archive::parse(Cursor::new(data)).expect_err("bad magic");
        let is_magic_mismatch = matches!(err, NvcError::MagicMismatch { .. });
        prop_assert!(is_magic_mismatch);
    }

    /// Hash text parses back to the same hash.
    #[test]
    fn prop_hash_text_round_trip(value in any::<u64>()) {
        let hash = Hash::from(value);
        let text = hash.to_string();
        prop_assert_eq!(text.len(), 16);
        prop_assert_eq!(text.parse::<Hash>().expect("parse"), hash);
    }

    /// Truncating a finished archive anywhere never panics and never returns
    /// wrong bytes.
    #[test]
    fn prop_truncation_is_detected(
        content in prop::collection::vec(any::<u8>(), 1..512),
        cut in any::<prop::sample::Index>(),
    ) {
        let bytes = write_members(&[("member".to_string(), content.clone())], None);
        let cut = cut.index(bytes.len());
        let truncated = bytes[..cut].to_vec();

        match Archive::parse(Cursor::new(truncated)) {
            Ok(mut archive) => {
                let err = archive.file(hash_of("member")).expect_err("payload is short");
                let is_truncated = matches!(err, NvcError::TruncatedPayload { .. });
                prop_assert!(is_truncated);
            }
            Err(err) => prop_assert!(err.is_format_error()),
        }
    }
}
