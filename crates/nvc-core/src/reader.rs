//! Random-access reading of NVC archives.

use std::collections::HashMap;
use std::io::Read;
use std::io::Seek;
use std::io::SeekFrom;
use std::io::{self};

use flate2::read::ZlibDecoder;
use tracing::debug;
use tracing::trace;
use tracing::warn;

use crate::NvcError;
use crate::Result;
use crate::format::COUNT_LEN;
use crate::format::EntryFlags;
use crate::format::MAGIC;
use crate::format::MAGIC_LEN;
use crate::format::TOC_ENTRY_LEN;
use crate::format::TocEntry;
use crate::hash::Hash;
use crate::io::read_full;

/// Upper bound on ToC entries preallocated before they are actually read.
const MAX_TOC_PREALLOC: usize = 4096;

/// A parsed NVC archive.
///
/// Holds the table of contents in memory and owns the byte source for its
/// whole lifetime. Member payloads are read on demand; nothing is cached, so
/// each [`Archive::file`] call seeks and reads again.
///
/// Reading moves the source's single cursor, which is why the read methods
/// take `&mut self`. Readers that need concurrency should open independent
/// sources or put the archive behind a lock.
///
/// # Duplicate hashes
///
/// When several ToC records share a hash, the lookup keeps the last one
/// while [`Archive::entries`] and [`Archive::entry_order`] keep every record
/// in file order. Shadowed records can still be read with
/// [`Archive::read_entry`].
///
/// # Examples
///
/// ```
/// use nvc_core::Archive;
/// use nvc_core::Writer;
/// use nvc_core::hash_of;
/// use std::io::Cursor;
///
/// let mut writer = Writer::new(Cursor::new(Vec::new()), 1)?;
/// writer.create(&b"Testing\n"[..], hash_of("/path/to/file"))?;
/// let bytes = writer.finalize()?.into_inner();
///
/// let mut archive = Archive::parse(Cursor::new(bytes))?;
/// assert_eq!(archive.len(), 1);
/// assert_eq!(archive.file(hash_of("/path/to/file"))?, b"Testing\n");
/// # Ok::<(), nvc_core::NvcError>(())
/// ```
#[derive(Debug)]
pub struct Archive<R> {
    source: R,
    toc: Vec<TocEntry>,
    index: HashMap<Hash, usize>,
}

impl<R: Read + Seek> Archive<R> {
    /// Validates and loads the header and table of contents of `source`.
    ///
    /// The source is rewound to its start first. Only the header and ToC are
    /// read; payloads are left untouched.
    ///
    /// # Errors
    ///
    /// - `MagicMismatch` if the first 8 bytes are not the NVC magic
    /// - `TruncatedHeader` if the source ends inside the magic or count
    /// - `TruncatedEntry` if the source ends inside the ToC
    /// - `Io` if seeking or reading fails
    pub fn parse(mut source: R) -> Result<Self> {
        source.seek(SeekFrom::Start(0))?;

        let mut magic = [0u8; MAGIC_LEN];
        if read_full(&mut source, &mut magic)? < MAGIC_LEN {
            return Err(NvcError::TruncatedHeader);
        }
        if magic != MAGIC {
            return Err(NvcError::MagicMismatch { found: magic });
        }

        let mut count = [0u8; COUNT_LEN];
        if read_full(&mut source, &mut count)? < COUNT_LEN {
            return Err(NvcError::TruncatedHeader);
        }
        let count = u32::from_le_bytes(count);
        debug!(count, "parsing nvc table of contents");

        let mut toc = Vec::with_capacity((count as usize).min(MAX_TOC_PREALLOC));
        let mut record = [0u8; TOC_ENTRY_LEN];
        for entries_read in 0..count {
            if read_full(&mut source, &mut record)? < TOC_ENTRY_LEN {
                return Err(NvcError::TruncatedEntry { entries_read });
            }
            toc.push(TocEntry::from_bytes(&record));
        }

        let mut index = HashMap::with_capacity(toc.len());
        for (position, entry) in toc.iter().enumerate() {
            if let Some(previous) = index.insert(entry.hash, position) {
                warn!(
                    hash = %entry.hash,
                    previous,
                    position,
                    "duplicate hash in table of contents, later entry wins"
                );
            }
        }

        Ok(Self {
            source,
            toc,
            index,
        })
    }

    /// Reads the member stored under `hash`.
    ///
    /// # Errors
    ///
    /// - `HashNotFound` if no entry has this hash
    /// - `UnsupportedEntryFlag` if the entry is encrypted or has an undefined
    ///   storage transform
    /// - `TruncatedPayload` if the payload ends early
    /// - `Io` if seeking, reading or decompressing fails
    pub fn file(&mut self, hash: Hash) -> Result<Vec<u8>> {
        let entry = *self.entry(hash).ok_or(NvcError::HashNotFound { hash })?;
        self.read_entry(&entry)
    }

    /// Reads the member described by `entry`.
    ///
    /// `entry` normally comes from [`Archive::entries`]; this is the only way
    /// to read a record shadowed by a later duplicate hash.
    ///
    /// # Errors
    ///
    /// Same as [`Archive::file`], minus `HashNotFound`.
    pub fn read_entry(&mut self, entry: &TocEntry) -> Result<Vec<u8>> {
        trace!(
            hash = %entry.hash,
            offset = entry.offset,
            raw_length = entry.raw_length,
            flags = entry.flags.to_raw(),
            "reading member"
        );

        self.source.seek(SeekFrom::Start(u64::from(entry.offset)))?;

        let view: Box<dyn Read + '_> = match entry.flags {
            EntryFlags::NoCompression => Box::new(&mut self.source),
            EntryFlags::ZlibCompression => Box::new(ZlibDecoder::new(&mut self.source)),
            other => {
                return Err(NvcError::UnsupportedEntryFlag {
                    flags: other.to_raw(),
                });
            }
        };

        let expected = entry.raw_length;
        let mut data = Vec::new();
        match view.take(u64::from(expected)).read_to_end(&mut data) {
            Ok(_) => {}
            // a zlib stream cut short ends in UnexpectedEof; data keeps what was decoded
            Err(e)
                if e.kind() == io::ErrorKind::UnexpectedEof
                    && entry.flags == EntryFlags::ZlibCompression => {}
            Err(e) => return Err(NvcError::Io(e)),
        }

        let actual = data.len() as u64;
        if actual < u64::from(expected) {
            return Err(NvcError::TruncatedPayload { expected, actual });
        }

        Ok(data)
    }
}

impl<R> Archive<R> {
    /// Returns the hashes of all ToC records in file order.
    ///
    /// The length equals the declared entry count, duplicates included.
    pub fn entry_order(&self) -> impl ExactSizeIterator<Item = Hash> + '_ {
        self.toc.iter().map(|entry| entry.hash)
    }

    /// Returns all ToC records in file order.
    #[must_use]
    pub fn entries(&self) -> &[TocEntry] {
        &self.toc
    }

    /// Looks up the entry for `hash`. With duplicate hashes this is the
    /// last record in file order.
    #[must_use]
    pub fn entry(&self, hash: Hash) -> Option<&TocEntry> {
        self.index.get(&hash).map(|&position| &self.toc[position])
    }

    /// Returns `true` if an entry with `hash` exists.
    #[must_use]
    pub fn contains(&self, hash: Hash) -> bool {
        self.index.contains_key(&hash)
    }

    /// Returns the number of ToC records (the declared count).
    #[must_use]
    pub fn len(&self) -> usize {
        self.toc.len()
    }

    /// Returns `true` if the archive declares no entries.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.toc.is_empty()
    }

    /// Returns the number of ToC records shadowed by a later duplicate hash.
    #[must_use]
    pub fn duplicate_count(&self) -> usize {
        self.toc.len() - self.index.len()
    }

    /// Returns `true` if the record at `position` in [`Archive::entries`] is
    /// the one the lookup resolves its hash to (not shadowed by a later
    /// duplicate).
    #[must_use]
    pub fn is_current(&self, position: usize) -> bool {
        self.toc
            .get(position)
            .and_then(|entry| self.index.get(&entry.hash))
            .is_some_and(|&current| current == position)
    }

    /// Gives the byte source back.
    #[must_use]
    pub fn into_inner(self) -> R {
        self.source
    }
}
