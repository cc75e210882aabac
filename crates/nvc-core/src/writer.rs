//! Two-phase NVC archive writer.
//!
//! The writer reserves the header region up front, appends payloads one by
//! one behind it, and fills in the header once every declared member has
//! been written.

use std::io::Read;
use std::io::Seek;
use std::io::SeekFrom;
use std::io::Write;
use std::io::{self};

use flate2::write::ZlibEncoder;
use tracing::debug;
use tracing::trace;

use crate::NvcError;
use crate::Result;
use crate::compression::compression_level_to_flate2;
use crate::copy::CopyBuffer;
use crate::copy::copy_with_buffer;
use crate::format::EntryFlags;
use crate::format::TocEntry;
use crate::format::encode_header;
use crate::format::header_len;
use crate::hash::Hash;
use crate::io::CountingWriter;

/// Largest raw or stored member length the 32-bit ToC fields can hold.
pub(crate) const MAX_MEMBER_LEN: u64 = 0xffff_ffff;

/// Writes an NVC archive with a member count fixed at creation.
///
/// Each `create*` call claims the next slot before touching any I/O, so a
/// call that fails still consumes its slot. [`Writer::finalize`] refuses to
/// write the header unless every slot was filled successfully.
///
/// # Examples
///
/// ```
/// use nvc_core::Writer;
/// use nvc_core::hash_of;
/// use std::io::Cursor;
///
/// let mut writer = Writer::new(Cursor::new(Vec::new()), 2)?;
/// writer.create(&b"plain"[..], hash_of("a.txt"))?;
/// writer.create_compressed(&b"squeezed"[..], hash_of("b.txt"), 9)?;
/// assert_eq!(writer.remaining(), 0);
///
/// let bytes = writer.finalize()?.into_inner();
/// assert_eq!(&bytes[..8], b"nvc1d\0\0\0");
/// # Ok::<(), nvc_core::NvcError>(())
/// ```
#[derive(Debug)]
pub struct Writer<W> {
    sink: W,
    declared: u32,
    slots: Vec<Option<TocEntry>>,
    completed: u32,
    buffer: Box<CopyBuffer>,
    member_limit: u64,
}

impl<W: Write + Seek> Writer<W> {
    /// Starts an archive of exactly `declared_count` members on `sink`.
    ///
    /// The sink is rewound to 0 and the header region is filled with zeros.
    ///
    /// # Errors
    ///
    /// - `InvalidParameter` if the header for `declared_count` entries would
    ///   push payload offsets past the 32-bit limit
    /// - `Io` if seeking or writing the reserved region fails
    pub fn new(mut sink: W, declared_count: u32) -> Result<Self> {
        let reserved = header_len(declared_count);
        if reserved > u64::from(u32::MAX) {
            return Err(NvcError::invalid_parameter(
                "declared count",
                format!("{declared_count} entries need a {reserved} byte header"),
            ));
        }

        sink.seek(SeekFrom::Start(0))?;
        io::copy(&mut io::repeat(0).take(reserved), &mut sink)?;
        debug!(declared_count, reserved, "reserved nvc header");

        Ok(Self {
            sink,
            declared: declared_count,
            slots: Vec::new(),
            completed: 0,
            buffer: Box::default(),
            member_limit: MAX_MEMBER_LEN,
        })
    }

    /// Appends `source` uncompressed under `hash` and returns its stored
    /// length.
    ///
    /// # Errors
    ///
    /// - `WriterOverrun` if every declared slot is already taken; nothing is
    ///   written in that case
    /// - `SizeOverflow` if the offset or length does not fit 32 bits; the
    ///   copy stops one byte past the limit
    /// - `Io` if reading the source or writing the sink fails; bytes already
    ///   written stay in the sink and the slot stays consumed
    pub fn create<R: Read>(&mut self, source: R, hash: Hash) -> Result<u64> {
        let slot = self.reserve()?;
        let offset = self.payload_offset()?;

        let mut bounded = source.take(self.member_limit + 1);
        let length = copy_with_buffer(&mut bounded, &mut self.sink, &mut self.buffer)?;
        let length = self.fit_member("member length", length)?;

        self.complete(
            slot,
            TocEntry {
                hash,
                offset,
                raw_length: length,
                stored_length: length,
                flags: EntryFlags::NoCompression,
            },
        );
        Ok(u64::from(length))
    }

    /// Appends `source` zlib-compressed at `level` (0-9) under `hash` and
    /// returns its stored length, zlib framing included.
    ///
    /// # Errors
    ///
    /// - `InvalidParameter` if `level` is above 9; checked before any slot is
    ///   reserved, so the call can be retried with a valid level
    /// - otherwise the same errors as [`Writer::create`]
    pub fn create_compressed<R: Read>(
        &mut self,
        source: R,
        hash: Hash,
        level: u32,
    ) -> Result<u64> {
        let compression = compression_level_to_flate2(level)?;
        let slot = self.reserve()?;
        let offset = self.payload_offset()?;
        let limit = self.member_limit;

        let mut bounded = source.take(limit + 1);
        let counting = CountingWriter::with_limit(&mut self.sink, limit);
        let mut encoder = ZlibEncoder::new(counting, compression);
        let raw_length = copy_with_buffer(&mut bounded, &mut encoder, &mut self.buffer)
            .map_err(|e| stored_limit_error(e, limit))?;
        let stored_length = encoder
            .finish()
            .map_err(|e| stored_limit_error(NvcError::Io(e), limit))?
            .total_bytes();

        let raw_length = self.fit_member("member length", raw_length)?;
        let stored_length = self.fit_member("compressed member length", stored_length)?;

        self.complete(
            slot,
            TocEntry {
                hash,
                offset,
                raw_length,
                stored_length,
                flags: EntryFlags::ZlibCompression,
            },
        );
        Ok(u64::from(stored_length))
    }

    /// Writes the header and returns the sink.
    ///
    /// Consumes the writer, so nothing can be appended afterwards.
    ///
    /// # Errors
    ///
    /// - `IncompleteArchive` if fewer members completed than were declared;
    ///   the header is left zeroed
    /// - `Io` if seeking, writing or flushing fails; the archive is then
    ///   unusable
    pub fn finalize(mut self) -> Result<W> {
        if self.completed < self.declared {
            return Err(NvcError::IncompleteArchive {
                completed: self.completed,
                declared: self.declared,
            });
        }

        let entries: Vec<TocEntry> = self.slots.iter().flatten().copied().collect();
        let header = encode_header(&entries);

        self.sink.seek(SeekFrom::Start(0))?;
        self.sink.write_all(&header)?;
        self.sink.flush()?;
        debug!(entries = entries.len(), header_len = header.len(), "finalized nvc archive");

        Ok(self.sink)
    }

    fn reserve(&mut self) -> Result<usize> {
        if self.slots.len() >= self.declared as usize {
            return Err(NvcError::WriterOverrun {
                declared: self.declared,
            });
        }
        self.slots.push(None);
        Ok(self.slots.len() - 1)
    }

    fn payload_offset(&mut self) -> Result<u32> {
        let position = self.sink.stream_position()?;
        fit_u32("member offset", position)
    }

    fn fit_member(&self, what: &'static str, value: u64) -> Result<u32> {
        if value > self.member_limit {
            return Err(NvcError::SizeOverflow { what, value });
        }
        fit_u32(what, value)
    }
}

impl<W> Writer<W> {
    /// Returns the member count the archive was started with.
    #[must_use]
    pub fn declared_count(&self) -> u32 {
        self.declared
    }

    /// Returns how many slots are still free.
    #[must_use]
    #[allow(clippy::cast_possible_truncation)]
    pub fn remaining(&self) -> u32 {
        // slots.len() never exceeds declared
        self.declared - self.slots.len() as u32
    }

    /// Returns the entries written successfully so far, in slot order.
    pub fn entries(&self) -> impl Iterator<Item = &TocEntry> + '_ {
        self.slots.iter().flatten()
    }

    fn complete(&mut self, slot: usize, entry: TocEntry) {
        trace!(
            slot,
            hash = %entry.hash,
            offset = entry.offset,
            raw_length = entry.raw_length,
            stored_length = entry.stored_length,
            "wrote member"
        );
        self.slots[slot] = Some(entry);
        self.completed += 1;
    }
}

fn fit_u32(what: &'static str, value: u64) -> Result<u32> {
    u32::try_from(value).map_err(|_| NvcError::SizeOverflow { what, value })
}

/// Maps a refused write from the limited counting writer to `SizeOverflow`.
fn stored_limit_error(err: NvcError, limit: u64) -> NvcError {
    match err {
        NvcError::Io(e) if e.kind() == io::ErrorKind::FileTooLarge => NvcError::SizeOverflow {
            what: "compressed member length",
            value: limit + 1,
        },
        other => other,
    }
}
