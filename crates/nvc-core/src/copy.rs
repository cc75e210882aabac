//! Buffered copy used to stream member payloads into an archive.
//!
//! The writer keeps one `CopyBuffer` for its whole session, so appending
//! members does not allocate per call the way `std::io::copy` may.

use std::io::Read;
use std::io::Write;
use std::io::{self};

use crate::NvcError;

/// Buffer size for payload copies (64KB).
const COPY_BUFFER_SIZE: usize = 64 * 1024;

/// Reusable fixed-size copy buffer.
///
/// # Examples
///
/// ```
/// use nvc_core::copy::CopyBuffer;
/// use nvc_core::copy::copy_with_buffer;
///
/// let mut buffer = CopyBuffer::new();
/// let mut input = &b"payload"[..];
/// let mut output = Vec::new();
///
/// let copied = copy_with_buffer(&mut input, &mut output, &mut buffer)?;
/// assert_eq!(copied, 7);
/// # Ok::<(), nvc_core::NvcError>(())
/// ```
#[derive(Debug)]
pub struct CopyBuffer {
    #[allow(clippy::large_stack_arrays)]
    buf: [u8; COPY_BUFFER_SIZE],
}

impl CopyBuffer {
    /// Creates a new zeroed copy buffer.
    #[inline]
    #[must_use]
    #[allow(clippy::large_stack_arrays)]
    pub fn new() -> Self {
        Self {
            buf: [0u8; COPY_BUFFER_SIZE],
        }
    }

    /// Returns the buffer size in bytes.
    #[inline]
    #[must_use]
    pub fn size(&self) -> usize {
        COPY_BUFFER_SIZE
    }
}

impl Default for CopyBuffer {
    fn default() -> Self {
        Self::new()
    }
}

/// Copies everything from `reader` to `writer` and returns the number of
/// bytes read.
///
/// Interrupted reads are retried. On any other failure the bytes already
/// handed to `writer` stay there; nothing is rolled back.
///
/// # Errors
///
/// Returns `NvcError::Io` if reading or writing fails, or
/// `NvcError::SizeOverflow` if the running total overflows `u64`.
#[inline]
pub fn copy_with_buffer<R: Read + ?Sized, W: Write + ?Sized>(
    reader: &mut R,
    writer: &mut W,
    buffer: &mut CopyBuffer,
) -> Result<u64, NvcError> {
    let mut total: u64 = 0;

    loop {
        let bytes_read = match reader.read(&mut buffer.buf) {
            Ok(0) => break,
            Ok(n) => n,
            Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
            Err(e) => return Err(NvcError::Io(e)),
        };

        writer.write_all(&buffer.buf[..bytes_read])?;

        total = total
            .checked_add(bytes_read as u64)
            .ok_or(NvcError::SizeOverflow {
                what: "copied length",
                value: total,
            })?;
    }

    Ok(total)
}
