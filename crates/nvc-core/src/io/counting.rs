//! Counting writer for tracking bytes that reach an archive sink.
//!
//! The writer wraps the sink in a `CountingWriter` underneath the zlib
//! encoder, so the count it reports is the member's stored length including
//! the zlib header and trailer.

use std::io::Write;
use std::io::{self};

/// Wrapper writer that tracks total bytes written.
///
/// The counter only increments on successful writes. If a write fails
/// partway through, only the bytes the inner writer accepted are counted.
///
/// # Examples
///
/// ```
/// use nvc_core::io::CountingWriter;
/// use std::io::Write;
///
/// let mut buffer = Vec::new();
/// let mut writer = CountingWriter::new(&mut buffer);
///
/// writer.write_all(b"nvc1d")?;
/// writer.write_all(b"\0\0\0")?;
///
/// assert_eq!(writer.total_bytes(), 8);
/// assert_eq!(buffer, b"nvc1d\0\0\0");
/// # Ok::<(), std::io::Error>(())
/// ```
pub struct CountingWriter<W> {
    inner: W,
    bytes_written: u64,
    limit: Option<u64>,
}

impl<W> CountingWriter<W> {
    /// Creates a new counting writer.
    #[must_use]
    pub fn new(inner: W) -> Self {
        Self {
            inner,
            bytes_written: 0,
            limit: None,
        }
    }

    /// Creates a counting writer that refuses any write that would take the
    /// total past `limit` bytes.
    ///
    /// A refused write passes nothing to the inner writer and fails with
    /// `ErrorKind::FileTooLarge`.
    #[must_use]
    pub fn with_limit(inner: W, limit: u64) -> Self {
        Self {
            inner,
            bytes_written: 0,
            limit: Some(limit),
        }
    }

    /// Returns the total number of bytes successfully written.
    #[must_use]
    pub fn total_bytes(&self) -> u64 {
        self.bytes_written
    }

    /// Consumes the counting writer and returns the inner writer.
    #[must_use]
    pub fn into_inner(self) -> W {
        self.inner
    }

    /// Returns a reference to the inner writer.
    #[must_use]
    pub fn get_ref(&self) -> &W {
        &self.inner
    }

    fn check_limit(&self, len: usize) -> io::Result<()> {
        match self.limit {
            Some(limit) if self.bytes_written.saturating_add(len as u64) > limit => {
                Err(io::Error::new(
                    io::ErrorKind::FileTooLarge,
                    format!("write would exceed the {limit} byte limit"),
                ))
            }
            _ => Ok(()),
        }
    }
}

impl<W: Write> Write for CountingWriter<W> {
    fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
        self.check_limit(buf.len())?;
        let bytes = self.inner.write(buf)?;
        self.bytes_written += bytes as u64;
        Ok(bytes)
    }

    fn flush(&mut self) -> std::io::Result<()> {
        self.inner.flush()
    }

    fn write_all(&mut self, buf: &[u8]) -> std::io::Result<()> {
        self.check_limit(buf.len())?;
        self.inner.write_all(buf)?;
        self.bytes_written += buf.len() as u64;
        Ok(())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use flate2::Compression;
    use flate2::write::ZlibEncoder;

    #[test]
    fn test_counting_writer_basic() {
        let mut buffer = Vec::new();
        let mut writer = CountingWriter::new(&mut buffer);

        writer.write_all(b"Hello").unwrap();
        assert_eq!(writer.total_bytes(), 5);

        writer.write_all(b", World!").unwrap();
        assert_eq!(writer.total_bytes(), 13);

        assert_eq!(buffer, b"Hello, World!");
    }

    #[test]
    fn test_counting_writer_empty() {
        let writer = CountingWriter::new(Vec::<u8>::new());
        assert_eq!(writer.total_bytes(), 0);
        assert!(writer.get_ref().is_empty());
    }

    #[test]
    fn test_counting_writer_under_encoder() {
        let mut encoder = ZlibEncoder::new(CountingWriter::new(Vec::new()), Compression::best());
        encoder.write_all(&[b'a'; 4096]).unwrap();
        let counting = encoder.finish().unwrap();

        let counted = counting.total_bytes();
        let compressed = counting.into_inner();
        assert_eq!(counted, compressed.len() as u64);
        assert!(counted < 4096);
    }

    #[test]
    fn test_counting_writer_limit() {
        let mut writer = CountingWriter::with_limit(Vec::new(), 8);
        writer.write_all(b"nvc1d").unwrap();

        let err = writer.write_all(b"\0\0\0\0").unwrap_err();
        assert_eq!(err.kind(), io::ErrorKind::FileTooLarge);
        assert_eq!(writer.total_bytes(), 5);
        assert_eq!(writer.get_ref(), b"nvc1d");

        writer.write_all(b"\0\0\0").unwrap();
        assert_eq!(writer.total_bytes(), 8);
    }

    #[test]
    fn test_counting_writer_partial_write() {
        struct LimitedWriter {
            inner: Vec<u8>,
            max_write: usize,
        }

        impl Write for LimitedWriter {
            fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
                let to_write = buf.len().min(self.max_write);
                self.inner.extend_from_slice(&buf[..to_write]);
                Ok(to_write)
            }

            fn flush(&mut self) -> std::io::Result<()> {
                Ok(())
            }
        }

        let mut writer = CountingWriter::new(LimitedWriter {
            inner: Vec::new(),
            max_write: 3,
        });

        let written = writer.write(b"hello").unwrap();
        assert_eq!(written, 3);
        assert_eq!(writer.total_bytes(), 3);
        assert_eq!(writer.get_ref().inner, b"hel");
    }
}
