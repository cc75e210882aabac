//! I/O helpers shared by the reader and the writer.

pub mod counting;

pub use counting::CountingWriter;

use std::io::Read;
use std::io::{self};

/// Fills `buf` from `reader` until it is full or the reader hits end of
/// stream, returning the number of bytes read.
///
/// Unlike `Read::read_exact`, a short read is not an error; callers decide
/// which truncation error to report.
pub(crate) fn read_full<R: Read + ?Sized>(reader: &mut R, buf: &mut [u8]) -> io::Result<usize> {
    let mut filled = 0;
    while filled < buf.len() {
        match reader.read(&mut buf[filled..]) {
            Ok(0) => break,
            Ok(n) => filled += n,
            Err(e) if e.kind() == io::ErrorKind::Interrupted => {}
            Err(e) => return Err(e),
        }
    }
    Ok(filled)
}
