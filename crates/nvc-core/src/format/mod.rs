//! On-disk layout of NVC archives.
//!
//! All multi-byte integers are little-endian and nothing is padded.
//!
//! | Offset | Size | Field |
//! |---|---|---|
//! | 0 | 8 | Magic `6E 76 63 31 64 00 00 00` (`"nvc1d\0\0\0"`) |
//! | 8 | 4 | Entry count (`u32`) |
//! | 12 | 24 × count | ToC entries: hash `u64`, offset `u32`, raw length `u32`, stored length `u32`, flags `u32` |
//! | 12 + 24 × count | variable | Member payloads, raw or zlib streams, addressed by each entry's offset |

pub mod entry;
pub mod header;

pub use entry::EntryFlags;
pub use entry::TOC_ENTRY_LEN;
pub use entry::TocEntry;
pub use header::COUNT_LEN;
pub use header::HEADER_PREFIX_LEN;
pub use header::MAGIC;
pub use header::MAGIC_LEN;
pub use header::encode_header;
pub use header::header_len;
