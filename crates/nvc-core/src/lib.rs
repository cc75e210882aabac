//! Reader and writer for NVC archives.
//!
//! An NVC archive is a flat container of opaque byte blobs. Members are
//! addressed by the 64-bit FNV-1a hash of a logical path; the path itself is
//! never stored. Each member is stored raw or as a zlib stream.
//!
//! `nvc-core` provides the low-level codec ([`Archive`], [`Writer`]) over any
//! seekable byte stream, plus a filesystem API ([`list_archive`],
//! [`extract_archive`], [`create_archive`]) built on top of it.
//!
//! # Examples
//!
//! ```
//! use nvc_core::Archive;
//! use nvc_core::Writer;
//! use nvc_core::hash_of;
//! use std::io::Cursor;
//!
//! let mut writer = Writer::new(Cursor::new(Vec::new()), 2)?;
//! writer.create(&b"raw bytes"[..], hash_of("textures/a.png"))?;
//! writer.create_compressed(&b"zlib bytes"[..], hash_of("sounds/b.ogg"), 6)?;
//! let bytes = writer.finalize()?.into_inner();
//!
//! let mut archive = Archive::parse(Cursor::new(bytes))?;
//! assert_eq!(archive.file(hash_of("sounds/b.ogg"))?, b"zlib bytes");
//! # Ok::<(), nvc_core::NvcError>(())
//! ```

#![deny(unsafe_code)]
#![warn(missing_docs)]

pub mod api;
pub mod compression;
pub mod config;
pub mod copy;
pub mod error;
pub mod format;
pub mod hash;
pub mod io;
pub mod naming;
pub mod pathlist;
pub mod reader;
pub mod report;
#[doc(hidden)]
pub mod test_utils;
pub mod walker;
pub mod writer;

pub use api::create_archive;
pub use api::extract_archive;
pub use api::list_archive;
pub use config::CreationConfig;
pub use config::ExtractionConfig;
pub use error::NvcError;
pub use error::Result;
pub use format::EntryFlags;
pub use format::TocEntry;
pub use hash::Hash;
pub use hash::hash_of;
pub use naming::NamingRule;
pub use naming::UnknownNaming;
pub use pathlist::PathList;
pub use reader::Archive;
pub use report::CreationReport;
pub use report::ExtractionReport;
pub use report::NoopProgress;
pub use report::ProgressCallback;
pub use writer::Writer;
