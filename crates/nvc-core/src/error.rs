//! Error types for NVC archive operations.

use std::path::PathBuf;
use thiserror::Error;

use crate::hash::Hash;

/// Result type alias using `NvcError`.
pub type Result<T> = std::result::Result<T, NvcError>;

/// Errors that can occur while reading or writing NVC archives.
#[derive(Error, Debug)]
pub enum NvcError {
    /// Underlying I/O operation failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The first eight bytes are not the NVC magic.
    #[error("nvc magic bytes not found (got {found:02x?})")]
    MagicMismatch {
        /// Bytes found where the magic was expected.
        found: [u8; 8],
    },

    /// The source ended inside the magic or the entry count.
    #[error("archive header is truncated")]
    TruncatedHeader,

    /// The source ended inside the table of contents.
    #[error("table of contents is truncated after {entries_read} complete entries")]
    TruncatedEntry {
        /// Number of complete entries read before the source ran out.
        entries_read: u32,
    },

    /// A member's payload ended before its declared length.
    #[error("payload is truncated: expected {expected} bytes, got {actual}")]
    TruncatedPayload {
        /// Declared (decompressed) length from the ToC entry.
        expected: u32,
        /// Bytes actually obtained.
        actual: u64,
    },

    /// The entry's flags select a storage transform that is not supported.
    #[error("unsupported entry flags: {flags}")]
    UnsupportedEntryFlag {
        /// Raw flags value from the ToC entry.
        flags: u32,
    },

    /// No entry with the requested hash exists in the archive.
    #[error("no entry with hash {hash}")]
    HashNotFound {
        /// The requested hash.
        hash: Hash,
    },

    /// A caller-supplied parameter is out of range.
    #[error("invalid parameter {name}: {reason}")]
    InvalidParameter {
        /// Parameter name.
        name: &'static str,
        /// Why the value was rejected.
        reason: String,
    },

    /// More members were written than the writer was created for.
    #[error("writer overrun: archive was declared with {declared} entries")]
    WriterOverrun {
        /// Declared member count.
        declared: u32,
    },

    /// Finalize was called before every declared member was written.
    #[error("archive is incomplete: {completed} of {declared} entries written")]
    IncompleteArchive {
        /// Number of slots that were filled successfully.
        completed: u32,
        /// Declared member count.
        declared: u32,
    },

    /// An offset or length does not fit the 32-bit on-disk fields.
    #[error("{what} of {value} bytes exceeds the 32-bit archive limit")]
    SizeOverflow {
        /// Which quantity overflowed.
        what: &'static str,
        /// The offending value.
        value: u64,
    },

    /// A source path given for archive creation does not exist.
    #[error("source path not found: {path}")]
    SourceNotFound {
        /// The missing path.
        path: PathBuf,
    },

    /// A listed member path would leave the output directory or is empty.
    #[error("refusing unsafe path {path:?}")]
    UnsafePath {
        /// The listed path as it appears in the path list.
        path: String,
    },

    /// An extraction target exists and overwriting is disabled.
    #[error("{} already exists", path.display())]
    OutputExists {
        /// The existing file.
        path: PathBuf,
    },
}

impl NvcError {
    /// Returns `true` if this error signals a broken caller contract.
    ///
    /// Fatal errors mean the archive under construction cannot be trusted
    /// and must be discarded; retrying the same call will not help.
    ///
    /// # Examples
    ///
    /// ```
    /// use nvc_core::NvcError;
    ///
    /// let err = NvcError::WriterOverrun { declared: 1 };
    /// assert!(err.is_fatal());
    ///
    /// let err = NvcError::TruncatedHeader;
    /// assert!(!err.is_fatal());
    /// ```
    #[must_use]
    pub const fn is_fatal(&self) -> bool {
        matches!(
            self,
            Self::WriterOverrun { .. } | Self::IncompleteArchive { .. }
        )
    }

    /// Returns `true` if this error describes malformed archive data.
    ///
    /// # Examples
    ///
    /// ```
    /// use nvc_core::NvcError;
    ///
    /// assert!(NvcError::TruncatedEntry { entries_read: 3 }.is_format_error());
    /// assert!(NvcError::UnsupportedEntryFlag { flags: 3 }.is_format_error());
    /// assert!(!NvcError::WriterOverrun { declared: 1 }.is_format_error());
    /// ```
    #[must_use]
    pub const fn is_format_error(&self) -> bool {
        matches!(
            self,
            Self::MagicMismatch { .. }
                | Self::TruncatedHeader
                | Self::TruncatedEntry { .. }
                | Self::TruncatedPayload { .. }
                | Self::UnsupportedEntryFlag { .. }
        )
    }

    pub(crate) fn invalid_parameter(name: &'static str, reason: impl Into<String>) -> Self {
        Self::InvalidParameter {
            name,
            reason: reason.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io;

    #[test]
    fn test_io_error_preserves_cause() {
        let err: NvcError = io::Error::new(io::ErrorKind::PermissionDenied, "denied").into();
        match err {
            NvcError::Io(inner) => assert_eq!(inner.kind(), io::ErrorKind::PermissionDenied),
            other => panic!("expected Io, got {other:?}"),
        }
    }

    #[test]
    fn test_error_display() {
        let err = NvcError::TruncatedPayload {
            expected: 10,
            actual: 4,
        };
        assert_eq!(
            err.to_string(),
            "payload is truncated: expected 10 bytes, got 4"
        );

        let err = NvcError::HashNotFound {
            hash: Hash::from(0xab),
        };
        assert_eq!(err.to_string(), "no entry with hash 00000000000000ab");

        let err = NvcError::UnsafePath {
            path: "../evil.txt".to_string(),
        };
        assert_eq!(err.to_string(), "refusing unsafe path \"../evil.txt\"");

        let err = NvcError::OutputExists {
            path: PathBuf::from("out/a.txt"),
        };
        assert_eq!(err.to_string(), "out/a.txt already exists");
    }

    #[test]
    fn test_fatal_classification() {
        assert!(
            NvcError::IncompleteArchive {
                completed: 0,
                declared: 2
            }
            .is_fatal()
        );
        assert!(!NvcError::MagicMismatch { found: [0; 8] }.is_fatal());
        assert!(!NvcError::Io(io::Error::other("boom")).is_fatal());
    }

    #[test]
    fn test_format_classification() {
        assert!(NvcError::MagicMismatch { found: [0; 8] }.is_format_error());
        assert!(NvcError::TruncatedHeader.is_format_error());
        assert!(!NvcError::HashNotFound { hash: Hash::from(1) }.is_format_error());
        assert!(!NvcError::invalid_parameter("level", "too big").is_format_error());
        assert!(!NvcError::UnsafePath { path: "..".into() }.is_format_error());
    }
}
