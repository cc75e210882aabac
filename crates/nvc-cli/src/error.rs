//! Error conversion utilities for CLI.
//!
//! Converts nvc-core's typed errors (thiserror) into user-friendly
//! contextual errors (anyhow) with actionable guidance.

use anyhow::anyhow;
use nvc_core::NvcError;
use std::path::Path;

/// Converts `NvcError` to a user-friendly anyhow error naming the archive.
pub fn convert_nvc_error(err: NvcError, archive: &Path) -> anyhow::Error {
    match err {
        NvcError::MagicMismatch { found } => anyhow!(
            "'{}' is not an NVC archive (starts with {found:02x?})\n\
             HINT: NVC archives begin with the bytes \"nvc1d\\0\\0\\0\".",
            archive.display()
        ),
        NvcError::TruncatedHeader | NvcError::TruncatedEntry { .. } => anyhow!(
            "Archive '{}' is truncated: {err}\n\
             HINT: The file may be incomplete. Re-download or re-create it.",
            archive.display()
        ),
        NvcError::UnsupportedEntryFlag { flags: 3 } => anyhow!(
            "Archive '{}' contains encrypted members, which are not supported",
            archive.display()
        ),
        NvcError::SourceNotFound { path } => anyhow!(
            "Source not found: {}\n\
             HINT: Check the path; sources must exist when the archive is created.",
            path.display()
        ),
        NvcError::SizeOverflow { .. } => anyhow!(
            "Cannot write '{}': {err}\n\
             HINT: NVC archives are limited to 4 GiB. Split the sources across several archives.",
            archive.display()
        ),
        NvcError::Io(io_err) => anyhow!(
            "I/O error while processing '{}': {io_err}",
            archive.display()
        ),
        _ => anyhow::Error::from(err)
            .context(format!("Error processing archive '{}'", archive.display())),
    }
}

/// Adds archive context to a core result.
pub fn add_archive_context<T>(
    result: Result<T, NvcError>,
    archive: &Path,
) -> anyhow::Result<T> {
    result.map_err(|e| convert_nvc_error(e, archive))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io;
    use std::path::PathBuf;

    #[test]
    fn test_convert_magic_mismatch() {
        let err = NvcError::MagicMismatch { found: *b"PK\x03\x04\0\0\0\0" };
        let msg = format!("{:?}", convert_nvc_error(err, Path::new("data.zip")));
        assert!(msg.contains("not an NVC archive"));
        assert!(msg.contains("data.zip"));
        assert!(msg.contains("HINT"));
    }

    #[test]
    fn test_convert_truncated() {
        let err = NvcError::TruncatedEntry { entries_read: 2 };
        let msg = format!("{:?}", convert_nvc_error(err, Path::new("cut.nvc")));
        assert!(msg.contains("truncated after 2 complete entries"));
    }

    #[test]
    fn test_convert_source_not_found() {
        let err = NvcError::SourceNotFound {
            path: PathBuf::from("missing/dir"),
        };
        let msg = format!("{:?}", convert_nvc_error(err, Path::new("out.nvc")));
        assert!(msg.contains("missing/dir"));
    }

    #[test]
    fn test_convert_io_error() {
        let err = NvcError::Io(io::Error::new(io::ErrorKind::NotFound, "file not found"));
        let msg = format!("{:?}", convert_nvc_error(err, Path::new("a.nvc")));
        assert!(msg.contains("I/O error"));
    }

    #[test]
    fn test_other_errors_keep_context() {
        let err = NvcError::UnsupportedEntryFlag { flags: 2 };
        let msg = format!("{:?}", convert_nvc_error(err, Path::new("a.nvc")));
        assert!(msg.contains("Error processing archive 'a.nvc'"));
        assert!(msg.contains("unsupported entry flags: 2"));
    }
}
