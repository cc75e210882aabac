//! Known logical paths for resolving hashes back to names.
//!
//! Archives store only hashes. A path list is a plain text file with one
//! logical path per line; hashing every line recovers the names of the
//! members it covers.

use std::collections::HashMap;
use std::fs::File;
use std::io::BufRead;
use std::io::BufReader;
use std::path::Path;

use crate::Result;
use crate::hash::Hash;
use crate::hash::hash_of;

/// Map from hash to logical path.
///
/// # Examples
///
/// ```
/// use nvc_core::PathList;
/// use nvc_core::hash_of;
///
/// let list = PathList::from_reader(&b"data/a.png\n\ndata/b.ogg\n"[..])?;
/// assert_eq!(list.len(), 2);
/// assert_eq!(list.resolve(hash_of("data/b.ogg")), Some("data/b.ogg"));
/// # Ok::<(), nvc_core::NvcError>(())
/// ```
#[derive(Debug, Clone, Default)]
pub struct PathList {
    paths: HashMap<Hash, String>,
}

impl PathList {
    /// Creates an empty path list.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Reads newline-separated paths from `reader`. Blank lines are skipped;
    /// other lines are taken verbatim, surrounding whitespace included.
    ///
    /// # Errors
    ///
    /// Returns `Io` if reading fails or a line is not valid UTF-8.
    pub fn from_reader<R: BufRead>(reader: R) -> Result<Self> {
        let mut list = Self::new();
        for line in reader.lines() {
            let line = line?;
            if !line.trim().is_empty() {
                list.insert(line);
            }
        }
        Ok(list)
    }

    /// Reads a path list file.
    ///
    /// # Errors
    ///
    /// Returns `Io` if the file cannot be opened or read.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let file = File::open(path)?;
        Self::from_reader(BufReader::new(file))
    }

    /// Adds `path`, replacing any earlier path with the same hash, and
    /// returns its hash.
    pub fn insert(&mut self, path: impl Into<String>) -> Hash {
        let path = path.into();
        let hash = hash_of(&path);
        self.paths.insert(hash, path);
        hash
    }

    /// Returns the path whose hash is `hash`, if known.
    #[must_use]
    pub fn resolve(&self, hash: Hash) -> Option<&str> {
        self.paths.get(&hash).map(String::as_str)
    }

    /// Returns the number of distinct hashes.
    #[must_use]
    pub fn len(&self) -> usize {
        self.paths.len()
    }

    /// Returns `true` if no paths are known.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.paths.is_empty()
    }
}

impl<S: Into<String>> FromIterator<S> for PathList {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        let mut list = Self::new();
        for path in iter {
            list.insert(path);
        }
        list
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_from_reader_skips_blank_lines() {
        let list = PathList::from_reader(&b"a\n\n   \nb\r\nc"[..]).unwrap();
        assert_eq!(list.len(), 3);
        assert_eq!(list.resolve(hash_of("b")), Some("b"));
        assert_eq!(list.resolve(hash_of("c")), Some("c"));
    }

    #[test]
    fn test_resolve_unknown() {
        let list: PathList = ["x"].into_iter().collect();
        assert_eq!(list.resolve(hash_of("y")), None);
        assert!(!list.is_empty());
    }

    #[test]
    fn test_insert_returns_hash() {
        let mut list = PathList::new();
        assert_eq!(list.insert("/path/to/file"), hash_of("/path/to/file"));
        assert_eq!(list.insert("/path/to/file"), hash_of("/path/to/file"));
        assert_eq!(list.len(), 1);
    }

    #[test]
    fn test_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "textures/hero.png").unwrap();
        writeln!(file, "sounds/step.ogg").unwrap();

        let list = PathList::from_file(file.path()).unwrap();
        assert_eq!(list.len(), 2);
        assert_eq!(
            list.resolve(hash_of("sounds/step.ogg")),
            Some("sounds/step.ogg")
        );
    }

    #[test]
    fn test_from_file_missing() {
        let err = PathList::from_file("/nonexistent/pathlist.txt").unwrap_err();
        assert!(matches!(err, crate::NvcError::Io(_)));
    }
}
