//! Operation reports and progress reporting.

use std::path::Path;
use std::time::Duration;

/// Report of an archive extraction operation.
#[derive(Debug, Clone, Default)]
pub struct ExtractionReport {
    /// Number of members written to disk.
    pub files_extracted: usize,

    /// Members written under a path from the path list.
    pub named_extracted: usize,

    /// Members written under a generated `data/...` name.
    pub unknown_extracted: usize,

    /// Members left out: unnamed without `extract_unknown`, unreadable, or
    /// refused by path checks.
    pub files_skipped: usize,

    /// ToC records shadowed by a later record with the same hash.
    pub duplicates: usize,

    /// Total bytes written to disk.
    pub bytes_written: u64,

    /// Duration of the extraction operation.
    pub duration: Duration,

    /// Warnings generated during extraction.
    pub warnings: Vec<String>,
}

impl ExtractionReport {
    /// Creates a new empty extraction report.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a warning message to the report.
    pub fn add_warning(&mut self, message: impl Into<String>) {
        self.warnings.push(message.into());
    }

    /// Returns whether any warnings were generated.
    #[must_use]
    pub fn has_warnings(&self) -> bool {
        !self.warnings.is_empty()
    }
}

/// Report of an archive creation operation.
///
/// # Examples
///
/// ```
/// use nvc_core::CreationReport;
///
/// let mut report = CreationReport::default();
/// report.files_added = 10;
/// report.bytes_read = 1024;
/// report.bytes_stored = 512;
///
/// assert_eq!(report.compression_ratio(), 2.0);
/// assert_eq!(report.compression_percentage(), 50.0);
/// ```
#[derive(Debug, Clone, Default)]
pub struct CreationReport {
    /// Number of members added to the archive.
    pub files_added: usize,

    /// Entries skipped while walking (hidden files, symlinks, special files).
    pub files_skipped: usize,

    /// Total member bytes read from the sources.
    pub bytes_read: u64,

    /// Total payload bytes stored in the archive.
    pub bytes_stored: u64,

    /// Size of the finished archive, header included.
    pub archive_size: u64,

    /// Duration of the creation operation.
    pub duration: Duration,

    /// Warnings generated during creation.
    pub warnings: Vec<String>,
}

impl CreationReport {
    /// Creates a new empty creation report.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a warning message to the report.
    pub fn add_warning(&mut self, message: impl Into<String>) {
        self.warnings.push(message.into());
    }

    /// Returns whether any warnings were generated.
    #[must_use]
    pub fn has_warnings(&self) -> bool {
        !self.warnings.is_empty()
    }

    /// Returns the compression ratio (read / stored).
    ///
    /// Returns 0.0 if either side is 0.
    ///
    /// # Examples
    ///
    /// ```
    /// use nvc_core::CreationReport;
    ///
    /// let mut report = CreationReport::new();
    /// report.bytes_read = 1000;
    /// report.bytes_stored = 1000;
    /// assert_eq!(report.compression_ratio(), 1.0);
    ///
    /// report.bytes_stored = 0;
    /// assert_eq!(report.compression_ratio(), 0.0);
    /// ```
    #[must_use]
    pub fn compression_ratio(&self) -> f64 {
        if self.bytes_stored == 0 || self.bytes_read == 0 {
            return 0.0;
        }
        self.bytes_read as f64 / self.bytes_stored as f64
    }

    /// Returns the space saved as a percentage of the bytes read.
    ///
    /// Returns 0.0 if nothing was read. Negative when zlib framing makes the
    /// stored payloads larger than the input.
    #[must_use]
    pub fn compression_percentage(&self) -> f64 {
        if self.bytes_read == 0 {
            return 0.0;
        }
        (1.0 - self.bytes_stored as f64 / self.bytes_read as f64) * 100.0
    }
}

/// Callback trait for progress reporting during archive operations.
///
/// Paths are the member's logical path for creation and its output path for
/// extraction.
///
/// # Examples
///
/// ```
/// use nvc_core::ProgressCallback;
/// use std::path::Path;
///
/// struct SimpleProgress;
///
/// impl ProgressCallback for SimpleProgress {
///     fn on_entry_start(&mut self, path: &Path, total: usize, current: usize) {
///         println!("Processing {}/{}: {}", current, total, path.display());
///     }
///
///     fn on_bytes_written(&mut self, _bytes: u64) {}
///
///     fn on_entry_complete(&mut self, path: &Path) {
///         println!("Completed: {}", path.display());
///     }
///
///     fn on_complete(&mut self) {
///         println!("Operation complete");
///     }
/// }
/// ```
pub trait ProgressCallback: Send {
    /// Called when starting to process an entry.
    ///
    /// `current` is 1-indexed.
    fn on_entry_start(&mut self, path: &Path, total: usize, current: usize);

    /// Called with the number of bytes written during extraction or read
    /// during creation.
    fn on_bytes_written(&mut self, bytes: u64);

    /// Called when an entry has been completely processed.
    fn on_entry_complete(&mut self, path: &Path);

    /// Called when the entire operation is complete.
    fn on_complete(&mut self);
}

/// No-op implementation of `ProgressCallback`.
#[derive(Debug, Default)]
pub struct NoopProgress;

impl ProgressCallback for NoopProgress {
    fn on_entry_start(&mut self, _path: &Path, _total: usize, _current: usize) {}

    fn on_bytes_written(&mut self, _bytes: u64) {}

    fn on_entry_complete(&mut self, _path: &Path) {}

    fn on_complete(&mut self) {}
}
