//! Configuration for archive creation and extraction.

use std::path::PathBuf;

use crate::NvcError;
use crate::Result;
use crate::compression::MAX_COMPRESSION_LEVEL;
use crate::naming::UnknownNaming;

/// Configuration for [`crate::create_archive`].
///
/// # Examples
///
/// ```
/// use nvc_core::CreationConfig;
///
/// // Members stored uncompressed
/// let config = CreationConfig::default();
/// assert!(config.compression_level.is_none());
///
/// let custom = CreationConfig::default()
///     .with_compression_level(Some(9))
///     .with_strip_prefix(Some("assets".into()));
/// assert!(custom.validate().is_ok());
/// ```
#[derive(Debug, Clone, Default)]
pub struct CreationConfig {
    /// Zlib level (0-9) applied to every member.
    ///
    /// Default: `None` (members stored uncompressed).
    pub compression_level: Option<u32>,

    /// Prefix removed from source paths before they are hashed.
    ///
    /// Default: `None` (paths hashed as given).
    pub strip_prefix: Option<PathBuf>,

    /// Follow symlinks while walking source directories.
    ///
    /// Default: `false` (symlinks are skipped).
    pub follow_symlinks: bool,

    /// Include hidden files (names starting with '.') found while walking.
    ///
    /// Default: `false`.
    pub include_hidden: bool,
}

impl CreationConfig {
    /// Creates a new `CreationConfig` with default settings.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the compression level; `None` stores members uncompressed.
    #[must_use]
    pub fn with_compression_level(mut self, level: Option<u32>) -> Self {
        self.compression_level = level;
        self
    }

    /// Sets the strip prefix.
    #[must_use]
    pub fn with_strip_prefix(mut self, prefix: Option<PathBuf>) -> Self {
        self.strip_prefix = prefix;
        self
    }

    /// Sets whether to follow symlinks.
    #[must_use]
    pub fn with_follow_symlinks(mut self, follow: bool) -> Self {
        self.follow_symlinks = follow;
        self
    }

    /// Sets whether to include hidden files.
    #[must_use]
    pub fn with_include_hidden(mut self, include: bool) -> Self {
        self.include_hidden = include;
        self
    }

    /// Validates the configuration.
    ///
    /// # Errors
    ///
    /// Returns `InvalidParameter` if the compression level is above 9.
    pub fn validate(&self) -> Result<()> {
        if let Some(level) = self.compression_level
            && level > MAX_COMPRESSION_LEVEL
        {
            return Err(NvcError::invalid_parameter(
                "compression level",
                format!("{level} is outside 0-{MAX_COMPRESSION_LEVEL}"),
            ));
        }
        Ok(())
    }
}

/// Configuration for [`crate::extract_archive`].
///
/// # Examples
///
/// ```
/// use nvc_core::ExtractionConfig;
///
/// let config = ExtractionConfig::default()
///     .with_extract_unknown(true)
///     .with_overwrite(true);
/// assert!(config.extract_unknown);
/// ```
#[derive(Debug, Clone, Default)]
pub struct ExtractionConfig {
    /// Also extract members missing from the path list, named by
    /// [`ExtractionConfig::naming`].
    ///
    /// Default: `false`.
    pub extract_unknown: bool,

    /// Replace files that already exist in the output directory.
    ///
    /// Default: `false` (existing files are skipped with a warning).
    pub overwrite: bool,

    /// Naming table for unknown members.
    pub naming: UnknownNaming,
}

impl ExtractionConfig {
    /// Creates a new `ExtractionConfig` with default settings.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets whether to extract members missing from the path list.
    #[must_use]
    pub fn with_extract_unknown(mut self, extract: bool) -> Self {
        self.extract_unknown = extract;
        self
    }

    /// Sets whether to overwrite existing files.
    #[must_use]
    pub fn with_overwrite(mut self, overwrite: bool) -> Self {
        self.overwrite = overwrite;
        self
    }

    /// Sets the naming table for unknown members.
    #[must_use]
    pub fn with_naming(mut self, naming: UnknownNaming) -> Self {
        self.naming = naming;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_creation_defaults() {
        let config = CreationConfig::default();
        assert!(config.compression_level.is_none());
        assert!(config.strip_prefix.is_none());
        assert!(!config.follow_symlinks);
        assert!(!config.include_hidden);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_creation_builder() {
        let config = CreationConfig::new()
            .with_compression_level(Some(0))
            .with_follow_symlinks(true)
            .with_include_hidden(true)
            .with_strip_prefix(Some(PathBuf::from("root")));
        assert_eq!(config.compression_level, Some(0));
        assert!(config.follow_symlinks);
        assert!(config.include_hidden);
        assert_eq!(config.strip_prefix, Some(PathBuf::from("root")));
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_creation_rejects_level() {
        let config = CreationConfig::new().with_compression_level(Some(10));
        assert!(matches!(
            config.validate(),
            Err(NvcError::InvalidParameter {
                name: "compression level",
                ..
            })
        ));
    }

    #[test]
    fn test_extraction_defaults() {
        let config = ExtractionConfig::new();
        assert!(!config.extract_unknown);
        assert!(!config.overwrite);
        assert_eq!(config.naming, UnknownNaming::default());
    }
}
