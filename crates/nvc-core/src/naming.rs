//! Output naming for members that have no known path.
//!
//! An archive only stores hashes, so a member missing from the path list
//! gets a name derived from its hash and a guess at its content type taken
//! from the first four payload bytes.

use std::path::PathBuf;

use crate::hash::Hash;

/// Directory that unknown members are placed under.
pub const UNKNOWN_ROOT: &str = "data";

/// A rule mapping a 4-byte payload prefix to a directory and extension.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NamingRule {
    /// Leading payload bytes that select this rule.
    pub prefix: [u8; 4],
    /// Directory under [`UNKNOWN_ROOT`].
    pub directory: String,
    /// File extension including the leading dot.
    pub extension: String,
}

impl NamingRule {
    /// Creates a rule.
    #[must_use]
    pub fn new(
        prefix: [u8; 4],
        directory: impl Into<String>,
        extension: impl Into<String>,
    ) -> Self {
        Self {
            prefix,
            directory: directory.into(),
            extension: extension.into(),
        }
    }
}

/// Table of content-type guesses for unknown members.
///
/// The default table recognises PNG images, NMF models, Ogg and WAV audio
/// and SPIR-V shaders. Anything else falls back to `unknown/*.unknown`.
///
/// # Examples
///
/// ```
/// use nvc_core::Hash;
/// use nvc_core::UnknownNaming;
/// use std::path::Path;
///
/// let naming = UnknownNaming::default();
/// let path = naming.path_for(Hash::from(0xab), b"OggS\0\x02");
/// assert_eq!(path, Path::new("data/unknown_ogg/00000000000000ab.ogg"));
///
/// let path = naming.path_for(Hash::from(0xab), b"??");
/// assert_eq!(path, Path::new("data/unknown/00000000000000ab.unknown"));
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownNaming {
    rules: Vec<NamingRule>,
    fallback_directory: String,
    fallback_extension: String,
}

impl Default for UnknownNaming {
    fn default() -> Self {
        Self {
            rules: vec![
                NamingRule::new(*b"\x89PNG", "unknown_png", ".png"),
                NamingRule::new(*b"nmf1", "unknown_nmd", ".nmd"),
                NamingRule::new(*b"OggS", "unknown_ogg", ".ogg"),
                NamingRule::new(*b"RIFF", "unknown_wav", ".wav"),
                NamingRule::new([0x03, 0x02, 0x23, 0x07], "unknown_spirv", ".spirv"),
            ],
            fallback_directory: "unknown".to_string(),
            fallback_extension: ".unknown".to_string(),
        }
    }
}

impl UnknownNaming {
    /// Creates a table with no rules and the given fallback.
    #[must_use]
    pub fn empty(
        fallback_directory: impl Into<String>,
        fallback_extension: impl Into<String>,
    ) -> Self {
        Self {
            rules: Vec::new(),
            fallback_directory: fallback_directory.into(),
            fallback_extension: fallback_extension.into(),
        }
    }

    /// Adds a rule. Earlier rules take precedence on equal prefixes.
    #[must_use]
    pub fn with_rule(mut self, rule: NamingRule) -> Self {
        self.rules.push(rule);
        self
    }

    /// Returns the rules in match order.
    #[must_use]
    pub fn rules(&self) -> &[NamingRule] {
        &self.rules
    }

    /// Returns the `(directory, extension)` pair for `content`.
    ///
    /// Payloads shorter than four bytes always use the fallback.
    #[must_use]
    pub fn classify(&self, content: &[u8]) -> (&str, &str) {
        content
            .get(..4)
            .and_then(|head| self.rules.iter().find(|rule| rule.prefix.as_slice() == head))
            .map_or(
                (
                    self.fallback_directory.as_str(),
                    self.fallback_extension.as_str(),
                ),
                |rule| (rule.directory.as_str(), rule.extension.as_str()),
            )
    }

    /// Returns the relative output path `data/<directory>/<hash><extension>`.
    #[must_use]
    pub fn path_for(&self, hash: Hash, content: &[u8]) -> PathBuf {
        let (directory, extension) = self.classify(content);
        PathBuf::from(UNKNOWN_ROOT)
            .join(directory)
            .join(format!("{hash}{extension}"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::Path;

    #[test]
    fn test_default_rules() {
        let naming = UnknownNaming::default();
        assert_eq!(naming.classify(b"\x89PNG\r\n\x1a\n"), ("unknown_png", ".png"));
        assert_eq!(naming.classify(b"nmf1...."), ("unknown_nmd", ".nmd"));
        assert_eq!(naming.classify(b"OggS"), ("unknown_ogg", ".ogg"));
        assert_eq!(naming.classify(b"RIFF\0\0\0\0WAVE"), ("unknown_wav", ".wav"));
        assert_eq!(
            naming.classify(&[0x03, 0x02, 0x23, 0x07, 0, 0]),
            ("unknown_spirv", ".spirv")
        );
    }

    #[test]
    fn test_fallback() {
        let naming = UnknownNaming::default();
        assert_eq!(naming.classify(b"GIF89a"), ("unknown", ".unknown"));
        assert_eq!(naming.classify(b"Ogg"), ("unknown", ".unknown"));
        assert_eq!(naming.classify(b""), ("unknown", ".unknown"));
    }

    #[test]
    fn test_path_for_uses_hash_hex() {
        let naming = UnknownNaming::default();
        let path = naming.path_for(Hash::from(0x0123_4567_89ab_cdef), b"\x89PNG");
        assert_eq!(path, Path::new("data/unknown_png/0123456789abcdef.png"));
    }

    #[test]
    fn test_custom_table() {
        let naming = UnknownNaming::empty("raw", ".bin")
            .with_rule(NamingRule::new(*b"GIF8", "gif", ".gif"));
        assert_eq!(naming.rules().len(), 1);
        assert_eq!(naming.classify(b"GIF89a"), ("gif", ".gif"));
        assert_eq!(naming.classify(b"OggS"), ("raw", ".bin"));
    }
}
