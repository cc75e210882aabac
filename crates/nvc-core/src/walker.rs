//! Source collection for archive creation.
//!
//! Turns the command-line style list of sources into the exact set of
//! member files, each with the logical path that gets hashed.

use std::collections::HashSet;
use std::io;
use std::path::Component;
use std::path::Path;
use std::path::PathBuf;

use tracing::debug;
use walkdir::DirEntry;
use walkdir::WalkDir;

use crate::NvcError;
use crate::Result;
use crate::config::CreationConfig;
use crate::hash::Hash;
use crate::hash::hash_of;

/// A file that will become one archive member.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceEntry {
    /// Filesystem path to read the content from.
    pub path: PathBuf,

    /// `/`-separated logical path, `strip_prefix` already removed.
    pub logical_path: String,

    /// Size in bytes at collection time.
    pub size: u64,
}

impl SourceEntry {
    /// Returns the hash the member is stored under.
    #[must_use]
    pub fn hash(&self) -> Hash {
        hash_of(&self.logical_path)
    }
}

/// Result of [`collect_sources`].
#[derive(Debug, Clone, Default)]
pub struct CollectedSources {
    /// Members in archive order.
    pub entries: Vec<SourceEntry>,

    /// Walked entries left out (hidden, symlinks, special files, repeats).
    pub skipped: usize,

    /// Human-readable reasons for entries that were left out for reasons
    /// other than hidden-file filtering.
    pub warnings: Vec<String>,
}

/// Collects the member files for `sources`.
///
/// Files are taken as given. Directories are walked in file-name order;
/// directories themselves are not members. Hidden entries below a walked
/// directory are skipped unless `include_hidden` is set, and symlinks are
/// skipped unless `follow_symlinks` is set. A logical path seen twice keeps
/// its first source.
///
/// # Errors
///
/// - `SourceNotFound` if a source does not exist
/// - `InvalidParameter` if a path is not valid UTF-8
/// - `Io` if a directory cannot be traversed
///
/// # Examples
///
/// ```no_run
/// use nvc_core::CreationConfig;
/// use nvc_core::walker::collect_sources;
///
/// let collected = collect_sources(&["assets"], &CreationConfig::default())?;
/// for entry in &collected.entries {
///     println!("{} <- {}", entry.logical_path, entry.path.display());
/// }
/// # Ok::<(), nvc_core::NvcError>(())
/// ```
pub fn collect_sources<P: AsRef<Path>>(
    sources: &[P],
    config: &CreationConfig,
) -> Result<CollectedSources> {
    let mut collected = CollectedSources::default();
    let mut seen = HashSet::new();

    for source in sources {
        let path = source.as_ref();
        let metadata = std::fs::metadata(path).map_err(|e| match e.kind() {
            io::ErrorKind::NotFound => NvcError::SourceNotFound {
                path: path.to_path_buf(),
            },
            _ => NvcError::Io(e),
        })?;

        if metadata.is_dir() {
            walk_directory(path, config, &mut collected, &mut seen)?;
        } else {
            push_entry(path, metadata.len(), config, &mut collected, &mut seen)?;
        }
    }

    debug!(
        members = collected.entries.len(),
        skipped = collected.skipped,
        "collected archive sources"
    );
    Ok(collected)
}

fn walk_directory(
    root: &Path,
    config: &CreationConfig,
    collected: &mut CollectedSources,
    seen: &mut HashSet<String>,
) -> Result<()> {
    let include_hidden = config.include_hidden;
    let mut hidden_skipped = 0;
    let walker = WalkDir::new(root)
        .follow_links(config.follow_symlinks)
        .sort_by_file_name()
        .into_iter()
        .filter_entry(|entry| {
            let keep = include_hidden || entry.depth() == 0 || !is_hidden(entry);
            if !keep {
                hidden_skipped += 1;
            }
            keep
        });

    for entry in walker {
        let entry =
            entry.map_err(|e| NvcError::Io(io::Error::other(format!("walkdir error: {e}"))))?;
        let file_type = entry.file_type();

        if file_type.is_dir() {
            continue;
        }
        if file_type.is_symlink() {
            collected.skipped += 1;
            collected
                .warnings
                .push(format!("skipped symlink {}", entry.path().display()));
            continue;
        }
        if !file_type.is_file() {
            collected.skipped += 1;
            collected
                .warnings
                .push(format!("skipped special file {}", entry.path().display()));
            continue;
        }

        let size = entry
            .metadata()
            .map_err(|e| NvcError::Io(io::Error::other(format!("cannot read metadata: {e}"))))?
            .len();
        push_entry(entry.path(), size, config, collected, seen)?;
    }

    collected.skipped += hidden_skipped;
    Ok(())
}

fn push_entry(
    path: &Path,
    size: u64,
    config: &CreationConfig,
    collected: &mut CollectedSources,
    seen: &mut HashSet<String>,
) -> Result<()> {
    let logical_path = logical_path(path, config.strip_prefix.as_deref())?;
    if !seen.insert(logical_path.clone()) {
        collected.skipped += 1;
        collected
            .warnings
            .push(format!("{logical_path} given more than once, keeping first"));
        return Ok(());
    }

    collected.entries.push(SourceEntry {
        path: path.to_path_buf(),
        logical_path,
        size,
    });
    Ok(())
}

fn is_hidden(entry: &DirEntry) -> bool {
    entry
        .file_name()
        .to_str()
        .is_some_and(|name| name.starts_with('.'))
}

/// Computes the `/`-separated logical path of `path`.
///
/// `prefix` is removed when `path` starts with it; otherwise the path is
/// used as given. A path with a root keeps its leading `/`.
///
/// # Errors
///
/// Returns `InvalidParameter` if the path is not valid UTF-8.
///
/// # Examples
///
/// ```
/// use nvc_core::walker::logical_path;
/// use std::path::Path;
///
/// let path = Path::new("build/assets/hero.png");
/// assert_eq!(logical_path(path, None)?, "build/assets/hero.png");
/// assert_eq!(logical_path(path, Some(Path::new("build")))?, "assets/hero.png");
/// assert_eq!(logical_path(Path::new("/abs/file"), None)?, "/abs/file");
/// # Ok::<(), nvc_core::NvcError>(())
/// ```
pub fn logical_path(path: &Path, prefix: Option<&Path>) -> Result<String> {
    let relative = prefix
        .and_then(|prefix| path.strip_prefix(prefix).ok())
        .unwrap_or(path);

    let mut parts = Vec::new();
    let mut rooted = false;
    for component in relative.components() {
        match component {
            Component::RootDir => rooted = true,
            other => parts.push(other.as_os_str().to_str().ok_or_else(|| {
                NvcError::invalid_parameter(
                    "source path",
                    format!("{} is not valid UTF-8", path.display()),
                )
            })?),
        }
    }

    let joined = parts.join("/");
    Ok(if rooted { format!("/{joined}") } else { joined })
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn logical_paths(collected: &CollectedSources, root: &Path) -> Vec<String> {
        let prefix = format!("{}/", logical_path(root, None).unwrap());
        collected
            .entries
            .iter()
            .map(|e| {
                e.logical_path
                    .strip_prefix(&prefix)
                    .unwrap_or(&e.logical_path)
                    .to_string()
            })
            .collect()
    }

    #[test]
    fn test_walk_sorted_files_only() {
        let temp = TempDir::new().unwrap();
        let root = temp.path();
        fs::write(root.join("b.txt"), "b").unwrap();
        fs::write(root.join("a.txt"), "a").unwrap();
        fs::create_dir(root.join("sub")).unwrap();
        fs::write(root.join("sub/c.txt"), "cc").unwrap();

        let collected = collect_sources(&[root], &CreationConfig::default()).unwrap();
        assert_eq!(
            logical_paths(&collected, root),
            vec!["a.txt", "b.txt", "sub/c.txt"]
        );
        assert_eq!(collected.entries[2].size, 2);
        assert_eq!(collected.skipped, 0);
    }

    #[test]
    fn test_hidden_entries_skipped_by_default() {
        let temp = TempDir::new().unwrap();
        let root = temp.path();
        fs::write(root.join("visible"), "v").unwrap();
        fs::write(root.join(".hidden"), "h").unwrap();
        fs::create_dir(root.join(".git")).unwrap();
        fs::write(root.join(".git/config"), "c").unwrap();

        let collected = collect_sources(&[root], &CreationConfig::default()).unwrap();
        assert_eq!(logical_paths(&collected, root), vec!["visible"]);
        assert_eq!(collected.skipped, 2);

        let config = CreationConfig::default().with_include_hidden(true);
        let collected = collect_sources(&[root], &config).unwrap();
        assert_eq!(
            logical_paths(&collected, root),
            vec![".git/config", ".hidden", "visible"]
        );
    }

    #[test]
    fn test_strip_prefix() {
        let temp = TempDir::new().unwrap();
        let root = temp.path();
        fs::create_dir(root.join("textures")).unwrap();
        fs::write(root.join("textures/hero.png"), "png").unwrap();

        let config = CreationConfig::default().with_strip_prefix(Some(root.to_path_buf()));
        let collected = collect_sources(&[root.join("textures")], &config).unwrap();
        assert_eq!(collected.entries[0].logical_path, "textures/hero.png");
        assert_eq!(collected.entries[0].hash(), hash_of("textures/hero.png"));
    }

    #[test]
    fn test_file_taken_as_given() {
        let temp = TempDir::new().unwrap();
        let file = temp.path().join(".dotfile");
        fs::write(&file, "x").unwrap();

        let collected = collect_sources(&[&file], &CreationConfig::default()).unwrap();
        assert_eq!(collected.entries.len(), 1);
        assert_eq!(collected.entries[0].path, file);
    }

    #[test]
    fn test_repeated_source_kept_once() {
        let temp = TempDir::new().unwrap();
        let file = temp.path().join("once.txt");
        fs::write(&file, "x").unwrap();

        let collected = collect_sources(&[&file, &file], &CreationConfig::default()).unwrap();
        assert_eq!(collected.entries.len(), 1);
        assert_eq!(collected.skipped, 1);
        assert_eq!(collected.warnings.len(), 1);
    }

    #[test]
    fn test_missing_source() {
        let err = collect_sources(&["/nonexistent/nvc/source"], &CreationConfig::default())
            .unwrap_err();
        assert!(matches!(err, NvcError::SourceNotFound { .. }));
    }

    #[cfg(unix)]
    #[test]
    fn test_symlinks_skipped_unless_followed() {
        let temp = TempDir::new().unwrap();
        let root = temp.path();
        fs::write(root.join("target.txt"), "t").unwrap();
        std::os::unix::fs::symlink(root.join("target.txt"), root.join("link.txt")).unwrap();

        let collected = collect_sources(&[root], &CreationConfig::default()).unwrap();
        assert_eq!(logical_paths(&collected, root), vec!["target.txt"]);
        assert_eq!(collected.skipped, 1);

        let config = CreationConfig::default().with_follow_symlinks(true);
        let collected = collect_sources(&[root], &config).unwrap();
        assert_eq!(
            logical_paths(&collected, root),
            vec!["link.txt", "target.txt"]
        );
    }

    #[test]
    fn test_logical_path_relative_components() {
        assert_eq!(logical_path(Path::new("./a/b"), None).unwrap(), "./a/b");
        assert_eq!(
            logical_path(Path::new("a/b"), Some(Path::new("other"))).unwrap(),
            "a/b"
        );
    }
}
