//! High-level public API for listing, extracting and creating archives on
//! the filesystem.

use std::collections::HashSet;
use std::fs;
use std::fs::File;
use std::io::BufReader;
use std::io::BufWriter;
use std::io::Read;
use std::path::Component;
use std::path::Path;
use std::path::PathBuf;
use std::time::Instant;

use tracing::debug;
use tracing::warn;

use crate::Archive;
use crate::CreationConfig;
use crate::CreationReport;
use crate::ExtractionConfig;
use crate::ExtractionReport;
use crate::NvcError;
use crate::PathList;
use crate::ProgressCallback;
use crate::Result;
use crate::Writer;
use crate::format::TocEntry;
use crate::format::header_len;
use crate::hash::Hash;
use crate::walker::CollectedSources;
use crate::walker::SourceEntry;
use crate::walker::collect_sources;

/// Reads the table of contents of the archive at `archive_path`.
///
/// Entries come back in file order, duplicates included. No payload is read.
///
/// # Errors
///
/// Returns `Io` if the file cannot be opened, or any parse error.
///
/// # Examples
///
/// ```no_run
/// use nvc_core::list_archive;
///
/// for entry in list_archive("data.nvc")? {
///     println!("{entry}");
/// }
/// # Ok::<(), nvc_core::NvcError>(())
/// ```
pub fn list_archive<P: AsRef<Path>>(archive_path: P) -> Result<Vec<TocEntry>> {
    let archive = open_archive(archive_path.as_ref())?;
    Ok(archive.entries().to_vec())
}

/// Extracts the archive at `archive_path` into `output_dir`.
///
/// Each distinct hash is extracted once, in the order it first appears in
/// the ToC; with duplicate hashes the last record's payload is used. Members
/// named by `paths` go to their listed path. Other members are written under
/// `data/` only when `config.extract_unknown` is set.
///
/// A member that cannot be read or written is skipped with a warning in the
/// report; extraction carries on with the next one.
///
/// # Errors
///
/// Returns an error if the archive cannot be opened or its header is
/// malformed, or if `output_dir` cannot be created.
///
/// # Examples
///
/// ```no_run
/// use nvc_core::ExtractionConfig;
/// use nvc_core::NoopProgress;
/// use nvc_core::PathList;
/// use nvc_core::extract_archive;
///
/// let paths = PathList::from_file("paths.txt")?;
/// let config = ExtractionConfig::default().with_extract_unknown(true);
/// let report = extract_archive("data.nvc", "out", &paths, &config, &mut NoopProgress)?;
/// println!("Extracted {} files", report.files_extracted);
/// # Ok::<(), nvc_core::NvcError>(())
/// ```
pub fn extract_archive<P: AsRef<Path>, Q: AsRef<Path>>(
    archive_path: P,
    output_dir: Q,
    paths: &PathList,
    config: &ExtractionConfig,
    progress: &mut dyn ProgressCallback,
) -> Result<ExtractionReport> {
    let start = Instant::now();
    let output_dir = output_dir.as_ref();
    let mut archive = open_archive(archive_path.as_ref())?;
    let mut report = ExtractionReport::new();
    report.duplicates = archive.duplicate_count();

    let mut seen = HashSet::with_capacity(archive.len());
    let mut plan: Vec<(Hash, Option<&str>)> = Vec::new();
    for hash in archive.entry_order() {
        if !seen.insert(hash) {
            continue;
        }
        match paths.resolve(hash) {
            Some(name) => plan.push((hash, Some(name))),
            None if config.extract_unknown => plan.push((hash, None)),
            None => report.files_skipped += 1,
        }
    }

    fs::create_dir_all(output_dir)?;
    let mut context = ProgressContext::new(progress, plan.len());

    for (hash, name) in plan {
        let label = name.map_or_else(|| PathBuf::from(hash.to_string()), PathBuf::from);
        context.on_entry_start(&label);

        match extract_member(&mut archive, hash, name, output_dir, config) {
            Ok((relative, written)) => {
                debug!(
                    hash = %hash,
                    path = %relative.display(),
                    bytes = written,
                    "extracted member"
                );
                report.files_extracted += 1;
                if name.is_some() {
                    report.named_extracted += 1;
                } else {
                    report.unknown_extracted += 1;
                }
                report.bytes_written += written;
                context.progress.on_bytes_written(written);
                context.on_entry_complete(&relative);
            }
            Err(err) => {
                warn!(hash = %hash, error = %err, "skipped member");
                report.files_skipped += 1;
                report.add_warning(format!("{hash}: {err}"));
                context.on_entry_complete(&label);
            }
        }
    }

    context.on_complete();
    report.duration = start.elapsed();
    Ok(report)
}

/// Creates an archive at `output_path` from files and directories.
///
/// All sources are collected first so the member count is known before the
/// header is reserved. Members are stored uncompressed unless
/// `config.compression_level` is set. Any failure while writing members
/// aborts creation and removes the partial output file.
///
/// # Errors
///
/// Returns an error if:
/// - The configuration is invalid
/// - A source does not exist or cannot be read
/// - The archive cannot be written, or exceeds the 32-bit offset limit
///
/// # Examples
///
/// ```no_run
/// use nvc_core::CreationConfig;
/// use nvc_core::NoopProgress;
/// use nvc_core::create_archive;
///
/// let config = CreationConfig::default().with_compression_level(Some(9));
/// let report = create_archive("data.nvc", &["assets/"], &config, &mut NoopProgress)?;
/// println!("Created archive with {} files", report.files_added);
/// # Ok::<(), nvc_core::NvcError>(())
/// ```
pub fn create_archive<P: AsRef<Path>, Q: AsRef<Path>>(
    output_path: P,
    sources: &[Q],
    config: &CreationConfig,
    progress: &mut dyn ProgressCallback,
) -> Result<CreationReport> {
    let start = Instant::now();
    let output = output_path.as_ref();
    config.validate()?;

    let mut collected = collect_sources(sources, config)?;
    exclude_output(output, &mut collected);
    let mut report = CreationReport::new();
    report.files_skipped = collected.skipped;
    for warning in collected.warnings {
        report.add_warning(warning);
    }

    if let Err(err) = write_members(output, &collected.entries, config, progress, &mut report) {
        warn!(path = %output.display(), error = %err, "removing partial archive");
        let _ = fs::remove_file(output);
        return Err(err);
    }

    report.duration = start.elapsed();
    debug!(
        path = %output.display(),
        members = report.files_added,
        size = report.archive_size,
        "created archive"
    );
    Ok(report)
}

fn write_members(
    output: &Path,
    entries: &[SourceEntry],
    config: &CreationConfig,
    progress: &mut dyn ProgressCallback,
    report: &mut CreationReport,
) -> Result<()> {
    let total = entries.len();
    let declared = u32::try_from(total).map_err(|_| NvcError::SizeOverflow {
        what: "member count",
        value: total as u64,
    })?;

    let sink = BufWriter::new(File::create(output)?);
    let mut writer = Writer::new(sink, declared)?;
    let mut context = ProgressContext::new(progress, total);

    for entry in entries {
        let logical = Path::new(&entry.logical_path);
        context.on_entry_start(logical);

        let file = File::open(&entry.path)?;
        let reader = ProgressTrackingReader::new(file, &mut *context.progress);
        let stored = match config.compression_level {
            Some(level) => writer.create_compressed(reader, entry.hash(), level)?,
            None => writer.create(reader, entry.hash())?,
        };

        report.files_added += 1;
        report.bytes_stored += stored;
        report.bytes_read += writer
            .entries()
            .last()
            .map_or(0, |written| u64::from(written.raw_length));
        context.on_entry_complete(logical);
    }

    writer
        .finalize()?
        .into_inner()
        .map_err(|e| NvcError::Io(e.into_error()))?;
    report.archive_size = header_len(declared) + report.bytes_stored;

    context.on_complete();
    Ok(())
}

fn open_archive(path: &Path) -> Result<Archive<BufReader<File>>> {
    let file = File::open(path)?;
    Archive::parse(BufReader::new(file))
}

/// Reads one member and writes it below `output_dir`, returning the relative
/// output path and the byte count.
fn extract_member(
    archive: &mut Archive<BufReader<File>>,
    hash: Hash,
    name: Option<&str>,
    output_dir: &Path,
    config: &ExtractionConfig,
) -> Result<(PathBuf, u64)> {
    let relative = match name {
        Some(name) => Some(sanitize_listed_path(name).ok_or_else(|| NvcError::UnsafePath {
            path: name.to_string(),
        })?),
        None => None,
    };

    let data = archive.file(hash)?;
    let relative = relative.unwrap_or_else(|| config.naming.path_for(hash, &data));

    let target = output_dir.join(&relative);
    if target.exists() && !config.overwrite {
        return Err(NvcError::OutputExists { path: target });
    }
    if let Some(parent) = target.parent() {
        fs::create_dir_all(parent)?;
    }
    fs::write(&target, &data)?;

    Ok((relative, data.len() as u64))
}

/// Drops the archive being written from the collected members.
///
/// An existing output inside a walked directory would otherwise be read
/// while it is rewritten. A missing output cannot have been collected.
fn exclude_output(output: &Path, collected: &mut CollectedSources) {
    let Ok(target) = fs::canonicalize(output) else {
        return;
    };
    let file_name = target.file_name();

    let mut removed = Vec::new();
    collected.entries.retain(|entry| {
        let same = entry.path.file_name() == file_name
            && fs::canonicalize(&entry.path).is_ok_and(|path| path == target);
        if same {
            removed.push(entry.path.clone());
        }
        !same
    });

    for path in removed {
        warn!(path = %path.display(), "skipping the archive being created");
        collected.skipped += 1;
        collected
            .warnings
            .push(format!("skipped {}: it is the archive being created", path.display()));
    }
}

/// Turns a listed logical path into a relative output path.
///
/// Root and `.` components are dropped. Returns `None` for paths that would
/// leave the output directory (`..`, drive prefixes) or that are empty once
/// cleaned.
fn sanitize_listed_path(name: &str) -> Option<PathBuf> {
    let mut clean = PathBuf::new();
    for component in Path::new(name).components() {
        match component {
            Component::Normal(part) => clean.push(part),
            Component::RootDir | Component::CurDir => {}
            Component::ParentDir | Component::Prefix(_) => return None,
        }
    }
    (!clean.as_os_str().is_empty()).then_some(clean)
}

/// Tracks the 1-indexed entry position for progress callbacks.
struct ProgressContext<'a> {
    progress: &'a mut dyn ProgressCallback,
    current_entry: usize,
    total_entries: usize,
}

impl<'a> ProgressContext<'a> {
    fn new(progress: &'a mut dyn ProgressCallback, total_entries: usize) -> Self {
        Self {
            progress,
            current_entry: 0,
            total_entries,
        }
    }

    fn on_entry_start(&mut self, path: &Path) {
        self.current_entry += 1;
        self.progress
            .on_entry_start(path, self.total_entries, self.current_entry);
    }

    fn on_entry_complete(&mut self, path: &Path) {
        self.progress.on_entry_complete(path);
    }

    fn on_complete(&mut self) {
        self.progress.on_complete();
    }
}

/// Reader that reports bytes read from a source file in batches.
struct ProgressTrackingReader<'a, R> {
    inner: R,
    progress: &'a mut dyn ProgressCallback,
    bytes_since_last_update: u64,
    batch_threshold: u64,
}

impl<'a, R> ProgressTrackingReader<'a, R> {
    fn new(inner: R, progress: &'a mut dyn ProgressCallback) -> Self {
        Self {
            inner,
            progress,
            bytes_since_last_update: 0,
            batch_threshold: 1024 * 1024,
        }
    }

    fn flush_progress(&mut self) {
        if self.bytes_since_last_update > 0 {
            self.progress.on_bytes_written(self.bytes_since_last_update);
            self.bytes_since_last_update = 0;
        }
    }
}

impl<R: Read> Read for ProgressTrackingReader<'_, R> {
    fn read(&mut self, buf: &mut [u8]) -> std::io::Result<usize> {
        let bytes_read = self.inner.read(buf)?;
        if bytes_read > 0 {
            self.bytes_since_last_update += bytes_read as u64;
            if self.bytes_since_last_update >= self.batch_threshold {
                self.flush_progress();
            }
        }
        Ok(bytes_read)
    }
}

impl<R> Drop for ProgressTrackingReader<'_, R> {
    fn drop(&mut self) {
        self.flush_progress();
    }
}
