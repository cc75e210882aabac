//! List command implementation

use crate::cli::ListArgs;
use crate::error::add_archive_context;
use crate::output::OutputFormatter;
use anyhow::Context;
use anyhow::Result;
use nvc_core::PathList;
use nvc_core::TocEntry;
use nvc_core::list_archive;

pub fn execute(args: &ListArgs, formatter: &dyn OutputFormatter) -> Result<()> {
    let paths = load_pathlist(args.pathlist.as_deref())?;

    let mut entries = add_archive_context(list_archive(&args.archive), &args.archive)?;
    if !args.hashes.is_empty() {
        entries.retain(|entry| args.hashes.contains(&entry.hash));
        warn_missing(&args.hashes, &entries, formatter);
    }

    if args.long {
        formatter.format_toc_long(&entries, &paths, args.human_readable)?;
    } else {
        formatter.format_toc_short(&entries, &paths)?;
    }

    Ok(())
}

/// Loads the optional path list, or returns an empty one.
pub fn load_pathlist(path: Option<&std::path::Path>) -> Result<PathList> {
    match path {
        Some(path) => PathList::from_file(path)
            .with_context(|| format!("Failed to read path list '{}'", path.display())),
        None => Ok(PathList::new()),
    }
}

fn warn_missing(wanted: &[nvc_core::Hash], found: &[TocEntry], formatter: &dyn OutputFormatter) {
    for hash in wanted {
        if !found.iter().any(|entry| entry.hash == *hash) {
            formatter.format_warning(&format!("No entry with hash {hash}"));
        }
    }
}
