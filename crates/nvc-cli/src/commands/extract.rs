//! Extract command implementation.

use super::list::load_pathlist;
use crate::cli::ExtractArgs;
use crate::error::add_archive_context;
use crate::output::OutputFormatter;
use crate::progress::CliProgress;
use anyhow::Context;
use anyhow::Result;
use nvc_core::ExtractionConfig;
use nvc_core::NoopProgress;
use nvc_core::ProgressCallback;
use nvc_core::extract_archive;
use std::env;

pub fn execute(
    args: &ExtractArgs,
    formatter: &dyn OutputFormatter,
    show_progress: bool,
) -> Result<()> {
    let output_dir = match &args.output_dir {
        Some(dir) => dir.clone(),
        None => env::current_dir().context("failed to get current directory")?,
    };

    let paths = load_pathlist(args.pathlist.as_deref())?;
    if paths.is_empty() && !args.unknown {
        formatter.format_warning(
            "No path list given and --unknown not set; nothing will be extracted",
        );
    }

    let config = ExtractionConfig::new()
        .with_extract_unknown(args.unknown)
        .with_overwrite(args.force);

    let mut progress: Box<dyn ProgressCallback> = if show_progress && CliProgress::should_show() {
        Box::new(CliProgress::new("Extracting"))
    } else {
        Box::new(NoopProgress)
    };

    let report = add_archive_context(
        extract_archive(&args.archive, &output_dir, &paths, &config, progress.as_mut()),
        &args.archive,
    )?;
    drop(progress);

    formatter.format_extraction_result(&output_dir, &report)?;

    Ok(())
}
