//! Create command implementation.

use crate::cli::CreateArgs;
use crate::error::add_archive_context;
use crate::output::OutputFormatter;
use crate::progress::CliProgress;
use anyhow::Result;
use anyhow::bail;
use nvc_core::CreationConfig;
use nvc_core::NoopProgress;
use nvc_core::ProgressCallback;
use nvc_core::create_archive;

pub fn execute(
    args: &CreateArgs,
    formatter: &dyn OutputFormatter,
    show_progress: bool,
) -> Result<()> {
    if args.output.exists() {
        if !args.force {
            bail!(
                "Output file '{}' already exists\n\
                 HINT: Use --force to overwrite it.",
                args.output.display()
            );
        }
        formatter.format_warning(&format!(
            "Overwriting existing archive '{}'",
            args.output.display()
        ));
    }

    let config = CreationConfig::new()
        .with_compression_level(args.compression_level)
        .with_strip_prefix(args.strip_prefix.clone())
        .with_follow_symlinks(args.follow_symlinks)
        .with_include_hidden(args.include_hidden);

    let mut progress: Box<dyn ProgressCallback> = if show_progress && CliProgress::should_show() {
        Box::new(CliProgress::new("Creating"))
    } else {
        Box::new(NoopProgress)
    };

    let report = add_archive_context(
        create_archive(&args.output, args.sources.as_slice(), &config, progress.as_mut()),
        &args.output,
    )?;
    drop(progress);

    formatter.format_creation_result(&args.output, &report)?;

    Ok(())
}
