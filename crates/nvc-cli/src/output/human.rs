//! Human-readable output formatter with colors and styling.

use super::formatter::OutputFormatter;
use crate::progress::humanize_bytes;
use anyhow::Result;
use console::Term;
use console::style;
use nvc_core::CreationReport;
use nvc_core::ExtractionReport;
use nvc_core::PathList;
use nvc_core::TocEntry;
use std::path::Path;

pub struct HumanFormatter {
    verbose: bool,
    quiet: bool,
    use_colors: bool,
    term: Term,
}

impl HumanFormatter {
    pub fn new(verbose: bool, quiet: bool) -> Self {
        Self {
            verbose,
            quiet,
            use_colors: console::colors_enabled(),
            term: Term::stdout(),
        }
    }

    fn format_number(n: usize) -> String {
        let s = n.to_string();
        let mut result = String::with_capacity(s.len() + s.len() / 3);
        for (i, c) in s.chars().enumerate() {
            if i > 0 && (s.len() - i) % 3 == 0 {
                result.push(',');
            }
            result.push(c);
        }
        result
    }

    fn size(bytes: u32, human_readable: bool) -> String {
        if human_readable {
            humanize_bytes(u64::from(bytes))
        } else {
            bytes.to_string()
        }
    }

    /// Listed name for `entry`, or its hash when the path list has none.
    fn display_name(entry: &TocEntry, paths: &PathList) -> String {
        paths
            .resolve(entry.hash)
            .map_or_else(|| entry.hash.to_string(), str::to_string)
    }

    fn write_heading(&self, mark: &str, text: &str) {
        if self.use_colors {
            let _ = self
                .term
                .write_line(&format!("{} {text}", style(mark).green().bold()));
        } else {
            let _ = self.term.write_line(text);
        }
    }

    fn write_warnings(&self, warnings: &[String]) {
        if warnings.is_empty() {
            return;
        }
        let _ = self.term.write_line("");
        if self.use_colors {
            let _ = self
                .term
                .write_line(&format!("{}", style("Warnings:").yellow().bold()));
        } else {
            let _ = self.term.write_line("Warnings:");
        }
        for warning in warnings {
            let _ = self.term.write_line(&format!("  - {warning}"));
        }
    }
}

impl OutputFormatter for HumanFormatter {
    fn format_toc_short(&self, entries: &[TocEntry], paths: &PathList) -> Result<()> {
        if self.quiet {
            return Ok(());
        }

        for entry in entries {
            let _ = self.term.write_line(&Self::display_name(entry, paths));
        }

        Ok(())
    }

    fn format_toc_long(
        &self,
        entries: &[TocEntry],
        paths: &PathList,
        human_readable: bool,
    ) -> Result<()> {
        if self.quiet {
            return Ok(());
        }

        for entry in entries {
            let mut line = format!(
                "{:<9} {:>10} {:>10} {:>10}  {}",
                entry.flags.name(),
                entry.offset,
                Self::size(entry.raw_length, human_readable),
                Self::size(entry.stored_length, human_readable),
                entry.hash,
            );
            if let Some(path) = paths.resolve(entry.hash) {
                line.push_str("  ");
                line.push_str(path);
            }
            let _ = self.term.write_line(&line);
        }

        let raw: u64 = entries.iter().map(|e| u64::from(e.raw_length)).sum();
        let stored: u64 = entries.iter().map(|e| u64::from(e.stored_length)).sum();
        let _ = self.term.write_line("");
        let _ = self.term.write_line(&format!(
            "Total: {} entries, {} ({} on disk)",
            Self::format_number(entries.len()),
            humanize_bytes(raw),
            humanize_bytes(stored)
        ));

        Ok(())
    }

    fn format_extraction_result(
        &self,
        output_dir: &Path,
        report: &ExtractionReport,
    ) -> Result<()> {
        if self.quiet {
            return Ok(());
        }

        self.write_heading(
            "✓",
            &format!("Extraction complete: {}", output_dir.display()),
        );
        let _ = self.term.write_line(&format!(
            "  Files extracted:  {}",
            Self::format_number(report.files_extracted)
        ));
        let _ = self.term.write_line(&format!(
            "  Total size:       {}",
            humanize_bytes(report.bytes_written)
        ));
        if report.files_skipped > 0 {
            let _ = self.term.write_line(&format!(
                "  Files skipped:    {}",
                Self::format_number(report.files_skipped)
            ));
        }

        if self.verbose {
            let _ = self.term.write_line(&format!(
                "  Named:            {}",
                Self::format_number(report.named_extracted)
            ));
            let _ = self.term.write_line(&format!(
                "  Unknown:          {}",
                Self::format_number(report.unknown_extracted)
            ));
            let _ = self
                .term
                .write_line(&format!("  Duplicate hashes: {}", report.duplicates));
            let _ = self
                .term
                .write_line(&format!("  Duration:         {:?}", report.duration));
        }

        self.write_warnings(&report.warnings);
        Ok(())
    }

    fn format_creation_result(&self, output_path: &Path, report: &CreationReport) -> Result<()> {
        if self.quiet {
            return Ok(());
        }

        self.write_heading(
            "✓",
            &format!("Archive created: {}", output_path.display()),
        );
        let _ = self.term.write_line("");
        let _ = self.term.write_line(&format!(
            "  Files added:      {}",
            Self::format_number(report.files_added)
        ));
        let _ = self.term.write_line(&format!(
            "  Total size:       {}",
            humanize_bytes(report.bytes_read)
        ));
        if report.bytes_stored < report.bytes_read {
            let _ = self.term.write_line(&format!(
                "  Stored size:      {}",
                humanize_bytes(report.bytes_stored)
            ));
            let _ = self.term.write_line(&format!(
                "  Compression:      {:.1}%",
                report.compression_percentage()
            ));
        }
        let _ = self.term.write_line(&format!(
            "  Archive size:     {}",
            humanize_bytes(report.archive_size)
        ));
        if report.files_skipped > 0 {
            let _ = self
                .term
                .write_line(&format!("  Files skipped:    {}", report.files_skipped));
        }
        if self.verbose {
            let _ = self
                .term
                .write_line(&format!("  Duration:         {:?}", report.duration));
        }

        self.write_warnings(&report.warnings);
        Ok(())
    }

    fn format_warning(&self, message: &str) {
        if self.quiet {
            return;
        }

        // stdout carries listings; warnings go to stderr
        let term = Term::stderr();
        if self.use_colors {
            let _ = term.write_line(&format!("{} {message}", style("⚠").yellow().bold()));
        } else {
            let _ = term.write_line(&format!("WARNING: {message}"));
        }
    }
}
