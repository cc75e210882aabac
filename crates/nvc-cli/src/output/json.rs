//! JSON output formatter for machine-readable results.

use super::formatter::JsonOutput;
use super::formatter::OutputFormatter;
use anyhow::Result;
use nvc_core::CreationReport;
use nvc_core::ExtractionReport;
use nvc_core::PathList;
use nvc_core::TocEntry;
use serde::Serialize;
use std::io::Write;
use std::io::{self};
use std::path::Path;

pub struct JsonFormatter;

#[derive(Debug, Serialize)]
struct EntryOutput {
    hash: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    path: Option<String>,
    offset: u32,
    raw_length: u32,
    stored_length: u32,
    flags: u32,
    storage: &'static str,
}

impl EntryOutput {
    fn new(entry: &TocEntry, paths: &PathList) -> Self {
        Self {
            hash: entry.hash.to_string(),
            path: paths.resolve(entry.hash).map(str::to_string),
            offset: entry.offset,
            raw_length: entry.raw_length,
            stored_length: entry.stored_length,
            flags: entry.flags.to_raw(),
            storage: entry.flags.name(),
        }
    }
}

#[derive(Debug, Serialize)]
struct ListOutput {
    total_entries: usize,
    total_size: u64,
    entries: Vec<EntryOutput>,
}

impl ListOutput {
    fn new(entries: &[TocEntry], paths: &PathList) -> Self {
        Self {
            total_entries: entries.len(),
            total_size: entries.iter().map(|e| u64::from(e.raw_length)).sum(),
            entries: entries.iter().map(|e| EntryOutput::new(e, paths)).collect(),
        }
    }
}

impl JsonFormatter {
    fn output<T: Serialize>(value: &T) -> Result<()> {
        Self::output_to(value, &mut io::stdout())
    }

    fn output_to<T: Serialize>(value: &T, out: &mut dyn Write) -> Result<()> {
        let json = serde_json::to_string_pretty(value)?;
        writeln!(out, "{json}")?;
        Ok(())
    }
}

impl OutputFormatter for JsonFormatter {
    fn format_toc_short(&self, entries: &[TocEntry], paths: &PathList) -> Result<()> {
        Self::output(&JsonOutput::success("list", ListOutput::new(entries, paths)))
    }

    fn format_toc_long(
        &self,
        entries: &[TocEntry],
        paths: &PathList,
        _human_readable: bool,
    ) -> Result<()> {
        Self::output(&JsonOutput::success("list", ListOutput::new(entries, paths)))
    }

    fn format_extraction_result(
        &self,
        output_dir: &Path,
        report: &ExtractionReport,
    ) -> Result<()> {
        #[derive(Serialize)]
        struct ExtractionOutput {
            output_dir: String,
            files_extracted: usize,
            named_extracted: usize,
            unknown_extracted: usize,
            files_skipped: usize,
            duplicates: usize,
            bytes_written: u64,
            duration_ms: u128,
            warnings: Vec<String>,
        }

        let data = ExtractionOutput {
            output_dir: output_dir.display().to_string(),
            files_extracted: report.files_extracted,
            named_extracted: report.named_extracted,
            unknown_extracted: report.unknown_extracted,
            files_skipped: report.files_skipped,
            duplicates: report.duplicates,
            bytes_written: report.bytes_written,
            duration_ms: report.duration.as_millis(),
            warnings: report.warnings.clone(),
        };

        Self::output(&JsonOutput::success("extract", data))
    }

    fn format_creation_result(&self, output_path: &Path, report: &CreationReport) -> Result<()> {
        #[derive(Serialize)]
        struct CreationOutput {
            output_path: String,
            files_added: usize,
            files_skipped: usize,
            bytes_read: u64,
            bytes_stored: u64,
            archive_size: u64,
            compression_ratio: f64,
            compression_percentage: f64,
            duration_ms: u128,
            warnings: Vec<String>,
        }

        let data = CreationOutput {
            output_path: output_path.display().to_string(),
            files_added: report.files_added,
            files_skipped: report.files_skipped,
            bytes_read: report.bytes_read,
            bytes_stored: report.bytes_stored,
            archive_size: report.archive_size,
            compression_ratio: report.compression_ratio(),
            compression_percentage: report.compression_percentage(),
            duration_ms: report.duration.as_millis(),
            warnings: report.warnings.clone(),
        };

        Self::output(&JsonOutput::success("create", data))
    }

    fn format_warning(&self, message: &str) {
        #[derive(Serialize)]
        struct WarningData {
            message: String,
        }

        let output = JsonOutput::warning(
            "warning",
            WarningData {
                message: message.to_string(),
            },
        );
        // keeps stdout a single JSON document
        let _ = Self::output_to(&output, &mut io::stderr());
    }
}
