//! Output formatter trait for CLI results.

use anyhow::Result;
use nvc_core::CreationReport;
use nvc_core::ExtractionReport;
use nvc_core::PathList;
use nvc_core::TocEntry;
use serde::Serialize;
use std::path::Path;

/// Common output formatter trait
pub trait OutputFormatter {
    /// Format a ToC listing, one name or hash per line
    fn format_toc_short(&self, entries: &[TocEntry], paths: &PathList) -> Result<()>;

    /// Format a ToC listing with offsets, sizes and flags
    fn format_toc_long(
        &self,
        entries: &[TocEntry],
        paths: &PathList,
        human_readable: bool,
    ) -> Result<()>;

    /// Format extraction result
    fn format_extraction_result(&self, output_dir: &Path, report: &ExtractionReport)
    -> Result<()>;

    /// Format creation result
    fn format_creation_result(&self, output_path: &Path, report: &CreationReport) -> Result<()>;

    /// Format warning message
    fn format_warning(&self, message: &str);
}

/// Generic JSON output structure
#[derive(Debug, Serialize)]
pub struct JsonOutput<T> {
    pub operation: String,
    pub status: Status,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Status {
    Success,
    Warning,
}

impl<T: Serialize> JsonOutput<T> {
    pub fn success(operation: impl Into<String>, data: T) -> Self {
        Self {
            operation: operation.into(),
            status: Status::Success,
            data: Some(data),
        }
    }

    pub fn warning(operation: impl Into<String>, data: T) -> Self {
        Self {
            operation: operation.into(),
            status: Status::Warning,
            data: Some(data),
        }
    }
}
