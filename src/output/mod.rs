//! Output formatting for scan reports.
//!
//! Three formats are supported:
//!
//! | Format | Module | Use case |
//! |--------|--------|----------|
//! | [`Pretty`](OutputFormat::Pretty) | [`pretty`] | Terminal / human review |
//! | [`Json`](OutputFormat::Json)     | [`json`]   | Automation / scripting  |
//! | [`Csv`](OutputFormat::Csv)       | [`csv`]    | Spreadsheets / triage   |
//!
//! Use [`format_scan_report`] to render a [`ScanReport`] in any of the above
//! formats.

pub mod csv;
pub mod json;
pub mod pretty;

use crate::scan::ScanReport;

/// Supported output formats for scan reports.
#[derive(Debug, Clone, clap::ValueEnum)]
pub enum OutputFormat {
    /// Human-readable colored text with per-plugin summaries.
    Pretty,
    /// Machine-readable JSON.
    Json,
    /// One row per parsed finding, for spreadsheet triage.
    Csv,
}

/// Formats a [`ScanReport`] in the requested [`OutputFormat`].
///
/// # Examples
///
/// ```rust,no_run
/// use vulnharvest::output::{format_scan_report, OutputFormat};
/// # use vulnharvest::scan::ScanReport;
/// # fn example(report: &ScanReport) {
/// let json = format_scan_report(report, &OutputFormat::Json);
/// println!("{json}");
/// # }
/// ```
pub fn format_scan_report(report: &ScanReport, format: &OutputFormat) -> String {
    match format {
        OutputFormat::Pretty => pretty::format(report),
        OutputFormat::Json => json::format(report),
        OutputFormat::Csv => csv::format(report),
    }
}
