//! JSON output formatter.
//!
//! Produces a pretty-printed JSON document containing run metadata, a
//! per-plugin summary, and every plugin's structured results.

use crate::plugins::PluginResult;
use crate::scan::ScanReport;

#[derive(serde::Serialize)]
struct JsonOutput<'a> {
    target: &'a str,
    timestamp: &'a str,
    success: bool,
    summary: Summary,
    plugin_results: &'a [PluginResult],
}

#[derive(serde::Serialize)]
struct Summary {
    plugins_run: usize,
    plugins_skipped: usize,
    plugins_errored: usize,
}

/// Formats a [`ScanReport`] as pretty-printed JSON.
///
/// # Panics
///
/// Panics if the report cannot be serialized (should not happen with valid data).
pub fn format(report: &ScanReport) -> String {
    let output = JsonOutput {
        target: &report.target,
        timestamp: &report.timestamp,
        success: report.success,
        summary: {
            // Single pass over results instead of three separate iterations.
            let (run, skipped, errored) =
                report
                    .plugin_results
                    .iter()
                    .fold((0, 0, 0), |(r, s, e), result| {
                        if result.skipped {
                            (r, s + 1, e)
                        } else if result.error.is_some() {
                            (r + 1, s, e + 1)
                        } else {
                            (r + 1, s, e)
                        }
                    });
            Summary {
                plugins_run: run,
                plugins_skipped: skipped,
                plugins_errored: errored,
            }
        },
        plugin_results: &report.plugin_results,
    };

    serde_json::to_string_pretty(&output).expect("JSON serialization failed")
}
