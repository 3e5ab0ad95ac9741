//! Human-readable colored text formatter.
//!
//! Produces a terminal-friendly report with ANSI color codes, showing
//! per-plugin statuses, parsed-report summaries, discovered API endpoints,
//! and a one-line result.

use crate::plugins::PluginResult;
use crate::scan::ScanReport;
use colored::Colorize;

/// Formats a [`ScanReport`] as human-readable, ANSI-colored text.
///
/// Sections rendered (in order):
/// 1. **Header** — target path and timestamp.
/// 2. **Plugins** — per-plugin status, files scanned, duration.
/// 3. **Details** — per-plugin highlights (finding counts by risk,
///    discovered endpoints, secret hits).
/// 4. **Result** — overall success line.
pub fn format(report: &ScanReport) -> String {
    let mut out = String::new();

    // Header
    out.push_str(&format!(
        "\n{}\n",
        format!("  Scan: {}  ", report.target).bold().on_blue().white()
    ));
    out.push_str(&format!("  Timestamp: {}\n\n", report.timestamp));

    // Plugin status summary
    out.push_str(&format!("{}\n", "Plugins".bold().underline()));
    for result in &report.plugin_results {
        let icon = if result.skipped {
            "SKIP".dimmed().to_string()
        } else if result.error.is_some() {
            "FAIL".red().bold().to_string()
        } else {
            "DONE".green().bold().to_string()
        };

        let detail = if result.skipped {
            result
                .skip_reason
                .as_deref()
                .unwrap_or("skipped")
                .dimmed()
                .to_string()
        } else if let Some(ref error) = result.error {
            error.red().to_string()
        } else {
            format!(
                "{} files scanned in {}ms",
                result.files_scanned, result.duration_ms
            )
        };

        out.push_str(&format!(
            "  [{icon}] {name:<14} {detail}\n",
            name = result.plugin_name,
        ));
    }
    out.push('\n');

    // Per-plugin highlights
    for result in &report.plugin_results {
        if result.skipped || result.results.is_null() {
            continue;
        }
        let lines = highlight_lines(result);
        if lines.is_empty() {
            continue;
        }
        out.push_str(&format!("{}\n", result.plugin_name.bold().underline()));
        for line in lines {
            out.push_str(&format!("  {line}\n"));
        }
        out.push('\n');
    }

    // Result line
    let status = if report.success {
        "OK".green().bold().to_string()
    } else {
        "ERRORS".red().bold().to_string()
    };
    out.push_str(&format!(
        "Result: {status}  |  {} plugins\n",
        report.plugin_results.len()
    ));

    out
}

/// Extracts a few human-oriented lines from a plugin's structured results.
fn highlight_lines(result: &PluginResult) -> Vec<String> {
    let mut lines = Vec::new();

    // Report parsers: one line per parsed file with its risk totals.
    if let Some(reports) = result.results["reports"].as_object() {
        for (file, parsed) in reports {
            let findings = parsed["data"].as_object().map(|d| d.len()).unwrap_or(0);
            let mut totals = String::new();
            if let Some(summary) = parsed["summary"].as_object() {
                for (key, count) in summary {
                    let label = key.strip_prefix("total_").unwrap_or(key);
                    totals.push_str(&format!(" {}={}", risk_colored(label), count));
                }
            }
            lines.push(format!(
                "{file}: {} findings{totals}",
                findings.to_string().bold()
            ));
        }
    }

    // API discovery: one line per API with its endpoint count.
    if let Some(apis) = result.results["apis"].as_array() {
        for api in apis {
            let name = api["name"].as_str().unwrap_or("?");
            let count = api["endpoints"].as_array().map(|e| e.len()).unwrap_or(0);
            lines.push(format!("{name}: {count} endpoints"));
        }
    }

    // git-secrets: one line per file with hits.
    if let Some(hits) = result.results["hits"].as_object() {
        for (file, matches) in hits {
            let count = matches.as_object().map(|m| m.len()).unwrap_or(0);
            lines.push(format!(
                "{file}: {} potential secrets",
                count.to_string().red().bold()
            ));
        }
    }

    // brakeman: warning count.
    if let Some(warnings) = result.results["warnings"].as_object() {
        if !warnings.is_empty() {
            lines.push(format!(
                "{} warnings",
                warnings.len().to_string().yellow().bold()
            ));
        }
    }

    lines
}

fn risk_colored(label: &str) -> String {
    match label {
        "critical" | "high" => label.red().bold().to_string(),
        "medium" => label.yellow().to_string(),
        "low" => label.green().to_string(),
        other => other.to_string(),
    }
}
