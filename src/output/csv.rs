//! CSV output formatter.
//!
//! Flattens every parsed finding into one row for spreadsheet triage.
//! API-discovery endpoints get rows too, with the classification columns
//! left empty.

use crate::scan::ScanReport;
use serde_json::Value;

const HEADER: [&str; 9] = [
    "plugin",
    "report",
    "finding",
    "risk",
    "impact",
    "exploitability",
    "category",
    "component",
    "status",
];

/// Formats a [`ScanReport`] as CSV, one row per finding or endpoint.
pub fn format(report: &ScanReport) -> String {
    let mut writer = csv::Writer::from_writer(vec![]);
    // Writing to an in-memory Vec cannot fail.
    let _ = writer.write_record(HEADER);

    for result in &report.plugin_results {
        let plugin = result.plugin_name.as_str();

        // Report parsers: results.reports.<file>.data.<finding> records.
        if let Some(reports) = result.results["reports"].as_object() {
            for (file, parsed) in reports {
                if let Some(data) = parsed["data"].as_object() {
                    for (finding, record) in data {
                        let _ = writer.write_record([
                            plugin,
                            file.as_str(),
                            finding.as_str(),
                            str_field(record, "risk"),
                            str_field(record, "impact"),
                            str_field(record, "exploitability"),
                            str_field(record, "category"),
                            str_field(record, "component"),
                            str_field(record, "status"),
                        ]);
                    }
                }
            }
        }

        // API discovery: results.apis[].endpoints[].
        if let Some(apis) = result.results["apis"].as_array() {
            for api in apis {
                let name = api["name"].as_str().unwrap_or("");
                if let Some(endpoints) = api["endpoints"].as_array() {
                    for endpoint in endpoints {
                        let method = endpoint["method"].as_str().unwrap_or("");
                        let path = endpoint["path"].as_str().unwrap_or("");
                        let finding = if method.is_empty() {
                            path.to_string()
                        } else {
                            format!("{method} {path}")
                        };
                        let _ = writer.write_record([
                            plugin,
                            name,
                            finding.as_str(),
                            "",
                            "",
                            "",
                            "",
                            "",
                            "",
                        ]);
                    }
                }
            }
        }
    }

    let bytes = writer.into_inner().unwrap_or_default();
    String::from_utf8_lossy(&bytes).into_owned()
}

fn str_field<'a>(record: &'a Value, key: &str) -> &'a str {
    record[key].as_str().unwrap_or("")
}
