use vulnharvest::output::{format_scan_report, OutputFormat};
use vulnharvest::plugins::PluginResult;
use vulnharvest::scan::ScanReport;

fn sample_report() -> ScanReport {
    ScanReport {
        target: "./target-repo".to_string(),
        timestamp: "2020-01-05T00:00:00+00:00".to_string(),
        plugin_results: vec![
            PluginResult {
                plugin_name: "ncc_report".to_string(),
                results: serde_json::json!({
                    "reports": {
                        "report.txt": {
                            "data": {
                                "1: SQL Injection": {
                                    "risk": "high",
                                    "impact": "high",
                                    "exploitability": "medium",
                                    "category": "Injection",
                                    "component": "Authentication",
                                    "status": "Open",
                                }
                            },
                            "summary": { "total_high": 1 },
                        }
                    }
                }),
                files_scanned: 1,
                skipped: false,
                skip_reason: None,
                error: None,
                duration_ms: 12,
            },
            PluginResult {
                plugin_name: "express_api".to_string(),
                results: serde_json::json!({
                    "apis": [{
                        "name": "src/app.js",
                        "endpoints": [
                            { "path": "/api/list", "method": "get" },
                            { "path": "/health", "method": "get" },
                        ],
                    }]
                }),
                files_scanned: 4,
                skipped: false,
                skip_reason: None,
                error: None,
                duration_ms: 3,
            },
            PluginResult::skipped("brakeman", "brakeman not found on PATH"),
        ],
        success: true,
    }
}

#[test]
fn json_output_includes_summary_counts() {
    let report = sample_report();
    let out = format_scan_report(&report, &OutputFormat::Json);

    let parsed: serde_json::Value = serde_json::from_str(&out).unwrap();
    assert_eq!(parsed["target"], "./target-repo");
    assert_eq!(parsed["success"], true);
    assert_eq!(parsed["summary"]["plugins_run"], 2);
    assert_eq!(parsed["summary"]["plugins_skipped"], 1);
    assert_eq!(parsed["summary"]["plugins_errored"], 0);
    assert_eq!(parsed["plugin_results"][0]["plugin_name"], "ncc_report");
}

#[test]
fn csv_output_has_one_row_per_finding_and_endpoint() {
    let report = sample_report();
    let out = format_scan_report(&report, &OutputFormat::Csv);

    let mut lines = out.lines();
    assert_eq!(
        lines.next().unwrap(),
        "plugin,report,finding,risk,impact,exploitability,category,component,status"
    );

    let rows: Vec<&str> = lines.collect();
    assert_eq!(rows.len(), 3);
    assert_eq!(
        rows[0],
        "ncc_report,report.txt,1: SQL Injection,high,high,medium,Injection,Authentication,Open"
    );
    assert!(rows
        .iter()
        .any(|r| r.starts_with("express_api,src/app.js,get /api/list")));
}

#[test]
fn pretty_output_lists_plugin_statuses() {
    let report = sample_report();
    colored::control::set_override(false);
    let out = format_scan_report(&report, &OutputFormat::Pretty);
    colored::control::unset_override();

    assert!(out.contains("Scan: ./target-repo"));
    assert!(out.contains("[DONE] ncc_report"));
    assert!(out.contains("[SKIP] brakeman"));
    assert!(out.contains("brakeman not found on PATH"));
    assert!(out.contains("report.txt: 1 findings high=1"));
    assert!(out.contains("src/app.js: 2 endpoints"));
    assert!(out.contains("Result: OK"));
}
