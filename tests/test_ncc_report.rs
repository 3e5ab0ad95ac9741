use std::path::Path;
use vulnharvest::config::Config;
use vulnharvest::plugins::ncc_report::{parse_report_file, NccReportPlugin};
use vulnharvest::plugins::Plugin;

const SAMPLE_REPORT: &str = "\
Acme Corp
Web Application Assessment
January 5, 2020
Executive Summary
Nothing to see here.
Finding Details
Finding 1: SQL Injection in Login Form
Risk High
Impact: High, Exploitability: Medium
Identifier NCC-2020-001
Category Injection
Component Authentication
Location /login
Status Open
Description
The login form concatenates user input into SQL queries.
Impact
An attacker can read arbitrary database rows.
Recommendation
Use parameterized queries.
Vulnerability 2: Reflected XSS
Risk Medium
Impact: Medium, Exploitability: High
Category Cross-Site Scripting
Status Fixed
Appendix A: Scope
";

fn write_report(dir: &Path, name: &str, content: &str) -> std::path::PathBuf {
    let path = dir.join(name);
    std::fs::write(&path, content).unwrap();
    path
}

#[test]
fn parses_title_and_date() {
    let dir = tempfile::tempdir().unwrap();
    let path = write_report(dir.path(), "report.txt", SAMPLE_REPORT);

    let report = parse_report_file(&path, &Config::default()).unwrap();

    assert_eq!(
        report.metadata["title"],
        "Acme Corp Web Application Assessment"
    );
    assert_eq!(report.metadata["date"], "January 5, 2020");
}

#[test]
fn parses_findings_with_split_risk_block() {
    let dir = tempfile::tempdir().unwrap();
    let path = write_report(dir.path(), "report.txt", SAMPLE_REPORT);

    let report = parse_report_file(&path, &Config::default()).unwrap();

    assert_eq!(report.data.len(), 2);

    let sqli = &report.data["1: SQL Injection in Login Form"];
    assert_eq!(sqli["risk"], "high");
    assert_eq!(sqli["impact"], "high");
    assert_eq!(sqli["exploitability"], "medium");
    assert_eq!(sqli["identifier"], "NCC-2020-001");
    assert_eq!(sqli["category"], "Injection");
    assert_eq!(sqli["component"], "Authentication");
    assert_eq!(sqli["location"], "/login");
    assert_eq!(sqli["status"], "Open");
    assert_eq!(
        sqli["description"],
        "The login form concatenates user input into SQL queries."
    );
    assert_eq!(
        sqli["impact_description"],
        "An attacker can read arbitrary database rows."
    );
    assert_eq!(sqli["recommendation"], "Use parameterized queries.");

    let xss = &report.data["2: Reflected XSS"];
    assert_eq!(xss["risk"], "medium");
    assert_eq!(xss["exploitability"], "high");
    assert_eq!(xss["status"], "Fixed");
    assert!(xss["identifier"].is_null());
}

#[test]
fn aggregates_risk_and_category_counts() {
    let dir = tempfile::tempdir().unwrap();
    let path = write_report(dir.path(), "report.txt", SAMPLE_REPORT);

    let report = parse_report_file(&path, &Config::default()).unwrap();

    assert_eq!(report.summary["total_high"], 1);
    assert_eq!(report.summary["total_medium"], 1);
    assert_eq!(report.aggregations.by_risk["high"], 1);
    assert_eq!(report.aggregations.by_risk["medium"], 1);
    assert_eq!(report.aggregations.by_impact["high"], 1);
    assert_eq!(report.aggregations.by_exploitability["medium"], 1);
    assert_eq!(report.aggregations.by_category["Injection"], 1);
    assert_eq!(report.aggregations.by_component["Authentication"], 1);
}

#[test]
fn strips_page_footers_and_watermarks() {
    let noisy = "\
Acme Corp
3 | Acme Corp Assessment
January 5, 2020
Finding Details
Finding 1: SQL Injection
anything / NCC Group Confidential
Risk High
Appendix A: Scope
";
    let dir = tempfile::tempdir().unwrap();
    let path = write_report(dir.path(), "report.txt", noisy);

    let report = parse_report_file(&path, &Config::default()).unwrap();

    // Boilerplate lines never reach buffers.
    assert_eq!(report.metadata["title"], "Acme Corp");
    assert_eq!(report.data["1: SQL Injection"]["risk"], "high");
}

#[test]
fn honors_configured_ignore_patterns() {
    let content = "\
Acme Corp
DRAFT COPY
January 5, 2020
Finding Details
Finding 1: SQL Injection
Risk High
Appendix A: Scope
";
    let dir = tempfile::tempdir().unwrap();
    let path = write_report(dir.path(), "report.txt", content);

    let mut config = Config::default();
    config.report.ignore_patterns.push("^DRAFT COPY$".to_string());

    let report = parse_report_file(&path, &config).unwrap();
    assert_eq!(report.metadata["title"], "Acme Corp");
}

#[test]
fn recognizes_ligature_identifier() {
    // PDF extraction renders "Identifier" with an fi ligature in some reports.
    let content = "\
Acme Corp
January 5, 2020
Finding Details
Finding 1: SQL Injection
Risk High
Identiﬁer NCC-2020-042
Appendix A: Scope
";
    let dir = tempfile::tempdir().unwrap();
    let path = write_report(dir.path(), "report.txt", content);

    let report = parse_report_file(&path, &Config::default()).unwrap();
    assert_eq!(report.data["1: SQL Injection"]["identifier"], "NCC-2020-042");
}

#[test]
fn plugin_scans_directory_of_reports() {
    let dir = tempfile::tempdir().unwrap();
    write_report(dir.path(), "a.txt", SAMPLE_REPORT);
    write_report(dir.path(), "b.txt", SAMPLE_REPORT);
    write_report(dir.path(), "notes.md", "not a report");

    let result = NccReportPlugin.run(dir.path(), &Config::default());

    assert!(!result.skipped);
    assert!(result.error.is_none());
    assert_eq!(result.files_scanned, 2);
    let reports = result.results["reports"].as_object().unwrap();
    assert_eq!(reports.len(), 2);
    assert_eq!(reports["a.txt"]["summary"]["total_high"], 1);
}

#[test]
fn plugin_records_error_for_unparseable_file_but_continues() {
    let dir = tempfile::tempdir().unwrap();
    write_report(dir.path(), "good.txt", SAMPLE_REPORT);
    // Not valid UTF-8; reading it fails.
    std::fs::write(dir.path().join("bad.txt"), [0xff, 0xfe, 0x00, 0xff]).unwrap();

    let result = NccReportPlugin.run(dir.path(), &Config::default());

    assert!(result.error.is_some());
    let reports = result.results["reports"].as_object().unwrap();
    assert!(reports.contains_key("good.txt"));
    assert!(!reports.contains_key("bad.txt"));
}

#[test]
fn plugin_reports_every_failing_file() {
    let dir = tempfile::tempdir().unwrap();
    write_report(dir.path(), "good.txt", SAMPLE_REPORT);
    std::fs::write(dir.path().join("bad-one.txt"), [0xff, 0xfe, 0x00, 0xff]).unwrap();
    std::fs::write(dir.path().join("bad-two.txt"), [0xff, 0xfe, 0x00, 0xff]).unwrap();

    let result = NccReportPlugin.run(dir.path(), &Config::default());

    let error = result.error.unwrap();
    assert!(error.contains("bad-one.txt"), "missing first file: {error}");
    assert!(error.contains("bad-two.txt"), "missing second file: {error}");
    assert!(result.results["reports"]
        .as_object()
        .unwrap()
        .contains_key("good.txt"));
}

#[test]
fn empty_directory_yields_empty_results() {
    let dir = tempfile::tempdir().unwrap();
    let result = NccReportPlugin.run(dir.path(), &Config::default());

    assert_eq!(result.files_scanned, 0);
    assert!(result.error.is_none());
    assert!(result.results["reports"].as_object().unwrap().is_empty());
}
