use assert_cmd::Command;
use predicates::prelude::*;

fn vulnharvest() -> Command {
    assert_cmd::cargo::cargo_bin_cmd!("vulnharvest")
}

#[test]
fn scan_fixture_report_succeeds() {
    vulnharvest()
        .args(["scan", "tests/fixtures", "--plugin", "ncc_report"])
        .assert()
        .success()
        .stdout(predicate::str::contains("ncc_report"))
        .stdout(predicate::str::contains("Result: OK"));
}

#[test]
fn scan_json_format() {
    vulnharvest()
        .args([
            "scan",
            "tests/fixtures",
            "--plugin",
            "ncc_report",
            "--format",
            "json",
        ])
        .assert()
        .success()
        .stdout(predicate::str::contains("\"success\": true"))
        .stdout(predicate::str::contains("sample-report.txt"))
        .stdout(predicate::str::contains("\"total_high\": 1"));
}

#[test]
fn scan_csv_format_emits_finding_rows() {
    vulnharvest()
        .args([
            "scan",
            "tests/fixtures",
            "--plugin",
            "ncc_report",
            "--format",
            "csv",
        ])
        .assert()
        .success()
        .stdout(predicate::str::contains(
            "plugin,report,finding,risk,impact,exploitability,category,component,status",
        ))
        .stdout(predicate::str::contains("1: SQL Injection in Login Form"));
}

#[test]
fn scan_discovers_express_endpoints() {
    vulnharvest()
        .args([
            "scan",
            "tests/fixtures/express-app",
            "--plugin",
            "express_api",
            "--format",
            "json",
        ])
        .assert()
        .success()
        .stdout(predicate::str::contains("/api/list"))
        .stdout(predicate::str::contains("/health"));
}

#[test]
fn scan_nonexistent_path_exits_2() {
    vulnharvest()
        .args(["scan", "tests/fixtures/does-not-exist"])
        .assert()
        .code(2)
        .stderr(predicate::str::contains("path does not exist"));
}

#[test]
fn scan_unknown_plugin_exits_2() {
    vulnharvest()
        .args(["scan", "tests/fixtures", "--plugin", "nonexistent"])
        .assert()
        .code(2)
        .stderr(predicate::str::contains("unknown plugin"));
}

#[test]
fn scan_output_to_file() {
    let dir = tempfile::tempdir().unwrap();
    let output_file = dir.path().join("scan.json");

    vulnharvest()
        .args([
            "scan",
            "tests/fixtures",
            "--plugin",
            "ncc_report",
            "--format",
            "json",
            "--output",
            output_file.to_str().unwrap(),
        ])
        .assert()
        .success();

    let content = std::fs::read_to_string(&output_file).unwrap();
    let parsed: serde_json::Value =
        serde_json::from_str(&content).expect("Output file should contain valid JSON");
    assert!(parsed["success"].as_bool().unwrap());
}

#[test]
fn parse_report_emits_structured_json() {
    let output = vulnharvest()
        .args(["parse-report", "tests/fixtures/sample-report.txt"])
        .assert()
        .success()
        .get_output()
        .stdout
        .clone();

    let parsed: serde_json::Value = serde_json::from_slice(&output).unwrap();
    assert_eq!(
        parsed["metadata"]["title"],
        "Acme Corp Web Application Security Assessment"
    );
    assert_eq!(parsed["metadata"]["date"], "January 5, 2020");
    assert_eq!(parsed["summary"]["total_high"], 1);
    assert_eq!(parsed["summary"]["total_medium"], 1);
    assert_eq!(parsed["aggregations"]["by_risk"]["high"], 1);
    assert_eq!(
        parsed["data"]["1: SQL Injection in Login Form"]["risk"],
        "high"
    );
}

#[test]
fn parse_report_on_directory_exits_2() {
    vulnharvest()
        .args(["parse-report", "tests/fixtures"])
        .assert()
        .code(2)
        .stderr(predicate::str::contains("not a file"));
}

#[test]
fn list_plugins_shows_all() {
    vulnharvest()
        .args(["list-plugins"])
        .assert()
        .success()
        .stdout(predicate::str::contains("ncc_report"))
        .stdout(predicate::str::contains("express_api"))
        .stdout(predicate::str::contains("apigee_api"))
        .stdout(predicate::str::contains("brakeman"))
        .stdout(predicate::str::contains("git_secrets"))
        .stdout(predicate::str::contains("Total: 5 plugins"));
}

#[test]
fn check_tools_succeeds() {
    vulnharvest()
        .args(["check-tools"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Plugin Availability"));
}

#[test]
fn config_can_disable_plugin() {
    let dir = tempfile::tempdir().unwrap();
    let config_path = dir.path().join("vulnharvest.toml");
    std::fs::write(&config_path, "[plugins]\nexpress_api = false\n").unwrap();

    vulnharvest()
        .args([
            "scan",
            "tests/fixtures/express-app",
            "--format",
            "json",
            "--config",
            config_path.to_str().unwrap(),
        ])
        .assert()
        .success()
        .stdout(predicate::str::contains("express_api").not());
}

#[test]
fn missing_config_file_exits_2() {
    vulnharvest()
        .args(["scan", "tests/fixtures", "--config", "no-such-config.toml"])
        .assert()
        .code(2)
        .stderr(predicate::str::contains("Config file not found"));
}
