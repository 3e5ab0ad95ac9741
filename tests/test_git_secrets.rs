use vulnharvest::plugins::git_secrets::parse_scan_output;

const SCAN_OUTPUT: &str = "\
src/config.js:12:aws_secret_access_key = \"AKIA1234\"
src/config.js:40:aws_secret_access_key = \"AKIA1234\"
deploy.sh:3:password=hunter2

[ERROR] Matched one or more prohibited patterns

Possible mitigations:
- Mark false positives as allowed using: git config --add secrets.allowed ...
";

#[test]
fn groups_hits_by_file_and_match() {
    let results = parse_scan_output(SCAN_OUTPUT);

    let hits = results["hits"].as_object().unwrap();
    assert_eq!(hits.len(), 2);

    let config_hits = hits["src/config.js"].as_object().unwrap();
    let lines = config_hits["aws_secret_access_key = \"AKIA1234\""]["lines"]
        .as_array()
        .unwrap();
    assert_eq!(lines.len(), 2);
    assert_eq!(lines[0], "12");
    assert_eq!(lines[1], "40");

    assert!(hits["deploy.sh"]
        .as_object()
        .unwrap()
        .contains_key("password=hunter2"));
}

#[test]
fn separates_errors_from_recommendations() {
    let results = parse_scan_output(SCAN_OUTPUT);

    let errors = results["errors"].as_array().unwrap();
    assert_eq!(errors.len(), 1);
    assert!(errors[0]
        .as_str()
        .unwrap()
        .starts_with("[ERROR] Matched one or more"));

    let recommendations = results["recommendations"].as_array().unwrap();
    assert_eq!(recommendations.len(), 2);
    assert!(recommendations[0].as_str().unwrap().starts_with("Possible"));
}

#[test]
fn empty_output_yields_no_hits() {
    let results = parse_scan_output("");
    assert!(results["hits"].as_object().unwrap().is_empty());
    assert!(results["errors"].as_array().unwrap().is_empty());
}

#[test]
fn lines_without_two_colons_are_ignored() {
    let results = parse_scan_output("no separators here\nfile.txt only one part\n");
    assert!(results["hits"].as_object().unwrap().is_empty());
}
