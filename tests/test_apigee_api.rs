use vulnharvest::config::Config;
use vulnharvest::plugins::apigee_api::ApigeeApiPlugin;
use vulnharvest::plugins::Plugin;

#[test]
fn extracts_base_paths_with_whitespace_variants() {
    let dir = tempfile::tempdir().unwrap();
    std::fs::write(
        dir.path().join("proxy.xml"),
        "<ProxyEndpoint>
<BasePath>/default</BasePath>
< BasePath> /with/pattern/*</ BasePath >
<BasePath > /more/spaces/and/levels </BasePath>
<BasePath>/with/{var}</BasePath >
</ProxyEndpoint>
",
    )
    .unwrap();

    let result = ApigeeApiPlugin.run(dir.path(), &Config::default());
    assert!(result.error.is_none());
    assert_eq!(result.files_scanned, 1);

    let apis = result.results["apis"].as_array().unwrap();
    assert_eq!(apis.len(), 1);

    let paths: Vec<&str> = apis[0]["endpoints"]
        .as_array()
        .unwrap()
        .iter()
        .map(|e| e["path"].as_str().unwrap())
        .collect();
    assert_eq!(
        paths,
        [
            "/default",
            "/with/pattern/*",
            "/more/spaces/and/levels",
            "/with/{var}",
        ]
    );
}

#[test]
fn files_without_base_paths_produce_no_apis() {
    let dir = tempfile::tempdir().unwrap();
    std::fs::write(
        dir.path().join("other.xml"),
        "<TargetEndpoint><Name>backend</Name></TargetEndpoint>\n",
    )
    .unwrap();

    let result = ApigeeApiPlugin.run(dir.path(), &Config::default());
    assert_eq!(result.files_scanned, 1);
    assert!(result.results["apis"].as_array().unwrap().is_empty());
}

#[test]
fn non_xml_files_are_not_scanned() {
    let dir = tempfile::tempdir().unwrap();
    std::fs::write(dir.path().join("readme.txt"), "<BasePath>/nope</BasePath>\n").unwrap();

    let result = ApigeeApiPlugin.run(dir.path(), &Config::default());
    assert_eq!(result.files_scanned, 0);
}
