//! Committed-credential detection via
//! [git-secrets](https://github.com/awslabs/git-secrets).
//!
//! This is an **external** plugin — it requires the `git-secrets` binary on
//! `PATH`. When missing, the scan runner marks the plugin as *skipped*.
//!
//! Runs `git secrets --scan -r <path>`. Hits are written to stderr as
//! `<file>:<line>:<match>` lines; once an `[ERROR]` line appears, the
//! remaining lines are git-secrets' remediation advice. Hits are grouped per
//! file, then per matched text, collecting the line numbers where the match
//! recurred.

use crate::config::Config;
use crate::plugins::{which_exists, Plugin, PluginResult};
use serde_json::Map;
use std::path::Path;
use std::time::Instant;

/// External plugin wrapper for git-secrets.
pub struct GitSecretsPlugin;

impl Plugin for GitSecretsPlugin {
    fn name(&self) -> &'static str {
        "git_secrets"
    }

    fn description(&self) -> &'static str {
        "Committed-credential detection via git-secrets (external tool)"
    }

    fn is_available(&self) -> bool {
        which_exists("git-secrets")
    }

    fn run(&self, path: &Path, _config: &Config) -> PluginResult {
        let start = Instant::now();

        let output = match std::process::Command::new("git")
            .arg("secrets")
            .arg("--scan")
            .arg("-r")
            .arg(path)
            .output()
        {
            Ok(o) => o,
            Err(e) => {
                return PluginResult {
                    plugin_name: self.name().to_string(),
                    results: serde_json::Value::Null,
                    files_scanned: 0,
                    skipped: false,
                    skip_reason: None,
                    error: Some(format!("Failed to run git-secrets: {}", e)),
                    duration_ms: start.elapsed().as_millis() as u64,
                };
            }
        };

        // A non-zero exit simply means matches were found.
        let stderr = String::from_utf8_lossy(&output.stderr);
        let results = parse_scan_output(&stderr);

        PluginResult {
            plugin_name: self.name().to_string(),
            results,
            files_scanned: 0,
            skipped: false,
            skip_reason: None,
            error: None,
            duration_ms: start.elapsed().as_millis() as u64,
        }
    }
}

/// Parses git-secrets scan output into
/// `{ hits: { file: { match: { lines: [...] } } }, errors, recommendations }`.
pub fn parse_scan_output(output: &str) -> serde_json::Value {
    let mut hits: Map<String, serde_json::Value> = Map::new();
    let mut errors: Vec<String> = Vec::new();
    let mut recommendations: Vec<String> = Vec::new();
    let mut past_errors = false;

    for raw in output.lines() {
        let line = raw.trim();
        if line.is_empty() {
            continue;
        }
        if line.starts_with("[ERROR]") {
            errors.push(line.to_string());
            past_errors = true;
            continue;
        }
        if past_errors {
            recommendations.push(line.to_string());
            continue;
        }

        let Some((file, rest)) = line.split_once(':') else {
            continue;
        };
        let Some((number, matched)) = rest.split_once(':') else {
            continue;
        };

        let file_entry = hits
            .entry(file.to_string())
            .or_insert_with(|| serde_json::Value::Object(Map::new()));
        if let Some(by_match) = file_entry.as_object_mut() {
            let match_entry = by_match
                .entry(matched.to_string())
                .or_insert_with(|| serde_json::json!({ "lines": [] }));
            if let Some(lines) = match_entry["lines"].as_array_mut() {
                lines.push(serde_json::Value::String(number.to_string()));
            }
        }
    }

    serde_json::json!({
        "hits": hits,
        "errors": errors,
        "recommendations": recommendations,
    })
}
