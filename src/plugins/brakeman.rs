//! Rails static analysis via [brakeman](https://brakemanscanner.org/).
//!
//! This is an **external** plugin — it requires the `brakeman` gem binary on
//! `PATH`. When missing, the scan runner marks the plugin as *skipped*.
//!
//! Runs `brakeman -f json -q <path>` and maps the `warnings` array into
//! finding records shaped like the report parser's output (risk from
//! `confidence`, category from `warning_type`), so downstream consumers see
//! one record vocabulary regardless of source.

use crate::config::Config;
use crate::plugins::{normalize_label, which_exists, Plugin, PluginResult};
use serde_json::Map;
use std::path::Path;
use std::time::Instant;

/// External plugin wrapper for brakeman.
pub struct BrakemanPlugin;

impl Plugin for BrakemanPlugin {
    fn name(&self) -> &'static str {
        "brakeman"
    }

    fn description(&self) -> &'static str {
        "Rails static analysis via brakeman (external tool)"
    }

    fn is_available(&self) -> bool {
        which_exists("brakeman")
    }

    fn run(&self, path: &Path, _config: &Config) -> PluginResult {
        let start = Instant::now();

        let output = match std::process::Command::new("brakeman")
            .arg("-f")
            .arg("json")
            .arg("-q")
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
                    error: Some(format!("Failed to run brakeman: {}", e)),
                    duration_ms: start.elapsed().as_millis() as u64,
                };
            }
        };

        // brakeman exits non-zero when warnings are present
        let stdout = String::from_utf8_lossy(&output.stdout);
        let root: serde_json::Value = match serde_json::from_str(&stdout) {
            Ok(v) => v,
            Err(e) => {
                return PluginResult {
                    plugin_name: self.name().to_string(),
                    results: serde_json::Value::Null,
                    files_scanned: 0,
                    skipped: false,
                    skip_reason: None,
                    error: Some(format!("Failed to parse brakeman JSON: {}", e)),
                    duration_ms: start.elapsed().as_millis() as u64,
                };
            }
        };

        let mut records = Map::new();
        if let Some(warnings) = root["warnings"].as_array() {
            for warning in warnings {
                let warning_type = warning["warning_type"].as_str().unwrap_or("unknown");
                let fingerprint = warning["fingerprint"].as_str().unwrap_or("");
                let key = if fingerprint.is_empty() {
                    warning_type.to_string()
                } else {
                    format!("{warning_type} ({fingerprint})")
                };
                records.insert(
                    key,
                    serde_json::json!({
                        "risk": warning["confidence"].as_str().map(normalize_label),
                        "category": Some(normalize_label(warning_type)),
                        "component": warning["file"].as_str(),
                        "location": warning["line"].as_u64().and_then(|line| {
                            warning["file"].as_str().map(|f| format!("{f}:{line}"))
                        }),
                        "description": warning["message"].as_str(),
                        "recommendation": warning["link"].as_str(),
                    }),
                );
            }
        }

        let files_scanned = root["scan_info"]["number_of_templates"]
            .as_u64()
            .unwrap_or(0) as usize;

        PluginResult {
            plugin_name: self.name().to_string(),
            results: serde_json::json!({ "warnings": records }),
            files_scanned,
            skipped: false,
            skip_reason: None,
            error: None,
            duration_ms: start.elapsed().as_millis() as u64,
        }
    }
}
