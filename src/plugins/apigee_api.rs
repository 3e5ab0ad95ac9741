//! Apigee proxy API-surface discovery.
//!
//! Scans `.xml` proxy configurations for `<BasePath>` elements. Extracted
//! text is whitespace-mangled in practice (`< BasePath > /spaces </ BasePath>`),
//! so the matcher tolerates spaces anywhere inside the tags.

use crate::config::Config;
use crate::plugins::{collect_files, Plugin, PluginResult};
use regex::Regex;
use std::path::Path;
use std::sync::LazyLock;
use std::time::Instant;

static RE_BASE_PATH: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?im)^\s*<\s*BasePath\s*>\s*(.*?)\s*<\s*/\s*BasePath\s*>\s*$").unwrap()
});

/// Discovers Apigee proxy base paths in XML configuration files.
pub struct ApigeeApiPlugin;

impl Plugin for ApigeeApiPlugin {
    fn name(&self) -> &'static str {
        "apigee_api"
    }

    fn description(&self) -> &'static str {
        "Discovers Apigee proxy base paths in XML configurations"
    }

    fn is_available(&self) -> bool {
        true
    }

    fn run(&self, path: &Path, _config: &Config) -> PluginResult {
        let start = Instant::now();
        let files = collect_files(path, &["xml"]);

        let mut apis = Vec::new();
        let mut error_msg = None;

        for file in &files {
            let content = match std::fs::read_to_string(file) {
                Ok(content) => content,
                Err(e) => {
                    error_msg = Some(format!("failed to read {}: {}", file.display(), e));
                    continue;
                }
            };
            let endpoints: Vec<serde_json::Value> = RE_BASE_PATH
                .captures_iter(&content)
                .map(|caps| serde_json::json!({ "path": caps[1].to_string() }))
                .collect();
            if !endpoints.is_empty() {
                apis.push(serde_json::json!({
                    "name": file.display().to_string(),
                    "endpoints": endpoints,
                }));
            }
        }

        PluginResult {
            plugin_name: self.name().to_string(),
            results: serde_json::json!({ "apis": apis }),
            files_scanned: files.len(),
            skipped: false,
            skip_reason: None,
            error: error_msg,
            duration_ms: start.elapsed().as_millis() as u64,
        }
    }
}
