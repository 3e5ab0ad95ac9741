//! Scan orchestration.
//!
//! The [`run_scan`] function is the main entry-point for running every
//! enabled [`Plugin`](crate::plugins::Plugin) against a target path. Plugins
//! execute in parallel via [rayon]; each one owns its target interpretation
//! (report files, source trees, repositories), so they never contend.

use crate::config::Config;
use crate::plugins::{self, PluginResult};
use chrono::Utc;
use rayon::prelude::*;
use std::path::Path;

/// Outcome of one scan invocation: every plugin's result plus run metadata.
#[derive(Debug, serde::Serialize)]
pub struct ScanReport {
    pub target: String,
    pub timestamp: String,
    pub plugin_results: Vec<PluginResult>,
    /// `false` when any executed plugin recorded an error.
    pub success: bool,
}

/// Runs all enabled plugins against `path`.
///
/// # Pipeline
///
/// 1. Loads every registered [`Plugin`](crate::plugins::Plugin).
/// 2. Filters down to those enabled in [`Config::plugins`]; when `only` is
///    non-empty it further restricts the run to the named plugins.
/// 3. Runs the active plugins **in parallel** using [rayon]. Plugins whose
///    external tool is missing are recorded as *skipped*.
/// 4. Assembles the final [`ScanReport`].
///
/// # Examples
///
/// ```rust,no_run
/// use std::path::Path;
/// use vulnharvest::{config::Config, scan};
///
/// let config = Config::load(None).unwrap();
/// let report = scan::run_scan(Path::new("./target-repo"), &config, &[]);
///
/// std::process::exit(if report.success { 0 } else { 1 });
/// ```
pub fn run_scan(path: &Path, config: &Config, only: &[String]) -> ScanReport {
    let all = plugins::all_plugins();

    let active: Vec<_> = all
        .into_iter()
        .filter(|p| config.is_plugin_enabled(p.name()))
        .filter(|p| only.is_empty() || only.iter().any(|name| name == p.name()))
        .collect();

    let plugin_results: Vec<PluginResult> = active
        .par_iter()
        .map(|plugin| {
            if plugin.is_available() {
                plugin.run(path, config)
            } else {
                PluginResult::skipped(
                    plugin.name(),
                    &format!("{} not found on PATH", plugin.name()),
                )
            }
        })
        .collect();

    let success = plugin_results.iter().all(|r| r.error.is_none());

    ScanReport {
        target: path.display().to_string(),
        timestamp: Utc::now().to_rfc3339(),
        plugin_results,
        success,
    }
}
