//! Pluggable security-scanning plugins.
//!
//! Every plugin implements the [`Plugin`] trait. Plugins fall into three
//! families:
//!
//! - **Report parsers** (no external dependencies): [`ncc_report`] — turns
//!   the flattened text of a vendor pentest report into a structured report
//!   via the sectioned text parser.
//! - **API-surface discovery** (no external dependencies): [`express_api`],
//!   [`apigee_api`] — regex scrapers over source and config files.
//! - **External tool wrappers** (require a binary on `PATH`): [`brakeman`],
//!   [`git_secrets`].
//!
//! Use [`all_plugins`] to obtain every registered plugin.

pub mod apigee_api;
pub mod brakeman;
pub mod express_api;
pub mod git_secrets;
pub mod ncc_report;

use crate::config::Config;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

/// A pluggable scanner or report parser.
///
/// Implementers **must** be [`Send`] + [`Sync`] because
/// [`scan::run_scan`](crate::scan::run_scan) executes plugins in parallel
/// via [rayon].
pub trait Plugin: Send + Sync {
    /// Returns the plugin's unique identifier (e.g. `"ncc_report"`).
    fn name(&self) -> &'static str;

    /// Returns a short, human-readable description of the plugin.
    fn description(&self) -> &'static str;

    /// Returns `true` if the plugin's external dependencies are installed.
    ///
    /// Built-in plugins always return `true`. Wrappers check whether their
    /// tool binary exists on `PATH` via [`which_exists`].
    fn is_available(&self) -> bool;

    /// Executes the plugin against the given target path.
    fn run(&self, path: &Path, config: &Config) -> PluginResult;
}

/// Outcome of one plugin execution against one target.
#[derive(Debug, serde::Serialize)]
pub struct PluginResult {
    pub plugin_name: String,
    /// Plugin-specific structured results (a parsed report, discovered APIs,
    /// mapped tool findings, …).
    pub results: serde_json::Value,
    pub files_scanned: usize,
    pub skipped: bool,
    pub skip_reason: Option<String>,
    pub error: Option<String>,
    pub duration_ms: u64,
}

impl PluginResult {
    pub fn skipped(name: &str, reason: &str) -> Self {
        PluginResult {
            plugin_name: name.to_string(),
            results: serde_json::Value::Null,
            files_scanned: 0,
            skipped: true,
            skip_reason: Some(reason.to_string()),
            error: None,
            duration_ms: 0,
        }
    }
}

/// Returns every registered [`Plugin`] implementation.
///
/// The returned order is the default listing order; execution order does not
/// matter because plugins run in parallel.
pub fn all_plugins() -> Vec<Box<dyn Plugin>> {
    vec![
        Box::new(ncc_report::NccReportPlugin),
        Box::new(express_api::ExpressApiPlugin),
        Box::new(apigee_api::ApigeeApiPlugin),
        Box::new(brakeman::BrakemanPlugin),
        Box::new(git_secrets::GitSecretsPlugin),
    ]
}

/// Recursively collects files matching the given extensions.
///
/// Walks the directory tree under `path` and returns every regular file whose
/// extension (case-insensitive) appears in `extensions`. When `path` is
/// itself a matching file it is returned as the sole entry.
pub fn collect_files(path: &Path, extensions: &[&str]) -> Vec<PathBuf> {
    let matches = |candidate: &Path| {
        candidate
            .extension()
            .map(|ext| {
                let ext = ext.to_string_lossy().to_lowercase();
                extensions.contains(&ext.as_str())
            })
            .unwrap_or(false)
    };

    if path.is_file() {
        return if matches(path) {
            vec![path.to_path_buf()]
        } else {
            vec![]
        };
    }

    let mut files = Vec::new();
    for entry in WalkDir::new(path)
        .into_iter()
        .filter_map(|e| e.ok())
        .filter(|e| e.file_type().is_file())
    {
        if matches(entry.path()) {
            files.push(entry.path().to_path_buf());
        }
    }
    files
}

/// Returns `true` if an executable named `cmd` exists on `PATH`.
///
/// On Unix the file must also have an executable permission bit set.
/// Used by tool wrappers to implement [`Plugin::is_available`].
pub fn which_exists(cmd: &str) -> bool {
    std::env::var_os("PATH")
        .map(|path| {
            std::env::split_paths(&path).any(|dir| {
                let candidate = dir.join(cmd);
                if !candidate.is_file() {
                    return false;
                }
                #[cfg(unix)]
                {
                    use std::os::unix::fs::PermissionsExt;
                    std::fs::metadata(&candidate)
                        .map(|m| m.permissions().mode() & 0o111 != 0)
                        .unwrap_or(false)
                }
                #[cfg(not(unix))]
                {
                    true
                }
            })
        })
        .unwrap_or(false)
}

/// Lowercases, collapses runs of whitespace, and joins with underscores.
///
/// Used to normalize classification values ("High  Risk" → `high_risk`) so
/// aggregation keys stay stable across formatting quirks in extracted text.
pub fn normalize_label(value: &str) -> String {
    value
        .split_whitespace()
        .map(str::to_lowercase)
        .collect::<Vec<_>>()
        .join("_")
}
