//! Configuration loading and management.
//!
//! Provides types for the TOML-based configuration file.
//!
//! # Configuration file
//!
//! The default configuration file is `vulnharvest.toml` in the current
//! working directory. Use [`Config::load`] to read it:
//!
//! ```rust,no_run
//! use vulnharvest::config::Config;
//!
//! let config = Config::load(None).expect("failed to load config");
//! assert!(config.is_plugin_enabled("ncc_report"));
//! ```

use std::path::Path;

/// Main configuration for the scan system.
///
/// Loaded from a TOML file (typically `vulnharvest.toml`). All fields carry
/// sensible defaults so the config file can be omitted entirely.
///
/// # Examples
///
/// ```rust,no_run
/// use vulnharvest::config::Config;
///
/// // Load from the default location or fall back to built-in defaults.
/// let config = Config::load(None).unwrap();
/// ```
#[derive(Debug, Clone, Default, serde::Deserialize, serde::Serialize)]
#[serde(default)]
pub struct Config {
    /// Per-plugin on/off toggles.
    pub plugins: PluginsConfig,
    /// Report-parsing settings shared by the report plugins.
    pub report: ReportConfig,
}

/// Per-plugin on/off toggles.
///
/// Every plugin defaults to **enabled**. Set a field to `false` in the TOML
/// config file to skip that plugin during scans.
///
/// # Examples
///
/// ```toml
/// [plugins]
/// brakeman = false   # skip brakeman even if it is installed
/// ```
#[derive(Debug, Clone, serde::Deserialize, serde::Serialize)]
#[serde(default)]
pub struct PluginsConfig {
    /// NCC Group-style report parsing (built-in, no external tool).
    pub ncc_report: bool,
    /// Express.js API discovery (built-in).
    pub express_api: bool,
    /// Apigee proxy API discovery (built-in).
    pub apigee_api: bool,
    /// Rails static analysis via [brakeman](https://brakemanscanner.org/).
    pub brakeman: bool,
    /// Committed-credential detection via
    /// [git-secrets](https://github.com/awslabs/git-secrets).
    pub git_secrets: bool,
}

/// Settings consumed by the report-parsing plugins.
///
/// # Examples
///
/// ```toml
/// [report]
/// ignore_patterns = ['^Draft copy$']
/// ```
#[derive(Debug, Clone, Default, serde::Deserialize, serde::Serialize)]
#[serde(default)]
pub struct ReportConfig {
    /// Extra regex patterns for boilerplate lines to drop before parsing,
    /// in addition to the built-in page-footer and watermark patterns.
    pub ignore_patterns: Vec<String>,
}

impl Default for PluginsConfig {
    fn default() -> Self {
        PluginsConfig {
            ncc_report: true,
            express_api: true,
            apigee_api: true,
            brakeman: true,
            git_secrets: true,
        }
    }
}

impl Config {
    /// Loads configuration from a TOML file.
    ///
    /// Resolution order:
    /// 1. If `path` is `Some`, load from that file (error if missing).
    /// 2. If `path` is `None`, try `vulnharvest.toml` in the current directory.
    /// 3. If that file does not exist either, return [`Config::default()`].
    ///
    /// # Errors
    ///
    /// Returns `Err(String)` when:
    /// - The explicit path does not exist.
    /// - The file cannot be read from disk.
    /// - The TOML content fails to parse.
    ///
    /// # Examples
    ///
    /// ```rust,no_run
    /// use std::path::Path;
    /// use vulnharvest::config::Config;
    ///
    /// // Explicit path
    /// let cfg = Config::load(Some(Path::new("my-config.toml")))?;
    ///
    /// // Auto-detect or default
    /// let cfg = Config::load(None)?;
    /// # Ok::<(), String>(())
    /// ```
    pub fn load(path: Option<&Path>) -> Result<Config, String> {
        let config_path = if let Some(p) = path {
            if p.exists() {
                Some(p.to_path_buf())
            } else {
                return Err(format!("Config file not found: {}", p.display()));
            }
        } else {
            let default_path = Path::new("vulnharvest.toml");
            if default_path.exists() {
                Some(default_path.to_path_buf())
            } else {
                None
            }
        };

        match config_path {
            Some(path) => {
                let content = std::fs::read_to_string(&path)
                    .map_err(|e| format!("Failed to read config {}: {}", path.display(), e))?;
                let config: Config = toml::from_str(&content)
                    .map_err(|e| format!("Failed to parse config {}: {}", path.display(), e))?;
                Ok(config)
            }
            None => Ok(Config::default()),
        }
    }

    /// Returns `true` if the named plugin is enabled.
    ///
    /// Unknown plugin names are considered enabled (returns `true`).
    ///
    /// # Examples
    ///
    /// ```
    /// use vulnharvest::config::Config;
    ///
    /// let config = Config::default();
    /// assert!(config.is_plugin_enabled("ncc_report"));
    /// assert!(config.is_plugin_enabled("unknown_plugin"));
    /// ```
    pub fn is_plugin_enabled(&self, name: &str) -> bool {
        match name {
            "ncc_report" => self.plugins.ncc_report,
            "express_api" => self.plugins.express_api,
            "apigee_api" => self.plugins.apigee_api,
            "brakeman" => self.plugins.brakeman,
            "git_secrets" => self.plugins.git_secrets,
            _ => true,
        }
    }
}
