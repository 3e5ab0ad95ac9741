//! Express.js API-surface discovery.
//!
//! Regex scraper over `.js` sources. A file that requires `express` becomes
//! an API; its endpoints come from direct route registrations
//! (`app.get('/x', …)`, `router.route('/x').post(…)`) and from router mounts
//! (`app.use('/api', require('./api'))`), whose endpoints are pulled in with
//! the mount path prefixed. Mount targets are resolved lexically against the
//! requiring file's directory; a mounted file does not also appear as its own
//! top-level API.

use crate::config::Config;
use crate::plugins::{collect_files, Plugin, PluginResult};
use regex::Regex;
use std::collections::{HashMap, HashSet};
use std::path::{Component, Path, PathBuf};
use std::sync::LazyLock;
use std::time::Instant;

static RE_EXPRESS: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?im)^\s*(?:var|let|const)\s+\w+\s*=\s*require\(\s*'express'\s*\)").unwrap()
});

static RE_REQUIRE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?im)^\s*(?:var|let|const)\s+(\w+)\s*=\s*require\(\s*'([./\w]+)'\s*\)").unwrap()
});

static RE_USE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?im)^.*\.\s*use\(\s*'([/\w]+)'\s*,\s*(?:require\(\s*'([./\w]+)'\s*\)|(\w+))")
        .unwrap()
});

static RE_ENDPOINT: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?im)^\s*\w+\s*\.\s*(get|post|delete|put)\s*\(\s*'(/[/\w:{}]*)'").unwrap()
});

static RE_ROUTE_CHAIN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?im)^\s*\w+\s*\.\s*route\s*\(\s*'(/[/\w:{}]*)'\s*\)\s*\.\s*(get|post|delete|put)\s*\(")
        .unwrap()
});

#[derive(Debug, Clone, serde::Serialize)]
struct Endpoint {
    path: String,
    method: String,
}

#[derive(Debug, Default)]
struct FileRoutes {
    has_express: bool,
    endpoints: Vec<Endpoint>,
    /// `(mount_path, resolved module key)` pairs from `use` calls.
    mounts: Vec<(String, String)>,
}

/// Discovers Express.js route definitions in JavaScript sources.
pub struct ExpressApiPlugin;

impl Plugin for ExpressApiPlugin {
    fn name(&self) -> &'static str {
        "express_api"
    }

    fn description(&self) -> &'static str {
        "Discovers Express.js API endpoints in JavaScript sources"
    }

    fn is_available(&self) -> bool {
        true
    }

    fn run(&self, path: &Path, _config: &Config) -> PluginResult {
        let start = Instant::now();
        let files = collect_files(path, &["js"]);

        let mut routes: HashMap<String, FileRoutes> = HashMap::new();
        let mut names: HashMap<String, String> = HashMap::new();
        let mut errors: Vec<String> = Vec::new();

        for file in &files {
            match std::fs::read_to_string(file) {
                Ok(content) => {
                    let key = module_key(file);
                    names.insert(key.clone(), file.display().to_string());
                    routes.insert(key, scrape_file(file, &content));
                }
                Err(e) => {
                    errors.push(format!("failed to read {}: {}", file.display(), e));
                }
            }
        }

        // Files pulled in through a mount belong to the mounting API.
        let mounted: HashSet<&String> = routes
            .values()
            .flat_map(|r| r.mounts.iter().map(|(_, target)| target))
            .collect();

        let mut apis = Vec::new();
        let mut keys: Vec<&String> = routes.keys().collect();
        keys.sort();
        for key in keys {
            let file = &routes[key];
            if !file.has_express || mounted.contains(key) {
                continue;
            }
            let mut endpoints = file.endpoints.clone();
            for (mount_path, target) in &file.mounts {
                if let Some(target_routes) = routes.get(target) {
                    for endpoint in &target_routes.endpoints {
                        endpoints.push(Endpoint {
                            path: join_route(mount_path, &endpoint.path),
                            method: endpoint.method.clone(),
                        });
                    }
                }
            }
            if !endpoints.is_empty() {
                apis.push(serde_json::json!({
                    "name": names.get(key).cloned().unwrap_or_else(|| key.clone()),
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
            error: if errors.is_empty() {
                None
            } else {
                Some(errors.join("; "))
            },
            duration_ms: start.elapsed().as_millis() as u64,
        }
    }
}

fn scrape_file(path: &Path, content: &str) -> FileRoutes {
    let mut file = FileRoutes {
        has_express: RE_EXPRESS.is_match(content),
        ..FileRoutes::default()
    };

    for caps in RE_ENDPOINT.captures_iter(content) {
        file.endpoints.push(Endpoint {
            path: caps[2].to_string(),
            method: caps[1].to_lowercase(),
        });
    }
    for caps in RE_ROUTE_CHAIN.captures_iter(content) {
        file.endpoints.push(Endpoint {
            path: caps[1].to_string(),
            method: caps[2].to_lowercase(),
        });
    }

    let requires: HashMap<String, String> = RE_REQUIRE
        .captures_iter(content)
        .map(|caps| (caps[1].to_string(), caps[2].to_string()))
        .collect();

    let dir = path.parent().unwrap_or_else(|| Path::new(""));
    for caps in RE_USE.captures_iter(content) {
        let mount_path = caps[1].to_string();
        // Inline require, or a variable bound by an earlier require.
        let target = caps
            .get(2)
            .map(|m| m.as_str().to_string())
            .or_else(|| {
                caps.get(3)
                    .and_then(|var| requires.get(var.as_str()).cloned())
            });
        if let Some(target) = target {
            file.mounts.push((mount_path, module_key(&dir.join(target))));
        }
    }

    file
}

/// Lexically normalized path without the `.js` extension; the common key
/// between a scanned file and a `require` target referring to it.
fn module_key(path: &Path) -> String {
    let mut normalized = PathBuf::new();
    for component in path.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => {
                if !normalized.pop() {
                    normalized.push("..");
                }
            }
            other => normalized.push(other),
        }
    }
    let text = normalized.display().to_string();
    text.strip_suffix(".js").map(str::to_string).unwrap_or(text)
}

fn join_route(prefix: &str, path: &str) -> String {
    format!("{}/{}", prefix.trim_end_matches('/'), path.trim_start_matches('/'))
}
