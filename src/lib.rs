//! # vulnharvest
//!
//! Harvests structured security findings from pentest reports, source trees,
//! and external tools.
//!
//! `vulnharvest` turns the flattened text of vendor assessment reports into
//! nested, aggregated finding records via a declarative sectioned text
//! parser, discovers API surfaces in Express.js and Apigee sources, and
//! wraps external tools like brakeman and git-secrets. Plugins run in
//! parallel and results render as pretty text, JSON, or CSV.
//!
//! ## Quick start
//!
//! ```rust,no_run
//! use std::path::Path;
//! use vulnharvest::{config::Config, output, scan};
//!
//! let config = Config::load(None).expect("failed to load config");
//! let report = scan::run_scan(Path::new("./target"), &config, &[]);
//!
//! let text = output::format_scan_report(&report, &output::OutputFormat::Pretty);
//! print!("{text}");
//! ```
//!
//! ## Architecture
//!
//! The crate is organized around a pipeline:
//!
//! 1. **[`config`]** — load and validate configuration from TOML files.
//! 2. **[`parser`]** — the sectioned text parser: a [`parser::Schema`] of
//!    boundary predicates drives a streaming engine producing a
//!    [`report::Report`].
//! 3. **[`plugins`]** — pluggable [`plugins::Plugin`] trait with built-in
//!    implementations (report parsing, API discovery, tool wrappers).
//! 4. **[`scan`]** — orchestrate plugins in parallel and collect results.
//! 5. **[`output`]** — format scan reports as pretty text, JSON, or CSV.
//!
//! ## Plugins
//!
//! | Plugin | External tool | Description |
//! |--------|--------------|-------------|
//! | `ncc_report` | — | NCC Group-style report text parsing |
//! | `express_api` | — | Express.js endpoint discovery |
//! | `apigee_api` | — | Apigee proxy base-path discovery |
//! | `brakeman` | [brakeman] | Rails static analysis |
//! | `git_secrets` | [git-secrets] | Committed-credential detection |
//!
//! [brakeman]: https://brakemanscanner.org/
//! [git-secrets]: https://github.com/awslabs/git-secrets

pub mod config;
pub mod output;
pub mod parser;
pub mod plugins;
pub mod report;
pub mod scan;
