//! NCC Group–style pentest report parser.
//!
//! Consumes the flattened text of a vendor assessment report (PDF-to-text
//! extraction happens upstream; this plugin takes `.txt` input) and produces
//! a structured [`Report`] through the sectioned text parser.
//!
//! # Document structure
//!
//! 1. **metadata** — title block ending at a date line
//!    (e.g. `January 5, 2020`).
//! 2. **findings** — a container opened by `Finding Details` /
//!    `Vulnerability Details` and closed by `Appendix A:`, holding one
//!    repeating **finding** per `Finding …` / `Vulnerability …` heading.
//!
//! Each finding block is decomposed into labeled fields (`Risk`,
//! `Description`, `Location`, `Recommendation`, …). The `Risk` block is the
//! combined `<risk> Impact: <impact>, Exploitability: <exploitability>` form
//! and is split into the three classification values, which are normalized
//! (`High Risk` → `high_risk`) so aggregation keys stay stable.
//!
//! Page footers (`12 | Title`) and confidentiality watermarks are removed by
//! the line filter before they reach the engine; extra patterns can be added
//! via `[report] ignore_patterns` in the config file.

use crate::config::Config;
use crate::parser::{ParseError, Schema, Section, SectionOutput, SectionedTextParser};
use crate::plugins::{collect_files, normalize_label, Plugin, PluginResult};
use crate::report::Report;
use regex::Regex;
use serde_json::Map;
use std::path::Path;
use std::sync::LazyLock;
use std::time::Instant;

static RE_PAGE_FOOTER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\d+\s\|\s.+$").unwrap());

static RE_WATERMARK: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)^.*/\sNCC Group Confidential$").unwrap());

static RE_TITLE_DATE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(\w+\s[0-3]?\d,\s(?:19|20)\d\d)").unwrap());

/// Built-in report parser for NCC Group–style assessment documents.
///
/// Accepts a single `.txt` file or a directory scanned for `.txt` files.
/// Results are keyed by file name under `results.reports`; a file whose
/// parse fails is recorded in `error` without blocking the remaining files.
pub struct NccReportPlugin;

impl Plugin for NccReportPlugin {
    fn name(&self) -> &'static str {
        "ncc_report"
    }

    fn description(&self) -> &'static str {
        "Parses NCC Group-style pentest report text into structured findings"
    }

    fn is_available(&self) -> bool {
        true
    }

    fn run(&self, path: &Path, config: &Config) -> PluginResult {
        let start = Instant::now();
        let files = collect_files(path, &["txt"]);

        if files.is_empty() {
            return PluginResult {
                plugin_name: self.name().to_string(),
                results: serde_json::json!({ "reports": {} }),
                files_scanned: 0,
                skipped: false,
                skip_reason: None,
                error: None,
                duration_ms: start.elapsed().as_millis() as u64,
            };
        }

        let schema = report_schema();
        let extra = compile_ignore_patterns(config);

        let mut reports = Map::new();
        let mut errors: Vec<String> = Vec::new();

        for file in &files {
            let parsed = SectionedTextParser::new(&schema)
                .parse_file(file, |line| is_boilerplate(line, &extra));
            match parsed {
                Ok(report) => match serde_json::to_value(&report) {
                    Ok(value) => {
                        reports.insert(file_key(file), value);
                    }
                    Err(e) => {
                        errors.push(format!("failed to serialize {}: {}", file.display(), e));
                    }
                },
                Err(e) => {
                    errors.push(e.to_string());
                }
            }
        }

        PluginResult {
            plugin_name: self.name().to_string(),
            results: serde_json::json!({ "reports": reports }),
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

/// Parses a single extracted-text report file. Used by the `parse-report`
/// CLI command, which wants the raw [`Report`] rather than a [`PluginResult`].
pub fn parse_report_file(path: &Path, config: &Config) -> Result<Report, ParseError> {
    let schema = report_schema();
    let extra = compile_ignore_patterns(config);
    SectionedTextParser::new(&schema).parse_file(path, |line| is_boilerplate(line, &extra))
}

/// The declarative section schema for this report family.
pub fn report_schema() -> Schema {
    Schema::new(vec![
        Section::leaf("metadata", |ctx| {
            ctx.completed.is_empty() && ctx.buffer.is_empty()
        })
        .until(|ctx| ctx.completed.is_empty() && RE_TITLE_DATE.is_match(ctx.line))
        .with_parser(parse_title),
        Section::container(
            "findings",
            |ctx| ctx.line == "Finding Details" || ctx.line == "Vulnerability Details",
            Section::repeating_item("finding", |ctx| {
                // A `Risk` line right after a heading also opens an instance,
                // covering extractions where the heading line itself was
                // consumed by an earlier boundary. The buffer check keeps the
                // clause from re-firing inside an instance that already holds
                // its heading.
                is_finding_heading(ctx.line)
                    || (ctx.line.starts_with("Risk")
                        && is_finding_heading(ctx.previous_line)
                        && !ctx.buffer.iter().any(|l| is_finding_heading(l)))
            })
            .until(|ctx| is_finding_heading(ctx.line))
            .with_parser(parse_finding),
        )
        .until(|ctx| ctx.line.starts_with("Appendix A:")),
    ])
}

fn is_finding_heading(line: &str) -> bool {
    line.starts_with("Finding") || line.starts_with("Vulnerability")
}

fn is_boilerplate(line: &str, extra: &[Regex]) -> bool {
    RE_PAGE_FOOTER.is_match(line)
        || RE_WATERMARK.is_match(line)
        || extra.iter().any(|re| re.is_match(line))
}

fn compile_ignore_patterns(config: &Config) -> Vec<Regex> {
    config
        .report
        .ignore_patterns
        .iter()
        .filter_map(|pattern| match Regex::new(pattern) {
            Ok(re) => Some(re),
            Err(e) => {
                eprintln!("Warning: skipping invalid ignore pattern '{pattern}': {e}");
                None
            }
        })
        .collect()
}

fn file_key(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().to_string())
        .unwrap_or_else(|| path.display().to_string())
}

/// Title block: every buffered line is part of the title; the triggering
/// line carries the report date.
fn parse_title(line: &str, buffer: &[String]) -> Result<SectionOutput, String> {
    let mut map = Map::new();
    map.insert("title".to_string(), buffer.join(" ").into());
    if let Some(captures) = RE_TITLE_DATE.captures(line) {
        map.insert("date".to_string(), captures[1].to_string().into());
    }
    Ok(SectionOutput::Metadata(map))
}

/// The labeled fields a finding block may carry, longest keywords first so
/// `Reproduction Steps` is never read as a stray `R…` prefix. `Identiﬁer`
/// (fi ligature) shows up in PDF-extracted text alongside `Identifier`.
const FIELD_KEYWORDS: &[(&str, &str)] = &[
    ("Reproduction Steps", "reproduction_steps"),
    ("Client Vulnerability ID", "client_vulnerability_id"),
    ("Recommendation", "recommendation"),
    ("Description", "description"),
    ("Identifier", "identifier"),
    ("Identiﬁer", "identifier"),
    ("Component", "component"),
    ("Category", "category"),
    ("Location", "location"),
    ("Status", "status"),
    ("Impact", "impact_description"),
    ("Risk", "risk"),
];

/// Matches a field-heading line. The keyword must be the whole line or be
/// followed by a space — `Impact: High` inside a risk block is a
/// continuation line, not a new `Impact` section.
fn match_field_keyword(line: &str) -> Option<(&'static str, &str)> {
    for (keyword, slot) in FIELD_KEYWORDS {
        if let Some(rest) = line.strip_prefix(keyword) {
            if rest.is_empty() || rest.starts_with(' ') {
                return Some((slot, rest));
            }
        }
    }
    None
}

fn field_value(fields: &[(&'static str, String)], slot: &str) -> Option<String> {
    fields
        .iter()
        .find(|(key, _)| *key == slot)
        .map(|(_, value)| value.trim().to_string())
        .filter(|value| !value.is_empty())
}

/// Converts one buffered finding block into a keyed record.
///
/// The first `Finding …` / `Vulnerability …` line supplies the entity key;
/// subsequent lines are grouped under the most recent field keyword.
fn parse_finding(_line: &str, buffer: &[String]) -> Result<SectionOutput, String> {
    let mut title: Option<String> = None;
    let mut fields: Vec<(&'static str, String)> = Vec::new();
    let mut current: Option<usize> = None;

    for raw in buffer {
        let line = raw.as_str();
        if title.is_none() {
            if let Some(rest) = line
                .strip_prefix("Finding ")
                .or_else(|| line.strip_prefix("Vulnerability "))
            {
                title = Some(rest.trim().to_string());
                continue;
            }
        }
        if let Some((slot, rest)) = match_field_keyword(line) {
            fields.push((slot, rest.trim().to_string()));
            current = Some(fields.len() - 1);
            continue;
        }
        if let Some(idx) = current {
            let text = &mut fields[idx].1;
            if !text.is_empty() {
                text.push(' ');
            }
            text.push_str(line);
        }
    }

    let title =
        title.ok_or_else(|| "finding block has no Finding/Vulnerability title line".to_string())?;

    let mut identifier = field_value(&fields, "identifier");
    let mut impact = None;
    let mut exploitability = None;
    let risk = match field_value(&fields, "risk") {
        Some(raw) => {
            let split = split_risk_block(&raw);
            impact = split.impact;
            exploitability = split.exploitability;
            if identifier.is_none() {
                identifier = split.identifier;
            }
            Some(split.risk)
        }
        None => None,
    };

    let record = serde_json::json!({
        "risk": risk,
        "identifier": identifier,
        "component": field_value(&fields, "component"),
        "category": field_value(&fields, "category"),
        "location": field_value(&fields, "location"),
        "status": field_value(&fields, "status"),
        "description": field_value(&fields, "description"),
        "exploitability": exploitability,
        "impact": impact,
        "impact_description": field_value(&fields, "impact_description"),
        "recommendation": field_value(&fields, "recommendation"),
        "reproduction_steps": field_value(&fields, "reproduction_steps"),
    });

    let mut records = Map::new();
    records.insert(title, record);
    Ok(SectionOutput::Records(records))
}

struct RiskBlock {
    risk: String,
    impact: Option<String>,
    exploitability: Option<String>,
    identifier: Option<String>,
}

/// Splits the combined risk block
/// `<risk> Impact: <impact>, Exploitability: <exploitability> [Identifier <id>]`
/// into its parts. A block without the `Impact:` marker is treated as a bare
/// risk value.
fn split_risk_block(raw: &str) -> RiskBlock {
    let Some(impact_at) = raw.find("Impact:") else {
        return RiskBlock {
            risk: normalize_label(raw),
            impact: None,
            exploitability: None,
            identifier: None,
        };
    };

    let risk = normalize_label(&raw[..impact_at]);
    let after_impact = &raw[impact_at + "Impact:".len()..];

    let (impact_raw, rest) = match after_impact.find("Exploitability:") {
        Some(at) => (
            &after_impact[..at],
            Some(&after_impact[at + "Exploitability:".len()..]),
        ),
        None => (after_impact, None),
    };
    let impact = non_empty(normalize_label(&impact_raw.replace(',', "")));

    let (exploitability, identifier) = match rest {
        Some(rest) => match rest.find("Identifier ") {
            Some(at) => (
                non_empty(normalize_label(&rest[..at])),
                non_empty(rest[at + "Identifier ".len()..].trim().to_string()),
            ),
            None => (non_empty(normalize_label(rest)), None),
        },
        None => (None, None),
    };

    RiskBlock {
        risk,
        impact,
        exploitability,
        identifier,
    }
}

fn non_empty(value: String) -> Option<String> {
    if value.is_empty() {
        None
    } else {
        Some(value)
    }
}
