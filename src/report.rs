//! Structured report types built incrementally by the sectioned text parser.
//!
//! A [`Report`] has four fixed top-level slots:
//!
//! | Slot | Contents |
//! |------|----------|
//! | `data` | parsed entities, keyed by a derived entity key (e.g. finding title) |
//! | `summary` | running counters (`total_high`, `total_low`, …) |
//! | `aggregations` | per-field histograms (`by_risk`, `by_category`, …) |
//! | `metadata` | free-form key/value pairs (report title, date, …) |
//!
//! Reports are built incrementally and never rolled back; each parse
//! invocation owns exactly one `Report`.

use serde_json::{Map, Value};
use std::collections::BTreeMap;

/// The accumulator a parse invocation writes into.
#[derive(Debug, Default, serde::Serialize)]
pub struct Report {
    /// Parsed entity records keyed by derived entity key.
    pub data: Map<String, Value>,
    /// Running counters, e.g. `total_high` per risk value seen.
    pub summary: BTreeMap<String, u64>,
    /// Per-classification-field histograms.
    pub aggregations: Aggregations,
    /// Free-form document metadata.
    pub metadata: Map<String, Value>,
}

/// Histograms over the classification fields of completed repeating records.
#[derive(Debug, Default, serde::Serialize)]
pub struct Aggregations {
    pub by_risk: BTreeMap<String, u64>,
    pub by_category: BTreeMap<String, u64>,
    pub by_impact: BTreeMap<String, u64>,
    pub by_exploitability: BTreeMap<String, u64>,
    pub by_component: BTreeMap<String, u64>,
}

impl Report {
    /// Updates `summary` and `aggregations` for one completed repeating record.
    ///
    /// Recognized classification fields: `risk` (also counted as
    /// `summary["total_" + risk]`), `category`, `impact`, `exploitability`,
    /// and `component`. Fields that are absent or non-string are ignored.
    pub(crate) fn tally(&mut self, record: &Value) {
        let Some(obj) = record.as_object() else {
            return;
        };

        if let Some(risk) = obj.get("risk").and_then(Value::as_str) {
            *self.summary.entry(format!("total_{risk}")).or_insert(0) += 1;
            *self
                .aggregations
                .by_risk
                .entry(risk.to_string())
                .or_insert(0) += 1;
        }
        if let Some(category) = obj.get("category").and_then(Value::as_str) {
            *self
                .aggregations
                .by_category
                .entry(category.to_string())
                .or_insert(0) += 1;
        }
        if let Some(impact) = obj.get("impact").and_then(Value::as_str) {
            *self
                .aggregations
                .by_impact
                .entry(impact.to_string())
                .or_insert(0) += 1;
        }
        if let Some(exploitability) = obj.get("exploitability").and_then(Value::as_str) {
            *self
                .aggregations
                .by_exploitability
                .entry(exploitability.to_string())
                .or_insert(0) += 1;
        }
        if let Some(component) = obj.get("component").and_then(Value::as_str) {
            *self
                .aggregations
                .by_component
                .entry(component.to_string())
                .or_insert(0) += 1;
        }
    }
}
