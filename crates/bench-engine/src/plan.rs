//! Execution plan inspection.
//!
//! `EXPLAIN <query>` returns a single item whose value is a plan tree.
//! Nodes carry an `#operator` discriminator: `sequence` nodes hold
//! `children`, `scan` is a full collection scan and `index_scan` names the
//! index it reads.

use std::fmt;

use serde_json::Value;

use crate::{EngineError, QueryEngine};

/// How a query reads its collection.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum IndexUsage {
    FullScan,
    Index(String),
    /// No scan operator found in the plan
    Unknown,
}

impl fmt::Display for IndexUsage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            IndexUsage::FullScan => write!(f, "full scan"),
            IndexUsage::Index(name) => write!(f, "index '{}'", name),
            IndexUsage::Unknown => write!(f, "unknown"),
        }
    }
}

/// Determine index usage from a plan tree.
///
/// An index scan anywhere in the tree wins over a full scan.
pub fn index_usage(plan: &Value) -> IndexUsage {
    let mut found = Vec::new();
    collect_scans(plan, &mut found);

    if let Some(index) = found
        .iter()
        .find(|usage| matches!(usage, IndexUsage::Index(_)))
    {
        return index.clone();
    }
    if found.contains(&IndexUsage::FullScan) {
        return IndexUsage::FullScan;
    }
    IndexUsage::Unknown
}

fn collect_scans(node: &Value, found: &mut Vec<IndexUsage>) {
    match node {
        Value::Object(map) => {
            match map.get("#operator").and_then(Value::as_str) {
                Some("index_scan") => {
                    found.push(IndexUsage::Index(index_name(node)));
                    return;
                }
                Some("scan") => {
                    found.push(IndexUsage::FullScan);
                    return;
                }
                _ => {}
            }
            if let Some(children) = map.get("children") {
                collect_scans(children, found);
            }
            for (key, value) in map {
                if key != "children" && (value.is_object() || value.is_array()) {
                    collect_scans(value, found);
                }
            }
        }
        Value::Array(items) => {
            for item in items {
                collect_scans(item, found);
            }
        }
        _ => {}
    }
}

fn index_name(node: &Value) -> String {
    ["index", "name"]
        .iter()
        .find_map(|key| node.get(*key).and_then(Value::as_str))
        .or_else(|| {
            let desc = node.get("desc")?;
            ["index", "name"]
                .iter()
                .find_map(|key| desc.get(*key).and_then(Value::as_str))
        })
        .unwrap_or("<unnamed>")
        .to_string()
}

/// Run `EXPLAIN` for a query and report its index usage.
pub async fn explain(engine: &dyn QueryEngine, query: &str) -> Result<IndexUsage, EngineError> {
    let result = engine.execute(&format!("EXPLAIN {}", query), None).await?;
    Ok(result.first().map(index_usage).unwrap_or(IndexUsage::Unknown))
}
