//! Persisted baseline records.
//!
//! One record exists per (fingerprint, engine version) pair. The document
//! shape matches the engine collection and the NDJSON interchange format:
//!
//! ```json
//! {"_id": {"query": "...", "hash": "...", "ditto_version": "4.12.2"},
//!  "metrics": {"mean": 1.2, ..., "timestamp": "2026-01-01T00:00:00Z"}}
//! ```

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::digest::StatDigest;
use crate::version::Version;

/// Maximum length (in characters) of the query display copy kept in the key.
pub const MAX_QUERY_DISPLAY_LEN: usize = 100;

const ELLIPSIS: &str = "...";

/// Composite document key.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BaselineId {
    /// Display copy of the query text, truncated to [`MAX_QUERY_DISPLAY_LEN`]
    pub query: String,
    /// Benchmark fingerprint (computed from the untruncated text)
    pub hash: String,
    /// Engine release the baseline was recorded on
    #[serde(rename = "ditto_version")]
    pub engine_version: String,
}

/// Stored measurement: the digest plus when it was taken.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BaselineMetrics {
    #[serde(flatten)]
    pub digest: StatDigest,
    pub timestamp: DateTime<Utc>,
}

/// A persisted baseline for one benchmark on one engine version.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BaselineRecord {
    #[serde(rename = "_id")]
    pub id: BaselineId,
    pub metrics: BaselineMetrics,
}

impl BaselineRecord {
    /// Build a record, truncating the query display copy.
    pub fn new(
        query: &str,
        hash: impl Into<String>,
        engine_version: impl Into<String>,
        digest: StatDigest,
        timestamp: DateTime<Utc>,
    ) -> Self {
        Self {
            id: BaselineId {
                query: truncate_query(query),
                hash: hash.into(),
                engine_version: engine_version.into(),
            },
            metrics: BaselineMetrics { digest, timestamp },
        }
    }

    /// Parsed engine version of this record.
    pub fn version(&self) -> Version {
        Version::parse(&self.id.engine_version)
    }

    pub fn hash(&self) -> &str {
        &self.id.hash
    }

    pub fn digest(&self) -> &StatDigest {
        &self.metrics.digest
    }

    /// Mean time in ms, or `None` for an unsupported sentinel record.
    pub fn mean(&self) -> Option<f64> {
        let digest = self.digest();
        digest.is_supported().then_some(digest.mean)
    }
}

/// Truncate query text to the display bound on a char boundary.
fn truncate_query(query: &str) -> String {
    if query.chars().count() <= MAX_QUERY_DISPLAY_LEN {
        return query.to_string();
    }
    let keep = MAX_QUERY_DISPLAY_LEN - ELLIPSIS.len();
    let mut truncated: String = query.chars().take(keep).collect();
    truncated.push_str(ELLIPSIS);
    truncated
}
