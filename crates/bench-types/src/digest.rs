//! Statistical digest of a benchmark run.

use serde::{Deserialize, Serialize};

/// Marker value stored in every field of an unsupported digest.
const UNSUPPORTED: f64 = -1.0;

/// Statistical summary of the timing samples from one benchmark run.
///
/// All timings are in milliseconds. A digest whose fields are all `-1`
/// marks a query the engine rejected; it is never a real measurement and
/// is suppressed from comparisons (see [`StatDigest::unsupported`]).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StatDigest {
    pub mean: f64,
    pub median: f64,
    pub min: f64,
    pub max: f64,
    pub std_dev: f64,
    pub p95: f64,
    pub p99: f64,
    /// Rows returned by the first successful run
    pub result_count: i64,
    /// Number of timed repetitions
    pub runs: i64,
}

impl StatDigest {
    /// The "not supported" sentinel digest.
    pub fn unsupported() -> Self {
        Self {
            mean: UNSUPPORTED,
            median: UNSUPPORTED,
            min: UNSUPPORTED,
            max: UNSUPPORTED,
            std_dev: UNSUPPORTED,
            p95: UNSUPPORTED,
            p99: UNSUPPORTED,
            result_count: -1,
            runs: -1,
        }
    }

    /// Whether this digest is the unsupported sentinel.
    pub fn is_unsupported(&self) -> bool {
        self.mean < 0.0
    }

    /// Whether this digest holds a real measurement.
    pub fn is_supported(&self) -> bool {
        !self.is_unsupported()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unsupported_sentinel() {
        let digest = StatDigest::unsupported();
        assert!(digest.is_unsupported());
        assert_eq!(digest.mean, -1.0);
        assert_eq!(digest.p99, -1.0);
        assert_eq!(digest.result_count, -1);
        assert_eq!(digest.runs, -1);
    }

    #[test]
    fn test_serializes_camel_case() {
        let digest = StatDigest {
            mean: 2.5,
            median: 2.0,
            min: 1.0,
            max: 4.0,
            std_dev: 0.5,
            p95: 4.0,
            p99: 4.0,
            result_count: 10,
            runs: 5,
        };
        let json = serde_json::to_value(digest).unwrap();
        assert_eq!(json["stdDev"], 0.5);
        assert_eq!(json["resultCount"], 10);
        assert!(digest.is_supported());
    }
}
