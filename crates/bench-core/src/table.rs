//! Multi-version table model shared by the batch report and the saved view.

use std::cmp::Ordering;

use bench_types::{BaselineRecord, Version};

use crate::orchestrator::BenchmarkReport;
use crate::selector::select_comparisons;
use crate::significance::{classify, Classification};

/// One table cell.
#[derive(Debug, Clone, PartialEq)]
pub enum Cell {
    /// Nothing recorded for this version; renders as `–`
    Missing,
    /// Recorded as unsupported; renders as `N/A`
    Unsupported,
    Value(f64),
    /// A baseline value with the change of the row's reference against it
    Compared {
        value: f64,
        classification: Classification,
    },
}

#[derive(Debug, Clone, PartialEq)]
pub struct TableRow {
    pub name: String,
    /// Aligned with [`VersionTable::versions`]
    pub cells: Vec<Cell>,
}

/// Rows are benchmarks, columns are versions, newest first.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct VersionTable {
    pub versions: Vec<Version>,
    pub rows: Vec<TableRow>,
}

impl VersionTable {
    /// Table for a batch of live reports.
    ///
    /// Columns are the current version plus every version the selector
    /// picks from any row's history, so rows stay aligned even when their
    /// histories differ. A column a row has no comparison for falls back to
    /// that row's stored record.
    pub fn from_reports(current: &Version, reports: &[BenchmarkReport]) -> Self {
        let versions = column_union(
            std::iter::once(current.clone()).chain(reports.iter().flat_map(|r| {
                select_comparisons(current, &r.history)
                    .into_iter()
                    .map(|selected| selected.version)
            })),
        );

        let rows = reports
            .iter()
            .map(|report| {
                let cells = versions
                    .iter()
                    .map(|version| {
                        if version.raw == current.raw {
                            return if report.run.is_supported() {
                                Cell::Value(report.run.digest.mean)
                            } else {
                                Cell::Unsupported
                            };
                        }
                        if let Some(c) = report
                            .comparisons
                            .iter()
                            .find(|c| c.version.raw == version.raw)
                        {
                            return Cell::Compared {
                                value: c.baseline_mean,
                                classification: c.classification.clone(),
                            };
                        }
                        report
                            .history
                            .iter()
                            .find(|r| r.id.engine_version == version.raw)
                            .map_or(Cell::Missing, stored_cell)
                    })
                    .collect();
                TableRow {
                    name: report.name.clone(),
                    cells,
                }
            })
            .collect();

        Self { versions, rows }
    }

    /// Table of stored baselines, one `(name, records)` entry per benchmark.
    ///
    /// Each row is measured against a reference record: the one for
    /// `current` when stored, otherwise the newest stored version. Other
    /// records are classified with themselves as the baseline.
    pub fn from_saved(current: &Version, entries: &[(String, Vec<BaselineRecord>)]) -> Self {
        let versions = column_union(
            entries
                .iter()
                .flat_map(|(_, records)| records.iter().map(BaselineRecord::version)),
        );

        let rows = entries
            .iter()
            .map(|(name, records)| {
                let reference = records
                    .iter()
                    .find(|r| r.id.engine_version == current.raw)
                    .or_else(|| records.iter().max_by(|a, b| column_order(&b.version(), &a.version())));
                let reference_mean = reference.and_then(BaselineRecord::mean);

                let cells = versions
                    .iter()
                    .map(|version| {
                        let Some(record) = records.iter().find(|r| r.id.engine_version == version.raw)
                        else {
                            return Cell::Missing;
                        };
                        let Some(value) = record.mean() else {
                            return Cell::Unsupported;
                        };
                        let is_reference = reference.is_some_and(|r| r.id == record.id);
                        match reference_mean {
                            Some(current_mean) if !is_reference => Cell::Compared {
                                value,
                                classification: classify(value, current_mean),
                            },
                            _ => Cell::Value(value),
                        }
                    })
                    .collect();
                TableRow {
                    name: name.clone(),
                    cells,
                }
            })
            .collect();

        Self { versions, rows }
    }
}

fn stored_cell(record: &BaselineRecord) -> Cell {
    record.mean().map_or(Cell::Unsupported, Cell::Value)
}

/// Newest first; equal tuples fall back to the raw string.
fn column_order(a: &Version, b: &Version) -> Ordering {
    Version::cmp_desc(a, b).then_with(|| a.raw.cmp(&b.raw))
}

fn column_union(versions: impl Iterator<Item = Version>) -> Vec<Version> {
    let mut columns: Vec<Version> = Vec::new();
    for version in versions {
        if !columns.iter().any(|c| c.raw == version.raw) {
            columns.push(version);
        }
    }
    columns.sort_by(column_order);
    columns
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::orchestrator::Comparison;
    use crate::runner::BenchmarkRun;
    use crate::significance::Significance;
    use bench_types::StatDigest;
    use chrono::Utc;

    fn record(version: &str, mean: Option<f64>) -> BaselineRecord {
        let digest = match mean {
            Some(mean) => StatDigest {
                mean,
                median: mean,
                min: mean,
                max: mean,
                std_dev: 0.0,
                p95: mean,
                p99: mean,
                result_count: 1,
                runs: 5,
            },
            None => StatDigest::unsupported(),
        };
        BaselineRecord::new("SELECT 1", "0123456789abcdef", version, digest, Utc::now())
    }

    fn live(name: &str, mean: Option<f64>, history: Vec<BaselineRecord>) -> BenchmarkReport {
        let current = Version::parse("4.12.2");
        let run = BenchmarkRun {
            digest: *record("4.12.2", mean).digest(),
            samples: mean.map(|m| vec![m]).unwrap_or_default(),
            error: mean.is_none().then(|| "unsupported".to_string()),
        };
        let comparisons = match mean {
            Some(mean) => select_comparisons(&current, &history)
                .into_iter()
                .filter_map(|selected| {
                    let baseline_mean = selected.record.mean()?;
                    Some(Comparison {
                        kind: selected.kind,
                        version: selected.version,
                        baseline_mean,
                        classification: classify(baseline_mean, mean),
                    })
                })
                .collect(),
            None => Vec::new(),
        };
        BenchmarkReport {
            name: name.to_string(),
            query: "SELECT 1".to_string(),
            fingerprint: "0123456789abcdef".to_string(),
            version: current,
            run,
            current_baseline: None,
            comparisons,
            history,
        }
    }

    fn raws(table: &VersionTable) -> Vec<&str> {
        table.versions.iter().map(|v| v.raw.as_str()).collect()
    }

    #[test]
    fn test_saved_table_uses_current_version_as_reference() {
        let entries = vec![(
            "movies".to_string(),
            vec![
                record("4.11.0", Some(5.0)),
                record("4.12.2", Some(7.0)),
                record("4.12.0", None),
            ],
        )];
        let table = VersionTable::from_saved(&Version::parse("4.12.2"), &entries);

        assert_eq!(raws(&table), vec!["4.12.2", "4.12.0", "4.11.0"]);
        let cells = &table.rows[0].cells;
        assert_eq!(cells[0], Cell::Value(7.0));
        assert_eq!(cells[1], Cell::Unsupported);
        match &cells[2] {
            Cell::Compared {
                value,
                classification,
            } => {
                assert_eq!(*value, 5.0);
                assert_eq!(classification.label, "+2.0ms");
                assert_eq!(classification.significance, Significance::LargeRegression);
            }
            other => panic!("expected comparison, got {:?}", other),
        }
    }

    #[test]
    fn test_saved_table_falls_back_to_newest_and_aligns_rows() {
        let entries = vec![
            (
                "a".to_string(),
                vec![record("4.10.0", Some(100.0)), record("4.11.0", Some(94.0))],
            ),
            ("b".to_string(), vec![record("4.9.0", Some(1.0))]),
        ];
        let table = VersionTable::from_saved(&Version::parse("4.12.2"), &entries);

        assert_eq!(raws(&table), vec!["4.11.0", "4.10.0", "4.9.0"]);
        let a = &table.rows[0].cells;
        assert_eq!(a[0], Cell::Value(94.0));
        assert!(matches!(&a[1], Cell::Compared { classification, .. } if classification.label == "-6.0%"));
        assert_eq!(a[2], Cell::Missing);

        let b = &table.rows[1].cells;
        assert_eq!(b[0], Cell::Missing);
        assert_eq!(b[1], Cell::Missing);
        assert_eq!(b[2], Cell::Value(1.0));
    }

    #[test]
    fn test_unparsable_versions_keep_distinct_columns() {
        let entries = vec![(
            "a".to_string(),
            vec![record("unknown", Some(1.0)), record("dev", Some(1.0))],
        )];
        let table = VersionTable::from_saved(&Version::parse("4.12.2"), &entries);
        assert_eq!(raws(&table), vec!["dev", "unknown"]);
    }

    #[test]
    fn test_live_table_marks_stored_unsupported() {
        let reports = vec![
            live("a", Some(4.0), vec![record("4.12.1", Some(3.0))]),
            live("b", Some(4.0), vec![record("4.12.1", None)]),
        ];
        let table = VersionTable::from_reports(&Version::parse("4.12.2"), &reports);

        assert_eq!(raws(&table), vec!["4.12.2", "4.12.1"]);
        let a = &table.rows[0].cells;
        assert_eq!(a[0], Cell::Value(4.0));
        assert!(matches!(
            &a[1],
            Cell::Compared { value, classification }
                if *value == 3.0 && classification.label == "+1.0ms"
        ));
        let b = &table.rows[1].cells;
        assert_eq!(b[0], Cell::Value(4.0));
        assert_eq!(b[1], Cell::Unsupported);
    }

    #[test]
    fn test_live_table_unsupported_run_shows_history() {
        let reports = vec![live(
            "a",
            None,
            vec![record("4.12.1", Some(3.0)), record("4.11.0", Some(9.0))],
        )];
        let table = VersionTable::from_reports(&Version::parse("4.12.2"), &reports);

        assert_eq!(raws(&table), vec!["4.12.2", "4.12.1", "4.11.0"]);
        let cells = &table.rows[0].cells;
        assert_eq!(cells[0], Cell::Unsupported);
        assert_eq!(cells[1], Cell::Value(3.0));
        assert_eq!(cells[2], Cell::Value(9.0));
    }

    #[test]
    fn test_live_table_missing_history_stays_missing() {
        let reports = vec![
            live("a", Some(4.0), vec![record("4.12.0", Some(4.0))]),
            live("b", Some(4.0), Vec::new()),
        ];
        let table = VersionTable::from_reports(&Version::parse("4.12.2"), &reports);

        assert_eq!(raws(&table), vec!["4.12.2", "4.12.0"]);
        assert_eq!(table.rows[1].cells[1], Cell::Missing);
        assert!(matches!(
            &table.rows[0].cells[1],
            Cell::Compared { classification, .. } if classification.significance == Significance::NoChange
        ));
    }
}
