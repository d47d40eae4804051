//! Plain-text rendering of runs, reports and tables.

use std::fmt::Write;

use crate::orchestrator::{BaselineSummary, BenchmarkReport};
use crate::runner::BenchmarkRun;
use crate::scenario::ScenarioReport;
use crate::significance::{Classification, Significance};
use crate::table::{Cell, VersionTable};

/// Placeholder for a version with no recorded data.
pub const MISSING: &str = "–";
/// Placeholder for an unsupported measurement.
pub const UNSUPPORTED: &str = "N/A";

const GREEN: &str = "\x1b[32m";
const YELLOW: &str = "\x1b[33m";
const RED: &str = "\x1b[31m";
const RESET: &str = "\x1b[0m";

#[derive(Debug, Clone, Copy, Default)]
pub struct Style {
    pub color: bool,
}

impl Style {
    pub fn new(color: bool) -> Self {
        Self { color }
    }

    fn paint(&self, significance: Significance, text: &str) -> String {
        let code = match significance {
            Significance::Improvement => GREEN,
            Significance::SmallRegression => YELLOW,
            Significance::LargeRegression => RED,
            Significance::NoChange => return text.to_string(),
        };
        if self.color {
            format!("{}{}{}", code, text, RESET)
        } else {
            text.to_string()
        }
    }

    fn diff(&self, classification: &Classification) -> String {
        self.paint(classification.significance, &classification.label)
    }
}

fn ms(value: f64) -> String {
    format!("{:.2}ms", value)
}

/// Stats block for a single run.
pub fn render_run(title: &str, run: &BenchmarkRun) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "{}", title);
    if !run.is_supported() {
        let _ = writeln!(
            out,
            "  {} (not supported: {})",
            UNSUPPORTED,
            run.error.as_deref().unwrap_or("unknown error")
        );
        return out;
    }
    let d = &run.digest;
    let _ = writeln!(out, "  runs:    {}", d.runs);
    let _ = writeln!(out, "  results: {}", d.result_count);
    let _ = writeln!(
        out,
        "  mean:    {}  median: {}  stddev: {}",
        ms(d.mean),
        ms(d.median),
        ms(d.std_dev)
    );
    let _ = writeln!(out, "  min:     {}  max: {}", ms(d.min), ms(d.max));
    let _ = writeln!(out, "  p95:     {}  p99: {}", ms(d.p95), ms(d.p99));
    out
}

/// One benchmark with its current baseline and comparisons.
pub fn render_report(report: &BenchmarkReport, style: Style) -> String {
    let title = format!(
        "{} [{}] on {}",
        report.name, report.fingerprint, report.version
    );
    let mut out = render_run(&title, &report.run);
    if !report.run.is_supported() {
        return out;
    }

    if let Some(current) = &report.current_baseline {
        let stored = current
            .record
            .mean()
            .map_or_else(|| UNSUPPORTED.to_string(), ms);
        let diff = current
            .classification
            .as_ref()
            .map(|c| format!(" ({})", style.diff(c)))
            .unwrap_or_default();
        let _ = writeln!(out, "  baseline {}: {}{}", report.version, stored, diff);
    }

    if report.comparisons.is_empty() {
        let _ = writeln!(out, "  no earlier baselines");
    }
    for comparison in &report.comparisons {
        let _ = writeln!(
            out,
            "  vs {} ({}): {} -> {} ({}, {})",
            comparison.version,
            comparison.kind,
            ms(comparison.baseline_mean),
            ms(report.run.digest.mean),
            style.diff(&comparison.classification),
            comparison.classification.significance
        );
    }
    out
}

fn cell_text(cell: &Cell) -> (String, Option<&Classification>) {
    match cell {
        Cell::Missing => (MISSING.to_string(), None),
        Cell::Unsupported => (UNSUPPORTED.to_string(), None),
        Cell::Value(value) => (ms(*value), None),
        Cell::Compared {
            value,
            classification,
        } => (
            format!("{} ({})", ms(*value), classification.label),
            Some(classification),
        ),
    }
}

/// Rows are benchmarks, columns are versions.
pub fn render_table(table: &VersionTable, style: Style) -> String {
    if table.rows.is_empty() {
        return "No benchmarks.\n".to_string();
    }

    let header: Vec<String> = std::iter::once("benchmark".to_string())
        .chain(table.versions.iter().map(|v| v.raw.clone()))
        .collect();
    let rows: Vec<Vec<(String, Option<&Classification>)>> = table
        .rows
        .iter()
        .map(|row| {
            std::iter::once((row.name.clone(), None))
                .chain(row.cells.iter().map(cell_text))
                .collect()
        })
        .collect();

    let mut widths: Vec<usize> = header.iter().map(|h| h.chars().count()).collect();
    for row in &rows {
        for (i, (text, _)) in row.iter().enumerate() {
            widths[i] = widths[i].max(text.chars().count());
        }
    }

    let mut out = String::new();
    let header_line: Vec<String> = header
        .iter()
        .zip(&widths)
        .map(|(h, w)| pad(h, *w))
        .collect();
    let _ = writeln!(out, "{}", header_line.join(" | ").trim_end());
    let rule: Vec<String> = widths.iter().map(|w| "-".repeat(*w)).collect();
    let _ = writeln!(out, "{}", rule.join("-+-"));

    for row in &rows {
        let cells: Vec<String> = row
            .iter()
            .zip(&widths)
            .map(|((text, classification), w)| {
                // pad before colouring so escape codes do not skew widths
                let padded = pad(text, *w);
                match classification {
                    Some(c) => style.paint(c.significance, &padded),
                    None => padded,
                }
            })
            .collect();
        let _ = writeln!(out, "{}", cells.join(" | ").trim_end());
    }
    out
}

fn pad(text: &str, width: usize) -> String {
    let len = text.chars().count();
    format!("{}{}", text, " ".repeat(width.saturating_sub(len)))
}

pub fn render_scenario(report: &ScenarioReport) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "Scenario {}", report.name);
    for (i, step) in report.steps.iter().enumerate() {
        match &step.error {
            Some(error) => {
                let _ = writeln!(out, "  {}. {}: FAILED ({})", i + 1, step.query, error);
            }
            None => {
                let _ = writeln!(
                    out,
                    "  {}. {}: {} ({} results)",
                    i + 1,
                    step.query,
                    ms(step.elapsed_ms),
                    step.result_count.unwrap_or(0)
                );
            }
        }
        for check in &step.checks {
            let _ = writeln!(out, "     [{}] {}: {}", check.outcome, check.check, check.detail);
        }
    }
    let verdict = if report.passed() { "passed" } else { "failed" };
    let _ = writeln!(out, "Scenario {}", verdict);
    out
}

pub fn render_summary(summary: &BaselineSummary) -> String {
    format!(
        "Baselines: {} created, {} overwritten, {} skipped, {} unsupported\n",
        summary.created, summary.overwritten, summary.skipped, summary.unsupported
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::significance::classify;
    use bench_types::{StatDigest, Version};

    fn run(mean: f64) -> BenchmarkRun {
        BenchmarkRun {
            digest: StatDigest {
                mean,
                median: mean,
                min: mean,
                max: mean,
                std_dev: 0.0,
                p95: mean,
                p99: mean,
                result_count: 3,
                runs: 5,
            },
            samples: vec![mean; 5],
            error: None,
        }
    }

    #[test]
    fn test_render_unsupported_run() {
        let unsupported = BenchmarkRun {
            digest: StatDigest::unsupported(),
            samples: Vec::new(),
            error: Some("syntax error".to_string()),
        };
        let text = render_run("q", &unsupported);
        assert!(text.contains("N/A"));
        assert!(text.contains("syntax error"));
        assert!(!text.contains("mean"));
    }

    #[test]
    fn test_render_run_stats() {
        let text = render_run("q", &run(1.5));
        assert!(text.contains("mean:    1.50ms"));
        assert!(text.contains("results: 3"));
    }

    #[test]
    fn test_table_placeholders_and_alignment() {
        let table = VersionTable {
            versions: vec![Version::parse("4.12.2"), Version::parse("4.11.0")],
            rows: vec![
                crate::table::TableRow {
                    name: "movies".to_string(),
                    cells: vec![
                        Cell::Value(7.0),
                        Cell::Compared {
                            value: 5.0,
                            classification: classify(5.0, 7.0),
                        },
                    ],
                },
                crate::table::TableRow {
                    name: "x".to_string(),
                    cells: vec![Cell::Unsupported, Cell::Missing],
                },
            ],
        };
        let text = render_table(&table, Style::new(false));
        let lines: Vec<&str> = text.lines().collect();

        assert_eq!(lines.len(), 4);
        assert!(lines[0].starts_with("benchmark | 4.12.2"));
        assert!(lines[2].contains("5.00ms (+2.0ms)"));
        assert!(lines[3].contains("N/A"));
        assert!(lines[3].ends_with(MISSING));
        assert!(!text.contains('\x1b'));
    }

    #[test]
    fn test_color_applies_only_to_changes() {
        let style = Style::new(true);
        assert_eq!(
            style.diff(&classify(5.0, 7.0)),
            format!("{}+2.0ms{}", RED, RESET)
        );
        assert_eq!(style.diff(&classify(5.0, 5.2)), "+0.2ms");
        assert_eq!(
            style.diff(&classify(100.0, 94.0)),
            format!("{}-6.0%{}", GREEN, RESET)
        );
    }

    #[test]
    fn test_render_summary() {
        let summary = BaselineSummary {
            created: 2,
            overwritten: 1,
            skipped: 3,
            unsupported: 1,
        };
        assert_eq!(
            render_summary(&summary),
            "Baselines: 2 created, 1 overwritten, 3 skipped, 1 unsupported\n"
        );
    }
}
