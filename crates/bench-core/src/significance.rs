//! Classification of a timing change against a baseline.
//!
//! Fast queries (baseline under [`ABSOLUTE_MODE_BELOW_MS`]) are judged by
//! absolute milliseconds, slower ones by percentage.

use std::fmt;

/// Baselines below this mean (ms) use absolute thresholds.
pub const ABSOLUTE_MODE_BELOW_MS: f64 = 10.0;
/// Absolute change under this many ms is noise.
pub const ABSOLUTE_NOISE_MS: f64 = 1.0;
/// Absolute regressions under this many ms are small.
pub const ABSOLUTE_SMALL_MS: f64 = 2.0;
/// Relative change under this percentage is noise.
pub const PERCENT_NOISE: f64 = 5.0;
/// Relative regressions under this percentage are small.
pub const PERCENT_SMALL: f64 = 15.0;

/// How significant a change is.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Significance {
    NoChange,
    Improvement,
    SmallRegression,
    LargeRegression,
}

impl fmt::Display for Significance {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Significance::NoChange => "no change",
            Significance::Improvement => "improvement",
            Significance::SmallRegression => "small regression",
            Significance::LargeRegression => "large regression",
        };
        f.write_str(label)
    }
}

/// Unit the change was measured in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DiffMode {
    AbsoluteMs,
    Percent,
}

/// A classified change with its signed display label.
#[derive(Debug, Clone, PartialEq)]
pub struct Classification {
    pub significance: Significance,
    pub mode: DiffMode,
    /// Signed change in the unit given by `mode`
    pub delta: f64,
    /// e.g. `+1.3ms` or `-6.0%`
    pub label: String,
}

/// Classify `current` against `baseline`. Argument order is baseline first.
pub fn classify(baseline: f64, current: f64) -> Classification {
    if baseline < ABSOLUTE_MODE_BELOW_MS {
        let delta = current - baseline;
        let significance = grade(delta, ABSOLUTE_NOISE_MS, ABSOLUTE_SMALL_MS);
        Classification {
            significance,
            mode: DiffMode::AbsoluteMs,
            delta,
            label: format!("{:+.1}ms", delta),
        }
    } else {
        let delta = (current - baseline) / baseline * 100.0;
        let significance = grade(delta, PERCENT_NOISE, PERCENT_SMALL);
        Classification {
            significance,
            mode: DiffMode::Percent,
            delta,
            label: format!("{:+.1}%", delta),
        }
    }
}

fn grade(delta: f64, noise: f64, small: f64) -> Significance {
    if delta.abs() < noise {
        Significance::NoChange
    } else if delta < 0.0 {
        Significance::Improvement
    } else if delta < small {
        Significance::SmallRegression
    } else {
        Significance::LargeRegression
    }
}
