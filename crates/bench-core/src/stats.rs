//! Summary statistics over timing samples.

use bench_types::StatDigest;

use crate::error::CoreError;

/// Summarize per-run durations (milliseconds).
///
/// Percentiles use the nearest-rank element at `floor(n * q)` of the sorted
/// samples, clamped to the last element. The median averages the two middle
/// values for even counts. Standard deviation is the population form.
pub fn summarize(samples: &[f64], result_count: i64) -> Result<StatDigest, CoreError> {
    if samples.is_empty() {
        return Err(CoreError::NoSamples);
    }

    let mut sorted = samples.to_vec();
    sorted.sort_by(f64::total_cmp);

    let n = sorted.len();
    let mean = sorted.iter().sum::<f64>() / n as f64;
    let median = if n % 2 == 0 {
        (sorted[n / 2 - 1] + sorted[n / 2]) / 2.0
    } else {
        sorted[n / 2]
    };
    let variance = sorted.iter().map(|s| (s - mean).powi(2)).sum::<f64>() / n as f64;

    Ok(StatDigest {
        mean,
        median,
        min: sorted[0],
        max: sorted[n - 1],
        std_dev: variance.sqrt(),
        p95: percentile(&sorted, 0.95),
        p99: percentile(&sorted, 0.99),
        result_count,
        runs: n as i64,
    })
}

fn percentile(sorted: &[f64], q: f64) -> f64 {
    let idx = ((sorted.len() as f64 * q).floor() as usize).min(sorted.len() - 1);
    sorted[idx]
}
