//! Timing statistics.

use crate::models::{AlgorithmComparison, GroupKey, TimingAggregate, TimingMeasurement};
use std::collections::BTreeMap;

/// Reduce one cohort to count, mean, population standard deviation, min and max cycles.
///
/// Returns `None` for an empty cohort.
pub fn summarize(key: &GroupKey, data: &[TimingMeasurement]) -> Option<TimingAggregate> {
    let first = data.first()?;

    let mut sum: i128 = 0;
    let mut min = first.cycles;
    let mut max = first.cycles;
    for m in data {
        sum += i128::from(m.cycles);
        min = min.min(m.cycles);
        max = max.max(m.cycles);
    }

    let count = data.len();
    let mean = sum as f64 / count as f64;

    let squared_deviations: f64 = data
        .iter()
        .map(|m| {
            let diff = m.cycles as f64 - mean;
            diff * diff
        })
        .sum();
    let stddev = (squared_deviations / count as f64).sqrt();

    Some(TimingAggregate {
        algorithm: key.algorithm.clone(),
        run_label: key.run_label.clone(),
        file_label: key.file_label.clone(),
        file_size_bytes: first.file_size_bytes,
        count,
        mean,
        stddev,
        min,
        max,
    })
}

/// Mean of cohort averages per algorithm, ordered by algorithm.
pub fn compare_algorithms(rows: &[TimingAggregate]) -> Vec<AlgorithmComparison> {
    let mut by_algorithm: BTreeMap<&str, (usize, f64)> = BTreeMap::new();
    for row in rows {
        let entry = by_algorithm.entry(row.algorithm.as_str()).or_default();
        entry.0 += 1;
        entry.1 += row.mean;
    }

    by_algorithm
        .into_iter()
        .map(|(algorithm, (cohorts, total))| AlgorithmComparison {
            algorithm: algorithm.to_string(),
            cohorts,
            mean_of_averages: total / cohorts as f64,
        })
        .collect()
}
