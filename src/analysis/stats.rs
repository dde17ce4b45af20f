// Descriptive statistics over per-user summary columns.
//
// Conventions follow dataframe `describe()`: standard deviation uses the
// sample (n - 1) denominator and quantiles interpolate linearly between
// the closest ranks. A single observation has a standard deviation of 0.0
// rather than NaN.

use serde::{Deserialize, Serialize};

/// count / mean / std / min / quartiles / max for one column.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ColumnSummary {
    pub count: usize,
    pub mean: f64,
    pub std: f64,
    pub min: f64,
    pub q1: f64,
    pub median: f64,
    pub q3: f64,
    pub max: f64,
}

pub fn mean(values: &[f64]) -> Option<f64> {
    if values.is_empty() {
        return None;
    }
    Some(values.iter().sum::<f64>() / values.len() as f64)
}

/// Sample standard deviation. `None` for no values, 0.0 for one.
pub fn sample_std(values: &[f64]) -> Option<f64> {
    let m = mean(values)?;
    if values.len() < 2 {
        return Some(0.0);
    }
    let sum_sq: f64 = values.iter().map(|v| (v - m).powi(2)).sum();
    Some((sum_sq / (values.len() - 1) as f64).sqrt())
}

/// The `q`-th quantile (0.0..=1.0) with linear interpolation.
pub fn quantile(values: &[f64], q: f64) -> Option<f64> {
    if values.is_empty() || !(0.0..=1.0).contains(&q) {
        return None;
    }
    let mut sorted = values.to_vec();
    sorted.sort_by(f64::total_cmp);

    let pos = q * (sorted.len() - 1) as f64;
    let lower = pos.floor() as usize;
    let upper = pos.ceil() as usize;
    let frac = pos - lower as f64;
    Some(sorted[lower] + (sorted[upper] - sorted[lower]) * frac)
}

/// Summarize a column. `None` when there are no values.
pub fn describe(values: &[f64]) -> Option<ColumnSummary> {
    Some(ColumnSummary {
        count: values.len(),
        mean: mean(values)?,
        std: sample_std(values)?,
        min: quantile(values, 0.0)?,
        q1: quantile(values, 0.25)?,
        median: quantile(values, 0.5)?,
        q3: quantile(values, 0.75)?,
        max: quantile(values, 1.0)?,
    })
}
