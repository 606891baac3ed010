//! Statistical helpers for analog ensemble generation.
//!
//! Streaming statistics live in [`MetricCalculator`]; the free functions
//! below are the NaN-aware reductions used by the similarity metric.

pub mod calculator;
pub mod error;

pub use calculator::{MetricCalculator, YAMARTINO_K};
pub use error::StatsError;

/// Arithmetic mean of the non-NaN values. NaN if there are none.
pub fn mean(data: &[f64]) -> f64 {
    let (sum, n) = data
        .iter()
        .filter(|v| !v.is_nan())
        .fold((0.0, 0usize), |(s, n), &v| (s + v, n + 1));
    if n == 0 {
        return f64::NAN;
    }
    sum / n as f64
}

/// Mean of the non-NaN values, tolerating at most `max_nan` NaNs.
///
/// Returns NaN when more than `max_nan` values are NaN or when every value
/// is NaN (including the empty slice).
pub fn nan_mean(values: &[f64], max_nan: usize) -> f64 {
    let mut sum = 0.0;
    let mut nan_count = 0;
    for &v in values {
        if v.is_nan() {
            nan_count += 1;
        } else {
            sum += v;
        }
    }
    if nan_count > max_nan || nan_count == values.len() {
        return f64::NAN;
    }
    sum / (values.len() - nan_count) as f64
}

/// Sum of the non-NaN values, tolerating at most `max_nan` NaNs.
///
/// Same NaN rules as [`nan_mean`].
pub fn nan_sum(values: &[f64], max_nan: usize) -> f64 {
    let mut sum = 0.0;
    let mut nan_count = 0;
    for &v in values {
        if v.is_nan() {
            nan_count += 1;
        } else {
            sum += v;
        }
    }
    if nan_count > max_nan || nan_count == values.len() {
        return f64::NAN;
    }
    sum
}

/// Shortest-arc distance between two angles in degrees.
///
/// Expects inputs in `[0, 360)`; the result is in `[0, 180]`.
#[inline]
pub fn circular_diff(a: f64, b: f64) -> f64 {
    let d = (a - b).abs();
    d.min((d - 360.0).abs())
}

/// Sample standard deviation of the non-NaN values (`n - 1` denominator).
/// NaN with fewer than two values.
pub fn sd_linear(data: &[f64]) -> f64 {
    let m = mean(data);
    let mut n = 0usize;
    let mut ss = 0.0;
    for &v in data.iter().filter(|v| !v.is_nan()) {
        ss += (v - m) * (v - m);
        n += 1;
    }
    if n < 2 {
        return f64::NAN;
    }
    (ss / (n - 1) as f64).sqrt()
}

/// Yamartino standard deviation of the non-NaN angles in degrees.
/// NaN with fewer than two values.
pub fn sd_circular(data: &[f64]) -> f64 {
    let mut calc = MetricCalculator::circular();
    data.iter().for_each(|&v| calc.push(v));
    calc.standard_deviation()
}
