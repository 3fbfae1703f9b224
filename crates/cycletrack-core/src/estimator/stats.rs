//! Small numeric helpers used by the estimator.
//!
//! All helpers are total: empty input yields `None` rather than NaN.

/// Quantile of already-sorted values using linear interpolation between
/// the two closest ranks (position `(n - 1) * q`).
///
/// `q` is clamped to `[0, 1]`. Returns `None` for empty input.
pub fn quantile_linear(sorted: &[f64], q: f64) -> Option<f64> {
    if sorted.is_empty() {
        return None;
    }
    let q = if q.is_nan() { 0.5 } else { q.clamp(0.0, 1.0) };
    let pos = (sorted.len() - 1) as f64 * q;
    let lo = pos.floor() as usize;
    let hi = pos.ceil() as usize;
    let frac = pos - lo as f64;
    Some(sorted[lo] + (sorted[hi] - sorted[lo]) * frac)
}

/// Arithmetic mean. `None` for empty input.
pub fn mean(values: &[f64]) -> Option<f64> {
    if values.is_empty() {
        return None;
    }
    Some(values.iter().sum::<f64>() / values.len() as f64)
}

/// Population standard deviation (divides by `n`, not `n - 1`).
pub fn population_std_dev(values: &[f64]) -> Option<f64> {
    let mu = mean(values)?;
    let variance = values.iter().map(|v| (v - mu).powi(2)).sum::<f64>() / values.len() as f64;
    Some(variance.sqrt())
}

/// Round to the nearest integer, ties away from negative infinity.
///
/// `2.5 -> 3`, `-2.5 -> -2`. Non-finite input saturates like `as i64`.
pub fn round_half_up(x: f64) -> i64 {
    (x + 0.5).floor() as i64
}
