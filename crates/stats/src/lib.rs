//! Statistical helper functions for the piena pipeline.

/// Arithmetic mean of a slice. Returns 0.0 if empty.
pub fn mean(data: &[f64]) -> f64 {
    if data.is_empty() {
        return 0.0;
    }
    let sum: f64 = data.iter().sum();
    sum / data.len() as f64
}

/// Arithmetic mean of the finite values in a slice.
///
/// Returns `None` if no value is finite.
pub fn finite_mean(data: &[f64]) -> Option<f64> {
    let mut sum = 0.0;
    let mut n = 0usize;
    for &x in data {
        if x.is_finite() {
            sum += x;
            n += 1;
        }
    }
    if n == 0 { None } else { Some(sum / n as f64) }
}

/// Percentile by linear interpolation between order statistics:
/// rank = p/100 * (n-1), interpolated between the floor and ceil ranks.
///
/// `p` is expressed in percent, e.g. `50.0` for the median.
///
/// **Expects pre-sorted input** (caller's responsibility).
///
/// # Panics
///
/// Panics if `sorted` is empty.
pub fn percentile(sorted: &[f64], p: f64) -> f64 {
    assert!(!sorted.is_empty(), "percentile: input must not be empty");
    let n = sorted.len();
    let h = (n - 1) as f64 * (p / 100.0);
    let lo = h.floor() as usize;
    let hi = (lo + 1).min(n - 1);
    sorted[lo] + (h - h.floor()) * (sorted[hi] - sorted[lo])
}

/// Sorts a copy of `data` ascending and evaluates every percentile in `ps`.
///
/// # Panics
///
/// Panics if `data` is empty.
pub fn percentiles(data: &[f64], ps: &[f64]) -> Vec<f64> {
    let mut sorted = data.to_vec();
    sorted.sort_by(|a, b| a.partial_cmp(b).unwrap_or(std::cmp::Ordering::Equal));
    ps.iter().map(|&p| percentile(&sorted, p)).collect()
}
