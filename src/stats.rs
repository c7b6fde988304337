//! Shared statistical conventions.
//!
//! Detection bounds and remediation values must agree exactly, so the
//! quantile and mode conventions live here and nowhere else:
//!
//! - Quantiles use linear interpolation between closest ranks (the numpy
//!   default). For `[1, 2, 2, 2, 3, 100]` this gives Q1 = 2 and Q3 = 2.75.
//! - Mode ties break in favor of the value seen first in row order.

use indexmap::IndexMap;

/// Quantile of a sorted, non-empty slice using linear interpolation.
///
/// `q` is clamped to `[0, 1]`. Returns `None` on an empty slice.
pub fn quantile(sorted: &[f64], q: f64) -> Option<f64> {
    if sorted.is_empty() {
        return None;
    }
    let q = q.clamp(0.0, 1.0);
    let n = sorted.len();
    if n == 1 {
        return Some(sorted[0]);
    }
    let rank = q * (n - 1) as f64;
    let lo = rank.floor() as usize;
    let hi = rank.ceil() as usize;
    let frac = rank - lo as f64;
    Some(sorted[lo] + frac * (sorted[hi] - sorted[lo]))
}

/// Median of an unsorted slice. Returns `None` on an empty slice.
pub fn median(values: &[f64]) -> Option<f64> {
    let mut sorted = values.to_vec();
    sorted.sort_by(|a, b| a.partial_cmp(b).unwrap_or(std::cmp::Ordering::Equal));
    quantile(&sorted, 0.5)
}

/// IQR outlier fences: `[Q1 - 1.5*IQR, Q3 + 1.5*IQR]`.
pub fn iqr_bounds(q1: f64, q3: f64) -> (f64, f64) {
    let iqr = q3 - q1;
    (q1 - 1.5 * iqr, q3 + 1.5 * iqr)
}

/// Most frequent key, ties broken by first-seen order.
///
/// Returns `None` when the iterator is empty.
pub fn mode<I, T>(items: I) -> Option<T>
where
    I: IntoIterator<Item = T>,
    T: Clone + Eq + std::hash::Hash,
{
    let mut counts: IndexMap<T, usize> = IndexMap::new();
    for item in items {
        *counts.entry(item).or_insert(0) += 1;
    }
    let mut best: Option<(T, usize)> = None;
    for (key, count) in counts {
        match &best {
            Some((_, best_count)) if count <= *best_count => {}
            _ => best = Some((key, count)),
        }
    }
    best.map(|(key, _)| key)
}

/// Round to one decimal place, the precision used in issue metrics.
pub fn round1(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}
