// SPDX-FileCopyrightText: 2026 Santhosh Shyamsundar, Prabhu S., and Studio Tyto
// SPDX-License-Identifier: MIT
//! Replicate aggregation.
//!
//! Every "Mean"/"Average" row in a test report runs through one primitive:
//! the arithmetic mean of the strictly-positive subset of the replicate
//! values. Blanks coerce to 0 upstream, and zeros are excluded from the
//! denominator rather than counted as zero contributions, so a half-filled
//! set of replicates averages only the rows that actually hold data.

use wasm_bindgen::prelude::*;

/// Mean of the strictly-positive entries; `None` when no entry qualifies.
///
/// `None` entries (guarded derived fields that never computed) and
/// non-positive entries are both excluded.
pub fn mean_positive<I>(values: I) -> Option<f64>
where
    I: IntoIterator<Item = Option<f64>>,
{
    let mut sum = 0.0;
    let mut count = 0u32;
    for v in values.into_iter().flatten() {
        if v > 0.0 && v.is_finite() {
            sum += v;
            count += 1;
        }
    }
    if count == 0 {
        None
    } else {
        Some(sum / count as f64)
    }
}

/// Host-side variant over a plain array (blanks already coerced to 0).
#[wasm_bindgen]
pub fn average_of_positive(values: Vec<f64>) -> Option<f64> {
    mean_positive(values.into_iter().map(Some))
}

/// Plain sum, used for sieve totals and shape-index accumulation.
pub fn sum(values: &[f64]) -> f64 {
    values.iter().copied().filter(|v| v.is_finite()).sum()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mean_excludes_zero_replicates() {
        // Two filled rows, one blank: (2400 + 2430) / 2
        let m = mean_positive([Some(2400.0), Some(0.0), Some(2430.0)]).unwrap();
        assert!((m - 2415.0).abs() < 1e-9, "Expected 2415, got {}", m);
    }

    #[test]
    fn test_mean_excludes_none_replicates() {
        let m = mean_positive([Some(2.5), None, Some(2.7)]).unwrap();
        assert!((m - 2.6).abs() < 1e-9);
    }

    #[test]
    fn test_empty_subset_is_none_not_zero() {
        assert_eq!(mean_positive([]), None);
        assert_eq!(mean_positive([Some(0.0), Some(0.0), Some(0.0)]), None);
        assert_eq!(mean_positive([None, None]), None);
    }

    #[test]
    fn test_negative_values_excluded() {
        // A negative derived value (flagged elsewhere) must not drag the mean
        let m = mean_positive([Some(-1.2), Some(8.7)]).unwrap();
        assert!((m - 8.7).abs() < 1e-9);
    }

    #[test]
    fn test_single_replicate() {
        assert_eq!(mean_positive([Some(1.96)]), Some(1.96));
    }

    #[test]
    fn test_average_of_positive_host_variant() {
        assert_eq!(average_of_positive(vec![2400.0, 0.0, 2430.0]), Some(2415.0));
        assert_eq!(average_of_positive(vec![0.0, 0.0]), None);
    }

    #[test]
    fn test_sum_skips_non_finite() {
        assert_eq!(sum(&[1.0, 2.0, f64::NAN, 3.0]), 6.0);
    }
}
