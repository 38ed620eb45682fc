// SPDX-FileCopyrightText: 2026 Santhosh Shyamsundar, Prabhu S., and Studio Tyto
// SPDX-License-Identifier: MIT
//
// LabCore — Materials Testing Observation Kernel
// ImpactEngine: aggregate impact value & particle-shape indices (IS 2386 Pt 4 & Pt 1)

use serde::{Deserialize, Serialize};

use crate::formulas;
use crate::rounding::round_to;
use crate::stats;

/// One impact determination: fines passing and material retained on the
/// 2.36 mm sieve after the blow cycle, grams.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct ImpactReading {
    pub passing: f64,
    pub retained: f64,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ImpactResult {
    pub values: Vec<Option<f64>>,
    pub mean_impact_value: Option<f64>,
}

/// Replicate weighings for one size fraction of a flakiness or elongation
/// determination (percent of flaky/elongated particles per weighing).
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct ShapeFraction {
    /// e.g. "10 mm", "20 mm"
    pub size: String,
    pub values: Vec<f64>,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ShapeIndexResult {
    /// mean per size fraction, in input order
    pub fraction_means: Vec<Option<f64>>,
    /// sum of the fraction means
    pub total_index: Option<f64>,
}

pub struct ImpactEngine;

impl ImpactEngine {
    /// Impact value per determination plus the replicate mean.
    pub fn compute(readings: &[ImpactReading]) -> ImpactResult {
        let values: Vec<Option<f64>> = readings
            .iter()
            .map(|r| formulas::impact_value(r.passing, r.retained).map(|v| round_to(v, 2)))
            .collect();

        ImpactResult {
            mean_impact_value: stats::mean_positive(values.iter().copied())
                .map(|m| round_to(m, 2)),
            values,
        }
    }

    /// Flakiness/elongation index: mean per size fraction, total as the sum
    /// of the fraction means. The same shape serves both indices.
    pub fn compute_shape_index(fractions: &[ShapeFraction]) -> ShapeIndexResult {
        let fraction_means: Vec<Option<f64>> = fractions
            .iter()
            .map(|f| {
                stats::mean_positive(f.values.iter().map(|&v| Some(v)))
                    .map(|m| round_to(m, 2))
            })
            .collect();

        let contributing: Vec<f64> = fraction_means.iter().copied().flatten().collect();
        ShapeIndexResult {
            total_index: if contributing.is_empty() {
                None
            } else {
                Some(round_to(stats::sum(&contributing), 2))
            },
            fraction_means,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_impact_value_set() {
        let result = ImpactEngine::compute(&[
            ImpactReading {
                passing: 60.0,
                retained: 290.0,
            },
            ImpactReading {
                passing: 55.0,
                retained: 295.0,
            },
            ImpactReading::default(),
        ]);
        assert_eq!(result.values[0], Some(17.14));
        assert_eq!(result.values[1], Some(15.71));
        assert_eq!(result.values[2], None);
        // (17.14 + 15.71) / 2 = 16.425 → 16.43
        assert_eq!(result.mean_impact_value, Some(16.43));
    }

    #[test]
    fn test_shape_index_totals_fraction_means() {
        let result = ImpactEngine::compute_shape_index(&[
            ShapeFraction {
                size: "10 mm".to_string(),
                values: vec![12.0, 14.0, 13.0],
            },
            ShapeFraction {
                size: "20 mm".to_string(),
                values: vec![9.0, 11.0, 0.0],
            },
        ]);
        assert_eq!(result.fraction_means, vec![Some(13.0), Some(10.0)]);
        assert_eq!(result.total_index, Some(23.0));
    }

    #[test]
    fn test_shape_index_empty() {
        let result = ImpactEngine::compute_shape_index(&[ShapeFraction {
            size: "10 mm".to_string(),
            values: vec![0.0, 0.0],
        }]);
        assert_eq!(result.fraction_means, vec![None]);
        assert_eq!(result.total_index, None);
    }
}
