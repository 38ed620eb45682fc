// SPDX-FileCopyrightText: 2026 Santhosh Shyamsundar, Prabhu S., and Studio Tyto
// SPDX-License-Identifier: MIT
//
// LabCore — Materials Testing Observation Kernel
// GravityEngine: specific gravity & water absorption (IS 2386 Pt 3, IS 4031 Pt 11)

use serde::{Deserialize, Serialize};

use crate::formulas;
use crate::rounding::round_to;
use crate::stats;

/// One pycnometer determination.
///
/// A = saturated-surface-dry aggregate, B = pycnometer + aggregate + water,
/// C = pycnometer + water, D = oven-dried aggregate (all grams).
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct PycnometerReading {
    pub wt_saturated_surface_dry: f64,
    pub wt_pycnometer_aggregate_water: f64,
    pub wt_pycnometer_water: f64,
    pub wt_oven_dried: f64,
}

impl PycnometerReading {
    /// All four balance readings entered.
    pub fn is_complete(&self) -> bool {
        self.wt_saturated_surface_dry > 0.0
            && self.wt_pycnometer_aggregate_water > 0.0
            && self.wt_pycnometer_water > 0.0
            && self.wt_oven_dried > 0.0
    }

    /// A - (B - C); non-positive on a complete row means the balance
    /// readings are non-physical.
    pub fn displaced_water(&self) -> f64 {
        self.wt_saturated_surface_dry
            - (self.wt_pycnometer_aggregate_water - self.wt_pycnometer_water)
    }
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct GravityRow {
    pub specific_gravity: Option<f64>,
    pub water_absorption: Option<f64>,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct GravityResult {
    pub rows: Vec<GravityRow>,
    pub mean_specific_gravity: Option<f64>,
    pub mean_water_absorption: Option<f64>,
}

pub struct GravityEngine;

impl GravityEngine {
    /// Aggregate specific gravity & absorption over the replicate set.
    pub fn compute_pycnometer(readings: &[PycnometerReading]) -> GravityResult {
        let rows: Vec<GravityRow> = readings
            .iter()
            .map(|r| GravityRow {
                specific_gravity: formulas::specific_gravity_pycnometer(
                    r.wt_saturated_surface_dry,
                    r.wt_pycnometer_aggregate_water,
                    r.wt_pycnometer_water,
                    r.wt_oven_dried,
                )
                .map(|g| round_to(g, 3)),
                water_absorption: formulas::water_absorption(
                    r.wt_saturated_surface_dry,
                    r.wt_oven_dried,
                )
                .map(|w| round_to(w, 2)),
            })
            .collect();

        GravityResult {
            mean_specific_gravity: stats::mean_positive(
                rows.iter().map(|r| r.specific_gravity),
            )
            .map(|m| round_to(m, 3)),
            mean_water_absorption: stats::mean_positive(
                rows.iter().map(|r| r.water_absorption),
            )
            .map(|m| round_to(m, 2)),
            rows,
        }
    }

    /// Cement specific gravity by Le Chatelier flask: the determinations
    /// come in as a flat grid of raw readings and the report carries their
    /// mean to 3 decimals.
    pub fn average_readings(readings: &[f64]) -> Option<f64> {
        stats::mean_positive(readings.iter().map(|&v| Some(v))).map(|m| round_to(m, 3))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn reading(a: f64, b: f64, c: f64, d: f64) -> PycnometerReading {
        PycnometerReading {
            wt_saturated_surface_dry: a,
            wt_pycnometer_aggregate_water: b,
            wt_pycnometer_water: c,
            wt_oven_dried: d,
        }
    }

    #[test]
    fn test_worked_determination() {
        let result = GravityEngine::compute_pycnometer(&[reading(100.0, 650.0, 600.0, 98.0)]);
        let row = &result.rows[0];
        // 98 / (100 - 50) = 1.960
        assert_eq!(row.specific_gravity, Some(1.96));
        // ((100 - 98) / 98) * 100 = 2.04
        assert_eq!(row.water_absorption, Some(2.04));
        assert_eq!(result.mean_specific_gravity, Some(1.96));
    }

    #[test]
    fn test_partial_row_stays_empty() {
        let result = GravityEngine::compute_pycnometer(&[
            reading(100.0, 650.0, 600.0, 98.0),
            reading(102.0, 0.0, 601.0, 99.0),
        ]);
        assert_eq!(result.rows[1].specific_gravity, None);
        // Mean over the one complete determination only
        assert_eq!(result.mean_specific_gravity, Some(1.96));
    }

    #[test]
    fn test_non_physical_readings_detected() {
        // Aggregate apparently displacing more water than its SSD weight
        let bad = reading(40.0, 650.0, 600.0, 39.0);
        assert!(bad.is_complete());
        assert!(bad.displaced_water() < 0.0);
        let result = GravityEngine::compute_pycnometer(&[bad]);
        // The division still runs (denominator is non-zero) but the
        // negative result never reaches a mean row.
        assert_eq!(result.rows[0].specific_gravity, Some(-3.9));
        assert_eq!(result.mean_specific_gravity, None);
    }

    #[test]
    fn test_cement_flask_average() {
        let grid = [3.12, 3.15, 3.14, 3.16];
        assert_eq!(GravityEngine::average_readings(&grid), Some(3.143));
        assert_eq!(GravityEngine::average_readings(&[]), None);
        assert_eq!(GravityEngine::average_readings(&[0.0, 0.0]), None);
    }
}
