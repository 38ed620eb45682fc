// SPDX-FileCopyrightText: 2026 Santhosh Shyamsundar, Prabhu S., and Studio Tyto
// SPDX-License-Identifier: MIT
//
// LabCore — Materials Testing Observation Kernel
// SieveEngine: sieve analysis, fineness modulus, IS 383 grading zone

use serde::{Deserialize, Serialize};

use crate::rounding::round_to;
use crate::stats;

/// The standard fine-aggregate sieve stack, coarse to fine. Retained
/// weights are reported in this order; the pan, when present, is the final
/// extra entry and stays out of the cumulative sum.
pub const FINE_AGGREGATE_SIEVES: [&str; 7] = [
    "10 mm", "4.75 mm", "2.36 mm", "1.18 mm", "600 micron", "300 micron", "150 micron",
];

/// Index of the 600 micron sieve, whose percent-passing figure places the
/// sample in an IS 383 grading zone.
const ZONE_SIEVE: usize = 4;

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct SieveRow {
    pub sieve: String,
    /// g
    pub retained: f64,
    /// percent of total sample
    pub retained_percent: Option<f64>,
    /// running total, percent
    pub cumulative_retained: Option<f64>,
    /// 100 - cumulative retained, percent
    pub passing: Option<f64>,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct SieveResult {
    pub rows: Vec<SieveRow>,
    /// g, including pan
    pub total_weight: f64,
    /// Σ cumulative % retained, excluding pan
    pub sum_cumulative_retained: Option<f64>,
    pub fineness_modulus: Option<f64>,
    /// "Zone I".."Zone IV" per IS 383, from 600 micron passing
    pub grading_zone: String,
}

pub struct SieveEngine;

impl SieveEngine {
    /// Full sieve-analysis computation from retained weights in standard
    /// stack order, with an optional trailing pan weight.
    ///
    /// FM = Σ(cumulative % retained on the standard sieves) / 100
    pub fn compute(retained_g: &[f64]) -> SieveResult {
        let sieve_count = retained_g.len().min(FINE_AGGREGATE_SIEVES.len());
        let total = stats::sum(retained_g);

        let mut rows = Vec::with_capacity(sieve_count);
        let mut cumulative = 0.0;
        let mut sum_cumulative = 0.0;

        for (i, name) in FINE_AGGREGATE_SIEVES.iter().enumerate().take(sieve_count) {
            let retained = retained_g[i];
            if total <= 0.0 {
                rows.push(SieveRow {
                    sieve: name.to_string(),
                    retained,
                    retained_percent: None,
                    cumulative_retained: None,
                    passing: None,
                });
                continue;
            }
            let percent = retained / total * 100.0;
            cumulative += percent;
            sum_cumulative += cumulative;
            rows.push(SieveRow {
                sieve: name.to_string(),
                retained,
                retained_percent: Some(round_to(percent, 2)),
                cumulative_retained: Some(round_to(cumulative, 2)),
                passing: Some(round_to(100.0 - cumulative, 2)),
            });
        }

        if total <= 0.0 {
            return SieveResult {
                rows,
                total_weight: total,
                sum_cumulative_retained: None,
                fineness_modulus: None,
                grading_zone: "N/A".to_string(),
            };
        }

        let zone = rows
            .get(ZONE_SIEVE)
            .and_then(|r| r.passing)
            .map(Self::classify_zone)
            .unwrap_or_else(|| "N/A".to_string());

        SieveResult {
            rows,
            total_weight: total,
            sum_cumulative_retained: Some(round_to(sum_cumulative, 2)),
            fineness_modulus: Some(round_to(sum_cumulative / 100.0, 2)),
            grading_zone: zone,
        }
    }

    /// IS 383 Table 9 ladder on the 600 micron percent passing.
    fn classify_zone(passing_600_micron: f64) -> String {
        if passing_600_micron < 15.0 {
            return "Coarser than Zone I".to_string();
        }
        if passing_600_micron < 35.0 {
            return "Zone I".to_string();
        }
        if passing_600_micron < 60.0 {
            return "Zone II".to_string();
        }
        if passing_600_micron < 80.0 {
            return "Zone III".to_string();
        }
        "Zone IV".to_string()
    }
}
