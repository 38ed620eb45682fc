// SPDX-FileCopyrightText: 2026 Santhosh Shyamsundar, Prabhu S., and Studio Tyto
// SPDX-License-Identifier: MIT
//
// LabCore — Materials Testing Observation Kernel
// CementEngine: soundness & fineness observations (IS 4031 Pt 1 & Pt 3)

use serde::{Deserialize, Serialize};

use crate::formulas;
use crate::rounding::round_to;
use crate::stats;

/// One Le Chatelier mould: indicator-point distance at 27 °C and after the
/// boiling-bath cycle, both mm.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct SoundnessReading {
    pub distance_27c: f64,
    pub distance_boiler: f64,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct SoundnessResult {
    /// mm expansion per mould
    pub expansions: Vec<f64>,
    pub mean_expansion: Option<f64>,
}

/// One sieving charge: sample weight and residue on the 90 micron sieve,
/// both grams.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct FinenessCharge {
    pub cement_weight: f64,
    pub residue_weight: f64,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct FinenessResult {
    /// percent residue per charge
    pub residues: Vec<Option<f64>>,
    pub mean_residue: Option<f64>,
}

pub struct CementEngine;

impl CementEngine {
    /// Le Chatelier soundness: expansion per mould, mean over the moulds
    /// that actually expanded.
    pub fn compute_soundness(readings: &[SoundnessReading]) -> SoundnessResult {
        let expansions: Vec<f64> = readings
            .iter()
            .map(|r| round_to(r.distance_boiler - r.distance_27c, 2))
            .collect();

        SoundnessResult {
            mean_expansion: stats::mean_positive(expansions.iter().map(|&e| Some(e)))
                .map(|m| round_to(m, 2)),
            expansions,
        }
    }

    /// Fineness by dry sieving: residue percent per charge, mean over the
    /// charges with a weighed sample.
    pub fn compute_fineness(charges: &[FinenessCharge]) -> FinenessResult {
        let residues: Vec<Option<f64>> = charges
            .iter()
            .map(|c| {
                formulas::residue_percent(c.residue_weight, c.cement_weight)
                    .map(|r| round_to(r, 2))
            })
            .collect();

        FinenessResult {
            mean_residue: stats::mean_positive(residues.iter().copied())
                .map(|m| round_to(m, 2)),
            residues,
        }
    }
}
