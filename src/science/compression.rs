// SPDX-FileCopyrightText: 2026 Santhosh Shyamsundar, Prabhu S., and Studio Tyto
// SPDX-License-Identifier: MIT
//
// LabCore — Materials Testing Observation Kernel
// CompressionEngine: cube & block compressive-strength observations (IS 516)

use serde::{Deserialize, Serialize};

use crate::formulas::{self, VolumeScale};
use crate::rounding::round_to;
use crate::stats;

/// Raw readings for one specimen on the compression bench.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct Specimen {
    pub id_mark: String,
    /// mm
    pub length: f64,
    /// mm
    pub breadth: f64,
    /// mm
    pub height: f64,
    /// kg
    pub weight: f64,
    /// kN at failure
    pub load: f64,
}

/// Derived row for one specimen.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct SpecimenRow {
    pub id_mark: String,
    /// Bearing area, mm²
    pub area: f64,
    /// Specimen volume, m³
    pub volume: f64,
    /// kg/m³
    pub density: Option<f64>,
    /// MPa
    pub compressive_strength: Option<f64>,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct CompressionResult {
    pub rows: Vec<SpecimenRow>,
    pub avg_density: Option<f64>,
    pub avg_load: Option<f64>,
    pub avg_compressive_strength: Option<f64>,
    /// e.g. "M25" from the mean strength
    pub strength_class: String,
}

pub struct CompressionEngine;

impl CompressionEngine {
    /// Concrete cubes: area and strength reported to 1 decimal.
    pub fn compute_cubes(specimens: &[Specimen]) -> CompressionResult {
        Self::compute(specimens, 1, 1)
    }

    /// AAC blocks: larger faces, strength reported to 2 decimals.
    pub fn compute_blocks(specimens: &[Specimen]) -> CompressionResult {
        Self::compute(specimens, 2, 2)
    }

    fn compute(specimens: &[Specimen], area_decimals: u32, strength_decimals: u32) -> CompressionResult {
        let rows: Vec<SpecimenRow> = specimens
            .iter()
            .map(|s| {
                let area = round_to(formulas::area(s.length, s.breadth), area_decimals);
                let volume = round_to(
                    formulas::volume(s.length, s.breadth, s.height, VolumeScale::CubicMetres),
                    6,
                );
                SpecimenRow {
                    id_mark: s.id_mark.clone(),
                    area,
                    volume,
                    density: formulas::density(s.weight, volume).map(|d| round_to(d, 1)),
                    compressive_strength: formulas::compressive_strength(s.load, area)
                        .map(|f| round_to(f, strength_decimals)),
                }
            })
            .collect();

        let avg_density = stats::mean_positive(rows.iter().map(|r| r.density))
            .map(|m| round_to(m, 1));
        let avg_load = stats::mean_positive(specimens.iter().map(|s| Some(s.load)))
            .map(|m| round_to(m, 1));
        let avg_compressive_strength =
            stats::mean_positive(rows.iter().map(|r| r.compressive_strength))
                .map(|m| round_to(m, strength_decimals));

        CompressionResult {
            rows,
            avg_density,
            avg_load,
            strength_class: Self::classify_strength(avg_compressive_strength),
            avg_compressive_strength,
        }
    }

    /// IS 456 grade ladder from the mean cube strength.
    fn classify_strength(fc: Option<f64>) -> String {
        let Some(fc) = fc else {
            return "N/A".to_string();
        };
        if fc < 10.0 {
            return "Below M10".to_string();
        }
        if fc < 15.0 {
            return "M10".to_string();
        }
        if fc < 20.0 {
            return "M15".to_string();
        }
        if fc < 25.0 {
            return "M20".to_string();
        }
        if fc < 30.0 {
            return "M25".to_string();
        }
        if fc < 35.0 {
            return "M30".to_string();
        }
        if fc < 40.0 {
            return "M35".to_string();
        }
        if fc < 45.0 {
            return "M40".to_string();
        }
        if fc < 50.0 {
            return "M45".to_string();
        }
        if fc < 60.0 {
            return "M50".to_string();
        }
        "M60+".to_string()
    }
}
