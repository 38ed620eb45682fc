// SPDX-FileCopyrightText: 2026 Santhosh Shyamsundar, Prabhu S., and Studio Tyto
// SPDX-License-Identifier: MIT
//
// LabCore — Materials Testing Observation Kernel
// BulkDensityEngine: cut-specimen and container bulk density (IS 2386 Pt 3)

use serde::{Deserialize, Serialize};

use crate::formulas::{self, VolumeScale};
use crate::rounding::round_to;
use crate::stats;

/// Cut specimen: mm dimensions, wet and oven-dry weights in kg.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct CutSpecimen {
    pub id_mark: String,
    pub length: f64,
    pub breadth: f64,
    pub depth: f64,
    pub weight_before: f64,
    pub weight_after: f64,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct CutSpecimenRow {
    pub id_mark: String,
    /// m³, 6 decimals; downstream density reads this rounded figure
    pub volume: f64,
    /// kg/m³
    pub bulk_density: Option<f64>,
    /// percent of dry mass, may be negative (flagged by the kernel)
    pub moisture_content: Option<f64>,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct BulkDensityResult {
    pub rows: Vec<CutSpecimenRow>,
    pub avg_bulk_density: Option<f64>,
    pub avg_moisture_content: Option<f64>,
}

/// Container method: measured container volume in litres, compacted
/// ("rodded") and shovelled ("loose") fill weights in kg.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct ContainerReading {
    pub volume: f64,
    pub rodded_weight: f64,
    pub loose_weight: f64,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ContainerRow {
    /// kg/L
    pub rodded_density: Option<f64>,
    /// kg/L
    pub loose_density: Option<f64>,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ContainerDensityResult {
    pub rows: Vec<ContainerRow>,
    pub mean_rodded_density: Option<f64>,
    pub mean_loose_density: Option<f64>,
}

pub struct BulkDensityEngine;

impl BulkDensityEngine {
    /// Bulk density and moisture content of cut specimens.
    ///
    /// The oven-dry weight is the mass term for bulk density; the wet/dry
    /// pair gives moisture content. Each derived cell is guarded the same
    /// way the pure formulas are.
    pub fn compute_cut_specimens(specimens: &[CutSpecimen]) -> BulkDensityResult {
        let rows: Vec<CutSpecimenRow> = specimens
            .iter()
            .map(|s| {
                let volume = round_to(
                    formulas::volume(s.length, s.breadth, s.depth, VolumeScale::CubicMetres),
                    6,
                );
                CutSpecimenRow {
                    id_mark: s.id_mark.clone(),
                    volume,
                    bulk_density: formulas::density(s.weight_after, volume)
                        .map(|d| round_to(d, 1)),
                    moisture_content: formulas::moisture_content(s.weight_before, s.weight_after)
                        .map(|w| round_to(w, 2)),
                }
            })
            .collect();

        BulkDensityResult {
            avg_bulk_density: stats::mean_positive(rows.iter().map(|r| r.bulk_density))
                .map(|m| round_to(m, 1)),
            avg_moisture_content: stats::mean_positive(rows.iter().map(|r| r.moisture_content))
                .map(|m| round_to(m, 2)),
            rows,
        }
    }

    /// Rodded and loose bulk density of aggregate in a calibrated container.
    pub fn compute_container(readings: &[ContainerReading]) -> ContainerDensityResult {
        let rows: Vec<ContainerRow> = readings
            .iter()
            .map(|r| ContainerRow {
                rodded_density: formulas::density(r.rodded_weight, r.volume)
                    .map(|d| round_to(d, 3)),
                loose_density: formulas::density(r.loose_weight, r.volume)
                    .map(|d| round_to(d, 3)),
            })
            .collect();

        ContainerDensityResult {
            mean_rodded_density: stats::mean_positive(rows.iter().map(|r| r.rodded_density))
                .map(|m| round_to(m, 3)),
            mean_loose_density: stats::mean_positive(rows.iter().map(|r| r.loose_density))
                .map(|m| round_to(m, 3)),
            rows,
        }
    }
}
