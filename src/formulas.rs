// SPDX-FileCopyrightText: 2026 Santhosh Shyamsundar, Prabhu S., and Studio Tyto
// SPDX-License-Identifier: MIT
//! Universal Observation Formulas for Materials Testing
//!
//! These are pure mathematical functions operating on scalar readings.
//! They form the foundation of every LabCore derived-field calculation.
//!
//! A guarded formula returns `None` instead of dividing by zero; `None`
//! renders as an empty report cell, never as `NaN` or `0`.
//!
//! References:
//! - IS 2386 (Part 3): Specific gravity, water absorption, bulk density
//! - IS 2386 (Part 4): Aggregate impact value
//! - IS 4031 (Part 1): Fineness of cement by dry sieving
//! - IS 516: Compressive strength of concrete specimens

use serde::{Deserialize, Serialize};
use wasm_bindgen::prelude::*;

/// Conversion constant between a raw mm-dimension product and the volume
/// unit a test records its density in.
#[wasm_bindgen]
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum VolumeScale {
    /// No conversion, volume stays in mm³
    CubicMillimetres = 0,
    /// mm³ → litres (1e6), densities in kg/L
    Litres = 1,
    /// mm³ → m³ (1e9), densities in kg/m³
    CubicMetres = 2,
}

impl VolumeScale {
    pub fn divisor(self) -> f64 {
        match self {
            VolumeScale::CubicMillimetres => 1.0,
            VolumeScale::Litres => 1.0e6,
            VolumeScale::CubicMetres => 1.0e9,
        }
    }
}

// ============================================================================
// GEOMETRY
// ============================================================================

/// Bearing area of a rectangular specimen face.
///
/// # Arguments
/// * `length_mm` - Specimen length (mm)
/// * `breadth_mm` - Specimen breadth (mm)
///
/// # Returns
/// Area in mm². Blank fields coerce to 0 upstream, so a partially measured
/// specimen yields area 0 rather than an error.
#[wasm_bindgen]
pub fn area(length_mm: f64, breadth_mm: f64) -> f64 {
    length_mm * breadth_mm
}

/// Specimen volume from three mm dimensions, converted per `scale`.
///
/// Cube and block forms record density in kg/m³, so they pass
/// `VolumeScale::CubicMetres` (divide by 1e9).
#[wasm_bindgen]
pub fn volume(length_mm: f64, breadth_mm: f64, height_mm: f64, scale: VolumeScale) -> f64 {
    (length_mm * breadth_mm * height_mm) / scale.divisor()
}

// ============================================================================
// DENSITY & MOISTURE
// ============================================================================

/// Density (or bulk density) as mass over volume.
///
/// Guard: `volume <= 0` yields `None`. A zero mass over a real volume is a
/// legitimate 0, not a guard case.
#[wasm_bindgen]
pub fn density(mass: f64, volume: f64) -> Option<f64> {
    if volume <= 0.0 {
        return None;
    }
    Some(mass / volume)
}

/// Moisture content of an oven-dried sample, percent of dry mass.
///
/// w = ((W_wet - W_dry) / W_dry) * 100
///
/// Guard: `weight_after <= 0` yields `None`. The result is deliberately NOT
/// clamped at zero; a wet weight below the dry weight produces a negative
/// percentage, which the kernel surfaces as a validation event.
#[wasm_bindgen]
pub fn moisture_content(weight_before: f64, weight_after: f64) -> Option<f64> {
    if weight_after <= 0.0 {
        return None;
    }
    Some(((weight_before - weight_after) / weight_after) * 100.0)
}

// ============================================================================
// SPECIFIC GRAVITY & ABSORPTION (PYCNOMETER METHOD, IS 2386 Pt 3)
// ============================================================================

/// Specific gravity of aggregate by pycnometer.
///
/// G = D / (A - (B - C))
///
/// # Arguments
/// * `a` - Weight of saturated-surface-dry aggregate (g)
/// * `b` - Weight of pycnometer + aggregate + water (g)
/// * `c` - Weight of pycnometer + water (g)
/// * `d` - Weight of oven-dried aggregate (g)
///
/// Computed only once all four readings are in; partial entry is the normal
/// state while the technician fills the row, so it yields `None`, not an
/// error. A non-positive denominator means the readings are non-physical
/// (the kernel flags it) and also yields `None`.
#[wasm_bindgen]
pub fn specific_gravity_pycnometer(a: f64, b: f64, c: f64, d: f64) -> Option<f64> {
    if a <= 0.0 || b <= 0.0 || c <= 0.0 || d <= 0.0 {
        return None;
    }
    let denominator = a - (b - c);
    if denominator == 0.0 {
        return None;
    }
    Some(d / denominator)
}

/// Water absorption, percent of oven-dry mass.
///
/// WA = ((A - D) / D) * 100, same reading labels as
/// [`specific_gravity_pycnometer`].
#[wasm_bindgen]
pub fn water_absorption(a: f64, d: f64) -> Option<f64> {
    if a <= 0.0 || d <= 0.0 {
        return None;
    }
    Some(((a - d) / d) * 100.0)
}

// ============================================================================
// STRENGTH & MECHANICAL INDICES
// ============================================================================

/// Compressive strength from crushing load over bearing area.
///
/// f_c = P * 1000 / A  (kN over mm² → MPa)
#[wasm_bindgen]
pub fn compressive_strength(load_kn: f64, area_mm2: f64) -> Option<f64> {
    if area_mm2 <= 0.0 {
        return None;
    }
    Some(load_kn * 1000.0 / area_mm2)
}

/// Aggregate impact value, percent of fines passing the 2.36 mm sieve
/// after impact (IS 2386 Pt 4).
///
/// AIV = passing / (passing + retained) * 100
#[wasm_bindgen]
pub fn impact_value(passing: f64, retained: f64) -> Option<f64> {
    let total = passing + retained;
    if total <= 0.0 {
        return None;
    }
    Some(passing / total * 100.0)
}

/// Residue retained on a sieve as a percent of the sample weight
/// (cement fineness by dry sieving, IS 4031 Pt 1).
#[wasm_bindgen]
pub fn residue_percent(residue: f64, total: f64) -> Option<f64> {
    if total <= 0.0 {
        return None;
    }
    Some(residue / total * 100.0)
}

// ============================================================================
// TESTS
// ============================================================================
