// SPDX-FileCopyrightText: 2026 Santhosh Shyamsundar, Prabhu S., and Studio Tyto
// SPDX-License-Identifier: MIT
//
// LabCore — Materials Testing Observation Kernel
// LabKernel: Unified Rust/WASM Observation Orchestrator
//
// ============================================================================
// This module centralizes report-side computation for the whole test catalog.
// The frontend should call ONLY this module (or hold an ObservationSheet for
// keystroke-level recompute), never the individual engines.
// ============================================================================

use std::collections::HashMap;

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use wasm_bindgen::prelude::*;

use crate::rounding::Reading;
use crate::science::bulk_density::{BulkDensityEngine, ContainerReading, CutSpecimen};
use crate::science::cement::{CementEngine, FinenessCharge, SoundnessReading};
use crate::science::compression::{CompressionEngine, Specimen};
use crate::science::gravity::{GravityEngine, PycnometerReading};
use crate::science::impact::{ImpactEngine, ImpactReading, ShapeFraction};
use crate::science::sieve::SieveEngine;

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct LabConfig {
    pub enable_validation_events: bool,
    /// Most replicate rows a single test accepts; extras are ignored.
    pub replicate_cap: usize,
    /// Plausibility band for hardened-specimen density, kg/m³.
    pub density_plausible_min: f64,
    pub density_plausible_max: f64,
    /// IS 383 acceptance ceiling for the mean aggregate impact value, %.
    pub impact_value_ceiling: f64,
    /// IS 269 Le Chatelier expansion limit, mm.
    pub soundness_limit_mm: f64,
}

impl Default for LabConfig {
    fn default() -> Self {
        Self {
            enable_validation_events: true,
            replicate_cap: 5,
            density_plausible_min: 1200.0,
            density_plausible_max: 2800.0,
            impact_value_ceiling: 45.0,
            soundness_limit_mm: 10.0,
        }
    }
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ValidationEvent {
    pub topic: String,
    pub message: String,
    pub severity: String, // 'INFO', 'WARNING', 'CRITICAL'
}

impl ValidationEvent {
    fn info(topic: &str, message: String) -> Self {
        Self::with_severity(topic, message, "INFO")
    }
    fn warning(topic: &str, message: String) -> Self {
        Self::with_severity(topic, message, "WARNING")
    }
    fn critical(topic: &str, message: String) -> Self {
        Self::with_severity(topic, message, "CRITICAL")
    }
    fn with_severity(topic: &str, message: String, severity: &str) -> Self {
        ValidationEvent {
            topic: topic.to_string(),
            message,
            severity: severity.to_string(),
        }
    }
}

#[derive(Serialize, Deserialize)]
pub struct ReportResponse {
    pub test_type: String,
    pub result: serde_json::Value,
    pub events: Vec<ValidationEvent>,
    pub compute_time_ms: f64,
}

// ----------------------------------------------------------------------------
// Observation payloads (frontend JSON; tolerant hydration)
// ----------------------------------------------------------------------------

#[derive(Deserialize)]
#[serde(bound(deserialize = "T: Deserialize<'de>"))]
struct Replicates<T> {
    #[serde(default)]
    replicates: Vec<T>,
}

/// Compression bench row. Cube reports call the failure load `crushingLoad`,
/// block reports call it `loadMax`; both are accepted.
#[derive(Deserialize, Default)]
#[serde(default, rename_all = "camelCase")]
struct SpecimenInput {
    id_mark: String,
    length: Reading,
    breadth: Reading,
    height: Reading,
    weight: Reading,
    crushing_load: Reading,
    load_max: Reading,
    #[serde(flatten)]
    _extra: HashMap<String, serde_json::Value>,
}

impl SpecimenInput {
    fn into_specimen(self) -> Specimen {
        let load = if self.crushing_load.is_blank() {
            self.load_max.value()
        } else {
            self.crushing_load.value()
        };
        Specimen {
            id_mark: self.id_mark,
            length: self.length.value(),
            breadth: self.breadth.value(),
            height: self.height.value(),
            weight: self.weight.value(),
            load,
        }
    }
}

#[derive(Deserialize, Default)]
#[serde(default, rename_all = "camelCase")]
struct CutSpecimenInput {
    id_mark: String,
    length: Reading,
    breadth: Reading,
    depth: Reading,
    weight_before: Reading,
    weight_after: Reading,
    #[serde(flatten)]
    _extra: HashMap<String, serde_json::Value>,
}

impl CutSpecimenInput {
    fn into_specimen(self) -> CutSpecimen {
        CutSpecimen {
            id_mark: self.id_mark,
            length: self.length.value(),
            breadth: self.breadth.value(),
            depth: self.depth.value(),
            weight_before: self.weight_before.value(),
            weight_after: self.weight_after.value(),
        }
    }
}

#[derive(Deserialize, Default)]
#[serde(default, rename_all = "camelCase")]
struct ContainerInput {
    volume: Reading,
    rodded_weight: Reading,
    loose_weight: Reading,
    #[serde(flatten)]
    _extra: HashMap<String, serde_json::Value>,
}

#[derive(Deserialize, Default)]
#[serde(default, rename_all = "camelCase")]
struct PycnometerInput {
    wt_saturated_surface_dry: Reading,
    wt_pycnometer_aggregate_water: Reading,
    wt_pycnometer_water: Reading,
    wt_oven_dried: Reading,
    #[serde(flatten)]
    _extra: HashMap<String, serde_json::Value>,
}

#[derive(Deserialize, Default)]
#[serde(default, rename_all = "camelCase")]
struct ImpactInput {
    passing: Reading,
    retained: Reading,
    #[serde(flatten)]
    _extra: HashMap<String, serde_json::Value>,
}

#[derive(Deserialize, Default)]
#[serde(default, rename_all = "camelCase")]
struct FinenessInput {
    cement_weight: Reading,
    residue_weight: Reading,
    #[serde(flatten)]
    _extra: HashMap<String, serde_json::Value>,
}

#[derive(Deserialize, Default)]
#[serde(default)]
struct SoundnessInput {
    #[serde(rename = "distance27c")]
    distance_27c: Reading,
    #[serde(rename = "distanceBoiler")]
    distance_boiler: Reading,
    #[serde(flatten)]
    _extra: HashMap<String, serde_json::Value>,
}

#[derive(Deserialize, Default)]
#[serde(default)]
struct SieveInput {
    retained: Vec<Reading>,
}

#[derive(Deserialize, Default)]
#[serde(default)]
struct ShapeFractionInput {
    size: String,
    values: Vec<Reading>,
}

#[derive(Deserialize, Default)]
#[serde(default)]
struct ShapeInput {
    flakiness: Vec<ShapeFractionInput>,
    elongation: Vec<ShapeFractionInput>,
}

fn to_fractions(inputs: Vec<ShapeFractionInput>) -> Vec<ShapeFraction> {
    inputs
        .into_iter()
        .map(|f| ShapeFraction {
            size: f.size,
            values: f.values.iter().map(Reading::value).collect(),
        })
        .collect()
}

#[derive(Deserialize, Default)]
#[serde(default)]
struct ReadingGridInput {
    readings: Vec<Reading>,
}

// ----------------------------------------------------------------------------
// Kernel
// ----------------------------------------------------------------------------

#[wasm_bindgen]
pub struct LabKernel;

#[wasm_bindgen]
impl LabKernel {
    /// Main entry point: compute one test report from observation JSON.
    ///
    /// # Arguments
    /// * `test_type` - catalog ID, e.g. "CubeCompression", "AggregateGravity"
    /// * `observations_json` - JSON object with a `replicates` array (or
    ///   `retained`/`readings` for the sieve and flask tests); field values
    ///   may be numbers or form-state strings
    ///
    /// # Returns
    /// JSON string: `{ test_type, result, events, compute_time_ms }`, or an
    /// error object if the payload does not parse. Partial observation rows
    /// are not errors; their derived cells come back empty.
    #[wasm_bindgen]
    pub fn compute_report(test_type: &str, observations_json: &str) -> String {
        Self::compute_report_with_config(test_type, observations_json, &LabConfig::default())
    }

    /// Same as [`compute_report`](Self::compute_report) with a config payload.
    #[wasm_bindgen]
    pub fn compute_report_configured(
        test_type: &str,
        observations_json: &str,
        config_json: &str,
    ) -> String {
        let config: LabConfig = match serde_json::from_str(config_json) {
            Ok(c) => c,
            Err(e) => return error_json(&format!("Failed to parse config: {}", e)),
        };
        Self::compute_report_with_config(test_type, observations_json, &config)
    }
}

/// Pure Rust implementation (non-wasm-bindgen).
impl LabKernel {
    fn compute_report_with_config(
        test_type: &str,
        observations_json: &str,
        config: &LabConfig,
    ) -> String {
        match Self::compute(test_type, observations_json, config) {
            Ok(response) => serde_json::to_string(&response).unwrap_or_default(),
            Err(e) => error_json(&e),
        }
    }

    /// [CORE] One report computation, shared by the WASM boundary and
    /// native callers.
    pub fn compute(
        test_type: &str,
        observations_json: &str,
        config: &LabConfig,
    ) -> Result<ReportResponse, String> {
        let start = instant::Instant::now();
        let mut events: Vec<ValidationEvent> = Vec::new();

        let result = match test_type {
            "CubeCompression" | "AacCompression" => {
                let rows = Self::replicates::<SpecimenInput>(observations_json, config, &mut events)?;
                let specimens: Vec<Specimen> =
                    rows.into_iter().map(SpecimenInput::into_specimen).collect();
                let result = if test_type == "CubeCompression" {
                    CompressionEngine::compute_cubes(&specimens)
                } else {
                    CompressionEngine::compute_blocks(&specimens)
                };
                // The plausibility band is for normal-weight concrete; AAC
                // runs far lighter by design.
                if test_type == "CubeCompression" {
                    for (i, row) in result.rows.iter().enumerate() {
                        if let Some(d) = row.density {
                            if d < config.density_plausible_min || d > config.density_plausible_max
                            {
                                events.push(ValidationEvent::info(
                                    "LAB.DENSITY",
                                    format!(
                                        "Specimen {} density {:.1} kg/m³ outside the usual {:.0}-{:.0} band",
                                        i + 1,
                                        d,
                                        config.density_plausible_min,
                                        config.density_plausible_max
                                    ),
                                ));
                            }
                        }
                    }
                }
                to_value(&result)
            }
            "BulkDensityMoisture" => {
                let rows =
                    Self::replicates::<CutSpecimenInput>(observations_json, config, &mut events)?;
                let specimens: Vec<CutSpecimen> = rows
                    .into_iter()
                    .map(CutSpecimenInput::into_specimen)
                    .collect();
                let result = BulkDensityEngine::compute_cut_specimens(&specimens);
                for (i, row) in result.rows.iter().enumerate() {
                    if let Some(w) = row.moisture_content {
                        if w < 0.0 {
                            events.push(ValidationEvent::warning(
                                "LAB.MOISTURE",
                                format!(
                                    "Negative moisture content on replicate {}: wet weight below oven-dry weight",
                                    i + 1
                                ),
                            ));
                        }
                    }
                }
                to_value(&result)
            }
            "AggregateBulkDensity" => {
                let rows =
                    Self::replicates::<ContainerInput>(observations_json, config, &mut events)?;
                let readings: Vec<ContainerReading> = rows
                    .into_iter()
                    .map(|r| ContainerReading {
                        volume: r.volume.value(),
                        rodded_weight: r.rodded_weight.value(),
                        loose_weight: r.loose_weight.value(),
                    })
                    .collect();
                to_value(&BulkDensityEngine::compute_container(&readings))
            }
            "AggregateGravity" => {
                let rows =
                    Self::replicates::<PycnometerInput>(observations_json, config, &mut events)?;
                let readings: Vec<PycnometerReading> = rows
                    .into_iter()
                    .map(|r| PycnometerReading {
                        wt_saturated_surface_dry: r.wt_saturated_surface_dry.value(),
                        wt_pycnometer_aggregate_water: r.wt_pycnometer_aggregate_water.value(),
                        wt_pycnometer_water: r.wt_pycnometer_water.value(),
                        wt_oven_dried: r.wt_oven_dried.value(),
                    })
                    .collect();
                for (i, r) in readings.iter().enumerate() {
                    if r.is_complete() && r.displaced_water() <= 0.0 {
                        events.push(ValidationEvent::critical(
                            "LAB.GRAVITY",
                            format!(
                                "Non-physical pycnometer readings on determination {}: displaced water is not positive",
                                i + 1
                            ),
                        ));
                    }
                }
                to_value(&GravityEngine::compute_pycnometer(&readings))
            }
            "AggregateImpact" => {
                let rows = Self::replicates::<ImpactInput>(observations_json, config, &mut events)?;
                let readings: Vec<ImpactReading> = rows
                    .into_iter()
                    .map(|r| ImpactReading {
                        passing: r.passing.value(),
                        retained: r.retained.value(),
                    })
                    .collect();
                let result = ImpactEngine::compute(&readings);
                if let Some(mean) = result.mean_impact_value {
                    if mean > config.impact_value_ceiling {
                        events.push(ValidationEvent::warning(
                            "LAB.IMPACT",
                            format!(
                                "Mean impact value {:.2}% exceeds the {:.0}% acceptance ceiling (IS 383)",
                                mean, config.impact_value_ceiling
                            ),
                        ));
                    }
                }
                to_value(&result)
            }
            "CementFineness" => {
                let rows =
                    Self::replicates::<FinenessInput>(observations_json, config, &mut events)?;
                let charges: Vec<FinenessCharge> = rows
                    .into_iter()
                    .map(|r| FinenessCharge {
                        cement_weight: r.cement_weight.value(),
                        residue_weight: r.residue_weight.value(),
                    })
                    .collect();
                to_value(&CementEngine::compute_fineness(&charges))
            }
            "CementSoundness" => {
                let rows =
                    Self::replicates::<SoundnessInput>(observations_json, config, &mut events)?;
                let readings: Vec<SoundnessReading> = rows
                    .into_iter()
                    .map(|r| SoundnessReading {
                        distance_27c: r.distance_27c.value(),
                        distance_boiler: r.distance_boiler.value(),
                    })
                    .collect();
                let result = CementEngine::compute_soundness(&readings);
                if let Some(mean) = result.mean_expansion {
                    if mean > config.soundness_limit_mm {
                        events.push(ValidationEvent::warning(
                            "LAB.SOUNDNESS",
                            format!(
                                "Mean expansion {:.2} mm exceeds the {:.0} mm limit (IS 269)",
                                mean, config.soundness_limit_mm
                            ),
                        ));
                    }
                }
                to_value(&result)
            }
            "AggregateShape" => {
                let input: ShapeInput = parse(observations_json)?;
                to_value(&serde_json::json!({
                    "flakiness": ImpactEngine::compute_shape_index(&to_fractions(input.flakiness)),
                    "elongation": ImpactEngine::compute_shape_index(&to_fractions(input.elongation)),
                }))
            }
            "SieveAnalysis" => {
                let input: SieveInput = parse(observations_json)?;
                let retained: Vec<f64> = input.retained.iter().map(Reading::value).collect();
                to_value(&SieveEngine::compute(&retained))
            }
            "CementGravity" => {
                let input: ReadingGridInput = parse(observations_json)?;
                let readings: Vec<f64> = input.readings.iter().map(Reading::value).collect();
                to_value(&serde_json::json!({
                    "avg_specific_gravity": GravityEngine::average_readings(&readings),
                }))
            }
            _ => return Err(format!("Unknown test type: {}", test_type)),
        };

        if !config.enable_validation_events {
            events.clear();
        }

        Ok(ReportResponse {
            test_type: test_type.to_string(),
            result,
            events,
            compute_time_ms: start.elapsed().as_secs_f64() * 1000.0,
        })
    }

    fn replicates<T: DeserializeOwned>(
        observations_json: &str,
        config: &LabConfig,
        events: &mut Vec<ValidationEvent>,
    ) -> Result<Vec<T>, String> {
        let mut parsed: Replicates<T> = parse(observations_json)?;
        if parsed.replicates.len() > config.replicate_cap {
            events.push(ValidationEvent::info(
                "LAB.REPLICATES",
                format!(
                    "{} replicates submitted; only the first {} are evaluated",
                    parsed.replicates.len(),
                    config.replicate_cap
                ),
            ));
            parsed.replicates.truncate(config.replicate_cap);
        }
        Ok(parsed.replicates)
    }
}

fn parse<T: DeserializeOwned>(json: &str) -> Result<T, String> {
    serde_json::from_str(json).map_err(|e| format!("Failed to parse observations: {}", e))
}

fn to_value<T: Serialize>(result: &T) -> serde_json::Value {
    serde_json::to_value(result).unwrap_or(serde_json::Value::Null)
}

fn error_json(message: &str) -> String {
    serde_json::to_string(&serde_json::json!({ "error": message })).unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unknown_test_type_is_an_error() {
        let err = LabKernel::compute("SlumpFlow", "{}", &LabConfig::default());
        assert!(err.is_err());
    }

    #[test]
    fn test_default_config_bounds() {
        let config = LabConfig::default();
        assert_eq!(config.replicate_cap, 5);
        assert!(config.density_plausible_min < config.density_plausible_max);
    }

    #[test]
    fn test_replicate_cap_truncates_with_event() {
        let payload = serde_json::json!({
            "replicates": (0..7).map(|_| serde_json::json!({"passing": 60, "retained": 290}))
                .collect::<Vec<_>>()
        });
        let response = LabKernel::compute(
            "AggregateImpact",
            &payload.to_string(),
            &LabConfig::default(),
        )
        .unwrap();
        assert!(response
            .events
            .iter()
            .any(|e| e.topic == "LAB.REPLICATES" && e.severity == "INFO"));
        assert_eq!(response.result["values"].as_array().unwrap().len(), 5);
    }
}
