// SPDX-FileCopyrightText: 2026 Santhosh Shyamsundar, Prabhu S., and Studio Tyto
// SPDX-License-Identifier: MIT
//! Test plans: which raw fields feed which formula at what precision.
//!
//! A plan is the entire per-form configuration. The forms themselves are
//! thin UI bindings over a plan; the calculation behavior of the whole test
//! catalog lives in [`PlanRegistry`].

use serde::{Deserialize, Serialize};

use crate::formulas::VolumeScale;

/// The formula vocabulary a binding can invoke.
///
/// Each variant maps onto one pure function in [`crate::formulas`], except
/// `MeanPositive` which invokes the aggregation primitive in
/// [`crate::stats`] and `Difference` which is plain subtraction (Le
/// Chatelier soundness expansion).
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub enum Formula {
    Area,
    Volume(VolumeScale),
    Density,
    MoistureContent,
    SpecificGravity,
    WaterAbsorption,
    CompressiveStrength,
    ImpactValue,
    ResiduePercent,
    Difference,
    MeanPositive,
}

/// One derived field: output key, formula, ordered input keys, display
/// decimals. The rounded value is what downstream bindings read, matching
/// the report sheets where each derived cell holds the displayed figure.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Binding {
    pub output: String,
    pub formula: Formula,
    pub inputs: Vec<String>,
    pub decimals: u32,
}

/// Complete calculation plan for one test type.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct TestPlan {
    pub id: String,
    pub replicates: u8,
    pub bindings: Vec<Binding>,
}

fn keyed(base: &str, replicate: u8) -> String {
    format!("{}_{}", base, replicate)
}

impl TestPlan {
    fn new(id: &str, replicates: u8) -> Self {
        TestPlan {
            id: id.to_string(),
            replicates,
            bindings: Vec::new(),
        }
    }

    /// Add one derived field per replicate; `output` and `inputs` are base
    /// names expanded with the replicate suffix (`area` → `area_1` …).
    fn derive(mut self, output: &str, formula: Formula, inputs: &[&str], decimals: u32) -> Self {
        for i in 1..=self.replicates {
            self.bindings.push(Binding {
                output: keyed(output, i),
                formula: formula.clone(),
                inputs: inputs.iter().map(|k| keyed(k, i)).collect(),
                decimals,
            });
        }
        self
    }

    /// Add an aggregate row: mean of the strictly-positive replicate values
    /// of `over`.
    fn aggregate(mut self, output: &str, over: &str, decimals: u32) -> Self {
        let inputs = (1..=self.replicates).map(|i| keyed(over, i)).collect();
        self.bindings.push(Binding {
            output: output.to_string(),
            formula: Formula::MeanPositive,
            inputs,
            decimals,
        });
        self
    }

    /// All derived output keys, in declaration order.
    pub fn outputs(&self) -> impl Iterator<Item = &str> {
        self.bindings.iter().map(|b| b.output.as_str())
    }
}

/// Standard plans for the laboratory's test catalog.
pub struct PlanRegistry;

impl PlanRegistry {
    /// Retrieve a standard test plan by ID.
    ///
    /// Supports: "CubeCompression", "AacCompression", "BulkDensityMoisture",
    /// "AggregateBulkDensity", "AggregateGravity", "AggregateImpact",
    /// "CementFineness", "CementSoundness"
    pub fn get_standard(test_type: &str) -> Option<TestPlan> {
        match test_type {
            // Concrete cube: 150mm cubes, density in kg/m3, strength from
            // crushing load over the bearing face.
            "CubeCompression" => Some(
                TestPlan::new("CubeCompression", 3)
                    .derive("area", Formula::Area, &["length", "breadth"], 1)
                    .derive(
                        "volume",
                        Formula::Volume(VolumeScale::CubicMetres),
                        &["length", "breadth", "height"],
                        6,
                    )
                    .derive("density", Formula::Density, &["weight", "volume"], 1)
                    .derive(
                        "compressive_strength",
                        Formula::CompressiveStrength,
                        &["crushing_load", "area"],
                        1,
                    )
                    .aggregate("avg_density", "density", 1)
                    .aggregate("avg_compressive_strength", "compressive_strength", 1),
            ),
            // AAC blocks: same formulas, block-sized specimens, the report
            // additionally averages the peak load column.
            "AacCompression" => Some(
                TestPlan::new("AacCompression", 3)
                    .derive("area", Formula::Area, &["length", "breadth"], 2)
                    .derive(
                        "volume",
                        Formula::Volume(VolumeScale::CubicMetres),
                        &["length", "breadth", "height"],
                        6,
                    )
                    .derive("density", Formula::Density, &["weight", "volume"], 1)
                    .derive(
                        "compressive_strength",
                        Formula::CompressiveStrength,
                        &["load_max", "area"],
                        2,
                    )
                    .aggregate("avg_load_max", "load_max", 1)
                    .aggregate("avg_compressive_strength", "compressive_strength", 2),
            ),
            // Bulk density & moisture content of a cut specimen: volume from
            // mm dimensions, wet/dry weights in kg.
            "BulkDensityMoisture" => Some(
                TestPlan::new("BulkDensityMoisture", 3)
                    .derive(
                        "volume",
                        Formula::Volume(VolumeScale::CubicMetres),
                        &["length", "breadth", "depth"],
                        6,
                    )
                    .derive("bulk_density", Formula::Density, &["weight_after", "volume"], 1)
                    .derive(
                        "moisture_content",
                        Formula::MoistureContent,
                        &["weight_before", "weight_after"],
                        2,
                    )
                    .aggregate("avg_bulk_density", "bulk_density", 1)
                    .aggregate("avg_moisture_content", "moisture_content", 2),
            ),
            // Rodded/loose bulk density of aggregate in a measured container
            // (volume entered in litres, densities in kg/L).
            "AggregateBulkDensity" => Some(
                TestPlan::new("AggregateBulkDensity", 3)
                    .derive("rodded_density", Formula::Density, &["rodded_weight", "volume"], 3)
                    .derive("loose_density", Formula::Density, &["loose_weight", "volume"], 3)
                    .aggregate("mean_rodded_density", "rodded_density", 3)
                    .aggregate("mean_loose_density", "loose_density", 3),
            ),
            // Pycnometer specific gravity & water absorption.
            "AggregateGravity" => Some(
                TestPlan::new("AggregateGravity", 3)
                    .derive(
                        "specific_gravity",
                        Formula::SpecificGravity,
                        &[
                            "wt_saturated_surface_dry",
                            "wt_pycnometer_aggregate_water",
                            "wt_pycnometer_water",
                            "wt_oven_dried",
                        ],
                        3,
                    )
                    .derive(
                        "water_absorption",
                        Formula::WaterAbsorption,
                        &["wt_saturated_surface_dry", "wt_oven_dried"],
                        2,
                    )
                    .aggregate("mean_specific_gravity", "specific_gravity", 3)
                    .aggregate("mean_water_absorption", "water_absorption", 2),
            ),
            // Aggregate impact value.
            "AggregateImpact" => Some(
                TestPlan::new("AggregateImpact", 3)
                    .derive(
                        "impact_value",
                        Formula::ImpactValue,
                        &["impact_passing", "impact_retained"],
                        2,
                    )
                    .aggregate("mean_impact_value", "impact_value", 2),
            ),
            // Cement fineness by dry sieving: residue percent per charge.
            "CementFineness" => Some(
                TestPlan::new("CementFineness", 3)
                    .derive(
                        "residue_percent",
                        Formula::ResiduePercent,
                        &["residue_weight", "cement_weight"],
                        2,
                    )
                    .aggregate("avg_residue", "residue_percent", 2),
            ),
            // Le Chatelier soundness: expansion between the 27C reading and
            // the post-boil reading, five moulds.
            "CementSoundness" => Some(
                TestPlan::new("CementSoundness", 5)
                    .derive(
                        "expansion",
                        Formula::Difference,
                        &["distance_boiler", "distance_27c"],
                        2,
                    )
                    .aggregate("avg_soundness", "expansion", 2),
            ),
            _ => None,
        }
    }
}
