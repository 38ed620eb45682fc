// SPDX-FileCopyrightText: 2026 Santhosh Shyamsundar, Prabhu S., and Studio Tyto
// SPDX-License-Identifier: MIT
//! The observation sheet: transient form state plus incremental recompute.
//!
//! A sheet is created when a form mounts (optionally pre-seeded from a
//! saved draft), mutated on every keystroke through [`ObservationSheet::set_field`],
//! and discarded when the form unmounts; persistence belongs to the host.
//! Each mutation re-evaluates only the derived fields downstream of the
//! edited key, in topological order.

use std::collections::HashMap;

use wasm_bindgen::prelude::*;

use crate::formulas;
use crate::rounding::{self, Reading};
use crate::stats;

use super::graph::RecalcGraph;
use super::plan::{Binding, Formula, PlanRegistry, TestPlan};

#[wasm_bindgen]
pub struct ObservationSheet {
    plan: TestPlan,
    graph: RecalcGraph,
    raw: HashMap<String, f64>,
    derived: HashMap<String, Option<f64>>,
}

#[wasm_bindgen]
impl ObservationSheet {
    /// Open a blank sheet for a standard test type.
    #[wasm_bindgen]
    pub fn open(test_type: &str) -> Result<ObservationSheet, JsValue> {
        let plan = PlanRegistry::get_standard(test_type)
            .ok_or_else(|| JsValue::from_str(&format!("Unknown test type: {}", test_type)))?;
        ObservationSheet::from_plan(plan).map_err(|e| JsValue::from_str(&e))
    }

    /// Pre-seed raw fields from a JSON object (string or number values),
    /// then run a full recompute pass.
    pub fn load_json(&mut self, fields_json: &str) -> Result<(), JsValue> {
        let fields: HashMap<String, Reading> = serde_json::from_str(fields_json)
            .map_err(|e| JsValue::from_str(&format!("Failed to parse fields: {}", e)))?;
        for (key, reading) in fields {
            if !self.graph.is_output(&key) {
                self.raw.insert(key, reading.value());
            }
        }
        self.recompute_all();
        Ok(())
    }

    /// Record one keystroke's worth of input and recompute downstream.
    ///
    /// Derived fields are read-only from the host side; setting one is a
    /// no-op rather than an error, mirroring a disabled report cell.
    pub fn set_field(&mut self, key: &str, text: &str) {
        self.set_value(key, rounding::coerce(text));
    }

    /// Same as [`set_field`](Self::set_field) with an already-numeric value.
    pub fn set_value(&mut self, key: &str, value: f64) {
        if self.graph.is_output(key) {
            return;
        }
        self.raw
            .insert(key.to_string(), if value.is_finite() { value } else { 0.0 });
        for output in self.graph.affected(key) {
            self.evaluate(&output);
        }
    }

    /// Current value of a field; `None` for guarded derived fields that have
    /// not computed (and for fields never touched).
    pub fn value(&self, key: &str) -> Option<f64> {
        if let Some(d) = self.derived.get(key) {
            return *d;
        }
        self.raw.get(key).copied()
    }

    /// Display string for a field: derived fields at their configured
    /// precision, raw fields verbatim, absent values as the empty string.
    pub fn display(&self, key: &str) -> String {
        if let Some(d) = self.derived.get(key) {
            let decimals = self
                .binding(key)
                .map(|b| b.decimals)
                .unwrap_or(2);
            return rounding::format_fixed(*d, decimals);
        }
        match self.raw.get(key) {
            Some(v) => format!("{}", v),
            None => String::new(),
        }
    }

    /// Full form state as JSON: every raw field as a number, every derived
    /// field as its formatted display string.
    pub fn snapshot_json(&self) -> String {
        self.snapshot_value().to_string()
    }

    /// Structured snapshot for the host, same data as
    /// [`snapshot_json`](Self::snapshot_json).
    pub fn snapshot(&self) -> JsValue {
        serde_wasm_bindgen::to_value(&self.snapshot_value()).unwrap_or(JsValue::NULL)
    }

    pub fn test_type(&self) -> String {
        self.plan.id.clone()
    }
}

/// Pure Rust implementation (non-wasm-bindgen).
impl ObservationSheet {
    pub fn from_plan(plan: TestPlan) -> Result<ObservationSheet, String> {
        let graph = RecalcGraph::compile(&plan)?;
        let mut sheet = ObservationSheet {
            plan,
            graph,
            raw: HashMap::new(),
            derived: HashMap::new(),
        };
        sheet.recompute_all();
        Ok(sheet)
    }

    pub fn plan(&self) -> &TestPlan {
        &self.plan
    }

    fn snapshot_value(&self) -> serde_json::Value {
        let mut fields = serde_json::Map::new();
        for (key, value) in &self.raw {
            if let Some(n) = serde_json::Number::from_f64(*value) {
                fields.insert(key.clone(), serde_json::Value::Number(n));
            }
        }
        for key in self.plan.outputs() {
            fields.insert(
                key.to_string(),
                serde_json::Value::String(self.display(key)),
            );
        }
        serde_json::json!({
            "testType": self.plan.id,
            "replicates": self.plan.replicates,
            "fields": fields,
        })
    }

    fn binding(&self, output: &str) -> Option<&Binding> {
        self.plan.bindings.iter().find(|b| b.output == output)
    }

    fn recompute_all(&mut self) {
        for output in self.graph.full_order().to_vec() {
            self.evaluate(&output);
        }
    }

    /// Numeric input with the blank-coerces-to-zero policy.
    fn input(&self, key: &str) -> f64 {
        self.value(key).unwrap_or(0.0)
    }

    fn evaluate(&mut self, output: &str) {
        let Some(binding) = self.binding(output).cloned() else {
            return;
        };
        let result = self.apply(&binding);
        self.derived.insert(
            binding.output,
            result.map(|v| rounding::round_to(v, binding.decimals)),
        );
    }

    fn apply(&self, binding: &Binding) -> Option<f64> {
        let at = |i: usize| self.input(&binding.inputs[i]);
        match &binding.formula {
            Formula::Area => Some(formulas::area(at(0), at(1))),
            Formula::Volume(scale) => Some(formulas::volume(at(0), at(1), at(2), *scale)),
            Formula::Density => formulas::density(at(0), at(1)),
            Formula::MoistureContent => formulas::moisture_content(at(0), at(1)),
            Formula::SpecificGravity => {
                formulas::specific_gravity_pycnometer(at(0), at(1), at(2), at(3))
            }
            Formula::WaterAbsorption => formulas::water_absorption(at(0), at(1)),
            Formula::CompressiveStrength => formulas::compressive_strength(at(0), at(1)),
            Formula::ImpactValue => formulas::impact_value(at(0), at(1)),
            Formula::ResiduePercent => formulas::residue_percent(at(0), at(1)),
            Formula::Difference => Some(at(0) - at(1)),
            Formula::MeanPositive => {
                stats::mean_positive(binding.inputs.iter().map(|k| self.value(k)))
            }
        }
    }
}
