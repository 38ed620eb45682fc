// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Santhosh Shyamsundar, Prabhu S., and Studio Tyto

//! LabCore Kernel Tests
//!
//! End-to-end tests over the JSON boundary: observation payloads in, report
//! payloads and validation events out.

use crate::kernel::{LabConfig, LabKernel};
use crate::sheet::ObservationSheet;
use serde_json::json;

#[test]
fn test_cube_report_end_to_end() {
    println!(" Checking a full M25 cube report (Native)");

    // Three 150mm cubes as the form would submit them: strings and numbers mixed
    let observations = json!({
        "replicates": [
            { "idMark": "C1", "length": "150.0", "breadth": "150.0", "height": "150.0",
              "weight": "8.5", "crushingLoad": "650" },
            { "idMark": "C2", "length": 150.0, "breadth": 150.0, "height": 150.0,
              "weight": 8.4, "crushingLoad": 640.0 },
            { "idMark": "C3", "length": "150", "breadth": "150", "height": "150",
              "weight": "8.6", "crushingLoad": "660" }
        ]
    });

    let response = LabKernel::compute(
        "CubeCompression",
        &observations.to_string(),
        &LabConfig::default(),
    )
    .unwrap();
    let res = &response.result;

    println!(" Result: {:#?}", res);

    // Densities: 8.5/0.003375 = 2518.5 etc.
    assert_eq!(res["rows"][0]["density"].as_f64().unwrap(), 2518.5);
    // Strengths: 650*1000/22500 = 28.9
    assert_eq!(res["rows"][0]["compressive_strength"].as_f64().unwrap(), 28.9);
    // Mean strength (28.9 + 28.4 + 29.3) / 3 = 28.866... → 28.9
    assert_eq!(res["avg_compressive_strength"].as_f64().unwrap(), 28.9);
    assert_eq!(res["strength_class"].as_str().unwrap(), "M25");
    // Plausible densities: no events
    assert!(response.events.is_empty());
    assert!(response.compute_time_ms >= 0.0);
}

#[test]
fn test_partial_rows_stay_empty_never_nan() {
    // One filled replicate, two untouched: the aggregate must average the
    // filled one and the blanks must serialize as null, not 0 or NaN.
    let observations = json!({
        "replicates": [
            { "length": "200", "breadth": "200", "depth": "250",
              "weightBefore": "19.2", "weightAfter": "18.5" },
            {},
            { "length": "", "breadth": "", "depth": "", "weightBefore": "", "weightAfter": "" }
        ]
    });

    let response = LabKernel::compute(
        "BulkDensityMoisture",
        &observations.to_string(),
        &LabConfig::default(),
    )
    .unwrap();
    let res = &response.result;

    assert_eq!(res["rows"][0]["bulk_density"].as_f64().unwrap(), 1850.0);
    assert!(res["rows"][1]["bulk_density"].is_null());
    assert!(res["rows"][2]["moisture_content"].is_null());
    assert_eq!(res["avg_bulk_density"].as_f64().unwrap(), 1850.0);
    assert_eq!(res["avg_moisture_content"].as_f64().unwrap(), 3.78);
}

#[test]
fn test_negative_moisture_is_flagged_not_clamped() {
    println!(" Testing the wet-below-dry anomaly path");

    let observations = json!({
        "replicates": [
            { "length": "200", "breadth": "200", "depth": "200",
              "weightBefore": "15.9", "weightAfter": "16.2" }
        ]
    });

    let response = LabKernel::compute(
        "BulkDensityMoisture",
        &observations.to_string(),
        &LabConfig::default(),
    )
    .unwrap();

    // Value passes through unclamped...
    assert_eq!(
        response.result["rows"][0]["moisture_content"].as_f64().unwrap(),
        -1.85
    );
    // ...and the operator gets told.
    assert!(response
        .events
        .iter()
        .any(|e| e.topic == "LAB.MOISTURE" && e.severity == "WARNING"));
}

#[test]
fn test_gravity_report_with_worked_example() {
    let observations = json!({
        "replicates": [
            { "wtSaturatedSurfaceDry": 100.0, "wtPycnometerAggregateWater": 650.0,
              "wtPycnometerWater": 600.0, "wtOvenDried": 98.0 }
        ]
    });

    let response = LabKernel::compute(
        "AggregateGravity",
        &observations.to_string(),
        &LabConfig::default(),
    )
    .unwrap();
    let res = &response.result;

    assert_eq!(res["rows"][0]["specific_gravity"].as_f64().unwrap(), 1.96);
    assert_eq!(res["rows"][0]["water_absorption"].as_f64().unwrap(), 2.04);
    assert_eq!(res["mean_specific_gravity"].as_f64().unwrap(), 1.96);
    assert!(response.events.is_empty());
}

#[test]
fn test_non_physical_pycnometer_readings_event() {
    let observations = json!({
        "replicates": [
            { "wtSaturatedSurfaceDry": 40.0, "wtPycnometerAggregateWater": 650.0,
              "wtPycnometerWater": 600.0, "wtOvenDried": 39.0 }
        ]
    });

    let response = LabKernel::compute(
        "AggregateGravity",
        &observations.to_string(),
        &LabConfig::default(),
    )
    .unwrap();
    assert!(response
        .events
        .iter()
        .any(|e| e.topic == "LAB.GRAVITY" && e.severity == "CRITICAL"));
}

#[test]
fn test_impact_ceiling_event() {
    // Weak aggregate: 180 of 360 g turns to fines → 50% > 45% ceiling
    let observations = json!({
        "replicates": [
            { "passing": 180.0, "retained": 180.0 }
        ]
    });

    let response = LabKernel::compute(
        "AggregateImpact",
        &observations.to_string(),
        &LabConfig::default(),
    )
    .unwrap();
    assert_eq!(
        response.result["mean_impact_value"].as_f64().unwrap(),
        50.0
    );
    assert!(response
        .events
        .iter()
        .any(|e| e.topic == "LAB.IMPACT" && e.severity == "WARNING"));
}

#[test]
fn test_sieve_report_fineness_modulus_and_zone() {
    let observations = json!({
        "retained": ["0", "25", "120", "180", "230", "280", "120", "45"]
    });

    let response = LabKernel::compute(
        "SieveAnalysis",
        &observations.to_string(),
        &LabConfig::default(),
    )
    .unwrap();
    let res = &response.result;

    assert_eq!(res["fineness_modulus"].as_f64().unwrap(), 2.84);
    assert_eq!(res["grading_zone"].as_str().unwrap(), "Zone II");
    assert_eq!(res["total_weight"].as_f64().unwrap(), 1000.0);
}

#[test]
fn test_shape_indices_report() {
    let observations = json!({
        "flakiness": [
            { "size": "10 mm", "values": ["12", "14", "13"] },
            { "size": "20 mm", "values": ["9", "11", "0"] }
        ],
        "elongation": [
            { "size": "10 mm", "values": ["18", "20", "19"] }
        ]
    });

    let response = LabKernel::compute(
        "AggregateShape",
        &observations.to_string(),
        &LabConfig::default(),
    )
    .unwrap();
    let res = &response.result;

    // Flakiness: fraction means 13.0 and 10.0, total 23.0
    assert_eq!(res["flakiness"]["total_index"].as_f64().unwrap(), 23.0);
    // Elongation: single fraction mean 19.0
    assert_eq!(res["elongation"]["total_index"].as_f64().unwrap(), 19.0);
}

#[test]
fn test_malformed_payload_returns_error_object_not_panic() {
    let out = LabKernel::compute_report("CubeCompression", "{not json");
    let parsed: serde_json::Value = serde_json::from_str(&out).unwrap();
    assert!(parsed["error"].as_str().unwrap().contains("Failed to parse"));
}

#[test]
fn test_report_matches_interactive_sheet() {
    println!(" Cross-checking the batch path against the keystroke path");

    // Batch report
    let observations = json!({
        "replicates": [
            { "length": "200", "breadth": "200", "depth": "250",
              "weightBefore": "19.2", "weightAfter": "18.5" }
        ]
    });
    let response = LabKernel::compute(
        "BulkDensityMoisture",
        &observations.to_string(),
        &LabConfig::default(),
    )
    .unwrap();

    // Same observations typed one keystroke at a time
    let mut sheet = ObservationSheet::open("BulkDensityMoisture").unwrap();
    for (key, value) in [
        ("length_1", "200"),
        ("breadth_1", "200"),
        ("depth_1", "250"),
        ("weight_before_1", "19.2"),
        ("weight_after_1", "18.5"),
    ] {
        sheet.set_field(key, value);
    }

    assert_eq!(
        response.result["rows"][0]["bulk_density"].as_f64().unwrap(),
        sheet.value("bulk_density_1").unwrap()
    );
    assert_eq!(
        response.result["avg_moisture_content"].as_f64().unwrap(),
        sheet.value("avg_moisture_content").unwrap()
    );
    println!(" ✓ Both evaluation paths agree");
}

#[test]
fn test_determinism_across_repeated_runs() {
    let observations = json!({
        "replicates": [
            { "passing": 60.0, "retained": 290.0 },
            { "passing": 55.0, "retained": 295.0 }
        ]
    })
    .to_string();

    let first = LabKernel::compute("AggregateImpact", &observations, &LabConfig::default())
        .unwrap();
    let second = LabKernel::compute("AggregateImpact", &observations, &LabConfig::default())
        .unwrap();
    assert_eq!(first.result, second.result);
}

#[test]
fn test_events_can_be_disabled() {
    let config = LabConfig {
        enable_validation_events: false,
        ..LabConfig::default()
    };
    let observations = json!({
        "replicates": [ { "passing": 180.0, "retained": 180.0 } ]
    });
    let response = LabKernel::compute("AggregateImpact", &observations.to_string(), &config)
        .unwrap();
    assert!(response.events.is_empty());
}
