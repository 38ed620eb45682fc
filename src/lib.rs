// SPDX-FileCopyrightText: 2026 Santhosh Shyamsundar, Prabhu S., and Studio Tyto
// SPDX-License-Identifier: MIT
//
// LabCore — Materials Testing Observation Kernel
// Calculation core for construction-materials test reports
//

pub mod formulas;
pub mod kernel;
pub mod rounding;
pub mod science;
pub mod sheet;
pub mod stats;
#[cfg(test)]
pub mod tests_lab;

// Re-export core types
pub use formulas::VolumeScale;
pub use kernel::{LabConfig, LabKernel, ReportResponse, ValidationEvent};
pub use rounding::Reading;
pub use sheet::{ObservationSheet, PlanRegistry, TestPlan};
