// SPDX-FileCopyrightText: 2026 Santhosh Shyamsundar, Prabhu S., and Studio Tyto
// SPDX-License-Identifier: MIT
//
// LabCore — Materials Testing Observation Kernel
// Observation sheets: one parametrized calculation engine for every form.

pub mod graph;
pub mod plan;
pub mod sheet;

pub use plan::{Binding, Formula, PlanRegistry, TestPlan};
pub use sheet::ObservationSheet;
