// SPDX-FileCopyrightText: 2026 Santhosh Shyamsundar, Prabhu S., and Studio Tyto
// SPDX-License-Identifier: MIT
//
// LabCore — Materials Testing Observation Kernel
// Per-test batch engines for report generation.

pub mod bulk_density;
pub mod cement;
pub mod compression;
pub mod gravity;
pub mod impact;
pub mod sieve;
