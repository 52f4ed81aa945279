// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Side-by-side comparison results.

use serde::Serialize;
#[cfg(feature = "binding-generation")]
use ts_rs::TS;

use super::{Clinic, TreatmentOffering};

/// One clinic's column in a comparison.
#[derive(Debug, Clone, Serialize, PartialEq)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct ComparisonEntry {
    pub clinic: Clinic,
    pub treatment: TreatmentOffering,
    /// Set on every entry whose price equals the lowest price
    pub is_best_value: bool,
}

/// Comparison of one treatment across several clinics.
#[derive(Debug, Clone, Serialize, PartialEq)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct ComparisonResult {
    pub treatment_name: String,
    pub comparisons: Vec<ComparisonEntry>,
}
