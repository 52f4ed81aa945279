// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Treatment reference data and per-clinic offerings.

use serde::{Deserialize, Serialize};
#[cfg(feature = "binding-generation")]
use ts_rs::TS;

/// A dental treatment (static reference data).
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct Treatment {
    /// Human-chosen slug, also the document ID
    pub treatment_id: String,
    pub name: String,
    pub description: String,
    pub category: String,
    /// Icon tag used by the frontend
    pub icon: String,
}

/// A clinic's specific offering of a treatment.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ClinicTreatment {
    /// Document ID
    pub id: String,
    pub clinic_id: String,
    pub treatment_id: String,
    /// Price in euros, non-negative
    pub price: f64,
    pub duration_days: u32,
    pub warranty_months: u32,
    #[serde(default)]
    pub process_steps: Vec<String>,
    #[serde(default)]
    pub includes: Vec<String>,
}

/// Treatment record merged with one clinic's offering details.
#[derive(Debug, Clone, Serialize, PartialEq)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct TreatmentOffering {
    #[serde(flatten)]
    pub treatment: Treatment,
    pub price: f64,
    pub duration_days: u32,
    pub warranty_months: u32,
    pub process_steps: Vec<String>,
    pub includes: Vec<String>,
}

impl TreatmentOffering {
    /// Merge shared treatment fields with a clinic's offering.
    pub fn new(treatment: Treatment, link: ClinicTreatment) -> Self {
        Self {
            treatment,
            price: link.price,
            duration_days: link.duration_days,
            warranty_months: link.warranty_months,
            process_steps: link.process_steps,
            includes: link.includes,
        }
    }
}
