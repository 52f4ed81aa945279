// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Clinic model and the read views assembled from it.

use serde::{Deserialize, Serialize};
#[cfg(feature = "binding-generation")]
use ts_rs::TS;

use super::treatment::TreatmentOffering;

/// Clinic stored in the `clinics` collection.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct Clinic {
    /// Human-chosen slug, also the document ID
    pub clinic_id: String,
    pub name: String,
    pub description: String,
    /// Street address
    pub address: String,
    pub city: String,
    pub postal_code: String,
    pub latitude: f64,
    pub longitude: f64,
    pub phone: String,
    pub email: String,
    pub image_url: String,
    pub rating: f64,
    pub review_count: u32,
    /// Creation timestamp (RFC3339); filled in at seed time when absent
    #[serde(default)]
    pub created_at: String,
}

/// Clinic search result, optionally enriched with the filtered treatment's
/// price and duration.
#[derive(Debug, Clone, Serialize, PartialEq)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct ClinicView {
    #[serde(flatten)]
    pub clinic: Clinic,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub treatment_price: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub treatment_duration: Option<u32>,
}

impl From<Clinic> for ClinicView {
    fn from(clinic: Clinic) -> Self {
        Self {
            clinic,
            treatment_price: None,
            treatment_duration: None,
        }
    }
}

/// Clinic with every treatment it offers.
#[derive(Debug, Clone, Serialize, PartialEq)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct ClinicDetail {
    #[serde(flatten)]
    pub clinic: Clinic,
    pub treatments: Vec<TreatmentOffering>,
}
