// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Side-by-side comparison of one treatment across clinics.

use crate::db::Db;
use crate::error::{AppError, Result};
use crate::models::{ComparisonEntry, ComparisonResult, TreatmentOffering};
use futures_util::future::try_join_all;

/// Fewest clinics a comparison accepts.
pub const MIN_CLINICS: usize = 2;

/// Mark every entry priced at the minimum as best value.
///
/// Ties are all marked. Prices are compared with exact equality, which holds
/// because they are stored literals rather than computed values.
pub fn mark_best_value(entries: &mut [ComparisonEntry]) {
    let Some(min_price) = entries
        .iter()
        .map(|e| e.treatment.price)
        .min_by(|a, b| a.total_cmp(b))
    else {
        return;
    };

    for entry in entries.iter_mut() {
        entry.is_best_value = entry.treatment.price == min_price;
    }
}

#[derive(Clone)]
pub struct CompareService {
    db: Db,
}

impl CompareService {
    pub fn new(db: Db) -> Self {
        Self { db }
    }

    /// Compare `treatment_id` across `clinic_ids`, in input order.
    ///
    /// Unknown clinics and clinics that do not offer the treatment are
    /// skipped. An empty comparison is a valid result.
    pub async fn compare(&self, clinic_ids: &[String], treatment_id: &str) -> Result<ComparisonResult> {
        if clinic_ids.len() < MIN_CLINICS {
            return Err(AppError::BadRequest(format!(
                "At least {} clinics are required to compare",
                MIN_CLINICS
            )));
        }

        let treatment = self
            .db
            .get_treatment(treatment_id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Treatment {} not found", treatment_id)))?;

        let candidates = try_join_all(clinic_ids.iter().map(|clinic_id| async move {
            let Some(clinic) = self.db.get_clinic(clinic_id).await? else {
                return Ok::<_, AppError>(None);
            };
            let link = self.db.find_link(clinic_id, treatment_id).await?;
            Ok(link.map(|link| (clinic, link)))
        }))
        .await?;

        let mut comparisons: Vec<ComparisonEntry> = candidates
            .into_iter()
            .flatten()
            .map(|(clinic, link)| ComparisonEntry {
                clinic,
                treatment: TreatmentOffering::new(treatment.clone(), link),
                is_best_value: false,
            })
            .collect();

        mark_best_value(&mut comparisons);

        tracing::debug!(
            treatment_id,
            requested = clinic_ids.len(),
            compared = comparisons.len(),
            "Comparison assembled"
        );

        Ok(ComparisonResult {
            treatment_name: treatment.name,
            comparisons,
        })
    }
}
