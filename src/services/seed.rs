// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Bundled sample catalogue and the operation that loads it.

use crate::db::Db;
use crate::error::AppError;
use crate::models::{Clinic, ClinicTreatment, Treatment};
use crate::time_utils::format_utc_rfc3339;
use serde::{Deserialize, Serialize};

const SEED_JSON: &str = include_str!("../../data/catalog_seed.json");

/// A complete catalogue: treatments, clinics and their offerings.
#[derive(Debug, Clone, Deserialize)]
pub struct CatalogSeed {
    pub treatments: Vec<Treatment>,
    pub clinics: Vec<Clinic>,
    pub clinic_treatments: Vec<ClinicTreatment>,
}

/// Counts reported after seeding.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct SeedSummary {
    pub treatments: usize,
    pub clinics: usize,
    pub clinic_treatments: usize,
}

impl CatalogSeed {
    /// The sample catalogue shipped with the binary.
    pub fn bundled() -> anyhow::Result<Self> {
        Ok(serde_json::from_str(SEED_JSON)?)
    }
}

/// Replace the stored catalogue with `seed`.
///
/// Clinics without a creation timestamp get the current time.
pub async fn load_catalog(db: &Db, mut seed: CatalogSeed) -> Result<SeedSummary, AppError> {
    let now = format_utc_rfc3339(chrono::Utc::now());
    for clinic in seed.clinics.iter_mut().filter(|c| c.created_at.is_empty()) {
        clinic.created_at = now.clone();
    }

    db.replace_catalog(&seed.treatments, &seed.clinics, &seed.clinic_treatments)
        .await?;

    let summary = SeedSummary {
        treatments: seed.treatments.len(),
        clinics: seed.clinics.len(),
        clinic_treatments: seed.clinic_treatments.len(),
    };
    tracing::info!(
        treatments = summary.treatments,
        clinics = summary.clinics,
        clinic_treatments = summary.clinic_treatments,
        "Catalogue seeded"
    );
    Ok(summary)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_bundled_catalog_is_consistent() {
        let seed = CatalogSeed::bundled().unwrap();
        assert_eq!(seed.treatments.len(), 6);
        assert_eq!(seed.clinics.len(), 5);
        assert_eq!(seed.clinic_treatments.len(), 15);

        let treatments: HashSet<_> = seed.treatments.iter().map(|t| &t.treatment_id).collect();
        let clinics: HashSet<_> = seed.clinics.iter().map(|c| &c.clinic_id).collect();
        let link_ids: HashSet<_> = seed.clinic_treatments.iter().map(|l| &l.id).collect();
        assert_eq!(link_ids.len(), seed.clinic_treatments.len());

        for link in &seed.clinic_treatments {
            assert!(treatments.contains(&link.treatment_id), "{}", link.id);
            assert!(clinics.contains(&link.clinic_id), "{}", link.id);
            assert!(link.price >= 0.0);
        }
    }

    #[tokio::test]
    async fn test_load_catalog_fills_created_at() {
        let db = Db::in_memory();
        let summary = load_catalog(&db, CatalogSeed::bundled().unwrap())
            .await
            .unwrap();
        assert_eq!(summary.clinics, 5);

        let clinic = db
            .get_clinic("dentistas-bilbao")
            .await
            .unwrap()
            .expect("seeded clinic");
        assert!(!clinic.created_at.is_empty());
    }
}
