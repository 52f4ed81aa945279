// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Catalogue reads: clinic search, clinic detail, city list, treatments.
//!
//! Clinic search is a fixed pipeline:
//! 1. fetch clinics by city/rating from the store,
//! 2. without a treatment filter, return them as-is,
//! 3. with one, keep only clinics offering it and attach its price/duration,
//! 4. then drop clinics whose price falls outside the inclusive bounds.
//!
//! Price bounds are ignored unless a treatment filter is present.

use crate::db::{ClinicQuery, Db};
use crate::error::{AppError, Result};
use crate::models::{
    Clinic, ClinicDetail, ClinicTreatment, ClinicView, Treatment, TreatmentOffering,
};
use futures_util::future::try_join_all;
use std::collections::{BTreeSet, HashMap};

/// Clinic search filters.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SearchFilters {
    pub city: Option<String>,
    pub min_rating: Option<f64>,
    pub treatment_id: Option<String>,
    pub min_price: Option<f64>,
    pub max_price: Option<f64>,
}

/// Inclusive price range; either end may be open.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct PriceBounds {
    pub min: Option<f64>,
    pub max: Option<f64>,
}

impl PriceBounds {
    pub fn is_set(&self) -> bool {
        self.min.is_some() || self.max.is_some()
    }

    pub fn contains(&self, price: f64) -> bool {
        self.min.map_or(true, |min| price >= min) && self.max.map_or(true, |max| price <= max)
    }
}

/// Keep clinics that offer the treatment described by `links` and attach the
/// offering's price and duration. Clinic order is preserved; with several
/// links for one clinic the last one wins.
pub fn attach_treatment(clinics: Vec<Clinic>, links: &[ClinicTreatment]) -> Vec<ClinicView> {
    let by_clinic: HashMap<&str, &ClinicTreatment> = links
        .iter()
        .map(|link| (link.clinic_id.as_str(), link))
        .collect();

    clinics
        .into_iter()
        .filter_map(|clinic| {
            let link = by_clinic.get(clinic.clinic_id.as_str())?;
            Some(ClinicView {
                treatment_price: Some(link.price),
                treatment_duration: Some(link.duration_days),
                clinic,
            })
        })
        .collect()
}

/// Drop views without a treatment price or whose price is out of bounds.
/// A no-op when no bound is set.
pub fn apply_price_bounds(views: Vec<ClinicView>, bounds: PriceBounds) -> Vec<ClinicView> {
    if !bounds.is_set() {
        return views;
    }

    views
        .into_iter()
        .filter(|v| v.treatment_price.is_some_and(|p| bounds.contains(p)))
        .collect()
}

/// Distinct city names in lexicographic order.
pub fn distinct_sorted(cities: impl IntoIterator<Item = String>) -> Vec<String> {
    cities.into_iter().collect::<BTreeSet<_>>().into_iter().collect()
}

/// Read-side catalogue operations.
#[derive(Clone)]
pub struct CatalogService {
    db: Db,
}

impl CatalogService {
    pub fn new(db: Db) -> Self {
        Self { db }
    }

    pub async fn list_treatments(&self) -> Result<Vec<Treatment>> {
        self.db.list_treatments().await
    }

    pub async fn get_treatment(&self, treatment_id: &str) -> Result<Treatment> {
        self.db
            .get_treatment(treatment_id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Treatment {} not found", treatment_id)))
    }

    /// Search clinics.
    pub async fn search(&self, filters: &SearchFilters) -> Result<Vec<ClinicView>> {
        let query = ClinicQuery {
            city: filters.city.clone(),
            min_rating: filters.min_rating,
        };
        let clinics = self.db.query_clinics(&query).await?;

        let Some(treatment_id) = filters.treatment_id.as_deref() else {
            return Ok(clinics.into_iter().map(ClinicView::from).collect());
        };

        let links = self.db.links_for_treatment(treatment_id).await?;
        let views = attach_treatment(clinics, &links);
        let bounds = PriceBounds {
            min: filters.min_price,
            max: filters.max_price,
        };

        let views = apply_price_bounds(views, bounds);
        tracing::debug!(
            treatment_id,
            links = links.len(),
            results = views.len(),
            "Clinic search with treatment filter"
        );
        Ok(views)
    }

    /// A clinic with all treatments it offers.
    ///
    /// Offerings whose treatment no longer exists are left out.
    pub async fn clinic_detail(&self, clinic_id: &str) -> Result<ClinicDetail> {
        let clinic = self
            .db
            .get_clinic(clinic_id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Clinic {} not found", clinic_id)))?;

        let links = self.db.links_for_clinic(clinic_id).await?;
        let treatments = try_join_all(links.into_iter().map(|link| async move {
            let treatment = self.db.get_treatment(&link.treatment_id).await?;
            if treatment.is_none() {
                tracing::debug!(
                    clinic_id = %link.clinic_id,
                    treatment_id = %link.treatment_id,
                    "Skipping offering of missing treatment"
                );
            }
            Ok::<_, AppError>(treatment.map(|t| TreatmentOffering::new(t, link)))
        }))
        .await?
        .into_iter()
        .flatten()
        .collect();

        Ok(ClinicDetail { clinic, treatments })
    }

    /// Distinct clinic cities, sorted.
    pub async fn list_cities(&self) -> Result<Vec<String>> {
        Ok(distinct_sorted(self.db.clinic_cities().await?))
    }
}
