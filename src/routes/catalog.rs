// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Public catalogue routes: treatments, clinics, cities.

use crate::error::{AppError, Result};
use crate::models::{ClinicDetail, ClinicView, Treatment};
use crate::services::SearchFilters;
use crate::AppState;
use axum::{
    extract::{Path, Query, State},
    routing::get,
    Json, Router,
};
use serde::Deserialize;
use std::sync::Arc;

pub fn routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/treatments", get(list_treatments))
        .route("/treatments/{treatment_id}", get(get_treatment))
        .route("/clinics", get(search_clinics))
        .route("/clinics/{clinic_id}", get(get_clinic))
        .route("/cities", get(list_cities))
}

/// Raw clinic search parameters. Numbers are parsed by hand so that empty
/// values count as absent rather than as a rejection.
#[derive(Debug, Default, Deserialize)]
pub struct ClinicSearchParams {
    pub city: Option<String>,
    pub treatment_id: Option<String>,
    pub min_price: Option<String>,
    pub max_price: Option<String>,
    pub min_rating: Option<String>,
}

fn non_empty(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

fn parse_number(name: &str, value: Option<String>) -> Result<Option<f64>> {
    let Some(raw) = non_empty(value) else {
        return Ok(None);
    };
    match raw.parse::<f64>() {
        Ok(n) if n.is_finite() => Ok(Some(n)),
        _ => Err(AppError::BadRequest(format!(
            "{} must be a number, got '{}'",
            name, raw
        ))),
    }
}

impl TryFrom<ClinicSearchParams> for SearchFilters {
    type Error = AppError;

    fn try_from(params: ClinicSearchParams) -> Result<Self> {
        Ok(SearchFilters {
            city: non_empty(params.city),
            treatment_id: non_empty(params.treatment_id),
            min_price: parse_number("min_price", params.min_price)?,
            max_price: parse_number("max_price", params.max_price)?,
            min_rating: parse_number("min_rating", params.min_rating)?,
        })
    }
}

async fn list_treatments(State(state): State<Arc<AppState>>) -> Result<Json<Vec<Treatment>>> {
    Ok(Json(state.catalog.list_treatments().await?))
}

async fn get_treatment(
    State(state): State<Arc<AppState>>,
    Path(treatment_id): Path<String>,
) -> Result<Json<Treatment>> {
    Ok(Json(state.catalog.get_treatment(&treatment_id).await?))
}

async fn search_clinics(
    State(state): State<Arc<AppState>>,
    Query(params): Query<ClinicSearchParams>,
) -> Result<Json<Vec<ClinicView>>> {
    let filters = SearchFilters::try_from(params)?;
    Ok(Json(state.catalog.search(&filters).await?))
}

async fn get_clinic(
    State(state): State<Arc<AppState>>,
    Path(clinic_id): Path<String>,
) -> Result<Json<ClinicDetail>> {
    Ok(Json(state.catalog.clinic_detail(&clinic_id).await?))
}

async fn list_cities(State(state): State<Arc<AppState>>) -> Result<Json<Vec<String>>> {
    Ok(Json(state.catalog.list_cities().await?))
}
