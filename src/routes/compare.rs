// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Treatment comparison route.

use crate::error::{AppError, Result};
use crate::models::ComparisonResult;
use crate::AppState;
use axum::{extract::State, routing::post, Json, Router};
use axum_extra::extract::WithRejection;
use serde::Deserialize;
use std::sync::Arc;

pub fn routes() -> Router<Arc<AppState>> {
    Router::new().route("/compare", post(compare))
}

#[derive(Debug, Deserialize)]
pub struct CompareRequest {
    #[serde(alias = "clinicIds")]
    pub clinic_ids: Vec<String>,
    #[serde(alias = "treatmentId")]
    pub treatment_id: String,
}

async fn compare(
    State(state): State<Arc<AppState>>,
    WithRejection(Json(body), _): WithRejection<Json<CompareRequest>, AppError>,
) -> Result<Json<ComparisonResult>> {
    let result = state
        .compare
        .compare(&body.clinic_ids, &body.treatment_id)
        .await?;
    Ok(Json(result))
}
