// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Catalogue seeding route, mounted only when enabled in config.

use crate::error::Result;
use crate::services::seed::{load_catalog, CatalogSeed, SeedSummary};
use crate::AppState;
use axum::{extract::State, routing::post, Json, Router};
use serde::Serialize;
use std::sync::Arc;

pub fn routes() -> Router<Arc<AppState>> {
    Router::new().route("/seed", post(seed))
}

#[derive(Debug, Serialize)]
pub struct SeedResponse {
    pub message: String,
    #[serde(flatten)]
    pub summary: SeedSummary,
}

/// Replace the catalogue with the bundled sample data.
async fn seed(State(state): State<Arc<AppState>>) -> Result<Json<SeedResponse>> {
    let summary = load_catalog(&state.db, CatalogSeed::bundled()?).await?;

    Ok(Json(SeedResponse {
        message: "Database seeded successfully".to_string(),
        summary,
    }))
}
