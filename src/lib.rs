// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! DentiCompare: find and compare dental treatments across clinics
//!
//! This crate provides the backend API for browsing the clinic catalogue,
//! comparing treatment offers side by side, and authenticating users by
//! password or through a delegated identity provider.

pub mod config;
pub mod db;
pub mod error;
pub mod ids;
pub mod middleware;
pub mod models;
pub mod routes;
pub mod services;
pub mod time_utils;

use config::Config;
use db::Db;
use services::{
    CatalogService, CompareService, IdentityClient, IdentityService, SessionResolver, TokenIssuer,
};

/// Shared application state.
pub struct AppState {
    pub config: Config,
    pub db: Db,
    pub tokens: TokenIssuer,
    pub sessions: SessionResolver,
    pub identity: IdentityService,
    pub catalog: CatalogService,
    pub compare: CompareService,
}

impl AppState {
    /// Wire every service onto one store handle.
    pub fn new(config: Config, db: Db) -> anyhow::Result<Self> {
        let tokens = TokenIssuer::new(&config.jwt_signing_key);
        let client = IdentityClient::new(
            config.identity_provider_url.clone(),
            config.identity_provider_timeout,
        )?;

        Ok(Self {
            sessions: SessionResolver::new(db.clone(), tokens.clone()),
            identity: IdentityService::new(client, db.clone()),
            catalog: CatalogService::new(db.clone()),
            compare: CompareService::new(db.clone()),
            tokens,
            db,
            config,
        })
    }
}
