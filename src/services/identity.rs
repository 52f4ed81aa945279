// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Delegated login through the third-party identity provider.
//!
//! Handles:
//! - Exchanging an external session ID for a verified profile
//! - Creating or refreshing the local user for that email
//! - Opening a local opaque session (fixed 7-day lifetime)

use crate::db::Db;
use crate::error::AppError;
use crate::ids::{new_session_token, new_user_id};
use crate::models::{Session, User};
use crate::time_utils::format_utc_rfc3339;
use chrono::{DateTime, Duration, Utc};
use serde::Deserialize;

/// Lifetime of a session opened by delegated login.
pub const SESSION_VALIDITY_DAYS: i64 = 7;

/// Header carrying the external session ID.
const SESSION_ID_HEADER: &str = "X-Session-ID";

/// Verified profile returned by the identity provider.
#[derive(Debug, Clone, Deserialize)]
pub struct ExternalIdentity {
    pub email: String,
    pub name: String,
    #[serde(default)]
    pub picture: Option<String>,
    /// Session token suggested by the provider
    #[serde(default)]
    pub session_token: Option<String>,
}

/// Identity provider HTTP client.
#[derive(Clone)]
pub struct IdentityClient {
    http: reqwest::Client,
    endpoint: String,
}

impl IdentityClient {
    /// Create a client whose every call is bounded by `timeout`.
    pub fn new(endpoint: String, timeout: std::time::Duration) -> anyhow::Result<Self> {
        let http = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| anyhow::anyhow!("failed building identity HTTP client: {}", e))?;

        Ok(Self { http, endpoint })
    }

    /// Fetch the verified profile for an external session.
    ///
    /// Transport errors, timeouts, non-2xx statuses and unreadable bodies all
    /// map to [`AppError::ExternalAuth`].
    pub async fn fetch_identity(&self, session_id: &str) -> Result<ExternalIdentity, AppError> {
        let response = self
            .http
            .get(&self.endpoint)
            .header(SESSION_ID_HEADER, session_id)
            .send()
            .await
            .map_err(|e| {
                let kind = if e.is_timeout() { "timeout" } else { "transport" };
                AppError::ExternalAuth(format!("identity provider {}: {}", kind, e))
            })?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            tracing::warn!(status = %status, body = %body, "Identity provider rejected session");
            return Err(AppError::ExternalAuth(format!(
                "identity provider returned {}",
                status
            )));
        }

        let identity: ExternalIdentity = response
            .json()
            .await
            .map_err(|e| AppError::ExternalAuth(format!("unreadable identity response: {}", e)))?;

        if identity.email.is_empty() {
            return Err(AppError::ExternalAuth(
                "identity response has no email".to_string(),
            ));
        }

        Ok(identity)
    }
}

/// Result of a successful delegated login.
#[derive(Debug, Clone)]
pub struct DelegatedLogin {
    pub user: User,
    /// The opaque session token actually stored
    pub session_token: String,
}

/// Turns external sessions into local users and sessions.
#[derive(Clone)]
pub struct IdentityService {
    client: IdentityClient,
    db: Db,
}

impl IdentityService {
    pub fn new(client: IdentityClient, db: Db) -> Self {
        Self { client, db }
    }

    /// Exchange an external session ID for a local user and session.
    pub async fn exchange(&self, external_session_id: &str) -> Result<DelegatedLogin, AppError> {
        self.exchange_at(external_session_id, Utc::now()).await
    }

    pub async fn exchange_at(
        &self,
        external_session_id: &str,
        now: DateTime<Utc>,
    ) -> Result<DelegatedLogin, AppError> {
        if external_session_id.trim().is_empty() {
            return Err(AppError::BadRequest("session_id is required".to_string()));
        }

        let identity = self.client.fetch_identity(external_session_id).await?;
        let now_str = format_utc_rfc3339(now);

        let user = match self.db.find_user_by_email(&identity.email).await? {
            Some(mut existing) => {
                existing.name = identity.name.clone();
                existing.picture = identity.picture.clone();
                self.db.upsert_user(&existing).await?;
                tracing::info!(user_id = %existing.user_id, "Delegated login for existing user");
                existing
            }
            None => {
                let user = User {
                    user_id: new_user_id()?,
                    email: identity.email.clone(),
                    name: identity.name.clone(),
                    picture: identity.picture.clone(),
                    password_hash: None,
                    created_at: now_str.clone(),
                };
                self.db.upsert_user(&user).await?;
                tracing::info!(user_id = %user.user_id, "Created user from delegated login");
                user
            }
        };

        let session_token = match identity.session_token {
            Some(token) if !token.is_empty() => token,
            _ => new_session_token()?,
        };

        let session = Session {
            session_token: session_token.clone(),
            user_id: user.user_id.clone(),
            expires_at: format_utc_rfc3339(now + Duration::days(SESSION_VALIDITY_DAYS)),
            created_at: now_str,
        };
        self.db.insert_session(&session).await?;

        Ok(DelegatedLogin {
            user,
            session_token,
        })
    }
}
