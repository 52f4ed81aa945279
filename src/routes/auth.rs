// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Authentication routes: password accounts, delegated login, logout.

use axum::{
    extract::State,
    routing::{get, post},
    Extension, Json, Router,
};
use axum_extra::extract::{cookie::CookieJar, WithRejection};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
#[cfg(feature = "binding-generation")]
use ts_rs::TS;
use validator::Validate;

use crate::error::{AppError, Result};
use crate::ids::new_user_id;
use crate::middleware::auth::{removal_cookie, session_cookie, CurrentUser, SESSION_COOKIE};
use crate::models::User;
use crate::services::password::{hash_password, verify_password};
use crate::time_utils::format_utc_rfc3339;
use crate::AppState;

/// Auth routes reachable without a credential.
pub fn routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/auth/register", post(register))
        .route("/auth/login", post(login))
        .route("/auth/session", post(exchange_session))
        .route("/auth/logout", post(logout))
}

/// Auth routes that need [`crate::middleware::require_auth`].
pub fn protected_routes() -> Router<Arc<AppState>> {
    Router::new().route("/auth/me", get(me))
}

#[derive(Debug, Deserialize, Validate)]
pub struct RegisterRequest {
    #[validate(email(message = "invalid email address"))]
    pub email: String,
    #[validate(length(min = 1, message = "password must not be empty"))]
    pub password: String,
    #[validate(length(min = 1, message = "name must not be empty"))]
    pub name: String,
}

#[derive(Debug, Deserialize, Validate)]
pub struct LoginRequest {
    #[validate(length(min = 1))]
    pub email: String,
    #[validate(length(min = 1))]
    pub password: String,
}

/// Delegated login request. A missing ID is rejected by the broker.
#[derive(Debug, Deserialize)]
pub struct SessionRequest {
    #[serde(default, alias = "externalSessionId")]
    pub session_id: String,
}

/// Profile plus credential, returned by every login flavour.
#[derive(Debug, Serialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct AuthResponse {
    pub user_id: String,
    pub email: String,
    pub name: String,
    pub picture: Option<String>,
    pub token: String,
}

impl AuthResponse {
    fn new(user: User, token: String) -> Self {
        Self {
            user_id: user.user_id,
            email: user.email,
            name: user.name,
            picture: user.picture,
            token,
        }
    }
}

#[derive(Debug, Serialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct UserResponse {
    pub user_id: String,
    pub email: String,
    pub name: String,
    pub picture: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct MessageResponse {
    pub message: String,
}

fn validation_error(err: validator::ValidationErrors) -> AppError {
    AppError::BadRequest(err.to_string())
}

/// Create a password account and sign it in.
///
/// Email uniqueness is best-effort: the lookup and the insert are separate
/// store calls with no transaction, so two concurrent registrations for the
/// same address can both succeed.
async fn register(
    State(state): State<Arc<AppState>>,
    jar: CookieJar,
    WithRejection(Json(body), _): WithRejection<Json<RegisterRequest>, AppError>,
) -> Result<(CookieJar, Json<AuthResponse>)> {
    body.validate().map_err(validation_error)?;

    if state.db.find_user_by_email(&body.email).await?.is_some() {
        return Err(AppError::Conflict("Email already registered".to_string()));
    }

    let password = body.password;
    let password_hash = tokio::task::spawn_blocking(move || hash_password(&password))
        .await
        .map_err(|e| AppError::Internal(anyhow::anyhow!("hashing task failed: {}", e)))??;

    let user = User {
        user_id: new_user_id()?,
        email: body.email,
        name: body.name,
        picture: None,
        password_hash: Some(password_hash),
        created_at: format_utc_rfc3339(chrono::Utc::now()),
    };
    state.db.upsert_user(&user).await?;

    let token = state.tokens.issue(&user.user_id)?;
    tracing::info!(user_id = %user.user_id, "Registered password account");

    Ok((
        jar.add(session_cookie(token.clone())),
        Json(AuthResponse::new(user, token)),
    ))
}

/// Password login. Unknown email and wrong password look the same.
async fn login(
    State(state): State<Arc<AppState>>,
    jar: CookieJar,
    WithRejection(Json(body), _): WithRejection<Json<LoginRequest>, AppError>,
) -> Result<(CookieJar, Json<AuthResponse>)> {
    body.validate().map_err(validation_error)?;

    let invalid = || AppError::Unauthenticated("invalid credentials");

    let user = state
        .db
        .find_user_by_email(&body.email)
        .await?
        .ok_or_else(invalid)?;

    // Accounts created by delegated login have no password.
    let Some(stored_hash) = user.password_hash.clone() else {
        return Err(invalid());
    };

    let password = body.password;
    let verified = tokio::task::spawn_blocking(move || verify_password(&password, &stored_hash))
        .await
        .map_err(|e| AppError::Internal(anyhow::anyhow!("verify task failed: {}", e)))?;
    if !verified {
        return Err(invalid());
    }

    let token = state.tokens.issue(&user.user_id)?;
    tracing::info!(user_id = %user.user_id, "Password login");

    Ok((
        jar.add(session_cookie(token.clone())),
        Json(AuthResponse::new(user, token)),
    ))
}

/// Exchange an identity-provider session for a local one.
async fn exchange_session(
    State(state): State<Arc<AppState>>,
    jar: CookieJar,
    WithRejection(Json(body), _): WithRejection<Json<SessionRequest>, AppError>,
) -> Result<(CookieJar, Json<AuthResponse>)> {
    let login = state.identity.exchange(&body.session_id).await?;

    Ok((
        jar.add(session_cookie(login.session_token.clone())),
        Json(AuthResponse::new(login.user, login.session_token)),
    ))
}

async fn me(Extension(CurrentUser(user)): Extension<CurrentUser>) -> Json<UserResponse> {
    Json(UserResponse {
        user_id: user.user_id,
        email: user.email,
        name: user.name,
        picture: user.picture,
    })
}

/// Drop the opaque session named by the cookie, if any, and clear the cookie.
///
/// Always succeeds; a failed delete is only logged.
async fn logout(State(state): State<Arc<AppState>>, jar: CookieJar) -> (CookieJar, Json<MessageResponse>) {
    if let Some(token) = jar.get(SESSION_COOKIE).map(|c| c.value().to_string()) {
        if !token.is_empty() {
            if let Err(e) = state.db.delete_session(&token).await {
                tracing::warn!(error = %e, "Failed to delete session on logout");
            }
        }
    }

    (
        jar.add(removal_cookie()),
        Json(MessageResponse {
            message: "Logged out successfully".to_string(),
        }),
    )
}
