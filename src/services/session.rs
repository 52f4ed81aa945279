// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Resolve a request credential to the authenticated user.
//!
//! A credential is either a signed bearer token (password logins) or an
//! opaque session token (delegated logins). Callers do not know which one
//! they hold, so resolution always tries, in order:
//!
//! 1. Signed-token verification, then a user lookup by the embedded ID.
//!    A bad/expired token or an unknown user falls through to step 2.
//! 2. Session lookup by exact token match.
//! 3. Session expiry check against the current clock (naive timestamps are UTC).
//! 4. User lookup by the session's user ID.

use crate::db::Db;
use crate::error::AppError;
use crate::models::User;
use crate::services::token::{TokenError, TokenIssuer};
use crate::time_utils::parse_stored_timestamp;
use chrono::{DateTime, Utc};

/// Why a credential did not resolve to a user.
#[derive(Debug, thiserror::Error)]
pub enum AuthError {
    #[error("no credential")]
    NoCredential,
    #[error("session not found")]
    SessionNotFound,
    #[error("session expired")]
    SessionExpired,
    #[error("user not found")]
    UserNotFound,
    /// The store failed; this is not an authentication outcome.
    #[error(transparent)]
    Store(#[from] AppError),
}

impl AuthError {
    fn reason(&self) -> &'static str {
        match self {
            AuthError::NoCredential => "no credential",
            AuthError::SessionNotFound => "session not found",
            AuthError::SessionExpired => "session expired",
            AuthError::UserNotFound => "user not found",
            AuthError::Store(_) => "store error",
        }
    }
}

impl From<AuthError> for AppError {
    fn from(err: AuthError) -> Self {
        match err {
            AuthError::Store(inner) => inner,
            other => AppError::Unauthenticated(other.reason()),
        }
    }
}

/// Dual-mode credential resolver.
#[derive(Clone)]
pub struct SessionResolver {
    db: Db,
    tokens: TokenIssuer,
}

impl SessionResolver {
    pub fn new(db: Db, tokens: TokenIssuer) -> Self {
        Self { db, tokens }
    }

    /// Resolve an optional credential; `None` fails immediately.
    pub async fn resolve(&self, credential: Option<&str>) -> Result<User, AuthError> {
        match credential {
            Some(c) if !c.is_empty() => self.resolve_at(c, Utc::now()).await,
            _ => Err(AuthError::NoCredential),
        }
    }

    /// Resolve a credential against an explicit clock.
    pub async fn resolve_at(&self, credential: &str, now: DateTime<Utc>) -> Result<User, AuthError> {
        // 1. Signed token
        match self.tokens.verify_at(credential, now) {
            Ok(user_id) => {
                if let Some(user) = self.db.get_user(&user_id).await? {
                    return Ok(user);
                }
                tracing::debug!(user_id = %user_id, "Token user missing, trying session lookup");
            }
            Err(TokenError::Expired) => {
                tracing::debug!("Signed token expired, trying session lookup");
            }
            Err(TokenError::Invalid) => {}
        }

        // 2. Opaque session
        let session = self
            .db
            .get_session(credential)
            .await?
            .ok_or(AuthError::SessionNotFound)?;

        // 3. Expiry; an unreadable expiry counts as expired
        let expires_at = parse_stored_timestamp(&session.expires_at).ok_or_else(|| {
            tracing::warn!(
                user_id = %session.user_id,
                expires_at = %session.expires_at,
                "Session has unparseable expiry"
            );
            AuthError::SessionExpired
        })?;
        if now >= expires_at {
            return Err(AuthError::SessionExpired);
        }

        // 4. Owner
        self.db
            .get_user(&session.user_id)
            .await?
            .ok_or(AuthError::UserNotFound)
    }
}
