// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! User and session models for storage and API.

use serde::{Deserialize, Serialize};

/// User account stored in the `users` collection.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct User {
    /// Server-generated identifier (`user_<hex>`), also the document ID
    pub user_id: String,
    /// Email address, unique across users (case-sensitive as stored)
    pub email: String,
    /// Display name
    pub name: String,
    /// Profile picture URL
    #[serde(default)]
    pub picture: Option<String>,
    /// Argon2 PHC string; absent for delegated-login-only accounts
    #[serde(default, rename = "password", skip_serializing_if = "Option::is_none")]
    pub password_hash: Option<String>,
    /// When the account was created (RFC3339)
    pub created_at: String,
}

/// Opaque server-side session created by delegated login.
///
/// Stored in the `user_sessions` collection keyed by `session_token`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Session {
    pub session_token: String,
    pub user_id: String,
    /// Expiry instant (RFC3339; timezone-less values are read as UTC)
    pub expires_at: String,
    pub created_at: String,
}
