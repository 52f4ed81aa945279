// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Random identifiers for users and opaque sessions.

use ring::rand::{SecureRandom, SystemRandom};

/// `prefix` followed by `bytes` random bytes as lowercase hex.
fn random_hex_id(prefix: &str, bytes: usize) -> anyhow::Result<String> {
    let mut buf = vec![0u8; bytes];
    SystemRandom::new()
        .fill(&mut buf)
        .map_err(|_| anyhow::anyhow!("system random source unavailable"))?;
    Ok(format!("{}{}", prefix, hex::encode(buf)))
}

/// New user identifier, e.g. `user_3f2a9c01b7de`.
pub fn new_user_id() -> anyhow::Result<String> {
    random_hex_id("user_", 6)
}

/// New opaque session token, e.g. `session_<32 hex chars>`.
pub fn new_session_token() -> anyhow::Result<String> {
    random_hex_id("session_", 16)
}
