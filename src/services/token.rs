// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Signed bearer tokens for password logins (HS256 JWT).

use chrono::{DateTime, Duration, Utc};
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};

/// How long an issued token stays valid.
pub const TOKEN_VALIDITY_DAYS: i64 = 7;

/// JWT claims structure.
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Claims {
    /// Subject (user ID)
    pub sub: String,
    /// Expiration time (Unix timestamp)
    pub exp: i64,
    /// Issued at (Unix timestamp)
    pub iat: i64,
}

/// Token verification failures.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum TokenError {
    #[error("token expired")]
    Expired,
    #[error("token invalid")]
    Invalid,
}

/// Issues and verifies tokens with the process-wide signing key.
#[derive(Clone)]
pub struct TokenIssuer {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
}

impl TokenIssuer {
    pub fn new(signing_key: &[u8]) -> Self {
        Self {
            encoding_key: EncodingKey::from_secret(signing_key),
            decoding_key: DecodingKey::from_secret(signing_key),
        }
    }

    /// Issue a token for `user_id`, valid for [`TOKEN_VALIDITY_DAYS`].
    pub fn issue(&self, user_id: &str) -> anyhow::Result<String> {
        self.issue_at(user_id, Utc::now())
    }

    pub fn issue_at(&self, user_id: &str, now: DateTime<Utc>) -> anyhow::Result<String> {
        let iat = now.timestamp();
        let claims = Claims {
            sub: user_id.to_string(),
            iat,
            exp: iat + Duration::days(TOKEN_VALIDITY_DAYS).num_seconds(),
        };

        Ok(encode(
            &Header::new(Algorithm::HS256),
            &claims,
            &self.encoding_key,
        )?)
    }

    /// Verify a token and return the user ID it carries.
    pub fn verify(&self, token: &str) -> Result<String, TokenError> {
        self.verify_at(token, Utc::now())
    }

    /// Verify against an explicit clock. A token is accepted up to and
    /// including its expiry instant.
    pub fn verify_at(&self, token: &str, now: DateTime<Utc>) -> Result<String, TokenError> {
        let mut validation = Validation::new(Algorithm::HS256);
        // Expiry is checked below against `now` rather than the library clock.
        validation.validate_exp = false;

        let data =
            decode::<Claims>(token, &self.decoding_key, &validation).map_err(|_| TokenError::Invalid)?;

        let expiry = DateTime::from_timestamp(data.claims.exp, 0).ok_or(TokenError::Invalid)?;
        if now > expiry {
            return Err(TokenError::Expired);
        }
        if data.claims.sub.is_empty() {
            return Err(TokenError::Invalid);
        }

        Ok(data.claims.sub)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    const KEY: &[u8] = b"test_signing_key_32_bytes_long!!";

    #[test]
    fn test_issue_then_verify() {
        let issuer = TokenIssuer::new(KEY);
        let token = issuer.issue("user_abc123").unwrap();
        assert_eq!(issuer.verify(&token), Ok("user_abc123".to_string()));
    }

    #[test]
    fn test_expiry_boundary() {
        let issuer = TokenIssuer::new(KEY);
        let issued = Utc.with_ymd_and_hms(2026, 1, 1, 12, 0, 0).unwrap();
        let token = issuer.issue_at("user_1", issued).unwrap();
        let expiry = issued + Duration::days(TOKEN_VALIDITY_DAYS);

        assert!(issuer.verify_at(&token, expiry - Duration::seconds(1)).is_ok());
        assert!(issuer.verify_at(&token, expiry).is_ok());
        for late in [Duration::milliseconds(500), Duration::seconds(1)] {
            assert_eq!(
                issuer.verify_at(&token, expiry + late),
                Err(TokenError::Expired)
            );
        }
    }

    #[test]
    fn test_wrong_key_is_invalid() {
        let token = TokenIssuer::new(KEY).issue("user_1").unwrap();
        let other = TokenIssuer::new(b"another_signing_key_entirely!!!!");
        assert_eq!(other.verify(&token), Err(TokenError::Invalid));
    }

    #[test]
    fn test_garbage_is_invalid() {
        let issuer = TokenIssuer::new(KEY);
        for input in ["", "session_0123456789abcdef", "a.b.c", "invalid.token.here"] {
            assert_eq!(issuer.verify(input), Err(TokenError::Invalid), "{input:?}");
        }
    }

    #[test]
    fn test_token_without_exp_is_invalid() {
        #[derive(Serialize)]
        struct NoExp {
            sub: String,
        }
        let token = encode(
            &Header::new(Algorithm::HS256),
            &NoExp {
                sub: "user_1".to_string(),
            },
            &EncodingKey::from_secret(KEY),
        )
        .unwrap();

        assert_eq!(
            TokenIssuer::new(KEY).verify(&token),
            Err(TokenError::Invalid)
        );
    }
}
