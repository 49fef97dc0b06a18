//! Access-token inspection
//!
//! The client never holds the signing key, so tokens are decoded without
//! signature verification and only used to predict expiry. The server stays
//! the authority: an opaque or undecodable token is treated as "unknown
//! expiry" and simply sent.

use chrono::{DateTime, Duration, TimeZone, Utc};
use jsonwebtoken::{decode, DecodingKey, Validation};
use serde::{Deserialize, Serialize};

/// Claims the client cares about
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccessClaims {
    /// Subject (user ID)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sub: Option<String>,
    /// Expiration time (Unix timestamp)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub exp: Option<i64>,
    /// Issued at (Unix timestamp)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub iat: Option<i64>,
    /// Token type as issued by the API ("access" / "refresh")
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub token_type: Option<String>,
}

impl AccessClaims {
    /// Expiration as a timestamp
    #[must_use]
    pub fn expires_at(&self) -> Option<DateTime<Utc>> {
        self.exp.and_then(|exp| Utc.timestamp_opt(exp, 0).single())
    }
}

/// Reads expiry information from bearer tokens
#[derive(Debug, Clone)]
pub struct TokenInspector {
    skew: Duration,
    validation: Validation,
}

impl TokenInspector {
    /// Create an inspector that treats tokens expiring within `skew` as expired
    #[must_use]
    pub fn new(skew: std::time::Duration) -> Self {
        let mut validation = Validation::default();
        validation.insecure_disable_signature_validation();
        validation.validate_exp = false;
        validation.validate_aud = false;
        validation.required_spec_claims.clear();

        Self {
            skew: Duration::from_std(skew).unwrap_or_else(|_| Duration::zero()),
            validation,
        }
    }

    /// Decode claims, or `None` for opaque tokens
    #[must_use]
    pub fn claims(&self, token: &str) -> Option<AccessClaims> {
        decode::<AccessClaims>(token, &DecodingKey::from_secret(&[]), &self.validation)
            .ok()
            .map(|data| data.claims)
    }

    /// Expiration time, if the token carries one
    #[must_use]
    pub fn expires_at(&self, token: &str) -> Option<DateTime<Utc>> {
        self.claims(token).and_then(|claims| claims.expires_at())
    }

    /// Check if the token is known to be expired (or about to be) right now
    #[must_use]
    pub fn is_expired(&self, token: &str) -> bool {
        self.is_expired_at(token, Utc::now())
    }

    /// Check if the token is known to be expired at `now`
    #[must_use]
    pub fn is_expired_at(&self, token: &str, now: DateTime<Utc>) -> bool {
        self.expires_at(token)
            .is_some_and(|expires_at| expires_at - self.skew <= now)
    }
}

impl Default for TokenInspector {
    fn default() -> Self {
        Self::new(std::time::Duration::from_secs(30))
    }
}
