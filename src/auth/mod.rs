//! Bearer-token issuance and verification.
//!
//! Tokens are HS256-signed JWTs carrying the caller's name, a unique token id
//! and an optional admin flag. The paired issuer ([`issue_token`]) is a
//! DEMO-ONLY stand-in for a real identity provider: it signs whatever name
//! and admin flag the caller asks for, with a year-long expiry and no
//! revocation. Do not ship it facing the public internet.

use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::config::SecurityConfig;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    /// Subject -- the caller-supplied display name.
    pub sub: String,
    /// Unique token identifier.
    pub jti: Uuid,
    /// Role claim. Absent (or false) means a non-admin caller; there is no
    /// intermediate role.
    #[serde(default, skip_serializing_if = "is_false")]
    pub admin: bool,
    pub iss: String,
    pub iat: i64,
    pub exp: i64,
}

fn is_false(v: &bool) -> bool {
    !*v
}

#[derive(Debug, thiserror::Error)]
pub enum TokenError {
    #[error("token rejected: {0}")]
    Invalid(#[from] jsonwebtoken::errors::Error),
    #[error("signing key not configured")]
    MissingKey,
}

/// Sign a fresh token for `name`, optionally carrying the admin role.
pub fn issue_token(
    name: &str,
    admin: bool,
    security: &SecurityConfig,
) -> Result<String, TokenError> {
    if security.signing_key.is_empty() {
        return Err(TokenError::MissingKey);
    }

    let now = Utc::now();
    let claims = Claims {
        sub: name.to_string(),
        jti: Uuid::new_v4(),
        admin,
        iss: security.issuer.clone(),
        iat: now.timestamp(),
        exp: (now + Duration::days(security.token_expiry_days)).timestamp(),
    };

    let key = EncodingKey::from_secret(security.signing_key.as_bytes());
    Ok(encode(&Header::default(), &claims, &key)?)
}

/// Verify signature, expiry and issuer, returning the embedded [`Claims`].
pub fn validate_token(token: &str, security: &SecurityConfig) -> Result<Claims, TokenError> {
    if security.signing_key.is_empty() {
        return Err(TokenError::MissingKey);
    }

    let key = DecodingKey::from_secret(security.signing_key.as_bytes());
    let mut validation = Validation::default(); // HS256, validates exp
    validation.set_issuer(&[&security.issuer]);

    let data = decode::<Claims>(token, &key, &validation)?;
    Ok(data.claims)
}
