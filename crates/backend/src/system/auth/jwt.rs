use std::collections::HashSet;

use anyhow::{Context, Result};
use chrono::Utc;
use contracts::system::auth::TokenClaims;
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde_json::Value;
use thiserror::Error;

use crate::shared::config::JwtSecret;

#[derive(Debug, Error)]
pub enum TokenError {
    /// Bad signature, expired, or not a JWT at all
    #[error("token verification failed: {0}")]
    Verification(#[from] jsonwebtoken::errors::Error),
    #[error("token payload field `{0}` is missing or has the wrong type")]
    InvalidPayload(&'static str),
}

/// Signing and verification keys derived from the shared secret
#[derive(Clone)]
pub struct JwtKeys {
    encoding: EncodingKey,
    decoding: DecodingKey,
    validation: Validation,
}

impl JwtKeys {
    pub fn new(secret: &JwtSecret) -> Self {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.algorithms = vec![Algorithm::HS256, Algorithm::HS384, Algorithm::HS512];
        // exp/nbf are checked when present but not required; no clock skew allowance
        validation.required_spec_claims = HashSet::new();
        validation.validate_nbf = true;
        validation.leeway = 0;
        validation.validate_aud = false;

        Self {
            encoding: EncodingKey::from_secret(secret.as_bytes()),
            decoding: DecodingKey::from_secret(secret.as_bytes()),
            validation,
        }
    }
}

/// Generate an HS256 access token
pub fn generate_access_token(
    keys: &JwtKeys,
    user_id: i64,
    username: &str,
    role: i64,
    lifetime_hours: i64,
) -> Result<String> {
    let now = Utc::now();
    let exp = (now + chrono::Duration::hours(lifetime_hours)).timestamp();

    let claims = TokenClaims {
        sub: user_id,
        username: username.to_string(),
        role,
        exp: Some(exp),
        iat: Some(now.timestamp()),
    };

    encode(&Header::default(), &claims, &keys.encoding).context("Failed to encode JWT token")
}

/// Verify the signature and extract claims
pub fn validate_token(keys: &JwtKeys, token: &str) -> Result<TokenClaims, TokenError> {
    let token_data = decode::<Value>(token, &keys.decoding, &keys.validation)?;
    claims_from_payload(&token_data.claims)
}

/// Registered time claims: optional, but numeric when present
const TIME_CLAIMS: [&str; 3] = ["exp", "nbf", "iat"];

/// `sub` and `role` must be integral JSON numbers (`42` or `42.0`), `username`
/// a JSON string. Strings that look like numbers are rejected.
pub fn claims_from_payload(payload: &Value) -> Result<TokenClaims, TokenError> {
    let object = payload
        .as_object()
        .ok_or(TokenError::InvalidPayload("payload"))?;

    let sub = object
        .get("sub")
        .and_then(as_integral)
        .ok_or(TokenError::InvalidPayload("sub"))?;
    let username = object
        .get("username")
        .and_then(Value::as_str)
        .ok_or(TokenError::InvalidPayload("username"))?;
    let role = object
        .get("role")
        .and_then(as_integral)
        .ok_or(TokenError::InvalidPayload("role"))?;

    for claim in TIME_CLAIMS {
        if object.get(claim).is_some_and(|v| !v.is_number()) {
            return Err(TokenError::InvalidPayload(claim));
        }
    }

    Ok(TokenClaims {
        sub,
        username: username.to_string(),
        role,
        exp: object.get("exp").and_then(Value::as_f64).map(|v| v as i64),
        iat: object.get("iat").and_then(Value::as_f64).map(|v| v as i64),
    })
}

/// Integer value of a JSON number without a fractional part
fn as_integral(value: &Value) -> Option<i64> {
    if let Some(n) = value.as_i64() {
        return Some(n);
    }
    let f = value.as_f64()?;
    // i64::MAX as f64 rounds up to 2^63, which itself does not fit
    if f.fract() == 0.0 && f >= i64::MIN as f64 && f < i64::MAX as f64 {
        Some(f as i64)
    } else {
        None
    }
}
