//! Route gate: decides per request whether the UI shell may be served.
//!
//! Order of checks:
//! 1. bypassed prefixes (`/api`, `/auth`, configured asset prefixes)
//! 2. public pages (`/login`, `/signup`)
//! 3. token presence, then signature and payload shape
//! 4. role allowlist
//!
//! Token problems end in a redirect to the login page, allowlist misses end
//! in a 404 so that protected pages are indistinguishable from missing ones.

use axum::http::{header, HeaderMap};
use contracts::system::auth::TokenClaims;

use super::access;
use super::jwt::{self, JwtKeys};

pub const LOGIN_PATH: &str = "/login";
pub const TOKEN_COOKIE: &str = "token";

const BYPASS_PREFIXES: [&str; 2] = ["/api", "/auth"];
const PUBLIC_PREFIXES: [&str; 2] = ["/login", "/signup"];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenSource {
    Header,
    Cookie,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Credential {
    pub token: String,
    pub source: TokenSource,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PassReason {
    Bypass,
    Asset,
    Public,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RedirectReason {
    MissingToken,
    InvalidToken,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GateDecision {
    /// Forward without looking at credentials
    Pass(PassReason),
    /// Forward with the caller's identity attached
    Forward(TokenClaims),
    RedirectToLogin(RedirectReason),
    /// Valid token, path outside the role's allowlist
    Deny { role: i64 },
}

/// `Authorization: Bearer` wins over the `token` cookie.
/// Empty tokens count as absent.
pub fn extract_token(headers: &HeaderMap) -> Option<Credential> {
    let bearer = headers
        .get(header::AUTHORIZATION)
        .and_then(|h| h.to_str().ok())
        .and_then(|value| value.strip_prefix("Bearer "))
        .map(str::trim)
        .filter(|token| !token.is_empty());
    if let Some(token) = bearer {
        return Some(Credential {
            token: token.to_string(),
            source: TokenSource::Header,
        });
    }

    headers
        .get_all(header::COOKIE)
        .iter()
        .filter_map(|h| h.to_str().ok())
        .flat_map(|cookies| cookies.split(';'))
        .filter_map(|pair| pair.trim().split_once('='))
        .find(|(name, value)| *name == TOKEN_COOKIE && !value.is_empty())
        .map(|(_, value)| Credential {
            token: value.to_string(),
            source: TokenSource::Cookie,
        })
}

pub struct RouteGate {
    keys: JwtKeys,
    asset_prefixes: Vec<String>,
}

impl RouteGate {
    pub fn new(keys: JwtKeys, asset_prefixes: Vec<String>) -> Self {
        Self {
            keys,
            asset_prefixes,
        }
    }

    fn pass_reason(&self, path: &str) -> Option<PassReason> {
        if BYPASS_PREFIXES.iter().any(|p| path.starts_with(p)) {
            Some(PassReason::Bypass)
        } else if self.asset_prefixes.iter().any(|p| path.starts_with(p.as_str())) {
            Some(PassReason::Asset)
        } else if PUBLIC_PREFIXES.iter().any(|p| path.starts_with(p)) {
            Some(PassReason::Public)
        } else {
            None
        }
    }

    pub fn evaluate(&self, path: &str, credential: Option<&Credential>) -> GateDecision {
        tracing::debug!(path, "gate: incoming request");

        if let Some(reason) = self.pass_reason(path) {
            tracing::debug!(path, ?reason, "gate: forwarded without checks");
            return GateDecision::Pass(reason);
        }

        let Some(credential) = credential else {
            tracing::debug!(path, "gate: no token, redirecting to login");
            return GateDecision::RedirectToLogin(RedirectReason::MissingToken);
        };
        tracing::debug!(path, source = ?credential.source, "gate: token present");

        let claims = match jwt::validate_token(&self.keys, &credential.token) {
            Ok(claims) => claims,
            Err(e) => {
                tracing::info!(path, error = %e, "gate: rejected token, redirecting to login");
                return GateDecision::RedirectToLogin(RedirectReason::InvalidToken);
            }
        };
        tracing::debug!(
            sub = claims.sub,
            username = %claims.username,
            role = claims.role,
            "gate: token payload"
        );

        let prefixes = access::allowed_prefixes(claims.role);
        tracing::debug!(role = claims.role, allowed = ?prefixes, "gate: resolved allowlist");

        if access::is_path_allowed(&prefixes, path) {
            tracing::debug!(path, sub = claims.sub, "gate: access granted");
            GateDecision::Forward(claims)
        } else {
            tracing::info!(
                path,
                sub = claims.sub,
                role = claims.role,
                "gate: path outside role allowlist"
            );
            GateDecision::Deny { role: claims.role }
        }
    }
}
