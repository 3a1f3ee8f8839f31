use std::sync::Arc;

use axum::{
    extract::{Json, State},
    http::{header, StatusCode},
    response::{IntoResponse, Response},
};
use contracts::enums::user_role::UserRole;
use contracts::system::auth::{
    ErrorResponse, LoginRequest, LoginResponse, UserInfo, INVALID_CREDENTIALS_MESSAGE,
};
use thiserror::Error;

use crate::shared::config::{AccountConfig, Config};
use crate::system::auth::gate::TOKEN_COOKIE;
use crate::system::auth::{jwt, jwt::JwtKeys, password};

/// State shared by the login/logout handlers
pub struct AuthState {
    keys: JwtKeys,
    accounts: Vec<AccountConfig>,
    token_lifetime_hours: i64,
    cookie_secure: bool,
}

impl AuthState {
    pub fn new(keys: JwtKeys, config: &Config) -> Self {
        Self {
            keys,
            accounts: config.accounts.clone(),
            token_lifetime_hours: config.auth.token_lifetime_hours,
            cookie_secure: config.auth.cookie_secure,
        }
    }

    fn find_account(&self, username: &str) -> Option<&AccountConfig> {
        self.accounts.iter().find(|a| a.username == username)
    }

    fn cookie(&self, value: &str, max_age_secs: i64) -> String {
        let mut cookie = format!(
            "{}={}; Path=/; HttpOnly; SameSite=Lax; Max-Age={}",
            TOKEN_COOKIE, value, max_age_secs
        );
        if self.cookie_secure {
            cookie.push_str("; Secure");
        }
        cookie
    }
}

#[derive(Debug, Error)]
pub enum LoginError {
    #[error("invalid credentials")]
    InvalidCredentials,
    #[error(transparent)]
    Internal(#[from] anyhow::Error),
}

impl IntoResponse for LoginError {
    fn into_response(self) -> Response {
        match self {
            LoginError::InvalidCredentials => (
                StatusCode::UNAUTHORIZED,
                Json(ErrorResponse::new(INVALID_CREDENTIALS_MESSAGE)),
            )
                .into_response(),
            LoginError::Internal(e) => {
                tracing::error!("Login failed: {:#}", e);
                StatusCode::INTERNAL_SERVER_ERROR.into_response()
            }
        }
    }
}

/// Login handler: issues a token and sets the `token` cookie
pub async fn login(
    State(state): State<Arc<AuthState>>,
    Json(request): Json<LoginRequest>,
) -> Result<Response, LoginError> {
    let Some(account) = state.find_account(&request.username) else {
        tracing::info!(username = %request.username, "Login rejected: unknown user");
        return Err(LoginError::InvalidCredentials);
    };

    if !password::verify_password(&request.password, &account.password_hash)? {
        tracing::info!(username = %request.username, "Login rejected: wrong password");
        return Err(LoginError::InvalidCredentials);
    }

    let token = jwt::generate_access_token(
        &state.keys,
        account.id,
        &account.username,
        account.role,
        state.token_lifetime_hours,
    )?;
    tracing::info!(
        sub = account.id,
        role = account.role,
        role_name = UserRole::from_code(account.role).map(|r| r.display_name()),
        "User logged in"
    );

    let cookie = state.cookie(&token, state.token_lifetime_hours * 3600);
    let body = LoginResponse {
        token,
        user: UserInfo {
            id: account.id,
            username: account.username.clone(),
            role: account.role,
        },
    };

    Ok(([(header::SET_COOKIE, cookie)], Json(body)).into_response())
}

/// Logout handler: expires the `token` cookie
pub async fn logout(State(state): State<Arc<AuthState>>) -> impl IntoResponse {
    (
        StatusCode::NO_CONTENT,
        [(header::SET_COOKIE, state.cookie("", 0))],
    )
}
