use serde::{Deserialize, Serialize};

/// Body returned with the 404 when a signed-in user opens a page outside
/// their role's allowlist.
pub const UNAUTHORIZED_PAGE_MESSAGE: &str = "Unauthorized: You do not have access to this page.";

pub const INVALID_CREDENTIALS_MESSAGE: &str = "Invalid username or password";

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoginResponse {
    pub token: String,
    pub user: UserInfo,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserInfo {
    pub id: i64,
    pub username: String,
    pub role: i64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenClaims {
    pub sub: i64, // user_id
    pub username: String,
    pub role: i64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub exp: Option<i64>, // expiration timestamp
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub iat: Option<i64>, // issued at
}

/// JSON error body shared by the gate and the auth API
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
}

impl ErrorResponse {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            error: message.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_response_shape() {
        let body = serde_json::to_string(&ErrorResponse::new(UNAUTHORIZED_PAGE_MESSAGE)).unwrap();
        assert_eq!(
            body,
            r#"{"error":"Unauthorized: You do not have access to this page."}"#
        );
    }

    #[test]
    fn test_claims_without_timestamps() {
        let claims: TokenClaims =
            serde_json::from_str(r#"{"sub":42,"username":"alice","role":6}"#).unwrap();
        assert_eq!(claims.exp, None);
        assert_eq!(claims.iat, None);
        assert_eq!(
            serde_json::to_value(&claims).unwrap(),
            serde_json::json!({"sub": 42, "username": "alice", "role": 6})
        );
    }
}
