use std::sync::Arc;

use axum::{
    http::{header, Method},
    middleware,
    routing::{get, post},
    Router,
};
use tower_http::cors::{Any, CorsLayer};
use tower_http::services::{ServeDir, ServeFile};

use crate::shared::config::{get_static_dir, Config, JwtSecret};
use crate::system;
use crate::system::auth::{gate::RouteGate, jwt::JwtKeys};
use crate::system::handlers::auth::AuthState;

/// Конфигурация всех роутов приложения
///
/// `/api` routes are registered directly; every other path falls through to
/// the static UI shell. The route gate wraps both.
pub fn configure_routes(config: &Config, secret: &JwtSecret) -> Router {
    let keys = JwtKeys::new(secret);
    let auth_state = Arc::new(AuthState::new(keys.clone(), config));
    let gate = Arc::new(RouteGate::new(keys, config.gate.asset_prefixes.clone()));

    // Client-side routing: unknown paths render the shell's index.html
    let static_dir = get_static_dir(config);
    let shell = ServeDir::new(&static_dir).fallback(ServeFile::new(static_dir.join("index.html")));

    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::DELETE,
            Method::OPTIONS,
        ])
        .allow_headers([header::CONTENT_TYPE, header::ACCEPT, header::AUTHORIZATION]);

    Router::new()
        .route("/api/health", get(|| async { "ok" }))
        // ========================================
        // AUTH ROUTES (PUBLIC, bypass the gate)
        // ========================================
        .route("/api/auth/login", post(system::handlers::auth::login))
        .route("/api/auth/logout", post(system::handlers::auth::logout))
        .with_state(auth_state)
        .fallback_service(shell)
        .layer(middleware::from_fn_with_state(
            gate,
            system::auth::middleware::route_gate,
        ))
        .layer(middleware::from_fn(
            system::middleware::request_logger::request_logger,
        ))
        .layer(cors)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shared::config::parse_config;
    use crate::system::auth::password::tests::quick_hash;
    use axum::{
        body::{to_bytes, Body},
        http::{HeaderMap, Request, StatusCode},
    };
    use contracts::system::auth::LoginResponse;
    use serde_json::json;
    use std::path::PathBuf;
    use tower::ServiceExt;

    const SHELL_HTML: &str = "<html>shell</html>";

    /// Per-test static dir with an index.html
    fn shell_dir(name: &str) -> PathBuf {
        let dir = std::env::temp_dir().join(format!(
            "route-gate-shell-{}-{}",
            std::process::id(),
            name
        ));
        std::fs::create_dir_all(&dir).unwrap();
        std::fs::write(dir.join("index.html"), SHELL_HTML).unwrap();
        dir
    }

    fn app(name: &str) -> Router {
        let config = parse_config(&format!(
            r#"
            [server]
            host = "127.0.0.1"
            port = 0
            static_dir = "{}"

            [auth]
            token_lifetime_hours = 1

            [[accounts]]
            id = 42
            username = "alice"
            role = 6
            password_hash = "{}"
            "#,
            shell_dir(name).display().to_string().replace('\\', "/"),
            quick_hash("alice-pass"),
        ))
        .unwrap();
        configure_routes(&config, &JwtSecret::new("test-secret"))
    }

    async fn send(app: Router, req: Request<Body>) -> (StatusCode, HeaderMap, String) {
        let response = app.oneshot(req).await.unwrap();
        let status = response.status();
        let headers = response.headers().clone();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        (status, headers, String::from_utf8_lossy(&bytes).to_string())
    }

    fn login_request(username: &str, password: &str) -> Request<Body> {
        Request::post("/api/auth/login")
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(
                json!({"username": username, "password": password}).to_string(),
            ))
            .unwrap()
    }

    #[tokio::test]
    async fn test_health_needs_no_token() {
        let (status, _, body) = send(
            app("health"),
            Request::get("/api/health").body(Body::empty()).unwrap(),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, "ok");
    }

    #[tokio::test]
    async fn test_login_page_served_without_token() {
        let (status, _, body) = send(
            app("login-page"),
            Request::get("/login").body(Body::empty()).unwrap(),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, SHELL_HTML);
    }

    #[tokio::test]
    async fn test_dashboard_without_token_redirects() {
        let (status, headers, _) = send(
            app("no-token"),
            Request::get("/dashboard/supplier/dashboard")
                .body(Body::empty())
                .unwrap(),
        )
        .await;
        assert_eq!(status, StatusCode::TEMPORARY_REDIRECT);
        assert_eq!(headers[header::LOCATION], "/login");
    }

    #[tokio::test]
    async fn test_assets_not_bypassed_by_default() {
        let app = app("assets");
        let assets = shell_dir("assets").join("assets");
        std::fs::create_dir_all(&assets).unwrap();
        std::fs::write(assets.join("x"), "asset").unwrap();

        for path in ["/assets/x", "/pkg/app.wasm", "/favicon.ico"] {
            let (status, headers, body) =
                send(app.clone(), Request::get(path).body(Body::empty()).unwrap()).await;
            assert_eq!(status, StatusCode::TEMPORARY_REDIRECT, "{path}");
            assert_eq!(headers[header::LOCATION], "/login");
            assert_ne!(body, "asset");
        }
    }

    #[tokio::test]
    async fn test_login_then_navigate() {
        let (status, headers, body) =
            send(app("login-flow"), login_request("alice", "alice-pass")).await;
        assert_eq!(status, StatusCode::OK);

        let login: LoginResponse = serde_json::from_str(&body).unwrap();
        assert_eq!(login.user.id, 42);
        assert_eq!(login.user.role, 6);

        let cookie = headers[header::SET_COOKIE].to_str().unwrap().to_string();
        assert!(cookie.starts_with(&format!("token={}", login.token)));
        assert!(cookie.contains("HttpOnly"));
        assert!(cookie.contains("Max-Age=3600"));

        // Cookie as the browser would send it
        let (status, _, body) = send(
            app("login-flow"),
            Request::get("/dashboard/supplier/dashboard")
                .header(header::COOKIE, format!("token={}", login.token))
                .body(Body::empty())
                .unwrap(),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, SHELL_HTML);

        let (status, _, body) = send(
            app("login-flow"),
            Request::get("/dashboard/retailer/dashboard")
                .header(header::AUTHORIZATION, format!("Bearer {}", login.token))
                .body(Body::empty())
                .unwrap(),
        )
        .await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(
            body,
            r#"{"error":"Unauthorized: You do not have access to this page."}"#
        );
    }

    #[tokio::test]
    async fn test_login_rejects_bad_credentials() {
        for (username, password) in [("alice", "wrong"), ("mallory", "alice-pass")] {
            let (status, headers, body) =
                send(app("bad-login"), login_request(username, password)).await;
            assert_eq!(status, StatusCode::UNAUTHORIZED);
            assert!(headers.get(header::SET_COOKIE).is_none());
            assert_eq!(body, r#"{"error":"Invalid username or password"}"#);
        }
    }

    #[tokio::test]
    async fn test_logout_clears_cookie() {
        let (status, headers, _) = send(
            app("logout"),
            Request::post("/api/auth/logout").body(Body::empty()).unwrap(),
        )
        .await;
        assert_eq!(status, StatusCode::NO_CONTENT);
        let cookie = headers[header::SET_COOKIE].to_str().unwrap();
        assert!(cookie.starts_with("token=;"));
        assert!(cookie.contains("Max-Age=0"));
    }
}
