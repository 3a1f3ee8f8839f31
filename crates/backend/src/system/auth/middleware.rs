use std::sync::Arc;

use axum::{
    body::Body,
    extract::{Request, State},
    http::{HeaderValue, StatusCode},
    middleware::Next,
    response::{IntoResponse, Redirect, Response},
    Json,
};
use contracts::system::auth::{ErrorResponse, UNAUTHORIZED_PAGE_MESSAGE};

use super::gate::{self, GateDecision, RouteGate};

pub const USER_ID_HEADER: &str = "x-user-id";
pub const USER_ROLE_HEADER: &str = "x-user-role";

/// Middleware that gates every page of the UI shell by role
pub async fn route_gate(
    State(gate): State<Arc<RouteGate>>,
    mut req: Request<Body>,
    next: Next,
) -> Response {
    // Identity headers are only ever set by the gate
    req.headers_mut().remove(USER_ID_HEADER);
    req.headers_mut().remove(USER_ROLE_HEADER);

    let credential = gate::extract_token(req.headers());
    let decision = gate.evaluate(req.uri().path(), credential.as_ref());

    match decision {
        GateDecision::Pass(_) => next.run(req).await,
        GateDecision::Forward(claims) => {
            req.headers_mut()
                .insert(USER_ID_HEADER, HeaderValue::from(claims.sub));
            req.headers_mut()
                .insert(USER_ROLE_HEADER, HeaderValue::from(claims.role));
            next.run(req).await
        }
        GateDecision::RedirectToLogin(_) => Redirect::temporary(gate::LOGIN_PATH).into_response(),
        GateDecision::Deny { .. } => (
            StatusCode::NOT_FOUND,
            Json(ErrorResponse::new(UNAUTHORIZED_PAGE_MESSAGE)),
        )
            .into_response(),
    }
}
