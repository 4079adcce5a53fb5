//! Middleware for authentication and security headers

use axum::{
    body::Body,
    extract::State,
    http::{header, HeaderValue, Request, StatusCode},
    middleware::Next,
    response::{IntoResponse, Response},
};
use serde_json::json;

use super::auth::current_user;
use super::AppState;
use crate::models::UserRole;

/// Authenticated account extracted by middleware, available via
/// `Extension<UserAccount>`.
pub async fn require_session(
    State(state): State<AppState>,
    request: Request<Body>,
    next: Next,
) -> Response {
    let user = match current_user(&state, request.headers()).await {
        Some(user) => user,
        None => {
            return (
                StatusCode::UNAUTHORIZED,
                axum::Json(json!({"success": false, "error": "Not authenticated"})),
            )
                .into_response();
        }
    };

    let mut request = request;
    request.extensions_mut().insert(user);
    next.run(request).await
}

/// Same as [`require_session`], restricted to administrator accounts.
pub async fn require_admin(
    State(state): State<AppState>,
    request: Request<Body>,
    next: Next,
) -> Response {
    let user = match current_user(&state, request.headers()).await {
        Some(user) => user,
        None => {
            return (
                StatusCode::UNAUTHORIZED,
                axum::Json(json!({"success": false, "error": "Not authenticated"})),
            )
                .into_response();
        }
    };

    if user.role != UserRole::Admin {
        return (
            StatusCode::FORBIDDEN,
            axum::Json(json!({"success": false, "error": "Admin privileges required"})),
        )
            .into_response();
    }

    let mut request = request;
    request.extensions_mut().insert(user);
    next.run(request).await
}

/// Security headers middleware
pub async fn security_headers(
    State(state): State<AppState>,
    request: Request<Body>,
    next: Next,
) -> Response {
    let mut response = next.run(request).await;
    let headers = response.headers_mut();

    headers.insert("X-Frame-Options", HeaderValue::from_static("DENY"));
    headers.insert(
        "X-Content-Type-Options",
        HeaderValue::from_static("nosniff"),
    );
    headers.insert(
        "Referrer-Policy",
        HeaderValue::from_static("strict-origin-when-cross-origin"),
    );

    if state.is_production {
        headers.insert(
            header::STRICT_TRANSPORT_SECURITY,
            HeaderValue::from_static("max-age=63072000; includeSubDomains"),
        );
    }

    response
}
