//! Authentication handlers

use axum::{
    extract::State,
    http::{header, HeaderMap, StatusCode},
    response::IntoResponse,
    Extension, Json,
};

use super::AppState;
use crate::models::{ApiResponse, LoginRequest, UserAccount, UserResponse};

/// Session cookie name
pub const SESSION_COOKIE: &str = "fiscaliza_session";

/// Log in and set the session cookie.
pub async fn login(
    State(state): State<AppState>,
    Json(input): Json<LoginRequest>,
) -> impl IntoResponse {
    match state
        .users
        .authenticate(&input.username, &input.password)
        .await
    {
        Some(user) => {
            let token = state.sessions.issue(user.id).await;
            tracing::info!("User {} logged in", user.username);

            let cookie = format!(
                "{}={}; Path=/; HttpOnly; SameSite=Strict; Max-Age={}",
                SESSION_COOKIE,
                token,
                state.session_expiry_hours * 3600
            );
            (
                StatusCode::OK,
                [(header::SET_COOKIE, cookie)],
                Json(ApiResponse::success(UserResponse::from(user))),
            )
        }
        None => (
            StatusCode::UNAUTHORIZED,
            [(header::SET_COOKIE, String::new())],
            Json(ApiResponse::error("Invalid username or password")),
        ),
    }
}

/// Log out: revoke the session and clear the cookie.
pub async fn logout(State(state): State<AppState>, headers: HeaderMap) -> impl IntoResponse {
    if let Some(token) = extract_session_token(&headers) {
        state.sessions.revoke(&token).await;
    }

    let cookie = format!(
        "{}=; Path=/; HttpOnly; SameSite=Strict; Max-Age=0",
        SESSION_COOKIE
    );
    (
        StatusCode::OK,
        [(header::SET_COOKIE, cookie)],
        Json(ApiResponse::success(())),
    )
}

/// Current session's account.
pub async fn get_session_user(Extension(user): Extension<UserAccount>) -> impl IntoResponse {
    (
        StatusCode::OK,
        Json(ApiResponse::success(UserResponse::from(user))),
    )
}

/// Resolve the acting account behind a request, if any.
pub async fn current_user(state: &AppState, headers: &HeaderMap) -> Option<UserAccount> {
    let token = extract_session_token(headers)?;
    let user_id = state.sessions.validate(&token).await?;
    state.users.get(user_id).await.ok()
}

pub fn extract_session_token(headers: &HeaderMap) -> Option<String> {
    let cookie_header = headers.get(header::COOKIE)?.to_str().ok()?;

    for cookie in cookie_header.split(';') {
        let cookie = cookie.trim();
        if let Some(value) = cookie.strip_prefix(&format!("{}=", SESSION_COOKIE)) {
            return Some(value.to_string());
        }
    }

    None
}
