//! User-management handlers (admin only)

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    Extension, Json,
};
use uuid::Uuid;

use super::AppState;
use crate::models::{ApiResponse, CreateUser, UpdateUser, UserAccount, UserResponse};
use crate::store::users::UserError;

fn user_error_status(error: &UserError) -> StatusCode {
    match error {
        UserError::NotFound => StatusCode::NOT_FOUND,
        UserError::DuplicateUsername | UserError::MissingPassword => StatusCode::BAD_REQUEST,
        UserError::Hashing => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

pub async fn list_users(
    State(state): State<AppState>,
    Extension(_admin): Extension<UserAccount>,
) -> impl IntoResponse {
    let users: Vec<UserResponse> = state
        .users
        .list()
        .await
        .into_iter()
        .map(UserResponse::from)
        .collect();
    (StatusCode::OK, Json(ApiResponse::success(users)))
}

pub async fn create_user(
    State(state): State<AppState>,
    Extension(admin): Extension<UserAccount>,
    Json(input): Json<CreateUser>,
) -> impl IntoResponse {
    match state.users.create(input).await {
        Ok(user) => {
            tracing::info!("Admin {} created user {}", admin.username, user.username);
            (
                StatusCode::CREATED,
                Json(ApiResponse::success(UserResponse::from(user))),
            )
        }
        Err(e) => {
            if matches!(e, UserError::Hashing) {
                tracing::error!("Failed to hash password for new user: {}", e);
            }
            (user_error_status(&e), Json(ApiResponse::error(e.to_string())))
        }
    }
}

pub async fn update_user(
    State(state): State<AppState>,
    Extension(admin): Extension<UserAccount>,
    Path(id): Path<Uuid>,
    Json(input): Json<UpdateUser>,
) -> impl IntoResponse {
    match state.users.update(id, input).await {
        Ok(user) => {
            tracing::info!("Admin {} updated user {}", admin.username, user.username);
            (
                StatusCode::OK,
                Json(ApiResponse::success(UserResponse::from(user))),
            )
        }
        Err(e) => (user_error_status(&e), Json(ApiResponse::error(e.to_string()))),
    }
}

pub async fn delete_user(
    State(state): State<AppState>,
    Extension(admin): Extension<UserAccount>,
    Path(id): Path<Uuid>,
) -> impl IntoResponse {
    match state.users.delete(id).await {
        Ok(()) => {
            tracing::info!("Admin {} deleted user {}", admin.username, id);
            (StatusCode::OK, Json(ApiResponse::success(())))
        }
        Err(e) => (user_error_status(&e), Json(ApiResponse::error(e.to_string()))),
    }
}
