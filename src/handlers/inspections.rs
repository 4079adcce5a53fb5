//! Inspection-record handlers

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
    Extension, Json,
};
use uuid::Uuid;

use super::AppState;
use crate::models::{
    AddFollowUp, AddPhoto, ApiResponse, CreateInspection, EnforcementAction, FollowUp,
    Inspection, InspectionStatus, Photo, UpdateInspection, UserAccount,
};
use crate::presentation::{action_icon, status_presentation};
use crate::report::{matches_filter, ListFilter};
use crate::store::StoreError;
use crate::validation::{validate_create_inspection, validate_follow_up, validate_photo};

/// List records, newest first, optionally narrowed by the text/status
/// filters of the list screen.
pub async fn list_inspections(
    State(state): State<AppState>,
    Extension(_user): Extension<UserAccount>,
    Query(filter): Query<ListFilter>,
) -> impl IntoResponse {
    let records: Vec<Inspection> = state
        .store
        .list()
        .await
        .into_iter()
        .filter(|i| matches_filter(i, &filter))
        .collect();
    (StatusCode::OK, Json(ApiResponse::success(records)))
}

/// Open a new case.
pub async fn create_inspection(
    State(state): State<AppState>,
    Extension(user): Extension<UserAccount>,
    Json(input): Json<CreateInspection>,
) -> impl IntoResponse {
    if let Err(e) = validate_create_inspection(&input) {
        return (
            StatusCode::BAD_REQUEST,
            Json(ApiResponse::<Inspection>::error(e.to_string())),
        );
    }

    match state.store.create(input, &user.name).await {
        Ok(created) => {
            // Best-effort external archive; never fails the intake.
            if let Some(ref archive) = state.archive {
                archive.record_case(&created).await;
            }

            tracing::info!("User {} opened inspection {}", user.username, created.protocol);
            (StatusCode::CREATED, Json(ApiResponse::success(created)))
        }
        Err(e @ StoreError::Validation(_)) => (
            StatusCode::BAD_REQUEST,
            Json(ApiResponse::error(e.to_string())),
        ),
        Err(StoreError::NotFound) => (
            StatusCode::NOT_FOUND,
            Json(ApiResponse::error("Inspection not found")),
        ),
    }
}

pub async fn get_inspection(
    State(state): State<AppState>,
    Extension(_user): Extension<UserAccount>,
    Path(id): Path<Uuid>,
) -> impl IntoResponse {
    match state.store.get(id).await {
        Ok(inspection) => (StatusCode::OK, Json(ApiResponse::success(inspection))),
        Err(StoreError::NotFound) => (
            StatusCode::NOT_FOUND,
            Json(ApiResponse::error("Inspection not found")),
        ),
        Err(e) => (
            StatusCode::BAD_REQUEST,
            Json(ApiResponse::error(e.to_string())),
        ),
    }
}

/// Save the edit surface: status, inspector, findings report, actions and
/// verified infractions. The store synthesizes the audit entries.
pub async fn update_inspection(
    State(state): State<AppState>,
    Extension(user): Extension<UserAccount>,
    Path(id): Path<Uuid>,
    Json(input): Json<UpdateInspection>,
) -> impl IntoResponse {
    match state.store.update(id, input, &user.name).await {
        Ok(updated) => {
            tracing::info!("User {} updated inspection {}", user.username, updated.protocol);
            (StatusCode::OK, Json(ApiResponse::success(updated)))
        }
        Err(StoreError::NotFound) => (
            StatusCode::NOT_FOUND,
            Json(ApiResponse::error("Inspection not found")),
        ),
        Err(e) => (
            StatusCode::BAD_REQUEST,
            Json(ApiResponse::error(e.to_string())),
        ),
    }
}

pub async fn add_photo(
    State(state): State<AppState>,
    Extension(user): Extension<UserAccount>,
    Path(id): Path<Uuid>,
    Json(input): Json<AddPhoto>,
) -> impl IntoResponse {
    if let Err(e) = validate_photo(&input) {
        return (
            StatusCode::BAD_REQUEST,
            Json(ApiResponse::<Photo>::error(e.to_string())),
        );
    }

    match state.store.add_photo(id, input, &user.name).await {
        Ok(photo) => (StatusCode::CREATED, Json(ApiResponse::success(photo))),
        Err(StoreError::NotFound) => (
            StatusCode::NOT_FOUND,
            Json(ApiResponse::error("Inspection not found")),
        ),
        Err(e) => (
            StatusCode::BAD_REQUEST,
            Json(ApiResponse::error(e.to_string())),
        ),
    }
}

pub async fn add_follow_up(
    State(state): State<AppState>,
    Extension(user): Extension<UserAccount>,
    Path(id): Path<Uuid>,
    Json(input): Json<AddFollowUp>,
) -> impl IntoResponse {
    if let Err(e) = validate_follow_up(&input) {
        return (
            StatusCode::BAD_REQUEST,
            Json(ApiResponse::<FollowUp>::error(e.to_string())),
        );
    }

    match state.store.add_follow_up(id, input, &user.name).await {
        Ok(follow_up) => (StatusCode::CREATED, Json(ApiResponse::success(follow_up))),
        Err(StoreError::NotFound) => (
            StatusCode::NOT_FOUND,
            Json(ApiResponse::error("Inspection not found")),
        ),
        Err(e) => (
            StatusCode::BAD_REQUEST,
            Json(ApiResponse::error(e.to_string())),
        ),
    }
}

/// Presentation map for the domain enums: one table for every view that
/// decorates statuses and actions (badges, dropdowns, report theming).
pub async fn presentation_map(
    Extension(_user): Extension<UserAccount>,
) -> impl IntoResponse {
    let statuses: Vec<_> = InspectionStatus::ALL
        .iter()
        .map(|status| {
            let badge = status_presentation(*status);
            serde_json::json!({
                "status": status,
                "label": status.label(),
                "icon": badge.icon,
                "background": badge.background,
                "foreground": badge.foreground,
            })
        })
        .collect();

    let actions: Vec<_> = EnforcementAction::ALL
        .iter()
        .map(|action| {
            serde_json::json!({
                "action": action,
                "label": action.label(),
                "icon": action_icon(*action),
            })
        })
        .collect();

    (
        StatusCode::OK,
        Json(ApiResponse::success(serde_json::json!({
            "statuses": statuses,
            "actions": actions,
        }))),
    )
}

/// Run the external summarizer over the findings report and store the
/// result. The summarizer itself never fails; it degrades to placeholder
/// text, which is stored like any other summary.
pub async fn summarize_report(
    State(state): State<AppState>,
    Extension(user): Extension<UserAccount>,
    Path(id): Path<Uuid>,
) -> impl IntoResponse {
    let inspection = match state.store.get(id).await {
        Ok(i) => i,
        Err(_) => {
            return (
                StatusCode::NOT_FOUND,
                Json(ApiResponse::<Inspection>::error("Inspection not found")),
            );
        }
    };

    let report = inspection.report.unwrap_or_default();
    if report.trim().is_empty() {
        return (
            StatusCode::BAD_REQUEST,
            Json(ApiResponse::error("The findings report is empty")),
        );
    }

    let summary = state.summarizer.summarize(&report).await;
    let changes = UpdateInspection {
        report_summary: Some(summary),
        ..Default::default()
    };
    match state.store.update(id, changes, &user.name).await {
        Ok(updated) => (StatusCode::OK, Json(ApiResponse::success(updated))),
        Err(StoreError::NotFound) => (
            StatusCode::NOT_FOUND,
            Json(ApiResponse::error("Inspection not found")),
        ),
        Err(e) => (
            StatusCode::BAD_REQUEST,
            Json(ApiResponse::error(e.to_string())),
        ),
    }
}
