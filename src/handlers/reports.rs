//! Report/export download handlers

use axum::{
    body::Body,
    extract::{Path, Query, State},
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    Extension,
};
use chrono::NaiveDate;
use serde::Deserialize;
use uuid::Uuid;

use super::AppState;
use crate::models::{ApiResponse, Inspection, InspectionStatus, UserAccount};
use crate::report::{
    self, detail, in_date_range, matches_filter, ListFilter, ReportFormat,
};

#[derive(Debug, Deserialize)]
pub struct ListReportQuery {
    pub format: ReportFormat,
    pub search: Option<String>,
    pub status: Option<InspectionStatus>,
    pub start: Option<NaiveDate>,
    pub end: Option<NaiveDate>,
}

/// Case-list report download in the requested format. The subset is either
/// the filtered list (same filters as the list screen) or an inclusive
/// creation-date period.
pub async fn list_report(
    State(state): State<AppState>,
    Extension(user): Extension<UserAccount>,
    Query(query): Query<ListReportQuery>,
) -> Response {
    let records = state.store.list().await;

    let subset: Vec<Inspection> = match (query.start, query.end) {
        (Some(start), Some(end)) => records
            .into_iter()
            .filter(|i| in_date_range(i, start, end))
            .collect(),
        (None, None) => {
            let filter = ListFilter {
                search: query.search.clone(),
                status: query.status,
            };
            records
                .into_iter()
                .filter(|i| matches_filter(i, &filter))
                .collect()
        }
        _ => {
            return error_response(
                StatusCode::BAD_REQUEST,
                "Both start and end dates are required for a period report",
            );
        }
    };

    let payload = match query.format {
        ReportFormat::Pdf => report::pdf::render(&subset),
        ReportFormat::Csv => Ok(report::csv::render(&subset).into_bytes()),
        ReportFormat::Xlsx => report::xlsx::render(&subset),
        ReportFormat::Doc => Ok(report::doc::render(&subset).into_bytes()),
    };

    match payload {
        Ok(bytes) => {
            tracing::info!(
                "User {} exported {} records as {}",
                user.username,
                subset.len(),
                query.format.file_name()
            );
            download_response(query.format.content_type(), query.format.file_name(), bytes)
        }
        Err(e) => {
            tracing::error!("Failed to generate list report: {}", e);
            error_response(
                StatusCode::INTERNAL_SERVER_ERROR,
                "Failed to generate report",
            )
        }
    }
}

/// Paginated detail dossier of a single record.
pub async fn detail_report(
    State(state): State<AppState>,
    Extension(user): Extension<UserAccount>,
    Path(id): Path<Uuid>,
) -> Response {
    let inspection = match state.store.get(id).await {
        Ok(i) => i,
        Err(_) => return error_response(StatusCode::NOT_FOUND, "Inspection not found"),
    };

    match detail::render(&inspection) {
        Ok(bytes) => {
            tracing::info!(
                "User {} exported the dossier of {}",
                user.username,
                inspection.protocol
            );
            download_response("application/pdf", &detail::file_name(&inspection), bytes)
        }
        Err(e) => {
            tracing::error!(
                "Failed to generate the dossier of {}: {}",
                inspection.protocol,
                e
            );
            error_response(
                StatusCode::INTERNAL_SERVER_ERROR,
                "Failed to generate report",
            )
        }
    }
}

fn download_response(content_type: &str, file_name: &str, bytes: Vec<u8>) -> Response {
    Response::builder()
        .status(StatusCode::OK)
        .header(header::CONTENT_TYPE, content_type)
        .header(
            header::CONTENT_DISPOSITION,
            format!("attachment; filename=\"{}\"", file_name),
        )
        .body(Body::from(bytes))
        .unwrap()
}

fn error_response(status: StatusCode, message: &str) -> Response {
    (status, axum::Json(ApiResponse::<()>::error(message))).into_response()
}
