use axum::extract::State;
use axum::Json;

use crate::api::v1::dto::sync::{SyncReportData, SyncRunRequest, SyncTestResponse};
use crate::api::v1::response::{ApiError, ApiResponse};
use crate::api::AppState;

/// `POST /api/v1/sync:run`
#[utoipa::path(
    post,
    path = "/api/v1/sync:run",
    tag = "sync",
    request_body = SyncRunRequest,
    responses(
        (status = 200, description = "Sync report", body = SyncReportData),
        (status = 401, description = "Missing or invalid API key", body = ApiError),
        (status = 501, description = "Retrieval service not configured", body = ApiError),
    )
)]
pub async fn run_sync(
    State(state): State<AppState>,
    Json(req): Json<SyncRunRequest>,
) -> ApiResponse<SyncReportData> {
    match state.sync.sync_posts(req.limit).await {
        Ok(report) => ApiResponse::success(SyncReportData::from(report)),
        Err(e) => ApiResponse::from(e),
    }
}

/// `POST /api/v1/sync:test`
#[utoipa::path(
    post,
    path = "/api/v1/sync:test",
    tag = "sync",
    responses(
        (status = 200, description = "Connection test result", body = SyncTestResponse),
        (status = 401, description = "Missing or invalid API key", body = ApiError),
        (status = 501, description = "Retrieval service not configured", body = ApiError),
    )
)]
pub async fn test_sync(State(state): State<AppState>) -> ApiResponse<SyncTestResponse> {
    match state.sync.test_connection().await {
        Ok(message) => ApiResponse::success(SyncTestResponse { message }),
        Err(e) => ApiResponse::from(e),
    }
}
