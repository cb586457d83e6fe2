use axum::extract::State;
use axum::Json;

use crate::api::v1::dto::import::{
    ImportPreviewRequest, ImportPreviewResponse, ImportReportData, ImportRunRequest,
    ImportTestResponse, ImportedPostData,
};
use crate::api::v1::response::{ApiError, ApiResponse};
use crate::api::AppState;

/// `POST /api/v1/import:test`
#[utoipa::path(
    post,
    path = "/api/v1/import:test",
    tag = "import",
    request_body = ImportPreviewRequest,
    responses(
        (status = 200, description = "Connection test result", body = ImportTestResponse),
        (status = 400, description = "Invalid source", body = ApiError),
        (status = 401, description = "Missing or invalid API key", body = ApiError),
    )
)]
pub async fn test_import(
    State(state): State<AppState>,
    Json(req): Json<ImportPreviewRequest>,
) -> ApiResponse<ImportTestResponse> {
    match state.importer.test_connection(&req.source_url).await {
        Ok(message) => ApiResponse::success(ImportTestResponse { message }),
        Err(e) => ApiResponse::from(e),
    }
}

/// `POST /api/v1/import:preview`
#[utoipa::path(
    post,
    path = "/api/v1/import:preview",
    tag = "import",
    request_body = ImportPreviewRequest,
    responses(
        (status = 200, description = "Fetched posts, nothing written", body = ImportPreviewResponse),
        (status = 400, description = "Invalid source or count", body = ApiError),
        (status = 401, description = "Missing or invalid API key", body = ApiError),
    )
)]
pub async fn preview_import(
    State(state): State<AppState>,
    Json(req): Json<ImportPreviewRequest>,
) -> ApiResponse<ImportPreviewResponse> {
    match state.importer.preview(&req.source_url, req.count).await {
        Ok(posts) => {
            let count = posts.len();
            ApiResponse::success(ImportPreviewResponse {
                posts: posts.into_iter().map(ImportedPostData::from).collect(),
                count,
            })
        }
        Err(e) => ApiResponse::from(e),
    }
}

/// `POST /api/v1/import:run`
#[utoipa::path(
    post,
    path = "/api/v1/import:run",
    tag = "import",
    request_body = ImportRunRequest,
    responses(
        (status = 200, description = "Import report", body = ImportReportData),
        (status = 400, description = "Invalid source or count", body = ApiError),
        (status = 401, description = "Missing or invalid API key", body = ApiError),
    )
)]
pub async fn run_import(
    State(state): State<AppState>,
    Json(req): Json<ImportRunRequest>,
) -> ApiResponse<ImportReportData> {
    match state
        .importer
        .import(&req.source_url, req.count, req.selected.as_deref())
        .await
    {
        Ok(report) => ApiResponse::success(ImportReportData::from(report)),
        Err(e) => ApiResponse::from(e),
    }
}
