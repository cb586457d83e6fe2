use axum::Json;
use utoipa::OpenApi;
use utoipa_redoc::{Redoc, Servable};

use super::dto;
use super::handlers;
use super::response;

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Newsdesk API",
        version = "1.0.0",
        description = "Self-hostable news chatbot backend. Imports WordPress posts, syncs them to a retrieval collection, and answers reader questions with LLM summaries.",
    ),
    paths(
        handlers::health::health_check,
        handlers::chat::post_message,
        handlers::posts::list_posts,
        handlers::posts::get_post,
        handlers::posts::delete_post,
        handlers::sync::run_sync,
        handlers::sync::test_sync,
        handlers::import::test_import,
        handlers::import::preview_import,
        handlers::import::run_import,
    ),
    components(schemas(
        // Response envelope
        response::ErrorCode,
        response::ApiError,
        response::ResponseMeta,
        // Chat
        dto::chat::MessageRequest,
        dto::chat::MessageResponse,
        // Posts
        dto::posts::ListPostsQuery,
        dto::posts::PostData,
        dto::posts::ListPostsResponse,
        // Sync
        dto::sync::SyncRunRequest,
        dto::sync::SyncReportData,
        dto::sync::SyncTestResponse,
        // Import
        dto::import::ImportPreviewRequest,
        dto::import::ImportRunRequest,
        dto::import::ImportedPostData,
        dto::import::ImportPreviewResponse,
        dto::import::ImportReportData,
        dto::import::ImportTestResponse,
        // Health (handler-local types)
        handlers::health::HealthData,
        handlers::health::DatabaseStatus,
        handlers::health::RetrievalStatus,
        handlers::health::SummarizerStatus,
    )),
    tags(
        (name = "health", description = "Health check"),
        (name = "chat", description = "Widget-facing question answering"),
        (name = "posts", description = "Local post store (auth required)"),
        (name = "sync", description = "ZeroEntropy collection sync (auth required)"),
        (name = "import", description = "WordPress post import (auth required)"),
    ),
    security(
        ("bearer_auth" = [])
    ),
    modifiers(&SecurityAddon),
)]
pub struct ApiDoc;

struct SecurityAddon;

impl utoipa::Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        let components = openapi.components.get_or_insert_with(Default::default);
        components.add_security_scheme(
            "bearer_auth",
            utoipa::openapi::security::SecurityScheme::Http(utoipa::openapi::security::Http::new(
                utoipa::openapi::security::HttpAuthScheme::Bearer,
            )),
        );
    }
}

pub async fn openapi_json() -> Json<utoipa::openapi::OpenApi> {
    Json(ApiDoc::openapi())
}

pub fn redoc_router<S: Clone + Send + Sync + 'static>() -> axum::Router<S> {
    Redoc::with_url("/docs", ApiDoc::openapi()).into()
}
