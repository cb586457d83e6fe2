use axum::extract::State;
use serde::Serialize;

use crate::api::v1::response::ApiResponse;
use crate::api::AppState;

/// Health data returned inside the v1 envelope.
#[derive(Debug, Clone, Serialize, utoipa::ToSchema)]
pub struct HealthData {
    pub status: String,
    pub version: String,
    pub database: DatabaseStatus,
    pub retrieval: RetrievalStatus,
    pub summarizer: SummarizerStatus,
}

#[derive(Debug, Clone, Serialize, utoipa::ToSchema)]
pub struct DatabaseStatus {
    pub status: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub posts: Option<u64>,
}

#[derive(Debug, Clone, Serialize, utoipa::ToSchema)]
pub struct RetrievalStatus {
    pub status: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub collection: Option<String>,
}

#[derive(Debug, Clone, Serialize, utoipa::ToSchema)]
pub struct SummarizerStatus {
    pub status: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub model: Option<String>,
}

/// `GET /api/v1/health`
#[utoipa::path(
    get,
    path = "/api/v1/health",
    tag = "health",
    responses(
        (status = 200, description = "Service health status", body = HealthData),
    )
)]
pub async fn health_check(State(state): State<AppState>) -> ApiResponse<HealthData> {
    let database = match state.store.count_posts().await {
        Ok(count) => DatabaseStatus {
            status: "ok".to_string(),
            posts: Some(count),
        },
        Err(_) => DatabaseStatus {
            status: "error".to_string(),
            posts: None,
        },
    };

    let retrieval = if state.retrieval.is_available() {
        RetrievalStatus {
            status: "available".to_string(),
            collection: state.retrieval.collection().map(String::from),
        }
    } else {
        RetrievalStatus {
            status: "unavailable".to_string(),
            collection: None,
        }
    };

    let summarizer = if state.summarizer.is_available() {
        SummarizerStatus {
            status: "available".to_string(),
            model: state.summarizer.model().map(String::from),
        }
    } else {
        SummarizerStatus {
            status: "unavailable".to_string(),
            model: None,
        }
    };

    ApiResponse::success(HealthData {
        status: "ok".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        database,
        retrieval,
        summarizer,
    })
}
