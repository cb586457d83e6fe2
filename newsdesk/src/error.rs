use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum NewsdeskError {
    #[error("Database error: {0}")]
    Database(#[from] libsql::Error),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("HTTP request error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Upstream returned HTTP {status}: {body}")]
    UpstreamStatus { status: u16, body: String },

    #[error("Malformed upstream response: {0}")]
    MalformedResponse(String),

    #[error("No results: {0}")]
    NoResults(String),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Summarizer error: {0}")]
    Summarizer(String),

    #[error("Summarizer unavailable: {0}")]
    SummarizerUnavailable(String),

    #[error("Retrieval unavailable: {0}")]
    RetrievalUnavailable(String),

    #[error("Internal server error: {0}")]
    Internal(String),
}

impl NewsdeskError {
    /// Helper for non-2xx upstream responses, capping the echoed body so a
    /// huge error page never ends up in logs or API responses.
    pub fn upstream(status: u16, body: impl Into<String>) -> Self {
        let mut body = body.into();
        if body.len() > 500 {
            let mut end = 500;
            while !body.is_char_boundary(end) {
                end -= 1;
            }
            body.truncate(end);
        }
        Self::UpstreamStatus { status, body }
    }
}

impl IntoResponse for NewsdeskError {
    fn into_response(self) -> Response {
        let (status, message) = match &self {
            NewsdeskError::NotFound(msg) => (StatusCode::NOT_FOUND, msg.clone()),
            NewsdeskError::Validation(msg) => (StatusCode::BAD_REQUEST, msg.clone()),
            NewsdeskError::Database(e) => (StatusCode::INTERNAL_SERVER_ERROR, e.to_string()),
            NewsdeskError::Http(e) => (StatusCode::BAD_GATEWAY, e.to_string()),
            NewsdeskError::UpstreamStatus { .. } => (StatusCode::BAD_GATEWAY, self.to_string()),
            NewsdeskError::MalformedResponse(msg) => (StatusCode::BAD_GATEWAY, msg.clone()),
            NewsdeskError::NoResults(msg) => (StatusCode::NOT_FOUND, msg.clone()),
            NewsdeskError::Json(e) => (StatusCode::BAD_REQUEST, e.to_string()),
            NewsdeskError::Summarizer(msg) => (StatusCode::BAD_GATEWAY, msg.clone()),
            NewsdeskError::SummarizerUnavailable(msg) => {
                (StatusCode::SERVICE_UNAVAILABLE, msg.clone())
            }
            NewsdeskError::RetrievalUnavailable(msg) => {
                (StatusCode::SERVICE_UNAVAILABLE, msg.clone())
            }
            NewsdeskError::Internal(msg) => (StatusCode::INTERNAL_SERVER_ERROR, msg.clone()),
        };

        let body = Json(json!({
            "error": message,
            "code": status.as_u16()
        }));

        (status, body).into_response()
    }
}

pub type Result<T> = std::result::Result<T, NewsdeskError>;
