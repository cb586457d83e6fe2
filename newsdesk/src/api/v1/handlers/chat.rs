//! v1 chat handler.
//!
//! `POST /api/v1/message` is the widget-facing endpoint. It always answers
//! HTTP 200 with `{ "answer": ... }`: upstream failures inside the answer
//! flow degrade through its fallback tiers instead of surfacing here.

use axum::extract::State;
use axum::Json;

use crate::api::v1::dto::chat::{MessageRequest, MessageResponse};
use crate::api::AppState;

/// `POST /api/v1/message`
#[utoipa::path(
    post,
    path = "/api/v1/message",
    tag = "chat",
    request_body = MessageRequest,
    responses(
        (status = 200, description = "Best-effort answer", body = MessageResponse),
    )
)]
pub async fn post_message(
    State(state): State<AppState>,
    Json(req): Json<MessageRequest>,
) -> Json<MessageResponse> {
    let answer = state.answer.answer(&req.question).await;
    Json(MessageResponse { answer })
}
