//! Chat endpoint DTOs.
//!
//! The wire shape is fixed by the browser widget: `{ "question": ... }` in,
//! `{ "answer": ... }` out, always HTTP 200. No envelope.

use serde::{Deserialize, Serialize};

/// Request body for `POST /v1/message`.
#[derive(Debug, Clone, Deserialize, utoipa::ToSchema)]
pub struct MessageRequest {
    /// The reader's free-text question.
    pub question: String,
}

/// Response body for `POST /v1/message`.
#[derive(Debug, Clone, Serialize, utoipa::ToSchema)]
pub struct MessageResponse {
    /// Best-effort answer as an HTML fragment (or plain text on the
    /// fallback tiers).
    pub answer: String,
}
