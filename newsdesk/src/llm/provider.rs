use crate::config::SummarizerConfig;
use crate::error::{NewsdeskError, Result};

use super::api::LlmApiClient;

/// Availability wrapper around [`LlmApiClient`], mirroring the retrieval
/// provider: missing configuration means the summarization tier silently
/// degrades instead of failing startup.
#[derive(Clone)]
pub struct SummarizerProvider {
    client: Option<LlmApiClient>,
}

impl SummarizerProvider {
    pub fn new(config: Option<&SummarizerConfig>) -> Self {
        let Some(config) = config else {
            return Self::unavailable();
        };

        match LlmApiClient::new(config) {
            Ok(client) => Self {
                client: Some(client),
            },
            Err(e) => {
                tracing::warn!(error = %e, "Summarizer client construction failed");
                Self::unavailable()
            }
        }
    }

    pub fn unavailable() -> Self {
        Self { client: None }
    }

    pub fn is_available(&self) -> bool {
        self.client.is_some()
    }

    pub fn model(&self) -> Option<&str> {
        self.client.as_ref().map(|c| c.model())
    }

    pub async fn complete(&self, prompt: &str, system_prompt: Option<&str>) -> Result<String> {
        let client = self.client.as_ref().ok_or_else(|| {
            NewsdeskError::SummarizerUnavailable("Summarizer API key not configured".to_string())
        })?;
        client.complete(prompt, system_prompt).await
    }
}
