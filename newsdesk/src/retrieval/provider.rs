use crate::config::RetrievalConfig;
use crate::error::{NewsdeskError, Result};

use super::api::{RetrievalResult, StatusInfo, ZeroEntropyClient};

/// Availability wrapper around [`ZeroEntropyClient`].
///
/// The service starts whether or not retrieval is configured; callers check
/// `is_available()` (or just let calls fail with `RetrievalUnavailable`) and
/// degrade to their fallback tiers.
#[derive(Debug, Clone)]
pub struct RetrievalProvider {
    client: Option<ZeroEntropyClient>,
    top_k: u32,
}

impl RetrievalProvider {
    pub fn new(config: &RetrievalConfig) -> Self {
        if config.api_key.is_none() || config.collection.is_empty() {
            return Self::unavailable();
        }

        match ZeroEntropyClient::new(config) {
            Ok(client) => Self {
                client: Some(client),
                top_k: config.top_k,
            },
            Err(e) => {
                tracing::warn!(error = %e, "Retrieval client construction failed");
                Self::unavailable()
            }
        }
    }

    pub fn unavailable() -> Self {
        Self {
            client: None,
            top_k: 0,
        }
    }

    pub fn is_available(&self) -> bool {
        self.client.is_some()
    }

    pub fn collection(&self) -> Option<&str> {
        self.client.as_ref().map(|c| c.collection())
    }

    fn client(&self) -> Result<&ZeroEntropyClient> {
        self.client.as_ref().ok_or_else(|| {
            NewsdeskError::RetrievalUnavailable(
                "Retrieval API key or collection not configured".to_string(),
            )
        })
    }

    pub async fn top_documents(&self, query: &str) -> Result<Vec<RetrievalResult>> {
        self.client()?.top_documents(query, self.top_k).await
    }

    pub async fn add_collection(&self) -> Result<()> {
        self.client()?.add_collection().await
    }

    pub async fn add_document(
        &self,
        path: &str,
        content: &str,
        metadata: &std::collections::HashMap<String, String>,
    ) -> Result<()> {
        self.client()?.add_document(path, content, metadata).await
    }

    pub async fn delete_document(&self, path: &str) -> Result<()> {
        self.client()?.delete_document(path).await
    }

    pub async fn get_status(&self, collection: Option<&str>) -> Result<StatusInfo> {
        self.client()?.get_status(collection).await
    }
}
