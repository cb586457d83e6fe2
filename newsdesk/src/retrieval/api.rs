use std::collections::HashMap;
use std::time::Duration;

use reqwest::{Client, StatusCode};
use serde::{Deserialize, Serialize};
use serde_json::json;
use tracing::debug;

use crate::{
    config::RetrievalConfig,
    error::{NewsdeskError, Result},
};

/// One ranked hit from `queries/top-documents`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RetrievalResult {
    pub path: String,
    #[serde(default)]
    pub score: Option<f32>,
}

#[derive(Debug, Clone, Deserialize)]
struct TopDocumentsResponse {
    #[serde(default)]
    results: Vec<RetrievalResult>,
}

/// Index status as reported by `status/get-status`.
#[derive(Debug, Clone, Deserialize)]
pub struct StatusInfo {
    #[serde(default)]
    pub num_documents: Option<u64>,
}

/// Thin HTTP client for the ZeroEntropy API. One attempt per call, no
/// retries; failures surface to the caller's fallback tier.
#[derive(Debug, Clone)]
pub struct ZeroEntropyClient {
    client: Client,
    config: RetrievalConfig,
    api_key: String,
}

impl ZeroEntropyClient {
    pub fn new(config: &RetrievalConfig) -> Result<Self> {
        let api_key = config.api_key.clone().ok_or_else(|| {
            NewsdeskError::RetrievalUnavailable("Retrieval API key not configured".to_string())
        })?;

        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(NewsdeskError::Http)?;

        Ok(Self {
            client,
            config: config.clone(),
            api_key,
        })
    }

    pub fn collection(&self) -> &str {
        &self.config.collection
    }

    async fn post(&self, endpoint: &str, body: serde_json::Value) -> Result<reqwest::Response> {
        let url = format!("{}/{}", self.config.base_url.trim_end_matches('/'), endpoint);
        let response = self
            .client
            .post(&url)
            .bearer_auth(&self.api_key)
            .json(&body)
            .send()
            .await?;
        debug!(endpoint, status = response.status().as_u16(), "ZeroEntropy call");
        Ok(response)
    }

    /// Query the collection for the `k` most relevant documents.
    pub async fn top_documents(&self, query: &str, k: u32) -> Result<Vec<RetrievalResult>> {
        let response = self
            .post(
                "queries/top-documents",
                json!({
                    "collection_name": self.config.collection,
                    "query": query,
                    "k": k,
                    "include_metadata": false,
                }),
            )
            .await?;

        let status = response.status();
        if status != StatusCode::OK {
            return Err(NewsdeskError::upstream(
                status.as_u16(),
                response.text().await.unwrap_or_default(),
            ));
        }

        let body = response.text().await?;
        let parsed: TopDocumentsResponse = serde_json::from_str(&body).map_err(|e| {
            NewsdeskError::MalformedResponse(format!("top-documents response: {e}"))
        })?;
        Ok(parsed.results)
    }

    /// Create the configured collection. Both 201 (created) and 409
    /// (already exists) count as success.
    pub async fn add_collection(&self) -> Result<()> {
        let response = self
            .post(
                "collections/add-collection",
                json!({ "collection_name": self.config.collection }),
            )
            .await?;

        let status = response.status();
        if status != StatusCode::CREATED && status != StatusCode::CONFLICT {
            return Err(NewsdeskError::upstream(
                status.as_u16(),
                response.text().await.unwrap_or_default(),
            ));
        }
        Ok(())
    }

    /// Add (or replace) a text document at `path`.
    pub async fn add_document(
        &self,
        path: &str,
        content: &str,
        metadata: &HashMap<String, String>,
    ) -> Result<()> {
        let response = self
            .post(
                "documents/add-document",
                json!({
                    "collection_name": self.config.collection,
                    "path": path,
                    "content": { "type": "text", "text": content },
                    "metadata": metadata,
                }),
            )
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(NewsdeskError::upstream(
                status.as_u16(),
                response.text().await.unwrap_or_default(),
            ));
        }
        Ok(())
    }

    pub async fn delete_document(&self, path: &str) -> Result<()> {
        let response = self
            .post(
                "documents/delete-document",
                json!({
                    "collection_name": self.config.collection,
                    "path": path,
                }),
            )
            .await?;

        let status = response.status();
        if status != StatusCode::OK {
            return Err(NewsdeskError::upstream(
                status.as_u16(),
                response.text().await.unwrap_or_default(),
            ));
        }
        Ok(())
    }

    /// Index status, optionally scoped to a single collection.
    pub async fn get_status(&self, collection: Option<&str>) -> Result<StatusInfo> {
        let body = match collection {
            Some(name) => json!({ "collection_name": name }),
            None => json!({}),
        };
        let response = self.post("status/get-status", body).await?;

        let status = response.status();
        if status != StatusCode::OK {
            return Err(NewsdeskError::upstream(
                status.as_u16(),
                response.text().await.unwrap_or_default(),
            ));
        }

        let body = response.text().await?;
        serde_json::from_str(&body)
            .map_err(|e| NewsdeskError::MalformedResponse(format!("get-status response: {e}")))
    }
}
