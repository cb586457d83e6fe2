use std::time::Duration;

use reqwest::{Client, StatusCode};
use serde::Deserialize;
use tracing::debug;

use crate::{
    config::ImporterConfig,
    error::{NewsdeskError, Result},
};

/// WordPress wraps rendered fields in `{ "rendered": "..." }`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Rendered {
    #[serde(default)]
    pub rendered: String,
}

/// A post as returned by `wp-json/wp/v2/posts`.
#[derive(Debug, Clone, Deserialize)]
pub struct WpPost {
    pub id: i64,
    #[serde(default)]
    pub date: Option<String>,
    #[serde(default)]
    pub link: String,
    #[serde(default)]
    pub title: Rendered,
    #[serde(default)]
    pub content: Option<Rendered>,
    #[serde(default)]
    pub excerpt: Option<Rendered>,
    #[serde(default)]
    pub author: Option<i64>,
    #[serde(default)]
    pub categories: Vec<i64>,
    #[serde(default)]
    pub tags: Vec<i64>,
}

#[derive(Debug, Clone, Deserialize)]
struct WpUser {
    #[serde(default)]
    name: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
struct WpTerm {
    #[serde(default)]
    name: Option<String>,
}

/// Read-only client for a remote WordPress site's REST API.
#[derive(Debug, Clone)]
pub struct WordPressApiClient {
    client: Client,
    api_base: String,
    test_timeout_secs: u64,
}

impl WordPressApiClient {
    pub fn new(source_url: &str, config: &ImporterConfig) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(NewsdeskError::Http)?;

        Ok(Self {
            client,
            api_base: format!("{}/wp-json/wp/v2", source_url.trim_end_matches('/')),
            test_timeout_secs: config.test_timeout_secs,
        })
    }

    /// Cheap reachability probe: one post, short timeout.
    pub async fn test_connection(&self) -> Result<()> {
        let url = format!("{}/posts?per_page=1", self.api_base);
        let response = self
            .client
            .get(&url)
            .timeout(Duration::from_secs(self.test_timeout_secs))
            .send()
            .await?;

        let status = response.status();
        if status != StatusCode::OK {
            return Err(NewsdeskError::upstream(
                status.as_u16(),
                response.text().await.unwrap_or_default(),
            ));
        }

        let body = response.text().await?;
        let parsed: serde_json::Value = serde_json::from_str(&body)
            .map_err(|e| NewsdeskError::MalformedResponse(format!("posts probe: {e}")))?;
        if !parsed.is_array() {
            return Err(NewsdeskError::MalformedResponse(
                "posts probe did not return an array".to_string(),
            ));
        }
        Ok(())
    }

    /// The most recent published posts, capped at the API's page limit.
    pub async fn fetch_posts(&self, per_page: u32) -> Result<Vec<WpPost>> {
        let url = format!(
            "{}/posts?per_page={}&status=publish",
            self.api_base,
            per_page.min(100)
        );
        let response = self.client.get(&url).send().await?;

        let status = response.status();
        debug!(status = status.as_u16(), "WordPress posts fetch");
        if status != StatusCode::OK {
            return Err(NewsdeskError::upstream(
                status.as_u16(),
                response.text().await.unwrap_or_default(),
            ));
        }

        let body = response.text().await?;
        serde_json::from_str(&body)
            .map_err(|e| NewsdeskError::MalformedResponse(format!("posts response: {e}")))
    }

    /// Full post detail, including rendered content. Failures degrade to
    /// `None`; the list entry is imported with whatever it already carried.
    pub async fn fetch_post(&self, id: i64) -> Option<WpPost> {
        let url = format!("{}/posts/{id}", self.api_base);
        let response = self.client.get(&url).send().await.ok()?;
        if response.status() != StatusCode::OK {
            return None;
        }
        response.json().await.ok()
    }

    /// Author display name, with a placeholder when the lookup fails.
    pub async fn fetch_author_name(&self, id: i64) -> String {
        let url = format!("{}/users/{id}", self.api_base);
        let fallback = format!("Author {id}");

        let Ok(response) = self.client.get(&url).send().await else {
            return fallback;
        };
        if response.status() != StatusCode::OK {
            return fallback;
        }
        match response.json::<WpUser>().await {
            Ok(user) => user.name.unwrap_or(fallback),
            Err(_) => fallback,
        }
    }

    pub async fn fetch_category_name(&self, id: i64) -> Option<String> {
        self.fetch_term_name("categories", id).await
    }

    pub async fn fetch_tag_name(&self, id: i64) -> Option<String> {
        self.fetch_term_name("tags", id).await
    }

    async fn fetch_term_name(&self, kind: &str, id: i64) -> Option<String> {
        let url = format!("{}/{kind}/{id}", self.api_base);
        let response = self.client.get(&url).send().await.ok()?;
        if response.status() != StatusCode::OK {
            return None;
        }
        response.json::<WpTerm>().await.ok()?.name
    }
}
