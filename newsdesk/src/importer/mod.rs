//! Importing posts from remote WordPress sites.
//!
//! Two-step flow mirrored by the admin API: `preview` fetches and enriches
//! posts without writing anything, `import` inserts them into the local
//! store. Imported posts remember their origin (`source_url`, `source_id`)
//! so re-running an import never duplicates them.

mod api;

pub use api::{WordPressApiClient, WpPost};

use std::sync::Arc;

use chrono::{DateTime, NaiveDateTime, Utc};
use serde::Serialize;
use tracing::info;

use crate::config::ImporterConfig;
use crate::db::PostStore;
use crate::error::{NewsdeskError, Result};
use crate::models::NewPost;

/// A remote post after enrichment, ready to preview or insert.
#[derive(Debug, Clone, Serialize)]
pub struct ImportedPost {
    pub id: i64,
    pub title: String,
    pub content: String,
    pub excerpt: String,
    pub link: String,
    pub date: Option<String>,
    pub author: String,
    pub categories: Vec<String>,
    pub tags: Vec<String>,
    pub source_url: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct ImportReport {
    pub imported: usize,
    pub total: usize,
    pub errors: Vec<String>,
}

#[derive(Clone)]
pub struct ImportService {
    store: Arc<dyn PostStore>,
    config: ImporterConfig,
    public_url: Option<String>,
}

impl ImportService {
    pub fn new(
        store: Arc<dyn PostStore>,
        config: ImporterConfig,
        public_url: Option<String>,
    ) -> Self {
        Self {
            store,
            config,
            public_url,
        }
    }

    fn validate_source(&self, source_url: &str, count: u32) -> Result<()> {
        if source_url.trim().is_empty() {
            return Err(NewsdeskError::Validation("Source URL is required".to_string()));
        }
        let parsed = url::Url::parse(source_url.trim()).map_err(|_| {
            NewsdeskError::Validation(format!("Source URL is not a valid URL: {source_url}"))
        })?;
        if !matches!(parsed.scheme(), "http" | "https") {
            return Err(NewsdeskError::Validation(
                "Source URL must use http or https".to_string(),
            ));
        }
        if !(1..=100).contains(&count) {
            return Err(NewsdeskError::Validation(
                "Number of posts must be between 1 and 100".to_string(),
            ));
        }
        if let Some(own_url) = &self.public_url {
            if source_url.trim_end_matches('/') == own_url.trim_end_matches('/') {
                return Err(NewsdeskError::Validation(
                    "Cannot import from this site itself. Use a different WordPress URL."
                        .to_string(),
                ));
            }
        }
        Ok(())
    }

    pub async fn test_connection(&self, source_url: &str) -> Result<String> {
        self.validate_source(source_url, 1)?;
        let client = WordPressApiClient::new(source_url, &self.config)?;
        client.test_connection().await?;
        Ok(format!(
            "Connection successful! Found WordPress REST API at {source_url}"
        ))
    }

    /// Fetch and enrich posts without writing anything.
    pub async fn preview(&self, source_url: &str, count: u32) -> Result<Vec<ImportedPost>> {
        self.validate_source(source_url, count)?;
        let client = WordPressApiClient::new(source_url, &self.config)?;

        let listed = client.fetch_posts(count).await?;
        info!(count = listed.len(), source_url, "Fetched posts from source");

        let mut posts = Vec::with_capacity(listed.len());
        for entry in listed {
            posts.push(self.enrich(&client, source_url, entry).await);
        }
        Ok(posts)
    }

    /// Import posts into the local store, skipping ones already imported
    /// from the same source. `selected` narrows the import to specific
    /// remote post ids.
    pub async fn import(
        &self,
        source_url: &str,
        count: u32,
        selected: Option<&[i64]>,
    ) -> Result<ImportReport> {
        let posts = self.preview(source_url, count).await?;
        let total = posts.len();

        let mut imported = 0;
        let mut errors = Vec::new();

        for post in posts {
            if let Some(ids) = selected {
                if !ids.contains(&post.id) {
                    continue;
                }
            }

            match self.import_single(&post).await {
                Ok(true) => imported += 1,
                Ok(false) => errors.push(format!("Post {} already imported", post.id)),
                Err(e) => errors.push(format!("Post {}: {e}", post.id)),
            }
        }

        info!(imported, total, source_url, "Import run finished");
        Ok(ImportReport {
            imported,
            total,
            errors,
        })
    }

    /// Returns `Ok(false)` when the post was skipped as a duplicate.
    async fn import_single(&self, post: &ImportedPost) -> Result<bool> {
        if self
            .store
            .find_by_source(&post.source_url, post.id)
            .await?
            .is_some()
        {
            return Ok(false);
        }

        self.store
            .insert_post(&NewPost {
                title: post.title.clone(),
                link: post.link.clone(),
                content: post.content.clone(),
                excerpt: post.excerpt.clone(),
                author: post.author.clone(),
                categories: post.categories.clone(),
                tags: post.tags.clone(),
                published_at: post.date.as_deref().and_then(parse_wp_date),
                source_url: Some(post.source_url.clone()),
                source_id: Some(post.id),
            })
            .await?;
        Ok(true)
    }

    async fn enrich(
        &self,
        client: &WordPressApiClient,
        source_url: &str,
        entry: WpPost,
    ) -> ImportedPost {
        // The list endpoint may omit full content; prefer the detail fetch.
        let detail = client.fetch_post(entry.id).await;
        let content = detail
            .and_then(|d| d.content)
            .or(entry.content)
            .map(|r| r.rendered)
            .unwrap_or_default();

        let author = match entry.author {
            Some(author_id) => client.fetch_author_name(author_id).await,
            None => "Unknown".to_string(),
        };

        let mut categories = Vec::new();
        for category_id in &entry.categories {
            if let Some(name) = client.fetch_category_name(*category_id).await {
                categories.push(name);
            }
        }

        let mut tags = Vec::new();
        for tag_id in &entry.tags {
            if let Some(name) = client.fetch_tag_name(*tag_id).await {
                tags.push(name);
            }
        }

        ImportedPost {
            id: entry.id,
            title: entry.title.rendered,
            content,
            excerpt: entry.excerpt.map(|r| r.rendered).unwrap_or_default(),
            link: entry.link,
            date: entry.date,
            author,
            categories,
            tags,
            source_url: source_url.to_string(),
        }
    }
}

/// WordPress reports dates either with an offset or as bare local time
/// (`2024-05-01T09:30:00`); treat the bare form as UTC.
fn parse_wp_date(raw: &str) -> Option<DateTime<Utc>> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Some(dt.with_timezone(&Utc));
    }
    NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S")
        .ok()
        .map(|naive| naive.and_utc())
}
