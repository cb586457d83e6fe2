//! Pushing local posts into the ZeroEntropy collection.
//!
//! Each post becomes a text document at path `post_<id>` whose body is a
//! flat header block (title, author, date, taxonomy, excerpt) followed by
//! the tag-stripped article text. Metadata carries the same fields for
//! retrieval-side filtering and the permalink for answer rendering.

use std::collections::HashMap;
use std::sync::Arc;

use serde::Serialize;
use tracing::{error, info};

use crate::config::SyncConfig;
use crate::db::PostStore;
use crate::error::Result;
use crate::llm::prompts::strip_tags;
use crate::models::Post;
use crate::retrieval::{post_path, RetrievalProvider};

#[derive(Debug, Clone, Serialize)]
pub struct SyncReport {
    pub synced: usize,
    pub total: usize,
    pub errors: Vec<String>,
}

#[derive(Clone)]
pub struct SyncService {
    store: Arc<dyn PostStore>,
    retrieval: RetrievalProvider,
    config: SyncConfig,
}

impl SyncService {
    pub fn new(store: Arc<dyn PostStore>, retrieval: RetrievalProvider, config: SyncConfig) -> Self {
        Self {
            store,
            retrieval,
            config,
        }
    }

    pub fn interval_secs(&self) -> u64 {
        self.config.interval_secs
    }

    /// Push the most recent posts into the collection. Per-post failures
    /// are collected in the report rather than aborting the run.
    pub async fn sync_posts(&self, limit: Option<u32>) -> Result<SyncReport> {
        let limit = limit.unwrap_or(self.config.batch_limit);

        self.retrieval.add_collection().await?;

        let posts = self.store.list_recent(limit).await?;
        let total = posts.len();

        let mut synced = 0;
        let mut errors = Vec::new();
        for post in &posts {
            match self.sync_single(post).await {
                Ok(()) => synced += 1,
                Err(e) => errors.push(format!("post {}: {e}", post.id)),
            }
        }

        info!(synced, total, "Sync run finished");
        Ok(SyncReport {
            synced,
            total,
            errors,
        })
    }

    /// Background sweep entry point.
    pub async fn run_once(&self) -> Result<()> {
        if !self.retrieval.is_available() {
            return Ok(());
        }
        let report = self.sync_posts(None).await?;
        for message in &report.errors {
            error!("Sync sweep error: {}", message);
        }
        Ok(())
    }

    async fn sync_single(&self, post: &Post) -> Result<()> {
        let content = prepare_content(post);
        let metadata = prepare_metadata(post);
        self.retrieval
            .add_document(&post_path(post.id), &content, &metadata)
            .await
    }

    /// Remove the document for a deleted post. Missing documents are the
    /// caller's problem to ignore; post deletion must not fail on this.
    pub async fn delete_post_document(&self, post_id: i64) -> Result<()> {
        self.retrieval.delete_document(&post_path(post_id)).await
    }

    /// Probe the retrieval service, reporting document counts when the
    /// collection-scoped status is available.
    pub async fn test_connection(&self) -> Result<String> {
        let general = self.retrieval.get_status(None).await?;

        let collection = self.retrieval.collection().unwrap_or_default().to_string();
        match self.retrieval.get_status(Some(&collection)).await {
            Ok(status) if status.num_documents.is_some() => Ok(format!(
                "Connection successful! Collection \"{}\" has {} documents.",
                collection,
                status.num_documents.unwrap_or_default()
            )),
            _ => match general.num_documents {
                Some(count) => Ok(format!(
                    "Connection successful! Found {count} documents across all collections."
                )),
                None => Ok("Connection successful!".to_string()),
            },
        }
    }
}

fn prepare_content(post: &Post) -> String {
    let date = post
        .published_at
        .map(|dt| dt.format("%Y-%m-%d %H:%M:%S").to_string())
        .unwrap_or_default();

    let mut content = format!("Title: {}\n\n", post.title);
    content.push_str(&format!("Author: {}\n", post.author));
    content.push_str(&format!("Date: {date}\n"));
    content.push_str(&format!("Categories: {}\n", post.categories.join(", ")));
    content.push_str(&format!("Tags: {}\n\n", post.tags.join(", ")));
    content.push_str(&format!("Excerpt: {}\n\n", post.excerpt));
    content.push_str(&format!("Content: {}", strip_tags(&post.content)));
    content
}

fn prepare_metadata(post: &Post) -> HashMap<String, String> {
    let date = post
        .published_at
        .map(|dt| dt.format("%Y-%m-%d %H:%M:%S").to_string())
        .unwrap_or_default();

    HashMap::from([
        ("title".to_string(), post.title.clone()),
        ("author".to_string(), post.author.clone()),
        ("date".to_string(), date),
        ("categories".to_string(), post.categories.join(", ")),
        ("tags".to_string(), post.tags.join(", ")),
        ("link".to_string(), post.link.clone()),
        ("post_id".to_string(), post.id.to_string()),
    ])
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};

    fn sample_post() -> Post {
        let published = Utc.with_ymd_and_hms(2024, 5, 1, 9, 30, 0).unwrap();
        Post {
            id: 784,
            title: "Solar farms expand".to_string(),
            link: "https://news.example.com/solar-farms".to_string(),
            content: "<p>Across the <strong>region</strong>.</p>".to_string(),
            excerpt: "Across the region.".to_string(),
            author: "Jordan Reyes".to_string(),
            categories: vec!["Energy".to_string(), "Local".to_string()],
            tags: vec!["solar".to_string()],
            published_at: Some(published),
            source_url: None,
            source_id: None,
            created_at: published,
            updated_at: published,
        }
    }

    #[test]
    fn content_block_carries_all_fields_in_order() {
        let content = prepare_content(&sample_post());
        assert!(content.starts_with("Title: Solar farms expand\n\n"));
        assert!(content.contains("Author: Jordan Reyes\n"));
        assert!(content.contains("Date: 2024-05-01 09:30:00\n"));
        assert!(content.contains("Categories: Energy, Local\n"));
        assert!(content.contains("Tags: solar\n\n"));
        assert!(content.contains("Excerpt: Across the region.\n\n"));
        assert!(content.ends_with("Content: Across the region ."));
    }

    #[test]
    fn content_block_strips_html_from_body() {
        let content = prepare_content(&sample_post());
        assert!(!content.contains("<p>"));
        assert!(!content.contains("<strong>"));
    }

    #[test]
    fn metadata_includes_permalink_and_post_id() {
        let metadata = prepare_metadata(&sample_post());
        assert_eq!(
            metadata.get("link").map(String::as_str),
            Some("https://news.example.com/solar-farms")
        );
        assert_eq!(metadata.get("post_id").map(String::as_str), Some("784"));
        assert_eq!(
            metadata.get("categories").map(String::as_str),
            Some("Energy, Local")
        );
    }
}
