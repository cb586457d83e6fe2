use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A locally stored article. Posts are either authored in place or imported
/// from a remote WordPress site (in which case `source_url`/`source_id`
/// record where they came from).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Post {
    pub id: i64,
    pub title: String,
    /// Canonical public URL of the article, used for "Read more" links.
    pub link: String,
    pub content: String,
    pub excerpt: String,
    pub author: String,
    pub categories: Vec<String>,
    pub tags: Vec<String>,
    pub published_at: Option<DateTime<Utc>>,
    pub source_url: Option<String>,
    pub source_id: Option<i64>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Fields for inserting a post; the store assigns `id` and timestamps.
#[derive(Debug, Clone, Default)]
pub struct NewPost {
    pub title: String,
    pub link: String,
    pub content: String,
    pub excerpt: String,
    pub author: String,
    pub categories: Vec<String>,
    pub tags: Vec<String>,
    pub published_at: Option<DateTime<Utc>>,
    pub source_url: Option<String>,
    pub source_id: Option<i64>,
}
