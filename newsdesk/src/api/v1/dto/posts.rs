use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::models::Post;

/// Query parameters for `GET /v1/posts`.
#[derive(Debug, Clone, Deserialize, utoipa::ToSchema)]
pub struct ListPostsQuery {
    /// Maximum number of posts to return (default 20, clamped to 1..=100).
    #[serde(default = "default_limit")]
    pub limit: u32,
}

fn default_limit() -> u32 {
    20
}

impl Default for ListPostsQuery {
    fn default() -> Self {
        Self {
            limit: default_limit(),
        }
    }
}

/// A post as exposed by the admin API. The full body is omitted from list
/// responses; `GET /v1/posts/{postId}` includes it.
#[derive(Debug, Clone, Serialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct PostData {
    pub id: i64,
    pub title: String,
    pub link: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub content: Option<String>,
    pub excerpt: String,
    pub author: String,
    pub categories: Vec<String>,
    pub tags: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub published_at: Option<DateTime<Utc>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub source_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub source_id: Option<i64>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl PostData {
    pub fn summary_of(post: Post) -> Self {
        let mut data = Self::from(post);
        data.content = None;
        data
    }
}

impl From<Post> for PostData {
    fn from(post: Post) -> Self {
        Self {
            id: post.id,
            title: post.title,
            link: post.link,
            content: Some(post.content),
            excerpt: post.excerpt,
            author: post.author,
            categories: post.categories,
            tags: post.tags,
            published_at: post.published_at,
            source_url: post.source_url,
            source_id: post.source_id,
            created_at: post.created_at,
            updated_at: post.updated_at,
        }
    }
}

/// Response body for `GET /v1/posts`.
#[derive(Debug, Clone, Serialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ListPostsResponse {
    pub posts: Vec<PostData>,
}
