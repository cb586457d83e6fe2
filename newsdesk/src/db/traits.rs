use async_trait::async_trait;

use crate::error::Result;
use crate::models::{NewPost, Post};

/// Read/write operations on the local post store.
///
/// The answer flow only ever reads; the importer writes. Handed around as
/// `Arc<dyn PostStore>` so tests can swap in a throwaway database.
#[async_trait]
pub trait PostStore: Send + Sync {
    async fn get_post(&self, id: i64) -> Result<Option<Post>>;
    async fn insert_post(&self, post: &NewPost) -> Result<Post>;
    /// Most recently published posts first.
    async fn list_recent(&self, limit: u32) -> Result<Vec<Post>>;
    async fn find_by_source(&self, source_url: &str, source_id: i64) -> Result<Option<Post>>;
    async fn delete_post(&self, id: i64) -> Result<bool>;
    async fn count_posts(&self) -> Result<u64>;
}
