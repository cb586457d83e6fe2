use async_trait::async_trait;
use chrono::{DateTime, Utc};
use libsql::params;

use crate::error::Result;
use crate::models::{NewPost, Post};

use super::connection::Database;
use super::traits::PostStore;

/// libsql-backed implementation of [`PostStore`].
#[derive(Clone)]
pub struct LibSqlPostStore {
    db: Database,
}

impl LibSqlPostStore {
    pub fn new(db: Database) -> Self {
        Self { db }
    }

    fn row_to_post(row: &libsql::Row) -> Result<Post> {
        Ok(Post {
            id: row.get(0)?,
            title: row.get(1)?,
            link: row.get(2)?,
            content: row.get(3)?,
            excerpt: row.get(4)?,
            author: row.get(5)?,
            categories: serde_json::from_str(&row.get::<String>(6)?).unwrap_or_default(),
            tags: serde_json::from_str(&row.get::<String>(7)?).unwrap_or_default(),
            published_at: row
                .get::<Option<String>>(8)?
                .and_then(|raw| DateTime::parse_from_rfc3339(&raw).ok())
                .map(|dt| dt.with_timezone(&Utc)),
            source_url: row.get(9)?,
            source_id: row.get(10)?,
            created_at: DateTime::parse_from_rfc3339(&row.get::<String>(11)?)
                .map(|dt| dt.with_timezone(&Utc))
                .unwrap_or_else(|_| Utc::now()),
            updated_at: DateTime::parse_from_rfc3339(&row.get::<String>(12)?)
                .map(|dt| dt.with_timezone(&Utc))
                .unwrap_or_else(|_| Utc::now()),
        })
    }
}

#[async_trait]
impl PostStore for LibSqlPostStore {
    async fn get_post(&self, id: i64) -> Result<Option<Post>> {
        let conn = self.db.connect()?;
        let mut rows = conn
            .query("SELECT * FROM posts WHERE id = ?1", params![id])
            .await?;

        if let Some(row) = rows.next().await? {
            Ok(Some(Self::row_to_post(&row)?))
        } else {
            Ok(None)
        }
    }

    async fn insert_post(&self, post: &NewPost) -> Result<Post> {
        let conn = self.db.connect()?;
        let now = Utc::now();

        conn.execute(
            r#"
            INSERT INTO posts (
                title, link, content, excerpt, author, categories, tags,
                published_at, source_url, source_id, created_at, updated_at
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12)
            "#,
            params![
                post.title.clone(),
                post.link.clone(),
                post.content.clone(),
                post.excerpt.clone(),
                post.author.clone(),
                serde_json::to_string(&post.categories)?,
                serde_json::to_string(&post.tags)?,
                post.published_at.map(|dt| dt.to_rfc3339()),
                post.source_url.clone(),
                post.source_id,
                now.to_rfc3339(),
                now.to_rfc3339(),
            ],
        )
        .await?;

        let id = conn.last_insert_rowid();

        Ok(Post {
            id,
            title: post.title.clone(),
            link: post.link.clone(),
            content: post.content.clone(),
            excerpt: post.excerpt.clone(),
            author: post.author.clone(),
            categories: post.categories.clone(),
            tags: post.tags.clone(),
            published_at: post.published_at,
            source_url: post.source_url.clone(),
            source_id: post.source_id,
            created_at: now,
            updated_at: now,
        })
    }

    async fn list_recent(&self, limit: u32) -> Result<Vec<Post>> {
        let conn = self.db.connect()?;
        let mut rows = conn
            .query(
                r#"
                SELECT * FROM posts
                ORDER BY COALESCE(published_at, created_at) DESC
                LIMIT ?1
                "#,
                params![limit as i64],
            )
            .await?;

        let mut posts = Vec::new();
        while let Some(row) = rows.next().await? {
            posts.push(Self::row_to_post(&row)?);
        }
        Ok(posts)
    }

    async fn find_by_source(&self, source_url: &str, source_id: i64) -> Result<Option<Post>> {
        let conn = self.db.connect()?;
        let mut rows = conn
            .query(
                "SELECT * FROM posts WHERE source_url = ?1 AND source_id = ?2",
                params![source_url, source_id],
            )
            .await?;

        if let Some(row) = rows.next().await? {
            Ok(Some(Self::row_to_post(&row)?))
        } else {
            Ok(None)
        }
    }

    async fn delete_post(&self, id: i64) -> Result<bool> {
        let conn = self.db.connect()?;
        let affected = conn
            .execute("DELETE FROM posts WHERE id = ?1", params![id])
            .await?;
        Ok(affected > 0)
    }

    async fn count_posts(&self) -> Result<u64> {
        let conn = self.db.connect()?;
        let mut rows = conn.query("SELECT COUNT(*) FROM posts", ()).await?;
        let row = rows
            .next()
            .await?
            .ok_or_else(|| crate::error::NewsdeskError::Internal("COUNT returned no row".into()))?;
        Ok(row.get::<i64>(0)? as u64)
    }
}
