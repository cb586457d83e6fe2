use serde::{Deserialize, Serialize};

use crate::importer::{ImportReport, ImportedPost};

fn default_count() -> u32 {
    10
}

/// Request body for `POST /v1/import:preview` and `POST /v1/import:test`.
#[derive(Debug, Clone, Deserialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ImportPreviewRequest {
    /// Base URL of the WordPress site to import from.
    pub source_url: String,
    /// How many recent posts to fetch (1..=100).
    #[serde(default = "default_count")]
    pub count: u32,
}

/// Request body for `POST /v1/import:run`.
#[derive(Debug, Clone, Deserialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ImportRunRequest {
    pub source_url: String,
    #[serde(default = "default_count")]
    pub count: u32,
    /// Restrict the import to these remote post ids; `None` imports all
    /// fetched posts.
    pub selected: Option<Vec<i64>>,
}

/// A remote post in a preview response.
#[derive(Debug, Clone, Serialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ImportedPostData {
    pub id: i64,
    pub title: String,
    pub excerpt: String,
    pub link: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub date: Option<String>,
    pub author: String,
    pub categories: Vec<String>,
    pub tags: Vec<String>,
}

impl From<ImportedPost> for ImportedPostData {
    fn from(post: ImportedPost) -> Self {
        Self {
            id: post.id,
            title: post.title,
            excerpt: post.excerpt,
            link: post.link,
            date: post.date,
            author: post.author,
            categories: post.categories,
            tags: post.tags,
        }
    }
}

/// Response body for `POST /v1/import:preview`.
#[derive(Debug, Clone, Serialize, utoipa::ToSchema)]
pub struct ImportPreviewResponse {
    pub posts: Vec<ImportedPostData>,
    pub count: usize,
}

/// Response body for `POST /v1/import:run`.
#[derive(Debug, Clone, Serialize, utoipa::ToSchema)]
pub struct ImportReportData {
    pub imported: usize,
    pub total: usize,
    pub errors: Vec<String>,
    pub message: String,
}

impl From<ImportReport> for ImportReportData {
    fn from(report: ImportReport) -> Self {
        let message = format!(
            "Successfully imported {} out of {} posts",
            report.imported, report.total
        );
        Self {
            imported: report.imported,
            total: report.total,
            errors: report.errors,
            message,
        }
    }
}

/// Response body for `POST /v1/import:test`.
#[derive(Debug, Clone, Serialize, utoipa::ToSchema)]
pub struct ImportTestResponse {
    pub message: String,
}
