use serde::{Deserialize, Serialize};

use crate::services::SyncReport;

/// Request body for `POST /v1/sync:run`.
#[derive(Debug, Clone, Default, Deserialize, utoipa::ToSchema)]
pub struct SyncRunRequest {
    /// How many recent posts to push; defaults to the configured batch
    /// limit.
    pub limit: Option<u32>,
}

/// Response body for `POST /v1/sync:run`.
#[derive(Debug, Clone, Serialize, utoipa::ToSchema)]
pub struct SyncReportData {
    pub synced: usize,
    pub total: usize,
    pub errors: Vec<String>,
    pub message: String,
}

impl From<SyncReport> for SyncReportData {
    fn from(report: SyncReport) -> Self {
        let message = format!(
            "Successfully synced {} out of {} posts",
            report.synced, report.total
        );
        Self {
            synced: report.synced,
            total: report.total,
            errors: report.errors,
            message,
        }
    }
}

/// Response body for `POST /v1/sync:test`.
#[derive(Debug, Clone, Serialize, utoipa::ToSchema)]
pub struct SyncTestResponse {
    pub message: String,
}
