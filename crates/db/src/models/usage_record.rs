//! Usage record entity model.

use clipbrief_core::types::{DbId, Timestamp};
use serde::Serialize;
use sqlx::FromRow;

/// One completed processing job, as persisted in `usage_records`.
///
/// Rows are append-only: written exactly once when a job succeeds and
/// never mutated afterwards.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct UsageRecord {
    pub id: DbId,
    pub user_id: DbId,
    pub video_name: String,
    pub prompt: String,
    /// Length of the generated summary in bytes.
    pub summary_length: i32,
    /// Wall-clock processing duration in whole seconds.
    pub processing_secs: i32,
    pub created_at: Timestamp,
}

/// Insert DTO for a new usage record.
#[derive(Debug, Clone)]
pub struct CreateUsageRecord {
    pub user_id: DbId,
    pub video_name: String,
    pub prompt: String,
    pub summary_length: i32,
    pub processing_secs: i32,
}
