//! Repository for the `usage_records` table.

use clipbrief_core::types::DbId;
use sqlx::PgPool;

use crate::models::usage_record::{CreateUsageRecord, UsageRecord};

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str =
    "id, user_id, video_name, prompt, summary_length, processing_secs, created_at";

/// Append-only audit trail of completed jobs.
pub struct UsageRepo;

impl UsageRepo {
    /// Insert the audit row for a completed job, returning the created row.
    pub async fn create(
        pool: &PgPool,
        input: &CreateUsageRecord,
    ) -> Result<UsageRecord, sqlx::Error> {
        let query = format!(
            "INSERT INTO usage_records (user_id, video_name, prompt, summary_length, processing_secs)
             VALUES ($1, $2, $3, $4, $5)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, UsageRecord>(&query)
            .bind(input.user_id)
            .bind(&input.video_name)
            .bind(&input.prompt)
            .bind(input.summary_length)
            .bind(input.processing_secs)
            .fetch_one(pool)
            .await
    }

    /// Page through one user's records, newest first.
    pub async fn find_by_user(
        pool: &PgPool,
        user_id: DbId,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<UsageRecord>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM usage_records
             WHERE user_id = $1
             ORDER BY created_at DESC
             LIMIT $2 OFFSET $3"
        );
        sqlx::query_as::<_, UsageRecord>(&query)
            .bind(user_id)
            .bind(limit)
            .bind(offset)
            .fetch_all(pool)
            .await
    }

    /// Total number of records for one user.
    pub async fn count_for_user(pool: &PgPool, user_id: DbId) -> Result<i64, sqlx::Error> {
        sqlx::query_scalar("SELECT COUNT(*) FROM usage_records WHERE user_id = $1")
            .bind(user_id)
            .fetch_one(pool)
            .await
    }

    /// Most recent records across all users, newest first.
    pub async fn recent(pool: &PgPool, limit: i64) -> Result<Vec<UsageRecord>, sqlx::Error> {
        let query =
            format!("SELECT {COLUMNS} FROM usage_records ORDER BY created_at DESC LIMIT $1");
        sqlx::query_as::<_, UsageRecord>(&query)
            .bind(limit)
            .fetch_all(pool)
            .await
    }
}
