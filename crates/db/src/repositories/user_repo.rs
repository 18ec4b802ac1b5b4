//! Repository for the `users` table.
//!
//! Besides identity lookups this repository is the quota ledger: it owns
//! the `usage_limit_secs` / `usage_consumed_secs` counters and is the only
//! code that mutates them.

use clipbrief_core::types::DbId;
use sqlx::PgPool;

use crate::models::user::{ProviderLogin, User};

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str = "id, provider_id, username, first_name, last_name, photo_url, \
                        password_hash, is_active, is_admin, usage_limit_secs, \
                        usage_consumed_secs, last_login_at, created_at, updated_at";

/// Identity persistence and quota accounting for users.
pub struct UserRepo;

impl UserRepo {
    /// Find a user by internal ID.
    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<User>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM users WHERE id = $1");
        sqlx::query_as::<_, User>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Find a user by the external provider's subject id.
    pub async fn find_by_provider_id(
        pool: &PgPool,
        provider_id: i64,
    ) -> Result<Option<User>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM users WHERE provider_id = $1");
        sqlx::query_as::<_, User>(&query)
            .bind(provider_id)
            .fetch_optional(pool)
            .await
    }

    /// Find a user by username (case-sensitive).
    pub async fn find_by_username(
        pool: &PgPool,
        username: &str,
    ) -> Result<Option<User>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM users WHERE username = $1");
        sqlx::query_as::<_, User>(&query)
            .bind(username)
            .fetch_optional(pool)
            .await
    }

    /// Create or refresh a user from a verified identity-provider login.
    ///
    /// First login inserts the row (with the default usage limit from the
    /// schema); subsequent logins refresh the profile fields. Both paths
    /// stamp `last_login_at` and `updated_at`.
    pub async fn upsert_provider_login(
        pool: &PgPool,
        login: &ProviderLogin,
    ) -> Result<User, sqlx::Error> {
        let query = format!(
            "INSERT INTO users (provider_id, username, first_name, last_name, photo_url, last_login_at)
             VALUES ($1, $2, $3, $4, $5, NOW())
             ON CONFLICT (provider_id) DO UPDATE SET
                username = EXCLUDED.username,
                first_name = EXCLUDED.first_name,
                last_name = EXCLUDED.last_name,
                photo_url = EXCLUDED.photo_url,
                last_login_at = NOW(),
                updated_at = NOW()
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, User>(&query)
            .bind(login.provider_id)
            .bind(&login.username)
            .bind(&login.first_name)
            .bind(&login.last_name)
            .bind(&login.photo_url)
            .fetch_one(pool)
            .await
    }

    /// Create an admin account with a pre-hashed password.
    ///
    /// Admin accounts have no `provider_id`; they authenticate with
    /// username + password only.
    pub async fn create_admin(
        pool: &PgPool,
        username: &str,
        password_hash: &str,
    ) -> Result<User, sqlx::Error> {
        let query = format!(
            "INSERT INTO users (username, password_hash, is_admin)
             VALUES ($1, $2, true)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, User>(&query)
            .bind(username)
            .bind(password_hash)
            .fetch_one(pool)
            .await
    }

    /// Record a successful login by stamping `last_login_at`.
    pub async fn record_login(pool: &PgPool, id: DbId) -> Result<(), sqlx::Error> {
        sqlx::query("UPDATE users SET last_login_at = NOW(), updated_at = NOW() WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;
        Ok(())
    }

    /// List users ordered by most recently created first.
    pub async fn list(pool: &PgPool, limit: i64, offset: i64) -> Result<Vec<User>, sqlx::Error> {
        let query =
            format!("SELECT {COLUMNS} FROM users ORDER BY created_at DESC LIMIT $1 OFFSET $2");
        sqlx::query_as::<_, User>(&query)
            .bind(limit)
            .bind(offset)
            .fetch_all(pool)
            .await
    }

    /// Total number of users.
    pub async fn count(pool: &PgPool) -> Result<i64, sqlx::Error> {
        sqlx::query_scalar("SELECT COUNT(*) FROM users")
            .fetch_one(pool)
            .await
    }

    /// Soft-deactivate a user. Returns `true` if the row was updated.
    pub async fn deactivate(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query(
            "UPDATE users SET is_active = false, updated_at = NOW()
             WHERE id = $1 AND is_active = true",
        )
        .bind(id)
        .execute(pool)
        .await?;
        Ok(result.rows_affected() > 0)
    }

    // -----------------------------------------------------------------------
    // Quota ledger
    // -----------------------------------------------------------------------

    /// Seconds of processing time the user may still consume.
    ///
    /// Returns `max(0, limit - consumed)`, or `None` if the user is absent.
    pub async fn remaining_seconds(pool: &PgPool, id: DbId) -> Result<Option<i32>, sqlx::Error> {
        let row: Option<(i32, i32)> =
            sqlx::query_as("SELECT usage_limit_secs, usage_consumed_secs FROM users WHERE id = $1")
                .bind(id)
                .fetch_optional(pool)
                .await?;
        Ok(row.map(|(limit, consumed)| (limit - consumed).max(0)))
    }

    /// Charge `seconds` of processing time against the user's quota.
    ///
    /// The consumed counter only moves forward: `seconds` must be
    /// non-negative. A negative charge is a caller bug (debug-asserted)
    /// and is clamped to zero in release builds. Returns whether a user
    /// row was actually charged.
    ///
    /// The increment happens inside the database so concurrent charges for
    /// the same user never lose updates. The quota is advisory: it is
    /// checked before a job starts and charged after it completes, so two
    /// concurrent jobs for one user may jointly overshoot the limit.
    pub async fn add_consumption(
        pool: &PgPool,
        id: DbId,
        seconds: i32,
    ) -> Result<bool, sqlx::Error> {
        debug_assert!(seconds >= 0, "quota charges must be non-negative");
        let result = sqlx::query(
            "UPDATE users SET
                usage_consumed_secs = usage_consumed_secs + $2,
                updated_at = NOW()
             WHERE id = $1",
        )
        .bind(id)
        .bind(seconds.max(0))
        .execute(pool)
        .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Administrative override of the usage limit. Consumed time is untouched.
    ///
    /// Returns the updated row, or `None` if the user is absent.
    pub async fn set_limit(
        pool: &PgPool,
        id: DbId,
        limit_seconds: i32,
    ) -> Result<Option<User>, sqlx::Error> {
        let query = format!(
            "UPDATE users SET usage_limit_secs = $2, updated_at = NOW()
             WHERE id = $1
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, User>(&query)
            .bind(id)
            .bind(limit_seconds)
            .fetch_optional(pool)
            .await
    }
}
