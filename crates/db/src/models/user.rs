//! User entity model and DTOs.

use clipbrief_core::types::{DbId, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// Full user row from the `users` table.
///
/// Contains the password hash -- NEVER serialize this to API responses
/// directly. Use [`UserResponse`] for external-facing output.
#[derive(Debug, Clone, FromRow)]
pub struct User {
    pub id: DbId,
    /// Subject id assigned by the external identity provider.
    /// `None` for accounts created by hand (admins).
    pub provider_id: Option<i64>,
    pub username: String,
    pub first_name: String,
    pub last_name: String,
    pub photo_url: String,
    /// Argon2id PHC string; only admin accounts carry one.
    pub password_hash: Option<String>,
    pub is_active: bool,
    pub is_admin: bool,
    pub usage_limit_secs: i32,
    pub usage_consumed_secs: i32,
    pub last_login_at: Option<Timestamp>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl User {
    /// Seconds of processing time this user may still consume,
    /// clamped at zero.
    pub fn remaining_secs(&self) -> i32 {
        (self.usage_limit_secs - self.usage_consumed_secs).max(0)
    }
}

/// Safe user representation for API responses (no password hash).
#[derive(Debug, Clone, Serialize)]
pub struct UserResponse {
    pub id: DbId,
    pub provider_id: Option<i64>,
    pub username: String,
    pub first_name: String,
    pub last_name: String,
    pub photo_url: String,
    pub is_active: bool,
    pub is_admin: bool,
    pub usage_limit_secs: i32,
    pub usage_consumed_secs: i32,
    pub last_login_at: Option<Timestamp>,
    pub created_at: Timestamp,
}

impl From<User> for UserResponse {
    fn from(user: User) -> Self {
        UserResponse {
            id: user.id,
            provider_id: user.provider_id,
            username: user.username,
            first_name: user.first_name,
            last_name: user.last_name,
            photo_url: user.photo_url,
            is_active: user.is_active,
            is_admin: user.is_admin,
            usage_limit_secs: user.usage_limit_secs,
            usage_consumed_secs: user.usage_consumed_secs,
            last_login_at: user.last_login_at,
            created_at: user.created_at,
        }
    }
}

/// Profile fields carried by a verified identity-provider login.
///
/// Used by [`UserRepo::upsert_provider_login`] to create the user on first
/// login or refresh the profile on subsequent logins.
///
/// [`UserRepo::upsert_provider_login`]: crate::repositories::UserRepo::upsert_provider_login
#[derive(Debug, Clone, Deserialize)]
pub struct ProviderLogin {
    pub provider_id: i64,
    pub username: String,
    pub first_name: String,
    pub last_name: String,
    pub photo_url: String,
}
