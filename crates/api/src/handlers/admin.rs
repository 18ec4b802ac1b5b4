//! Handlers for the `/admin` resource (user management, usage oversight).

use axum::extract::{Path, Query, State};
use axum::Json;
use serde::{Deserialize, Serialize};

use clipbrief_core::error::CoreError;
use clipbrief_core::types::DbId;
use clipbrief_db::models::usage_record::UsageRecord;
use clipbrief_db::models::user::UserResponse;
use clipbrief_db::repositories::{UsageRepo, UserRepo};

use crate::error::{AppError, AppResult};
use crate::middleware::auth::AdminUser;
use crate::query::{PageMeta, PageParams};
use crate::state::AppState;

/// How many of a user's records the usage detail endpoint returns.
const USAGE_DETAIL_RECORDS: i64 = 10;

// ---------------------------------------------------------------------------
// Request / response types
// ---------------------------------------------------------------------------

/// Response for `GET /admin/users`.
#[derive(Debug, Serialize)]
pub struct UserListResponse {
    pub users: Vec<UserResponse>,
    #[serde(flatten)]
    pub meta: PageMeta,
}

/// Response for `GET /admin/users/{id}/usage`.
#[derive(Debug, Serialize)]
pub struct UserUsageResponse {
    pub user: UserResponse,
    pub remaining_secs: i32,
    /// The user's most recent records, newest first.
    pub records: Vec<UsageRecord>,
    /// Total records on file for this user.
    pub total_records: i64,
}

/// Response for `GET /admin/usage/recent`.
#[derive(Debug, Serialize)]
pub struct RecentUsageResponse {
    pub records: Vec<UsageRecord>,
}

/// Request body for `PUT /admin/users/limit`.
#[derive(Debug, Deserialize)]
pub struct UpdateLimitRequest {
    pub user_id: DbId,
    pub limit_seconds: i32,
}

// ---------------------------------------------------------------------------
// Handlers
// ---------------------------------------------------------------------------

/// GET /api/v1/admin/users
///
/// Paginated user list, newest accounts first.
pub async fn list_users(
    State(state): State<AppState>,
    AdminUser(_admin): AdminUser,
    Query(params): Query<PageParams>,
) -> AppResult<Json<UserListResponse>> {
    let (limit, offset) = params.limit_offset();

    let users = UserRepo::list(&state.pool, limit, offset).await?;
    let total = UserRepo::count(&state.pool).await?;

    Ok(Json(UserListResponse {
        users: users.into_iter().map(UserResponse::from).collect(),
        meta: PageMeta::new(&params, total),
    }))
}

/// GET /api/v1/admin/users/{id}/usage
///
/// One user's quota standing and their most recent records.
pub async fn user_usage(
    State(state): State<AppState>,
    AdminUser(_admin): AdminUser,
    Path(id): Path<DbId>,
) -> AppResult<Json<UserUsageResponse>> {
    let user = UserRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound { entity: "user", id }))?;

    let records = UsageRepo::find_by_user(&state.pool, id, USAGE_DETAIL_RECORDS, 0).await?;
    let total_records = UsageRepo::count_for_user(&state.pool, id).await?;

    let remaining_secs = user.remaining_secs();
    Ok(Json(UserUsageResponse {
        user: user.into(),
        remaining_secs,
        records,
        total_records,
    }))
}

/// GET /api/v1/admin/usage/recent
///
/// Most recent processing activity across all users.
pub async fn recent_usage(
    State(state): State<AppState>,
    AdminUser(_admin): AdminUser,
    Query(params): Query<PageParams>,
) -> AppResult<Json<RecentUsageResponse>> {
    let records = UsageRepo::recent(&state.pool, params.page_size()).await?;
    Ok(Json(RecentUsageResponse { records }))
}

/// PUT /api/v1/admin/users/limit
///
/// Override a user's processing-seconds limit. Consumed time is untouched,
/// so raising the limit is the way to grant more quota.
pub async fn update_limit(
    State(state): State<AppState>,
    AdminUser(admin): AdminUser,
    Json(input): Json<UpdateLimitRequest>,
) -> AppResult<Json<UserResponse>> {
    if input.limit_seconds < 0 {
        return Err(AppError::Core(CoreError::Validation(
            "limit_seconds must be non-negative".into(),
        )));
    }

    let user = UserRepo::set_limit(&state.pool, input.user_id, input.limit_seconds)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "user",
            id: input.user_id,
        }))?;

    tracing::info!(
        admin_id = admin.user.id,
        user_id = user.id,
        limit_seconds = input.limit_seconds,
        "Usage limit updated"
    );

    Ok(Json(user.into()))
}
