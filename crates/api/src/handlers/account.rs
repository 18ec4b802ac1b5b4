//! Handlers for the current user's own data (`/profile`, `/history`).

use axum::extract::{Query, State};
use axum::Json;
use serde::Serialize;

use clipbrief_db::models::usage_record::UsageRecord;
use clipbrief_db::models::user::UserResponse;
use clipbrief_db::repositories::UsageRepo;

use crate::error::AppResult;
use crate::middleware::auth::AuthUser;
use crate::query::{PageMeta, PageParams};
use crate::state::AppState;

/// Response for `GET /profile`.
#[derive(Debug, Serialize)]
pub struct ProfileResponse {
    #[serde(flatten)]
    pub user: UserResponse,
    /// Seconds of processing time still available, clamped at zero.
    pub remaining_secs: i32,
}

/// Response for `GET /history`.
#[derive(Debug, Serialize)]
pub struct HistoryResponse {
    pub records: Vec<UsageRecord>,
    #[serde(flatten)]
    pub meta: PageMeta,
}

/// GET /api/v1/profile
///
/// The authenticated user's profile plus remaining quota.
pub async fn profile(auth: AuthUser) -> AppResult<Json<ProfileResponse>> {
    let remaining_secs = auth.user.remaining_secs();
    Ok(Json(ProfileResponse {
        user: auth.user.into(),
        remaining_secs,
    }))
}

/// GET /api/v1/history
///
/// The authenticated user's usage records, newest first, paginated.
pub async fn history(
    State(state): State<AppState>,
    auth: AuthUser,
    Query(params): Query<PageParams>,
) -> AppResult<Json<HistoryResponse>> {
    let (limit, offset) = params.limit_offset();

    let records = UsageRepo::find_by_user(&state.pool, auth.user.id, limit, offset).await?;
    let total = UsageRepo::count_for_user(&state.pool, auth.user.id).await?;

    Ok(Json(HistoryResponse {
        records,
        meta: PageMeta::new(&params, total),
    }))
}
