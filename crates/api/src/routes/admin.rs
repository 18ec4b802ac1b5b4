//! Route definitions for the `/admin` resource.
//!
//! All handlers here use the [`AdminUser`] extractor, so non-admin callers
//! are rejected with 403 before any handler logic runs.
//!
//! [`AdminUser`]: crate::middleware::auth::AdminUser

use axum::routing::{get, put};
use axum::Router;

use crate::handlers::admin;
use crate::state::AppState;

/// Routes mounted at `/admin`.
///
/// ```text
/// GET /users             -> paginated user list
/// GET /users/{id}/usage  -> one user's quota standing + recent records
/// PUT /users/limit       -> override a user's usage limit
/// GET /usage/recent      -> recent activity across all users
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/users", get(admin::list_users))
        .route("/users/{id}/usage", get(admin::user_usage))
        .route("/users/limit", put(admin::update_limit))
        .route("/usage/recent", get(admin::recent_usage))
}
