//! Route definitions for the current user's own data.

use axum::routing::get;
use axum::Router;

use crate::handlers::account;
use crate::state::AppState;

/// Routes mounted at the API root.
///
/// ```text
/// GET /profile  -> current user + remaining quota
/// GET /history  -> current user's usage records (paginated)
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/profile", get(account::profile))
        .route("/history", get(account::history))
}
