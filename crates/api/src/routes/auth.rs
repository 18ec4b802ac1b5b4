//! Route definitions for the `/auth` resource.

use axum::routing::{get, post};
use axum::Router;

use crate::handlers::auth;
use crate::state::AppState;

/// Routes mounted at `/auth`.
///
/// ```text
/// GET  /provider  -> provider login (signed assertion in query params)
/// POST /admin     -> admin login (username + password)
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/provider", get(auth::provider_login))
        .route("/admin", post(auth::admin_login))
}
