pub mod account;
pub mod admin;
pub mod auth;
pub mod health;
pub mod videos;

use axum::Router;

use crate::state::AppState;

/// Build the `/api/v1` route tree.
///
/// Route hierarchy:
///
/// ```text
/// /auth/provider                 provider login assertion (public, GET)
/// /auth/admin                    admin username/password login (public, POST)
///
/// /videos                        process an upload (auth required, POST)
///
/// /profile                       current user + remaining quota (GET)
/// /history                       current user's usage records (GET)
///
/// /admin/users                   paginated user list (admin, GET)
/// /admin/users/{id}/usage        one user's quota + records (admin, GET)
/// /admin/users/limit             override a usage limit (admin, PUT)
/// /admin/usage/recent            recent activity across users (admin, GET)
/// ```
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .nest("/auth", auth::router())
        .merge(videos::router())
        .merge(account::router())
        .nest("/admin", admin::router())
}
