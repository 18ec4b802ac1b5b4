//! Session-based authentication extractors for Axum handlers.
//!
//! Unlike role-in-token schemes, the session token only carries the user id;
//! the user row (active flag, admin flag, quota counters) is loaded from the
//! database on every request, so deactivation takes effect immediately even
//! though tokens cannot be revoked.

use axum::extract::FromRequestParts;
use axum::http::request::Parts;

use clipbrief_core::error::CoreError;
use clipbrief_db::models::user::User;
use clipbrief_db::repositories::UserRepo;

use crate::auth::session::{verify_session, SessionError};
use crate::error::AppError;
use crate::state::AppState;

/// Authenticated user extracted from a Bearer session token in the
/// `Authorization` header.
///
/// Use this as an extractor parameter in any handler that requires
/// authentication:
///
/// ```ignore
/// async fn my_handler(auth: AuthUser) -> AppResult<Json<()>> {
///     tracing::info!(user_id = auth.user.id, "handling request");
///     Ok(Json(()))
/// }
/// ```
#[derive(Debug, Clone)]
pub struct AuthUser {
    /// The full user row, freshly loaded for this request.
    pub user: User,
}

impl FromRequestParts<AppState> for AuthUser {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let auth_header = parts
            .headers
            .get("authorization")
            .and_then(|v| v.to_str().ok())
            .ok_or_else(|| {
                AppError::Core(CoreError::Unauthorized(
                    "Missing Authorization header".into(),
                ))
            })?;

        let token = auth_header.strip_prefix("Bearer ").ok_or_else(|| {
            AppError::Core(CoreError::Unauthorized(
                "Invalid Authorization format. Expected: Bearer <token>".into(),
            ))
        })?;

        let user_id = verify_session(token, &state.config.auth).map_err(|e| match e {
            SessionError::MissingSecret => {
                AppError::Core(CoreError::Configuration(e.to_string()))
            }
            _ => AppError::Core(CoreError::Unauthorized("Invalid or expired token".into())),
        })?;

        let user = UserRepo::find_by_id(&state.pool, user_id)
            .await?
            .ok_or_else(|| {
                AppError::Core(CoreError::Unauthorized("User no longer exists".into()))
            })?;

        if !user.is_active {
            return Err(AppError::Core(CoreError::Forbidden(
                "Account is deactivated".into(),
            )));
        }

        Ok(AuthUser { user })
    }
}

/// Requires the authenticated user to be an admin. Rejects with 403 otherwise.
///
/// ```ignore
/// async fn admin_only(AdminUser(auth): AdminUser) -> AppResult<Json<()>> {
///     // auth.user is guaranteed to be an active admin here
///     Ok(Json(()))
/// }
/// ```
pub struct AdminUser(pub AuthUser);

impl FromRequestParts<AppState> for AdminUser {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let auth = AuthUser::from_request_parts(parts, state).await?;
        if !auth.user.is_admin {
            return Err(AppError::Core(CoreError::Forbidden(
                "Admin access required".into(),
            )));
        }
        Ok(AdminUser(auth))
    }
}
