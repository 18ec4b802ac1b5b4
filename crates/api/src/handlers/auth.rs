//! Handlers for the `/auth` resource (provider login, admin login).

use axum::extract::{Query, State};
use axum::Json;
use chrono::Utc;
use serde::{Deserialize, Serialize};

use clipbrief_core::error::CoreError;
use clipbrief_db::models::user::{ProviderLogin, User, UserResponse};
use clipbrief_db::repositories::UserRepo;

use crate::auth::assertion::{verify_login_assertion, AssertionError, LoginAssertion};
use crate::auth::password::verify_password;
use crate::auth::session::{issue_session, SessionError};
use crate::error::{AppError, AppResult};
use crate::state::AppState;

// ---------------------------------------------------------------------------
// Request / response types
// ---------------------------------------------------------------------------

/// Request body for `POST /auth/admin`.
#[derive(Debug, Deserialize)]
pub struct AdminLoginRequest {
    pub username: String,
    pub password: String,
}

/// Successful authentication response returned by both login endpoints.
#[derive(Debug, Serialize)]
pub struct AuthResponse {
    /// Signed session token; valid for 30 days, not revocable.
    pub token: String,
    pub user: UserResponse,
}

// ---------------------------------------------------------------------------
// Handlers
// ---------------------------------------------------------------------------

/// GET /api/v1/auth/provider
///
/// Verify the identity provider's signed login assertion (delivered as
/// query parameters), create or refresh the user, and issue a session.
pub async fn provider_login(
    State(state): State<AppState>,
    Query(assertion): Query<LoginAssertion>,
) -> AppResult<Json<AuthResponse>> {
    verify_login_assertion(&assertion, &state.config.auth, Utc::now()).map_err(|e| match e {
        AssertionError::MissingSecret => AppError::Core(CoreError::Configuration(e.to_string())),
        AssertionError::Expired | AssertionError::BadSignature => {
            AppError::Core(CoreError::Unauthorized(e.to_string()))
        }
    })?;

    let login = ProviderLogin {
        provider_id: assertion.id,
        username: assertion.username,
        first_name: assertion.first_name,
        last_name: assertion.last_name,
        photo_url: assertion.photo_url,
    };
    let user = UserRepo::upsert_provider_login(&state.pool, &login).await?;

    if !user.is_active {
        return Err(AppError::Core(CoreError::Forbidden(
            "Account is deactivated".into(),
        )));
    }

    tracing::info!(user_id = user.id, provider_id = assertion.id, "Provider login");
    let response = session_response(&state, user)?;
    Ok(Json(response))
}

/// POST /api/v1/auth/admin
///
/// Authenticate an admin account with username + password.
pub async fn admin_login(
    State(state): State<AppState>,
    Json(input): Json<AdminLoginRequest>,
) -> AppResult<Json<AuthResponse>> {
    let user = UserRepo::find_by_username(&state.pool, &input.username)
        .await?
        .ok_or_else(|| {
            AppError::Core(CoreError::Unauthorized(
                "Invalid username or password".into(),
            ))
        })?;

    if !user.is_admin {
        return Err(AppError::Core(CoreError::Forbidden(
            "Admin access required".into(),
        )));
    }

    if !user.is_active {
        return Err(AppError::Core(CoreError::Forbidden(
            "Account is deactivated".into(),
        )));
    }

    // Provider-only accounts carry no password hash and can never pass here.
    let Some(hash) = user.password_hash.as_deref() else {
        return Err(AppError::Core(CoreError::Unauthorized(
            "Invalid username or password".into(),
        )));
    };

    let password_valid = verify_password(&input.password, hash)
        .map_err(|e| AppError::InternalError(format!("Password verification error: {e}")))?;

    if !password_valid {
        return Err(AppError::Core(CoreError::Unauthorized(
            "Invalid username or password".into(),
        )));
    }

    UserRepo::record_login(&state.pool, user.id).await?;

    tracing::info!(user_id = user.id, "Admin login");
    let response = session_response(&state, user)?;
    Ok(Json(response))
}

/// Issue a session token for the user and assemble the login response.
fn session_response(state: &AppState, user: User) -> Result<AuthResponse, AppError> {
    let token = issue_session(user.id, &state.config.auth).map_err(|e| match e {
        SessionError::MissingSecret => AppError::Core(CoreError::Configuration(e.to_string())),
        other => AppError::InternalError(format!("Session issuing failed: {other}")),
    })?;

    Ok(AuthResponse {
        token,
        user: user.into(),
    })
}
