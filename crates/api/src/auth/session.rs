//! Session-token generation and validation.
//!
//! Sessions are stateless HS256-signed JWTs containing a [`Claims`] payload.
//! There is no server-side session store and no revocation: a token stays
//! valid until its expiry regardless of account changes.

use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};

use clipbrief_core::types::DbId;

use crate::config::AuthConfig;

/// Token issuer embedded in (and required of) every session token.
const ISSUER: &str = "clipbrief";

/// JWT claims embedded in every session token.
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Claims {
    /// Subject -- the user's internal database id.
    pub sub: DbId,
    /// Issued-at time (UTC Unix timestamp).
    pub iat: i64,
    /// Expiration time (UTC Unix timestamp).
    pub exp: i64,
    /// Token issuer.
    pub iss: String,
}

/// Why a session could not be issued or verified.
#[derive(Debug, thiserror::Error)]
pub enum SessionError {
    /// `SESSION_SECRET` is not configured; token operations fail closed.
    #[error("session secret is not configured")]
    MissingSecret,

    /// The token's expiry has passed.
    #[error("session token has expired")]
    Expired,

    /// Malformed token, bad signature, wrong issuer, or any other
    /// verification failure.
    #[error("invalid session token: {0}")]
    Invalid(jsonwebtoken::errors::Error),
}

impl From<jsonwebtoken::errors::Error> for SessionError {
    fn from(err: jsonwebtoken::errors::Error) -> Self {
        match err.kind() {
            jsonwebtoken::errors::ErrorKind::ExpiredSignature => SessionError::Expired,
            _ => SessionError::Invalid(err),
        }
    }
}

/// Issue a signed session token for the given user.
///
/// The token expires `session_ttl_days` after issue and carries no role
/// information; authorization is resolved from the database on each request.
pub fn issue_session(user_id: DbId, config: &AuthConfig) -> Result<String, SessionError> {
    let secret = config
        .session_secret
        .as_deref()
        .ok_or(SessionError::MissingSecret)?;

    let now = chrono::Utc::now().timestamp();
    let claims = Claims {
        sub: user_id,
        iat: now,
        exp: now + config.session_ttl_days * 24 * 60 * 60,
        iss: ISSUER.to_string(),
    };

    let token = encode(
        &Header::default(), // HS256
        &claims,
        &EncodingKey::from_secret(secret.as_bytes()),
    )?;
    Ok(token)
}

/// Validate a session token and return the user id it was issued for.
///
/// Checks the signature, expiry, and issuer. No revocation lookup.
pub fn verify_session(token: &str, config: &AuthConfig) -> Result<DbId, SessionError> {
    let secret = config
        .session_secret
        .as_deref()
        .ok_or(SessionError::MissingSecret)?;

    let mut validation = Validation::default(); // HS256, validates exp
    validation.set_issuer(&[ISSUER]);

    let token_data = decode::<Claims>(
        token,
        &DecodingKey::from_secret(secret.as_bytes()),
        &validation,
    )?;
    Ok(token_data.claims.sub)
}
