//! Verification of identity-provider login assertions.
//!
//! The provider redirects the user to us with their profile fields plus an
//! HMAC-SHA256 signature. The signing key is `SHA256(shared_secret)` (the
//! provider's derived-key scheme) and the message is the canonical string
//! of the payload: every field except the signature rendered as `key=value`,
//! empty optional fields omitted, sorted by key, joined with newlines.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use hmac::{Hmac, Mac};
use serde::Deserialize;
use sha2::{Digest, Sha256};

use crate::config::AuthConfig;

type HmacSha256 = Hmac<Sha256>;

/// Maximum accepted age of an assertion's `auth_date`, in seconds.
const MAX_ASSERTION_AGE_SECS: i64 = 24 * 60 * 60;

/// A signed login assertion, as delivered by the provider's login widget
/// in query parameters.
///
/// `id`, `auth_date`, and `signature` are required; profile fields default
/// to empty when the provider omits them.
#[derive(Debug, Clone, Deserialize)]
pub struct LoginAssertion {
    /// The provider's subject id for this user.
    pub id: i64,
    #[serde(default)]
    pub username: String,
    #[serde(default)]
    pub first_name: String,
    #[serde(default)]
    pub last_name: String,
    #[serde(default)]
    pub photo_url: String,
    /// Unix timestamp at which the provider authenticated the user.
    pub auth_date: i64,
    /// Hex HMAC-SHA256 digest of the canonical string.
    pub signature: String,
}

/// Why an assertion was rejected.
#[derive(Debug, thiserror::Error)]
pub enum AssertionError {
    /// `auth_date` is older than the acceptance window.
    #[error("login assertion has expired")]
    Expired,

    /// `PROVIDER_SECRET` is not configured; verification fails closed.
    #[error("provider secret is not configured")]
    MissingSecret,

    /// The supplied signature does not match the payload.
    #[error("login assertion signature mismatch")]
    BadSignature,
}

impl LoginAssertion {
    /// Render the canonical string the signature is computed over.
    ///
    /// Empty optional fields are omitted so our string matches what the
    /// provider signed when it left those fields out of the redirect.
    fn canonical_string(&self) -> String {
        let mut fields = BTreeMap::new();
        fields.insert("id", self.id.to_string());
        fields.insert("auth_date", self.auth_date.to_string());
        if !self.username.is_empty() {
            fields.insert("username", self.username.clone());
        }
        if !self.first_name.is_empty() {
            fields.insert("first_name", self.first_name.clone());
        }
        if !self.last_name.is_empty() {
            fields.insert("last_name", self.last_name.clone());
        }
        if !self.photo_url.is_empty() {
            fields.insert("photo_url", self.photo_url.clone());
        }

        fields
            .into_iter()
            .map(|(k, v)| format!("{k}={v}"))
            .collect::<Vec<_>>()
            .join("\n")
    }
}

/// Build the HMAC over an assertion's canonical string.
///
/// Keyed with `SHA256(shared_secret)` per the provider's protocol.
fn signature_mac(assertion: &LoginAssertion, shared_secret: &str) -> HmacSha256 {
    let key = Sha256::digest(shared_secret.as_bytes());

    let mut mac =
        HmacSha256::new_from_slice(&key).expect("HMAC-SHA256 accepts keys of any length");
    mac.update(assertion.canonical_string().as_bytes());
    mac
}

/// Decode a hex digest into bytes, accepting either case.
///
/// Returns `None` for odd-length or non-hex input.
fn decode_hex_digest(digest: &str) -> Option<Vec<u8>> {
    if digest.len() % 2 != 0 || !digest.bytes().all(|b| b.is_ascii_hexdigit()) {
        return None;
    }
    (0..digest.len())
        .step_by(2)
        .map(|i| u8::from_str_radix(&digest[i..i + 2], 16).ok())
        .collect()
}

/// Verify a login assertion against the configured provider secret.
///
/// Freshness is checked first: an assertion older than 24 hours is rejected
/// regardless of its signature. The digest comparison runs in constant time.
/// Pure function of payload, secret, and clock; the caller performs the
/// identity upsert on success.
pub fn verify_login_assertion(
    assertion: &LoginAssertion,
    config: &AuthConfig,
    now: DateTime<Utc>,
) -> Result<(), AssertionError> {
    if now.timestamp() - assertion.auth_date > MAX_ASSERTION_AGE_SECS {
        return Err(AssertionError::Expired);
    }

    let secret = config
        .provider_secret
        .as_deref()
        .ok_or(AssertionError::MissingSecret)?;

    let supplied =
        decode_hex_digest(&assertion.signature).ok_or(AssertionError::BadSignature)?;
    signature_mac(assertion, secret)
        .verify_slice(&supplied)
        .map_err(|_| AssertionError::BadSignature)
}
