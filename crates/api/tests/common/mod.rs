//! Shared harness for HTTP-level integration tests.
//!
//! Builds the application through [`build_app_router`] so tests exercise
//! the same middleware stack (CORS, request ID, timeout, tracing, panic
//! recovery) that production uses, and provides request/fixture helpers.

use std::sync::Arc;
use std::time::Duration;

use axum::body::Body;
use axum::http::{header, Request, StatusCode};
use axum::response::Response;
use axum::Router;
use hmac::{Hmac, Mac};
use http_body_util::BodyExt;
use sha2::{Digest, Sha256};
use sqlx::PgPool;
use tower::util::ServiceExt;

use clipbrief_api::auth::password::hash_password;
use clipbrief_api::auth::session::issue_session;
use clipbrief_api::config::{AuthConfig, ServerConfig};
use clipbrief_api::processing::{MediaPipeline, VideoProcessor};
use clipbrief_api::router::build_app_router;
use clipbrief_api::state::AppState;
use clipbrief_db::models::user::{ProviderLogin, User};
use clipbrief_db::repositories::UserRepo;
use clipbrief_pipeline::PipelineSettings;

/// Session secret used by every test app.
pub const SESSION_SECRET: &str = "test-session-secret-long-enough-for-hmac";

/// Provider shared secret used by every test app.
pub const PROVIDER_SECRET: &str = "test-provider-shared-secret";

/// Build a test `ServerConfig` with both secrets configured.
pub fn test_config() -> ServerConfig {
    ServerConfig {
        host: "127.0.0.1".to_string(),
        port: 0,
        cors_origins: vec!["http://localhost:5173".to_string()],
        request_timeout_secs: 30,
        auth: AuthConfig {
            session_secret: Some(SESSION_SECRET.to_string()),
            provider_secret: Some(PROVIDER_SECRET.to_string()),
            session_ttl_days: 30,
        },
    }
}

/// Pipeline settings with a dummy API key and an unroutable base URL, so a
/// test that accidentally reaches a network stage fails fast instead of
/// calling out.
pub fn test_pipeline_settings() -> PipelineSettings {
    PipelineSettings {
        api_key: Some("test-key".to_string()),
        api_base: "http://127.0.0.1:9".to_string(),
        transcribe_model: "whisper-1".to_string(),
        summary_model: "gpt-4o-mini".to_string(),
        language: "ru".to_string(),
        transcribe_timeout: Duration::from_secs(5),
        summary_timeout: Duration::from_secs(5),
    }
}

/// Build the full application router with all middleware layers.
pub fn build_test_app(pool: PgPool) -> Router {
    build_test_app_with_pipeline(pool, test_pipeline_settings())
}

/// Like [`build_test_app`] but with caller-supplied pipeline settings
/// (e.g. a missing API key).
pub fn build_test_app_with_pipeline(pool: PgPool, pipeline: PipelineSettings) -> Router {
    let pipeline = Arc::new(pipeline);
    let processor = Arc::new(MediaPipeline::new(Arc::clone(&pipeline)));
    build_test_app_inner(pool, pipeline, processor)
}

/// Like [`build_test_app`] but with a caller-supplied processing backend,
/// so tests can drive the orchestrator to a terminal outcome.
pub fn build_test_app_with_processor(pool: PgPool, processor: Arc<dyn VideoProcessor>) -> Router {
    build_test_app_inner(pool, Arc::new(test_pipeline_settings()), processor)
}

fn build_test_app_inner(
    pool: PgPool,
    pipeline: Arc<PipelineSettings>,
    processor: Arc<dyn VideoProcessor>,
) -> Router {
    let config = test_config();
    let state = AppState {
        pool,
        config: Arc::new(config.clone()),
        pipeline,
        processor,
    };
    build_app_router(state, &config)
}

// ---------------------------------------------------------------------------
// Request helpers
// ---------------------------------------------------------------------------

/// GET a path without authentication.
pub async fn get(app: Router, uri: &str) -> Response {
    let request = Request::builder()
        .method("GET")
        .uri(uri)
        .body(Body::empty())
        .expect("request should build");
    app.oneshot(request).await.expect("request should complete")
}

/// GET a path with a Bearer token.
pub async fn get_auth(app: Router, uri: &str, token: &str) -> Response {
    let request = Request::builder()
        .method("GET")
        .uri(uri)
        .header(header::AUTHORIZATION, format!("Bearer {token}"))
        .body(Body::empty())
        .expect("request should build");
    app.oneshot(request).await.expect("request should complete")
}

/// POST a JSON body without authentication.
pub async fn post_json(app: Router, uri: &str, body: serde_json::Value) -> Response {
    let request = Request::builder()
        .method("POST")
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .expect("request should build");
    app.oneshot(request).await.expect("request should complete")
}

/// PUT a JSON body with a Bearer token.
pub async fn put_json_auth(
    app: Router,
    uri: &str,
    body: serde_json::Value,
    token: &str,
) -> Response {
    let request = Request::builder()
        .method("PUT")
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .header(header::AUTHORIZATION, format!("Bearer {token}"))
        .body(Body::from(body.to_string()))
        .expect("request should build");
    app.oneshot(request).await.expect("request should complete")
}

/// One part of a multipart request body.
pub enum Part<'a> {
    /// A plain text field.
    Text(&'a str, &'a str),
    /// A file field: `(name, filename, content)`.
    File(&'a str, &'a str, &'a [u8]),
}

/// POST a multipart body with a Bearer token.
pub async fn post_multipart_auth(
    app: Router,
    uri: &str,
    parts: &[Part<'_>],
    token: &str,
) -> Response {
    const BOUNDARY: &str = "test-boundary-7MA4YWxkTrZu0gW";

    let mut body: Vec<u8> = Vec::new();
    for part in parts {
        body.extend_from_slice(format!("--{BOUNDARY}\r\n").as_bytes());
        match part {
            Part::Text(name, value) => {
                body.extend_from_slice(
                    format!("Content-Disposition: form-data; name=\"{name}\"\r\n\r\n").as_bytes(),
                );
                body.extend_from_slice(value.as_bytes());
            }
            Part::File(name, filename, content) => {
                body.extend_from_slice(
                    format!(
                        "Content-Disposition: form-data; name=\"{name}\"; filename=\"{filename}\"\r\n\
                         Content-Type: application/octet-stream\r\n\r\n"
                    )
                    .as_bytes(),
                );
                body.extend_from_slice(content);
            }
        }
        body.extend_from_slice(b"\r\n");
    }
    body.extend_from_slice(format!("--{BOUNDARY}--\r\n").as_bytes());

    let request = Request::builder()
        .method("POST")
        .uri(uri)
        .header(
            header::CONTENT_TYPE,
            format!("multipart/form-data; boundary={BOUNDARY}"),
        )
        .header(header::AUTHORIZATION, format!("Bearer {token}"))
        .body(Body::from(body))
        .expect("request should build");
    app.oneshot(request).await.expect("request should complete")
}

/// Collect a response body and parse it as JSON.
pub async fn body_json(response: Response) -> serde_json::Value {
    let bytes = response
        .into_body()
        .collect()
        .await
        .expect("body should collect")
        .to_bytes();
    serde_json::from_slice(&bytes).expect("body should be valid JSON")
}

/// Assert a response carries the standard error shape with the given code.
pub async fn assert_error_code(response: Response, status: StatusCode, code: &str) {
    assert_eq!(response.status(), status);
    let json = body_json(response).await;
    assert_eq!(json["code"], code, "unexpected error code: {json}");
    assert!(json["error"].is_string(), "error body must carry a message");
}

// ---------------------------------------------------------------------------
// Fixtures
// ---------------------------------------------------------------------------

/// Create a provider-backed user directly in the database.
pub async fn create_provider_user(pool: &PgPool, provider_id: i64, username: &str) -> User {
    let login = ProviderLogin {
        provider_id,
        username: username.to_string(),
        first_name: "Test".to_string(),
        last_name: "User".to_string(),
        photo_url: String::new(),
    };
    UserRepo::upsert_provider_login(pool, &login)
        .await
        .expect("user creation should succeed")
}

/// Create an admin account and return the row plus the plaintext password.
pub async fn create_admin_user(pool: &PgPool, username: &str) -> (User, String) {
    let password = "admin_password_123!";
    let hashed = hash_password(password).expect("hashing should succeed");
    let user = UserRepo::create_admin(pool, username, &hashed)
        .await
        .expect("admin creation should succeed");
    (user, password.to_string())
}

/// Issue a session token for a user under the test session secret.
pub fn session_token(user_id: i64) -> String {
    issue_session(user_id, &test_config().auth).expect("token issuing should succeed")
}

// ---------------------------------------------------------------------------
// Provider assertion signing (mirrors the provider side of the protocol)
// ---------------------------------------------------------------------------

/// Sign provider login fields the way the provider does: canonical
/// `key=value` lines sorted by key (empty fields omitted), HMAC-SHA256
/// keyed with `SHA256(shared_secret)`, hex digest.
pub fn sign_provider_fields(fields: &[(&str, String)], secret: &str) -> String {
    let mut sorted: Vec<_> = fields
        .iter()
        .filter(|(_, v)| !v.is_empty())
        .collect();
    sorted.sort_by_key(|(k, _)| *k);

    let canonical = sorted
        .iter()
        .map(|(k, v)| format!("{k}={v}"))
        .collect::<Vec<_>>()
        .join("\n");

    let key = Sha256::digest(secret.as_bytes());
    let mut mac =
        Hmac::<Sha256>::new_from_slice(&key).expect("HMAC-SHA256 accepts keys of any length");
    mac.update(canonical.as_bytes());
    mac.finalize()
        .into_bytes()
        .iter()
        .map(|b| format!("{b:02x}"))
        .collect()
}

/// Build a signed `/auth/provider` query string for the given identity.
pub fn signed_provider_query(provider_id: i64, username: &str, auth_date: i64) -> String {
    let fields = [
        ("id", provider_id.to_string()),
        ("username", username.to_string()),
        ("first_name", "Test".to_string()),
        ("auth_date", auth_date.to_string()),
    ];
    let signature = sign_provider_fields(&fields, PROVIDER_SECRET);

    format!(
        "id={provider_id}&username={username}&first_name=Test&auth_date={auth_date}&signature={signature}"
    )
}
