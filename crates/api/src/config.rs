/// Authentication configuration (session signing, provider secret).
///
/// Both secrets are optional at load time. Operations that need a missing
/// secret fail closed with a configuration error instead of the server
/// refusing to boot; this keeps local development (where, say, the
/// provider login is unused) workable without dummy secrets.
#[derive(Debug, Clone)]
pub struct AuthConfig {
    /// HMAC-SHA256 secret used to sign and verify session tokens.
    pub session_secret: Option<String>,
    /// Shared secret of the external identity provider, used to verify
    /// signed login assertions.
    pub provider_secret: Option<String>,
    /// Session token lifetime in days (default: 30).
    pub session_ttl_days: i64,
}

/// Default session token lifetime in days.
const DEFAULT_SESSION_TTL_DAYS: i64 = 30;

impl AuthConfig {
    /// Load auth configuration from environment variables.
    ///
    /// | Env Var            | Required | Default |
    /// |--------------------|----------|---------|
    /// | `SESSION_SECRET`   | no       | unset (logins fail closed) |
    /// | `PROVIDER_SECRET`  | no       | unset (provider login fails closed) |
    /// | `SESSION_TTL_DAYS` | no       | `30`    |
    pub fn from_env() -> Self {
        let session_secret = std::env::var("SESSION_SECRET")
            .ok()
            .filter(|s| !s.is_empty());
        let provider_secret = std::env::var("PROVIDER_SECRET")
            .ok()
            .filter(|s| !s.is_empty());

        let session_ttl_days: i64 = std::env::var("SESSION_TTL_DAYS")
            .unwrap_or_else(|_| DEFAULT_SESSION_TTL_DAYS.to_string())
            .parse()
            .expect("SESSION_TTL_DAYS must be a valid i64");

        Self {
            session_secret,
            provider_secret,
            session_ttl_days,
        }
    }
}

/// Server configuration loaded from environment variables.
///
/// All fields have sensible defaults suitable for local development.
/// In production, override via environment variables.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Bind address (default: `0.0.0.0`).
    pub host: String,
    /// Bind port (default: `3000`).
    pub port: u16,
    /// Allowed CORS origins, parsed from comma-separated `CORS_ORIGINS` env var.
    pub cors_origins: Vec<String>,
    /// HTTP request timeout in seconds (default: `900`).
    ///
    /// Deliberately generous: a video upload plus the full pipeline
    /// (two ffmpeg passes, 5-minute transcription budget, 3-minute
    /// summarization budget) runs inside a single request.
    pub request_timeout_secs: u64,
    /// Authentication configuration (secrets, session lifetime).
    pub auth: AuthConfig,
}

impl ServerConfig {
    /// Load configuration from environment variables with defaults.
    ///
    /// | Env Var                | Default                    |
    /// |------------------------|----------------------------|
    /// | `HOST`                 | `0.0.0.0`                  |
    /// | `PORT`                 | `3000`                     |
    /// | `CORS_ORIGINS`         | `http://localhost:5173`    |
    /// | `REQUEST_TIMEOUT_SECS` | `900`                      |
    pub fn from_env() -> Self {
        let host = std::env::var("HOST").unwrap_or_else(|_| "0.0.0.0".into());

        let port: u16 = std::env::var("PORT")
            .unwrap_or_else(|_| "3000".into())
            .parse()
            .expect("PORT must be a valid u16");

        let cors_origins: Vec<String> = std::env::var("CORS_ORIGINS")
            .unwrap_or_else(|_| "http://localhost:5173".into())
            .split(',')
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect();

        let request_timeout_secs: u64 = std::env::var("REQUEST_TIMEOUT_SECS")
            .unwrap_or_else(|_| "900".into())
            .parse()
            .expect("REQUEST_TIMEOUT_SECS must be a valid u64");

        let auth = AuthConfig::from_env();

        Self {
            host,
            port,
            cors_origins,
            request_timeout_secs,
            auth,
        }
    }
}
