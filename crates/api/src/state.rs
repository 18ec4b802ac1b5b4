use std::sync::Arc;

use clipbrief_pipeline::PipelineSettings;

use crate::config::ServerConfig;
use crate::processing::VideoProcessor;

/// Shared application state available to all Axum handlers via `State<AppState>`.
///
/// This is cheaply cloneable (inner data is behind `Arc` or is already `Clone`).
#[derive(Clone)]
pub struct AppState {
    /// Database connection pool.
    pub pool: clipbrief_db::DbPool,
    /// Server configuration (secrets, CORS, timeouts).
    pub config: Arc<ServerConfig>,
    /// Media pipeline settings (provider API key, models, stage timeouts).
    pub pipeline: Arc<PipelineSettings>,
    /// Processing backend the `/videos` orchestrator drives.
    pub processor: Arc<dyn VideoProcessor>,
}
