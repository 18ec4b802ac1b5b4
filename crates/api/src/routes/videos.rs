//! Route definitions for the `/videos` resource.

use axum::extract::DefaultBodyLimit;
use axum::routing::post;
use axum::Router;

use crate::handlers::videos;
use crate::state::AppState;

/// Maximum accepted upload size: 500 MiB.
const MAX_UPLOAD_BYTES: usize = 500 * 1024 * 1024;

/// Routes mounted at the API root.
///
/// ```text
/// POST /videos  -> process an uploaded video (auth required)
/// ```
///
/// The default 2 MB body limit is replaced on this route only; everything
/// else keeps axum's default.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/videos", post(videos::process_video))
        .layer(DefaultBodyLimit::max(MAX_UPLOAD_BYTES))
}
