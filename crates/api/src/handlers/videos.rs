//! Handler for `POST /videos` -- the processing orchestrator.
//!
//! Gatekeeping happens before any expensive work: authentication (via the
//! [`AuthUser`] extractor), the advisory quota check, and the API-key check
//! all reject the request without touching the upload. The pipeline itself
//! runs as its own tokio task whose `JoinHandle` is awaited exactly once,
//! so every job has exactly one terminal outcome.

use std::path::Path;
use std::time::Instant;

use axum::extract::{Multipart, State};
use axum::Json;
use serde::Serialize;
use tokio::io::AsyncWriteExt;

use clipbrief_core::error::CoreError;
use clipbrief_db::models::usage_record::CreateUsageRecord;
use clipbrief_db::repositories::{UsageRepo, UserRepo};
use clipbrief_pipeline::TempArtifact;

use crate::error::{AppError, AppResult};
use crate::middleware::auth::AuthUser;
use crate::state::AppState;

/// Response for a successfully processed video.
#[derive(Debug, Serialize)]
pub struct ProcessResponse {
    pub transcript: String,
    pub summary: String,
    /// Whole seconds of processing time charged against the quota.
    pub elapsed_secs: i32,
}

/// POST /api/v1/videos
///
/// Multipart upload (`file` + `prompt`) through the four-stage pipeline.
/// On success the elapsed whole seconds are charged to the user's quota
/// and an audit record is written; neither write failure fails the job.
pub async fn process_video(
    State(state): State<AppState>,
    auth: AuthUser,
    mut multipart: Multipart,
) -> AppResult<Json<ProcessResponse>> {
    let user = auth.user;

    // Advisory quota gate: checked before the pipeline, charged after.
    if user.remaining_secs() <= 0 {
        return Err(AppError::Core(CoreError::Forbidden(
            "Processing quota exhausted".into(),
        )));
    }

    // Without an API key the transcription stage cannot run; reject before
    // accepting the upload.
    if state.pipeline.api_key.is_none() {
        return Err(AppError::Core(CoreError::Configuration(
            "transcription API key is not configured".into(),
        )));
    }

    let (video, video_name, prompt) = read_upload(&mut multipart).await?;

    tracing::info!(
        user_id = user.id,
        video_name = %video_name,
        remaining_secs = user.remaining_secs(),
        "Starting video processing"
    );
    let started = Instant::now();

    // Run the processing backend in its own task and await its single
    // outcome. The temp artifact stays owned by this handler so the upload
    // is cleaned up on every exit path, including a pipeline panic.
    let job = state
        .processor
        .process(video.path().to_path_buf(), prompt.clone());
    let handle = tokio::spawn(job);

    let output = handle
        .await
        .map_err(|e| AppError::InternalError(format!("Pipeline task failed: {e}")))??;

    let elapsed_secs = started.elapsed().as_secs() as i32;

    // Charge the quota, then record the job. Both happen after the result
    // exists; failures are logged and the result is still returned.
    match UserRepo::add_consumption(&state.pool, user.id, elapsed_secs).await {
        Ok(true) => {}
        Ok(false) => {
            tracing::error!(user_id = user.id, "Quota charge matched no user row");
        }
        Err(e) => tracing::error!(user_id = user.id, error = %e, "Failed to charge quota"),
    }

    let record = CreateUsageRecord {
        user_id: user.id,
        video_name,
        prompt,
        summary_length: output.summary.len() as i32,
        processing_secs: elapsed_secs,
    };
    if let Err(e) = UsageRepo::create(&state.pool, &record).await {
        tracing::error!(user_id = user.id, error = %e, "Failed to write usage record");
    }

    tracing::info!(user_id = user.id, elapsed_secs, "Video processing complete");

    Ok(Json(ProcessResponse {
        transcript: output.transcript,
        summary: output.summary,
        elapsed_secs,
    }))
}

/// Read the multipart upload into a temp file and collect the prompt.
///
/// Returns the artifact guard owning the uploaded video, the client-supplied
/// file name, and the prompt. Missing parts are a 400.
async fn read_upload(
    multipart: &mut Multipart,
) -> Result<(TempArtifact, String, String), AppError> {
    let mut video: Option<(TempArtifact, String)> = None;
    let mut prompt: Option<String> = None;

    while let Some(mut field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::BadRequest(format!("Malformed multipart body: {e}")))?
    {
        let name = field.name().map(str::to_owned);
        match name.as_deref() {
            Some("file") => {
                let file_name = field.file_name().unwrap_or("upload").to_string();
                let extension = Path::new(&file_name)
                    .extension()
                    .and_then(|e| e.to_str())
                    .unwrap_or("mp4");

                let artifact = TempArtifact::with_extension(extension);
                let mut file = tokio::fs::File::create(artifact.path())
                    .await
                    .map_err(|e| AppError::InternalError(format!("Upload spool failed: {e}")))?;

                while let Some(chunk) = field
                    .chunk()
                    .await
                    .map_err(|e| AppError::BadRequest(format!("Upload read failed: {e}")))?
                {
                    file.write_all(&chunk).await.map_err(|e| {
                        AppError::InternalError(format!("Upload spool failed: {e}"))
                    })?;
                }
                file.flush()
                    .await
                    .map_err(|e| AppError::InternalError(format!("Upload spool failed: {e}")))?;

                video = Some((artifact, file_name));
            }
            Some("prompt") => {
                let text = field
                    .text()
                    .await
                    .map_err(|e| AppError::BadRequest(format!("Malformed prompt field: {e}")))?;
                prompt = Some(text);
            }
            _ => {} // unknown parts are ignored
        }
    }

    let (artifact, file_name) =
        video.ok_or_else(|| AppError::BadRequest("Missing 'file' part".into()))?;
    let prompt = prompt
        .filter(|p| !p.trim().is_empty())
        .ok_or_else(|| AppError::BadRequest("Missing 'prompt' part".into()))?;

    Ok((artifact, file_name, prompt))
}
