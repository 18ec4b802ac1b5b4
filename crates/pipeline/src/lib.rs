//! The media processing pipeline: a four-stage, strictly ordered,
//! fail-fast transformation of an uploaded video into a transcript
//! and a summary.
//!
//! Stages:
//! 1. Extract the audio track from the video (ffmpeg subprocess).
//! 2. Convert the audio to MP3 for the transcription API (ffmpeg subprocess).
//! 3. Transcribe the audio (speech-to-text capability, 5 minute timeout).
//! 4. Summarize the transcript with the caller's prompt (text-generation
//!    capability, 3 minute timeout, deterministic sampling).
//!
//! The pipeline stops at the first failing stage and returns that stage's
//! typed [`PipelineError`]. Intermediate artifacts are owned by
//! [`TempArtifact`] guards, so cleanup is attempted on every exit path but
//! is never part of the success/failure contract.

pub mod artifact;
pub mod error;
pub mod openai;
pub mod stages;

use std::path::Path;
use std::time::Duration;

pub use artifact::TempArtifact;
pub use error::PipelineError;
use openai::OpenAiClient;

/// Default timeout for the transcription stage.
const DEFAULT_TRANSCRIBE_TIMEOUT_SECS: u64 = 300;

/// Default timeout for the summarization stage.
const DEFAULT_SUMMARY_TIMEOUT_SECS: u64 = 180;

/// Configuration for the pipeline's external capabilities.
///
/// Loaded once at startup and threaded through application state; the
/// API key is optional so a missing secret fails closed per-job with
/// [`PipelineError::MissingApiKey`] rather than panicking at boot.
#[derive(Debug, Clone)]
pub struct PipelineSettings {
    /// API key for the transcription/summarization provider.
    pub api_key: Option<String>,
    /// Base URL of the provider API.
    pub api_base: String,
    /// Speech-to-text model name.
    pub transcribe_model: String,
    /// Text-generation model name.
    pub summary_model: String,
    /// Target language passed to the transcription capability.
    pub language: String,
    /// Timeout for the transcription stage.
    pub transcribe_timeout: Duration,
    /// Timeout for the summarization stage.
    pub summary_timeout: Duration,
}

impl PipelineSettings {
    /// Load pipeline settings from environment variables.
    ///
    /// | Env Var                    | Default                      |
    /// |----------------------------|------------------------------|
    /// | `OPENAI_API_KEY`           | unset (jobs fail closed)     |
    /// | `OPENAI_API_BASE`          | `https://api.openai.com/v1`  |
    /// | `TRANSCRIBE_MODEL`         | `whisper-1`                  |
    /// | `SUMMARY_MODEL`            | `gpt-4o-mini`                |
    /// | `TRANSCRIBE_LANGUAGE`      | `ru`                         |
    pub fn from_env() -> Self {
        Self {
            api_key: std::env::var("OPENAI_API_KEY").ok().filter(|k| !k.is_empty()),
            api_base: std::env::var("OPENAI_API_BASE")
                .unwrap_or_else(|_| "https://api.openai.com/v1".into()),
            transcribe_model: std::env::var("TRANSCRIBE_MODEL")
                .unwrap_or_else(|_| "whisper-1".into()),
            summary_model: std::env::var("SUMMARY_MODEL")
                .unwrap_or_else(|_| "gpt-4o-mini".into()),
            language: std::env::var("TRANSCRIBE_LANGUAGE").unwrap_or_else(|_| "ru".into()),
            transcribe_timeout: Duration::from_secs(DEFAULT_TRANSCRIBE_TIMEOUT_SECS),
            summary_timeout: Duration::from_secs(DEFAULT_SUMMARY_TIMEOUT_SECS),
        }
    }
}

/// Result of a successful pipeline run.
#[derive(Debug, Clone)]
pub struct PipelineOutput {
    pub transcript: String,
    pub summary: String,
}

/// Run all four stages against the uploaded video.
///
/// The caller owns `video_path` (including its cleanup); intermediate
/// audio artifacts are created and discarded here. Each stage only runs
/// if the previous one produced its artifact.
pub async fn run_pipeline(
    settings: &PipelineSettings,
    video_path: &Path,
    prompt: &str,
) -> Result<PipelineOutput, PipelineError> {
    let client = OpenAiClient::new(settings)?;

    let wav = TempArtifact::with_extension("wav");
    stages::extract_audio(video_path, wav.path()).await?;
    tracing::debug!(path = %wav.path().display(), "audio track extracted");

    let mp3 = TempArtifact::with_extension("mp3");
    stages::convert_to_mp3(wav.path(), mp3.path()).await?;
    // The wav is superseded once the mp3 exists.
    drop(wav);
    tracing::debug!(path = %mp3.path().display(), "audio converted to mp3");

    let transcript = client.transcribe(mp3.path()).await?;
    drop(mp3);
    tracing::debug!(chars = transcript.len(), "transcription complete");

    let summary = client.summarize(&transcript, prompt).await?;
    tracing::debug!(chars = summary.len(), "summary generated");

    Ok(PipelineOutput {
        transcript,
        summary,
    })
}
