//! Seam between the HTTP orchestrator and the media pipeline.
//!
//! The `POST /videos` handler drives any [`VideoProcessor`]; production
//! wires in [`MediaPipeline`], which runs the real four-stage pipeline.
//! Integration tests substitute a backend with a canned outcome so the
//! post-pipeline accounting can be exercised without ffmpeg or a provider
//! endpoint.

use std::future::Future;
use std::path::PathBuf;
use std::pin::Pin;
use std::sync::Arc;

use clipbrief_pipeline::{run_pipeline, PipelineError, PipelineOutput, PipelineSettings};

/// Boxed future returned by [`VideoProcessor::process`].
pub type ProcessingFuture =
    Pin<Box<dyn Future<Output = Result<PipelineOutput, PipelineError>> + Send>>;

/// A processing backend that turns an uploaded video into a transcript and
/// summary.
pub trait VideoProcessor: Send + Sync {
    /// Process the video file at `video` under the user-supplied `prompt`.
    ///
    /// The returned future owns its inputs so the caller can run it as a
    /// detached task.
    fn process(&self, video: PathBuf, prompt: String) -> ProcessingFuture;
}

/// The production backend: ffmpeg extraction/conversion plus the provider's
/// transcription and summarization APIs.
pub struct MediaPipeline {
    settings: Arc<PipelineSettings>,
}

impl MediaPipeline {
    pub fn new(settings: Arc<PipelineSettings>) -> Self {
        Self { settings }
    }
}

impl VideoProcessor for MediaPipeline {
    fn process(&self, video: PathBuf, prompt: String) -> ProcessingFuture {
        let settings = Arc::clone(&self.settings);
        Box::pin(async move { run_pipeline(&settings, &video, &prompt).await })
    }
}
