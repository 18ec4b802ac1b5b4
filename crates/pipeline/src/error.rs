use std::time::Duration;

/// Typed failure for each pipeline stage.
///
/// The first failing stage aborts the run; the remaining stages never start.
#[derive(Debug, thiserror::Error)]
pub enum PipelineError {
    /// The provider API key is unconfigured. Jobs fail closed rather than
    /// degrading.
    #[error("transcription/summarization capability is not configured (OPENAI_API_KEY missing)")]
    MissingApiKey,

    /// ffmpeg could not be spawned at all.
    #[error("ffmpeg binary not found: {0}")]
    FfmpegNotFound(std::io::Error),

    /// Stage 1: extracting the audio track failed.
    #[error("audio extraction failed (exit code {exit_code:?}): {stderr}")]
    AudioExtraction {
        exit_code: Option<i32>,
        stderr: String,
    },

    /// Stage 2: converting the audio to MP3 failed.
    #[error("audio conversion failed (exit code {exit_code:?}): {stderr}")]
    AudioConversion {
        exit_code: Option<i32>,
        stderr: String,
    },

    /// Stage 3: the speech-to-text call failed.
    #[error("transcription failed: {0}")]
    Transcription(String),

    /// Stage 3: the speech-to-text call exceeded its deadline.
    #[error("transcription timed out after {0:?}")]
    TranscriptionTimeout(Duration),

    /// Stage 4: the text-generation call failed.
    #[error("summary generation failed: {0}")]
    Summary(String),

    /// Stage 4: the text-generation call exceeded its deadline.
    #[error("summary generation timed out after {0:?}")]
    SummaryTimeout(Duration),

    /// Stage 4: the generation capability returned no candidate output.
    #[error("the generation capability returned an empty response")]
    EmptySummaryResponse,

    /// Reading or writing an intermediate artifact failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}
