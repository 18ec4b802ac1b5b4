//! The two ffmpeg subprocess stages: audio extraction and MP3 conversion.

use std::path::Path;

use crate::error::PipelineError;

/// Outcome of one ffmpeg invocation, before it is attributed to a stage.
enum FfmpegFailure {
    /// The binary could not be spawned at all.
    Spawn(std::io::Error),
    /// The process ran and exited non-zero.
    Failed {
        exit_code: Option<i32>,
        stderr: String,
    },
}

/// Stage 1: extract the audio track from a video as 44.1 kHz stereo PCM.
pub async fn extract_audio(video_path: &Path, wav_path: &Path) -> Result<(), PipelineError> {
    run_ffmpeg(&[
        "-y",
        "-i",
        &video_path.to_string_lossy(),
        "-vn",
        "-acodec",
        "pcm_s16le",
        "-ar",
        "44100",
        "-ac",
        "2",
        &wav_path.to_string_lossy(),
    ])
    .await
    .map_err(|f| match f {
        FfmpegFailure::Spawn(e) => PipelineError::FfmpegNotFound(e),
        FfmpegFailure::Failed { exit_code, stderr } => {
            PipelineError::AudioExtraction { exit_code, stderr }
        }
    })
}

/// Stage 2: convert the extracted audio to the low-bitrate MP3 the
/// transcription API expects.
pub async fn convert_to_mp3(wav_path: &Path, mp3_path: &Path) -> Result<(), PipelineError> {
    run_ffmpeg(&[
        "-y",
        "-i",
        &wav_path.to_string_lossy(),
        "-codec:a",
        "libmp3lame",
        "-qscale:a",
        "2",
        "-b:a",
        "32k",
        &mp3_path.to_string_lossy(),
    ])
    .await
    .map_err(|f| match f {
        FfmpegFailure::Spawn(e) => PipelineError::FfmpegNotFound(e),
        FfmpegFailure::Failed { exit_code, stderr } => {
            PipelineError::AudioConversion { exit_code, stderr }
        }
    })
}

/// Run ffmpeg to completion, capturing stderr for diagnostics.
async fn run_ffmpeg(args: &[&str]) -> Result<(), FfmpegFailure> {
    let output = tokio::process::Command::new("ffmpeg")
        .args(args)
        .output()
        .await
        .map_err(FfmpegFailure::Spawn)?;

    if !output.status.success() {
        return Err(FfmpegFailure::Failed {
            exit_code: output.status.code(),
            stderr: String::from_utf8_lossy(&output.stderr).to_string(),
        });
    }

    Ok(())
}
