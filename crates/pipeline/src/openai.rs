//! HTTP client for the speech-to-text and text-generation capabilities.
//!
//! Both calls carry a per-request deadline (5 minutes for transcription,
//! 3 minutes for summarization). Summaries use deterministic sampling
//! (temperature 0) so identical transcript+prompt pairs reproduce the
//! same output.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::PipelineError;
use crate::PipelineSettings;

/// Client bound to one provider endpoint and API key.
pub struct OpenAiClient {
    http: reqwest::Client,
    api_key: String,
    api_base: String,
    transcribe_model: String,
    summary_model: String,
    language: String,
    transcribe_timeout: std::time::Duration,
    summary_timeout: std::time::Duration,
}

// ---------------------------------------------------------------------------
// Wire types
// ---------------------------------------------------------------------------

/// Response body of the transcription endpoint.
#[derive(Debug, Deserialize)]
struct TranscriptionResponse {
    text: String,
}

/// Request body of the chat-completions endpoint.
#[derive(Debug, Serialize)]
struct ChatRequest {
    model: String,
    messages: Vec<ChatMessage>,
    temperature: f32,
}

#[derive(Debug, Serialize, Deserialize)]
struct ChatMessage {
    role: String,
    content: String,
}

/// Response body of the chat-completions endpoint.
#[derive(Debug, Deserialize)]
struct ChatResponse {
    #[serde(default)]
    choices: Vec<ChatChoice>,
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    message: ChatMessage,
}

// ---------------------------------------------------------------------------
// Client
// ---------------------------------------------------------------------------

impl OpenAiClient {
    /// Build a client from pipeline settings.
    ///
    /// Fails closed with [`PipelineError::MissingApiKey`] if the key is
    /// unconfigured.
    pub fn new(settings: &PipelineSettings) -> Result<Self, PipelineError> {
        let api_key = settings
            .api_key
            .clone()
            .ok_or(PipelineError::MissingApiKey)?;

        Ok(Self {
            http: reqwest::Client::new(),
            api_key,
            api_base: settings.api_base.trim_end_matches('/').to_string(),
            transcribe_model: settings.transcribe_model.clone(),
            summary_model: settings.summary_model.clone(),
            language: settings.language.clone(),
            transcribe_timeout: settings.transcribe_timeout,
            summary_timeout: settings.summary_timeout,
        })
    }

    /// Stage 3: transcribe an audio file into text.
    pub async fn transcribe(&self, audio_path: &Path) -> Result<String, PipelineError> {
        let bytes = tokio::fs::read(audio_path).await?;
        let filename = audio_path
            .file_name()
            .map(|n| n.to_string_lossy().to_string())
            .unwrap_or_else(|| "audio.mp3".to_string());

        let form = reqwest::multipart::Form::new()
            .part(
                "file",
                reqwest::multipart::Part::bytes(bytes).file_name(filename),
            )
            .text("model", self.transcribe_model.clone())
            .text("language", self.language.clone());

        let response = self
            .http
            .post(format!("{}/audio/transcriptions", self.api_base))
            .bearer_auth(&self.api_key)
            .multipart(form)
            .timeout(self.transcribe_timeout)
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    PipelineError::TranscriptionTimeout(self.transcribe_timeout)
                } else {
                    PipelineError::Transcription(e.to_string())
                }
            })?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(PipelineError::Transcription(format!("{status}: {body}")));
        }

        let parsed: TranscriptionResponse = response
            .json()
            .await
            .map_err(|e| PipelineError::Transcription(format!("invalid response body: {e}")))?;

        Ok(parsed.text)
    }

    /// Stage 4: summarize a transcript under the caller's instruction.
    pub async fn summarize(&self, transcript: &str, prompt: &str) -> Result<String, PipelineError> {
        let request = ChatRequest {
            model: self.summary_model.clone(),
            messages: vec![
                ChatMessage {
                    role: "system".to_string(),
                    content: prompt.to_string(),
                },
                ChatMessage {
                    role: "user".to_string(),
                    content: transcript.to_string(),
                },
            ],
            // Deterministic sampling: the same transcript and prompt must
            // reproduce the same summary.
            temperature: 0.0,
        };

        let response = self
            .http
            .post(format!("{}/chat/completions", self.api_base))
            .bearer_auth(&self.api_key)
            .json(&request)
            .timeout(self.summary_timeout)
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    PipelineError::SummaryTimeout(self.summary_timeout)
                } else {
                    PipelineError::Summary(e.to_string())
                }
            })?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(PipelineError::Summary(format!("{status}: {body}")));
        }

        let parsed: ChatResponse = response
            .json()
            .await
            .map_err(|e| PipelineError::Summary(format!("invalid response body: {e}")))?;

        summary_from_response(parsed)
    }
}

/// Extract the summary text from a chat-completion response: first
/// candidate's content, trimmed of surrounding whitespace.
fn summary_from_response(response: ChatResponse) -> Result<String, PipelineError> {
    let first = response
        .choices
        .into_iter()
        .next()
        .ok_or(PipelineError::EmptySummaryResponse)?;
    Ok(first.message.content.trim().to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn summary_is_trimmed() {
        let response = ChatResponse {
            choices: vec![ChatChoice {
                message: ChatMessage {
                    role: "assistant".to_string(),
                    content: "  \n The summary. \n\n".to_string(),
                },
            }],
        };
        let summary = summary_from_response(response).expect("candidate present");
        assert_eq!(summary, "The summary.");
    }

    #[test]
    fn empty_choice_list_is_rejected() {
        let response = ChatResponse { choices: vec![] };
        match summary_from_response(response) {
            Err(PipelineError::EmptySummaryResponse) => {}
            other => panic!("expected EmptySummaryResponse, got {other:?}"),
        }
    }

    /// A chat response with a missing `choices` key still deserializes
    /// (serde default) and is then rejected as empty.
    #[test]
    fn missing_choices_key_deserializes_as_empty() {
        let parsed: ChatResponse =
            serde_json::from_str(r#"{"id": "cmpl-1"}"#).expect("deserialization should succeed");
        assert!(parsed.choices.is_empty());
    }

    #[test]
    fn chat_response_wire_format_parses() {
        let raw = r#"{
            "id": "cmpl-2",
            "choices": [
                {"index": 0, "message": {"role": "assistant", "content": "ok"}, "finish_reason": "stop"}
            ]
        }"#;
        let parsed: ChatResponse = serde_json::from_str(raw).expect("deserialization should succeed");
        assert_eq!(parsed.choices.len(), 1);
        assert_eq!(parsed.choices[0].message.content, "ok");
    }
}
