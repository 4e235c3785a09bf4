//! Whisper transcription adapter.
//!
//! Uploads audio to an OpenAI-compatible `audio/transcriptions` endpoint
//! and returns the plain-text transcript.

use async_trait::async_trait;
use reqwest::multipart::{Form, Part};
use tracing::debug;

use crate::domain::{AudioClip, AudioFormat, Transcript};
use crate::error::TranscriptionError;

use super::TranscriptProvider;

const DEFAULT_ENDPOINT: &str = "https://api.openai.com/v1/audio/transcriptions";
const DEFAULT_MODEL: &str = "whisper-1";

/// HTTP client for the transcription provider.
pub struct WhisperTranscriber {
    api_key: String,
    endpoint: String,
    model: String,
    client: reqwest::Client,
}

impl WhisperTranscriber {
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            endpoint: DEFAULT_ENDPOINT.to_string(),
            model: DEFAULT_MODEL.to_string(),
            client: reqwest::Client::new(),
        }
    }

    /// Point the adapter at a different OpenAI-compatible endpoint.
    pub fn with_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.endpoint = endpoint.into();
        self
    }

    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }
}

#[async_trait]
impl TranscriptProvider for WhisperTranscriber {
    async fn transcribe(&self, audio: &AudioClip) -> Result<Transcript, TranscriptionError> {
        // Reject unknown containers before spending a network call.
        let format = AudioFormat::from_hint(&audio.format_hint)
            .ok_or_else(|| TranscriptionError::UnsupportedAudio(audio.format_hint.clone()))?;

        let file_part = Part::bytes(audio.bytes.clone())
            .file_name(format!("voice.{}", format.extension()))
            .mime_str(format.mime_type())
            .map_err(|e| TranscriptionError::Provider(e.to_string()))?;

        let form = Form::new()
            .text("model", self.model.clone())
            .text("response_format", "text")
            .part("file", file_part);

        debug!(bytes = audio.bytes.len(), format = ?format, "uploading audio for transcription");

        let response = self
            .client
            .post(&self.endpoint)
            .bearer_auth(&self.api_key)
            .multipart(form)
            .send()
            .await
            .map_err(|e| TranscriptionError::Provider(e.to_string()))?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| TranscriptionError::Provider(e.to_string()))?;

        if !status.is_success() {
            return Err(TranscriptionError::Provider(format!(
                "status {status}: {}",
                body.trim()
            )));
        }

        let text = body.trim();
        if text.is_empty() {
            return Err(TranscriptionError::EmptyTranscript);
        }

        Ok(Transcript::new(text))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn unsupported_format_fails_before_any_request() {
        let transcriber = WhisperTranscriber::new("test-key");
        let clip = AudioClip::new(vec![0u8; 16], "audio/flac");

        let err = transcriber.transcribe(&clip).await.unwrap_err();
        assert_eq!(
            err,
            TranscriptionError::UnsupportedAudio("audio/flac".to_string())
        );
    }

    #[test]
    fn builder_overrides_endpoint_and_model() {
        let transcriber = WhisperTranscriber::new("k")
            .with_endpoint("http://localhost:9000/v1/audio/transcriptions")
            .with_model("whisper-large");

        assert_eq!(
            transcriber.endpoint,
            "http://localhost:9000/v1/audio/transcriptions"
        );
        assert_eq!(transcriber.model, "whisper-large");
    }
}
