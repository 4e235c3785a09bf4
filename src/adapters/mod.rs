//! Adapter interfaces for external services.
//!
//! Each adapter wraps one external capability behind a narrow typed
//! interface: speech-to-text, language-model field extraction, and the two
//! destination write APIs. The core only ever sees these traits; the HTTP
//! clients live in the submodules.

pub mod gcal;
pub mod notion;
pub mod openai;
pub mod whisper;

use async_trait::async_trait;
use serde::Deserialize;

use crate::domain::{AudioClip, StoredId, Transcript};
use crate::error::{DestinationWriteError, ExtractionError, TranscriptionError};

pub use gcal::GoogleCalendarWriter;
pub use notion::NotionNoteWriter;
pub use openai::OpenAiExtractor;
pub use whisper::WhisperTranscriber;

/// Speech-to-text capability.
#[async_trait]
pub trait TranscriptProvider: Send + Sync {
    async fn transcribe(&self, audio: &AudioClip) -> Result<Transcript, TranscriptionError>;
}

/// Language-model call that maps free text onto calendar event fields.
///
/// Returns `Ok(None)` when the model reports that the text describes no
/// event. Anything that does not fit the expected structured shape is a
/// `MalformedResponse`, never a crash.
#[async_trait]
pub trait FieldExtractor: Send + Sync {
    async fn extract_fields(
        &self,
        prompt: &ExtractionPrompt,
    ) -> Result<Option<ExtractedFields>, ExtractionError>;
}

/// One destination write API. Two instances exist (notes, calendar) with
/// the same shape but different record types.
#[async_trait]
pub trait DestinationWriter: Send + Sync {
    type Record;

    /// Destination name used in logs and error detail.
    fn name(&self) -> &'static str;

    /// Persist one record. Never retries, never partially commits.
    async fn write(&self, record: &Self::Record) -> Result<StoredId, DestinationWriteError>;
}

/// Prompt for one extraction call, anchored to the event's receipt time.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExtractionPrompt {
    pub system: String,
    pub user: String,
}

/// Raw event fields as the model returned them, before validation and
/// time-zone resolution.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct ExtractedFields {
    #[serde(default)]
    pub title: Option<String>,

    /// ISO 8601 local time, or a bare date when the speaker gave none.
    #[serde(default)]
    pub start_time: Option<String>,

    #[serde(default)]
    pub end_time: Option<String>,

    #[serde(default)]
    pub location: Option<String>,
}
