//! Destination records and the pipeline outcome.
//!
//! Drafts are structured, not-yet-persisted representations of what a
//! destination adapter will write. All of them are transient: created and
//! consumed within a single pipeline run.

use chrono::DateTime;
use chrono_tz::Tz;
use serde::Serialize;

use crate::error::PipelineError;

/// A calendar event extracted from free text, ready for the calendar
/// destination.
///
/// Invariant: `end >= start`. The extractor enforces this before a draft is
/// ever constructed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CalendarEventDraft {
    pub title: String,
    pub start: DateTime<Tz>,
    pub end: DateTime<Tz>,
    pub location: Option<String>,

    /// The residual transcript the event was extracted from.
    pub source_text: String,
}

/// A note ready for the note destination.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NoteRecord {
    pub title: String,
    pub body: String,
    pub occurred_at: DateTime<Tz>,
    pub source_user_id: Option<String>,
}

impl NoteRecord {
    /// Fixed category tag applied to every note this pipeline writes.
    pub const TAG: &'static str = "voice-record";
}

/// Identifier returned by a destination after a successful write, plus the
/// browse URL when the destination provides one (surfaced in the reply).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoredId {
    pub id: String,
    pub url: Option<String>,
}

impl StoredId {
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            url: None,
        }
    }

    pub fn with_url(mut self, url: impl Into<String>) -> Self {
        self.url = Some(url.into());
        self
    }
}

/// The single side effect a pipeline run performed, if any.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SideEffect {
    NoteStored(StoredId),
    EventCreated(StoredId),
    None,
}

/// Outcome of one pipeline run. There is always a reply, even on failure.
#[derive(Debug)]
pub struct PipelineResult {
    /// Text to send back through the transport.
    pub reply_text: String,

    pub side_effect: SideEffect,

    /// Structured error when the run failed. `reply_text` then carries the
    /// user-facing template for the failure kind.
    pub error: Option<PipelineError>,
}

impl PipelineResult {
    pub fn succeeded(reply_text: String, side_effect: SideEffect) -> Self {
        Self {
            reply_text,
            side_effect,
            error: None,
        }
    }

    pub fn failed(error: PipelineError) -> Self {
        Self {
            reply_text: error.user_reply().to_string(),
            side_effect: SideEffect::None,
            error: Some(error),
        }
    }

    pub fn is_failure(&self) -> bool {
        self.error.is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::TranscriptionError;

    #[test]
    fn failed_result_carries_reply_and_no_side_effect() {
        let result = PipelineResult::failed(TranscriptionError::EmptyTranscript.into());

        assert!(result.is_failure());
        assert_eq!(result.side_effect, SideEffect::None);
        assert!(!result.reply_text.is_empty());
    }

    #[test]
    fn stored_id_builder() {
        let id = StoredId::new("abc").with_url("https://example.com/abc");
        assert_eq!(id.id, "abc");
        assert_eq!(id.url.as_deref(), Some("https://example.com/abc"));
    }
}
