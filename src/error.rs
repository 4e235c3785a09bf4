//! Failure taxonomy for the pipeline.
//!
//! Every failure is caught at the orchestrator boundary and converted into a
//! user-facing reply; nothing here should ever surface as a panic or an
//! unhandled crash in the transport layer. Retries, if any, are a host-layer
//! policy applied to the whole pipeline invocation.

use thiserror::Error;

/// Failures from the transcription adapter.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TranscriptionError {
    /// The transport's format hint does not match anything the provider
    /// accepts. Detected before any network call.
    #[error("unsupported audio format: {0}")]
    UnsupportedAudio(String),

    /// The provider returned an empty or whitespace-only transcript
    /// (silent audio). Terminal; never treated as an echo of empty text.
    #[error("transcript was empty")]
    EmptyTranscript,

    /// Network error or non-success response from the provider.
    #[error("transcription provider error: {0}")]
    Provider(String),
}

/// Failures from the calendar event extraction step.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ExtractionError {
    /// The underlying language-model call failed.
    #[error("extraction call failed: {0}")]
    CallFailed(String),

    /// The model responded, but not in the expected structured shape.
    #[error("extraction response did not match the expected shape: {0}")]
    MalformedResponse(String),

    /// No start time could be determined from the text.
    #[error("no usable date or time in the message")]
    NoTemporalInformation,
}

/// Failures from a destination writer adapter. No partial-write recovery:
/// a failure aborts the pipeline for that event.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DestinationWriteError {
    /// The destination answered with a non-success status (auth failure,
    /// schema mismatch, quota).
    #[error("{destination} rejected the write (status {status}): {detail}")]
    Rejected {
        destination: &'static str,
        status: u16,
        detail: String,
    },

    /// The request never completed (network error, timeout).
    #[error("{destination} request failed: {detail}")]
    Transport {
        destination: &'static str,
        detail: String,
    },
}

/// Any failure a pipeline run can end in.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PipelineError {
    #[error("transcription failed: {0}")]
    Transcription(#[from] TranscriptionError),

    #[error("event extraction failed: {0}")]
    Extraction(#[from] ExtractionError),

    #[error("destination write failed: {0}")]
    DestinationWrite(#[from] DestinationWriteError),
}

impl PipelineError {
    /// Non-technical reply template for this failure kind. The user always
    /// receives some reply; there is no silent drop.
    pub fn user_reply(&self) -> &'static str {
        match self {
            PipelineError::Transcription(TranscriptionError::UnsupportedAudio(_)) => {
                "Sorry, I can't process that audio format."
            }
            PipelineError::Transcription(_) => "Sorry, I couldn't understand the audio.",
            PipelineError::Extraction(ExtractionError::NoTemporalInformation) => {
                "I couldn't figure out a date or time for that event."
            }
            PipelineError::Extraction(_) => "Sorry, I couldn't work out the event details.",
            PipelineError::DestinationWrite(_) => {
                "Sorry, I couldn't save that right now. Please try again later."
            }
        }
    }
}
