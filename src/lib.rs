//! voiceroute - voice-message intent dispatch pipeline
//!
//! Takes one inbound voice event from a chat platform, transcribes it,
//! classifies the speaker's intent from a leading keyword, and routes the
//! transcript to exactly one destination - a note store, a calendar, or a
//! plain echo - producing exactly one reply.
//!
//! # Architecture
//!
//! - `adapters`: boundary clients for external services (transcription,
//!   field extraction, note store, calendar), each behind a narrow trait
//! - `core`: the pipeline itself (classifier, extractor, note builder,
//!   orchestrator state machine)
//! - `domain`: transient data flowing through one run
//! - `config`: explicit immutable configuration threaded in at construction
//! - `error`: failure taxonomy; every kind maps to a user-facing reply
//!
//! The webhook transport, credential loading, and process hosting live
//! outside this crate: the host hands the orchestrator a `VoiceEvent` and
//! sends back the `PipelineResult`'s reply text.
//!
//! # Usage
//!
//! ```no_run
//! use chrono::Utc;
//! use voiceroute::{
//!     AudioClip, GoogleCalendarWriter, NotionNoteWriter, OpenAiExtractor,
//!     PipelineConfig, PipelineOrchestrator, VoiceEvent, WhisperTranscriber,
//! };
//!
//! # async fn example(audio_bytes: Vec<u8>) {
//! let orchestrator = PipelineOrchestrator::new(
//!     PipelineConfig::default(),
//!     WhisperTranscriber::new("openai-key"),
//!     OpenAiExtractor::new("openai-key"),
//!     NotionNoteWriter::new("notion-key", "database-id"),
//!     GoogleCalendarWriter::new("calendar-token"),
//! );
//!
//! let result = orchestrator
//!     .handle(VoiceEvent {
//!         source_user_id: "U123".to_string(),
//!         audio: AudioClip::new(audio_bytes, "audio/m4a"),
//!         received_at: Utc::now(),
//!     })
//!     .await;
//!
//! println!("{}", result.reply_text);
//! # }
//! ```

pub mod adapters;
pub mod config;
pub mod core;
pub mod domain;
pub mod error;

// Re-export main types at crate root for convenience
pub use adapters::{
    DestinationWriter, ExtractedFields, ExtractionPrompt, FieldExtractor, GoogleCalendarWriter,
    NotionNoteWriter, OpenAiExtractor, TranscriptProvider, WhisperTranscriber,
};
pub use config::{ConfigError, PipelineConfig, TriggerTokens};
pub use core::{
    build_note, CalendarEventExtractor, Classification, Intent, IntentClassifier,
    PipelineOrchestrator, PipelineState,
};
pub use domain::{
    AudioClip, AudioFormat, CalendarEventDraft, NoteRecord, PipelineResult, SideEffect, StoredId,
    Transcript, VoiceEvent,
};
pub use error::{DestinationWriteError, ExtractionError, PipelineError, TranscriptionError};
