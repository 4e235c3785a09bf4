//! Data structures flowing through the pipeline.
//!
//! Everything here is transient: created on event arrival, consumed by the
//! time the reply is sent.

pub mod message;
pub mod records;

pub use message::{AudioClip, AudioFormat, Transcript, VoiceEvent};
pub use records::{CalendarEventDraft, NoteRecord, PipelineResult, SideEffect, StoredId};
