//! Pipeline orchestrator.
//!
//! Drives one voice event through the state machine
//! `Received → Transcribing → Classified → {Extracting | Building} →
//! Writing → Replying → Done`, with `Failed` reachable from any state.
//! Every run produces a reply: failures are converted into their
//! user-facing templates at this boundary and never escape as panics.

use tracing::{debug, info, instrument, warn};

use crate::adapters::{DestinationWriter, FieldExtractor, TranscriptProvider};
use crate::config::PipelineConfig;
use crate::domain::{
    CalendarEventDraft, NoteRecord, PipelineResult, SideEffect, StoredId, VoiceEvent,
};
use crate::error::{PipelineError, TranscriptionError};

use super::classifier::{Intent, IntentClassifier};
use super::extractor::CalendarEventExtractor;
use super::note::build_note;

/// States of one pipeline run. Used for logging and assertions; the
/// transitions themselves are enforced by control flow in `run`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PipelineState {
    Received,
    Transcribing,
    Classified,
    Extracting,
    Building,
    Writing,
    Replying,
    Done,
    Failed,
}

/// Sequences the adapters for one incoming voice event.
///
/// Holds only read-only configuration and the adapters; `handle` takes
/// `&self`, so any number of events may be processed concurrently with no
/// shared mutable state between runs.
pub struct PipelineOrchestrator<T, X, N, C> {
    config: PipelineConfig,
    classifier: IntentClassifier,
    transcriber: T,
    extractor: CalendarEventExtractor<X>,
    note_writer: N,
    calendar_writer: C,
}

impl<T, X, N, C> PipelineOrchestrator<T, X, N, C>
where
    T: TranscriptProvider,
    X: FieldExtractor,
    N: DestinationWriter<Record = NoteRecord>,
    C: DestinationWriter<Record = CalendarEventDraft>,
{
    pub fn new(
        config: PipelineConfig,
        transcriber: T,
        field_extractor: X,
        note_writer: N,
        calendar_writer: C,
    ) -> Self {
        let classifier = IntentClassifier::new(&config.trigger_tokens);
        let extractor = CalendarEventExtractor::new(field_extractor, &config);

        Self {
            config,
            classifier,
            transcriber,
            extractor,
            note_writer,
            calendar_writer,
        }
    }

    /// Process one voice event to completion. Always returns a result with
    /// a reply; failures are folded into their reply templates here.
    #[instrument(skip(self, event), fields(user = %event.source_user_id))]
    pub async fn handle(&self, event: VoiceEvent) -> PipelineResult {
        match self.run(event).await {
            Ok(result) => {
                info!(state = ?PipelineState::Done, "pipeline run completed");
                result
            }
            Err(error) => {
                warn!(state = ?PipelineState::Failed, %error, "pipeline run failed");
                PipelineResult::failed(error)
            }
        }
    }

    async fn run(&self, event: VoiceEvent) -> Result<PipelineResult, PipelineError> {
        let mut state = PipelineState::Received;

        state = advance(state, PipelineState::Transcribing);
        let transcript = self.transcriber.transcribe(&event.audio).await?;
        if transcript.text.trim().is_empty() {
            // Terminal: an empty transcript is never echoed back.
            return Err(TranscriptionError::EmptyTranscript.into());
        }

        state = advance(state, PipelineState::Classified);
        let classified = self.classifier.classify(&transcript.text);
        info!(intent = ?classified.intent, "transcript classified");

        let (reply_text, side_effect) = match classified.intent {
            Intent::Echo => {
                advance(state, PipelineState::Replying);
                // Reply is the transcript itself; no write step.
                (transcript.text.clone(), SideEffect::None)
            }
            Intent::SaveNote => {
                state = advance(state, PipelineState::Building);
                let note = build_note(
                    &classified.residual,
                    Some(event.source_user_id.clone()),
                    event.received_at.with_timezone(&self.config.timezone),
                    &self.config,
                );

                state = advance(state, PipelineState::Writing);
                let stored = self.note_writer.write(&note).await?;
                info!(destination = self.note_writer.name(), id = %stored.id, "note stored");

                advance(state, PipelineState::Replying);
                (note_reply(&note, &stored), SideEffect::NoteStored(stored))
            }
            Intent::CreateCalendarEvent => {
                state = advance(state, PipelineState::Extracting);
                let draft = self
                    .extractor
                    .extract(&classified.residual, event.received_at)
                    .await?;

                state = advance(state, PipelineState::Writing);
                let stored = self.calendar_writer.write(&draft).await?;
                info!(destination = self.calendar_writer.name(), id = %stored.id, "event created");

                advance(state, PipelineState::Replying);
                (event_reply(&draft, &stored), SideEffect::EventCreated(stored))
            }
        };

        Ok(PipelineResult::succeeded(reply_text, side_effect))
    }
}

fn advance(from: PipelineState, to: PipelineState) -> PipelineState {
    debug!(?from, ?to, "state transition");
    to
}

/// Reply composition is pure formatting; it cannot fail.
fn note_reply(note: &NoteRecord, stored: &StoredId) -> String {
    let mut reply = format!("📝 Saved to your notes\n\n{}", note.body);
    if let Some(url) = &stored.url {
        reply.push_str("\n\n");
        reply.push_str(url);
    }
    reply
}

fn event_reply(draft: &CalendarEventDraft, stored: &StoredId) -> String {
    let mut reply = format!(
        "✅ Event added\n\nTitle: {}\nStarts: {}",
        draft.title,
        draft.start.format("%Y-%m-%d %H:%M %Z"),
    );
    if let Some(location) = &draft.location {
        reply.push_str("\nLocation: ");
        reply.push_str(location);
    }
    if let Some(url) = &stored.url {
        reply.push('\n');
        reply.push_str(url);
    }
    reply
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn note_reply_includes_body_and_url() {
        let note = NoteRecord {
            title: "t".to_string(),
            body: "today I learned X".to_string(),
            occurred_at: chrono_tz::Asia::Taipei
                .with_ymd_and_hms(2024, 5, 1, 10, 0, 0)
                .unwrap(),
            source_user_id: None,
        };
        let stored = StoredId::new("p1").with_url("https://notion.so/p1");

        let reply = note_reply(&note, &stored);
        assert!(reply.contains("today I learned X"));
        assert!(reply.contains("https://notion.so/p1"));
    }

    #[test]
    fn event_reply_includes_title_time_and_location() {
        let tz = chrono_tz::Asia::Taipei;
        let draft = CalendarEventDraft {
            title: "Team sync".to_string(),
            start: tz.with_ymd_and_hms(2024, 5, 2, 15, 0, 0).unwrap(),
            end: tz.with_ymd_and_hms(2024, 5, 2, 16, 0, 0).unwrap(),
            location: Some("Room 2".to_string()),
            source_text: "tomorrow 3pm meeting".to_string(),
        };
        let stored = StoredId::new("e1");

        let reply = event_reply(&draft, &stored);
        assert!(reply.contains("Team sync"));
        assert!(reply.contains("2024-05-02 15:00"));
        assert!(reply.contains("Room 2"));
    }
}
