//! Note record construction.
//!
//! Pure, total, deterministic: any text (including empty) produces a
//! well-formed record.

use chrono::DateTime;
use chrono_tz::Tz;

use crate::config::PipelineConfig;
use crate::domain::NoteRecord;

/// Title used when the transcript carries no content.
const PLACEHOLDER_TITLE: &str = "(empty voice note)";

/// Sentence terminators recognized for title derivation. Covers the CJK
/// full-width forms since transcripts may be in either script.
const SENTENCE_ENDS: [char; 6] = ['.', '!', '?', '。', '！', '？'];

/// Build a note from residual transcript text.
pub fn build_note(
    text: &str,
    source_user_id: Option<String>,
    occurred_at: DateTime<Tz>,
    config: &PipelineConfig,
) -> NoteRecord {
    NoteRecord {
        title: derive_title(text, config.note_title_max_chars),
        body: text.to_string(),
        occurred_at,
        source_user_id,
    }
}

/// First sentence when it fits the cap, otherwise a character-prefix
/// truncation of the text.
fn derive_title(text: &str, max_chars: usize) -> String {
    let trimmed = text.trim();
    if trimmed.is_empty() {
        return PLACEHOLDER_TITLE.to_string();
    }

    if let Some((idx, _)) = trimmed
        .char_indices()
        .find(|(_, c)| SENTENCE_ENDS.contains(c))
    {
        let sentence = trimmed[..idx].trim_end();
        if !sentence.is_empty() && sentence.chars().count() <= max_chars {
            return sentence.to_string();
        }
    }

    trimmed.chars().take(max_chars).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn config() -> PipelineConfig {
        PipelineConfig::default()
    }

    fn at() -> DateTime<Tz> {
        chrono_tz::Asia::Taipei
            .with_ymd_and_hms(2024, 5, 1, 10, 0, 0)
            .unwrap()
    }

    #[test]
    fn body_is_the_full_text() {
        let note = build_note("today I learned X", Some("U1".into()), at(), &config());
        assert_eq!(note.body, "today I learned X");
        assert_eq!(note.title, "today I learned X");
        assert_eq!(note.source_user_id.as_deref(), Some("U1"));
    }

    #[test]
    fn title_is_first_sentence_when_present() {
        let note = build_note(
            "Buy milk. Also eggs and maybe bread.",
            None,
            at(),
            &config(),
        );
        assert_eq!(note.title, "Buy milk");
        assert_eq!(note.body, "Buy milk. Also eggs and maybe bread.");
    }

    #[test]
    fn title_recognizes_cjk_sentence_ends() {
        let note = build_note("買牛奶。還有雞蛋。", None, at(), &config());
        assert_eq!(note.title, "買牛奶");
    }

    #[test]
    fn long_text_without_sentences_truncates_by_chars() {
        let text = "x".repeat(250);
        let note = build_note(&text, None, at(), &config());
        assert_eq!(note.title.chars().count(), 100);
        assert_eq!(note.body, text);
    }

    #[test]
    fn empty_text_gets_placeholder_title() {
        let note = build_note("", None, at(), &config());
        assert_eq!(note.title, PLACEHOLDER_TITLE);
        assert_eq!(note.body, "");
    }

    #[test]
    fn builder_is_deterministic() {
        let a = build_note("same text", None, at(), &config());
        let b = build_note("same text", None, at(), &config());
        assert_eq!(a, b);
    }
}
