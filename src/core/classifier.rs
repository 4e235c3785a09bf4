//! Intent classification from a leading keyword.
//!
//! Total and deterministic: every input classifies to exactly one intent,
//! and unmatched text falls through to `Echo` with the input untouched.

use crate::config::TriggerTokens;

/// The classified purpose of a transcript, selecting a destination handler.
///
/// Closed enum on purpose: every consumer matches exhaustively, so a new
/// destination makes the compiler flag every unhandled site.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Intent {
    SaveNote,
    CreateCalendarEvent,
    Echo,
}

/// An intent plus the transcript minus the recognized trigger token.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Classification {
    pub intent: Intent,
    pub residual: String,
}

/// Leading-token matcher over the configured trigger table.
#[derive(Debug, Clone)]
pub struct IntentClassifier {
    note_tokens: Vec<String>,
    calendar_tokens: Vec<String>,
}

impl IntentClassifier {
    pub fn new(tokens: &TriggerTokens) -> Self {
        let lower = |list: &[String]| list.iter().map(|t| t.to_lowercase()).collect();
        Self {
            note_tokens: lower(&tokens.note),
            calendar_tokens: lower(&tokens.calendar),
        }
    }

    /// Classify one transcript.
    ///
    /// The first whitespace-delimited token is compared case-insensitively
    /// against the trigger table. On a match the residual is the remainder,
    /// trimmed; on no match the residual is the input unchanged. Only the
    /// leading token is authoritative, even if another trigger word appears
    /// later in the text.
    pub fn classify(&self, text: &str) -> Classification {
        let trimmed = text.trim_start();
        let mut parts = trimmed.splitn(2, char::is_whitespace);
        let head = parts.next().unwrap_or("").to_lowercase();
        let rest = parts.next().unwrap_or("");

        let intent = if self.note_tokens.iter().any(|t| *t == head) {
            Intent::SaveNote
        } else if self.calendar_tokens.iter().any(|t| *t == head) {
            Intent::CreateCalendarEvent
        } else {
            Intent::Echo
        };

        let residual = match intent {
            Intent::Echo => text.to_string(),
            _ => rest.trim().to_string(),
        };

        Classification { intent, residual }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::TriggerTokens;

    fn classifier() -> IntentClassifier {
        IntentClassifier::new(&TriggerTokens::default())
    }

    #[test]
    fn note_token_selects_save_note() {
        let result = classifier().classify("notion today I learned X");
        assert_eq!(result.intent, Intent::SaveNote);
        assert_eq!(result.residual, "today I learned X");
    }

    #[test]
    fn calendar_token_selects_calendar_event() {
        let result = classifier().classify("calendar tomorrow 3pm meeting");
        assert_eq!(result.intent, Intent::CreateCalendarEvent);
        assert_eq!(result.residual, "tomorrow 3pm meeting");
    }

    #[test]
    fn matching_is_case_insensitive() {
        let result = classifier().classify("NOTION remember the milk");
        assert_eq!(result.intent, Intent::SaveNote);
        assert_eq!(result.residual, "remember the milk");
    }

    #[test]
    fn unmatched_text_echoes_identically() {
        let input = "this is a test message";
        let result = classifier().classify(input);
        assert_eq!(result.intent, Intent::Echo);
        assert_eq!(result.residual, input);
    }

    #[test]
    fn echo_preserves_leading_whitespace_exactly() {
        let input = "  hello there";
        let result = classifier().classify(input);
        assert_eq!(result.intent, Intent::Echo);
        assert_eq!(result.residual, input);
    }

    #[test]
    fn trigger_only_input_yields_empty_residual() {
        let result = classifier().classify("notion");
        assert_eq!(result.intent, Intent::SaveNote);
        assert_eq!(result.residual, "");
    }

    #[test]
    fn leading_token_wins_over_later_trigger_words() {
        let result = classifier().classify("notion calendar tomorrow");
        assert_eq!(result.intent, Intent::SaveNote);
        assert_eq!(result.residual, "calendar tomorrow");
    }

    #[test]
    fn trigger_must_be_whole_leading_token() {
        let result = classifier().classify("notions are vague");
        assert_eq!(result.intent, Intent::Echo);
    }

    #[test]
    fn classification_is_deterministic() {
        let c = classifier();
        for input in ["notion a b", "calendar x", "plain text", "", "   "] {
            assert_eq!(c.classify(input), c.classify(input));
        }
    }

    #[test]
    fn empty_input_echoes() {
        let result = classifier().classify("");
        assert_eq!(result.intent, Intent::Echo);
        assert_eq!(result.residual, "");
    }

    #[test]
    fn only_the_leading_token_is_stripped() {
        let c = classifier();
        for input in ["notion notion nested", "cal cal cal"] {
            let result = c.classify(input);
            // Only the leading token is stripped; the rest is content.
            let expected = input.splitn(2, ' ').nth(1).unwrap_or("");
            assert_eq!(result.residual, expected);
        }
    }
}
