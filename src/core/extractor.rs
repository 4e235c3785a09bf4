//! Calendar event extraction from free text.
//!
//! The language model does the natural-language reading; this module owns
//! everything around it: the prompt anchored to the event's receipt time,
//! defensive validation of the returned fields, and the tie-break policies
//! for ambiguous temporal information (date without time, missing end,
//! end before start).

use chrono::{DateTime, Duration, LocalResult, NaiveDate, NaiveDateTime, NaiveTime, TimeZone, Utc};
use chrono_tz::Tz;
use tracing::debug;

use crate::adapters::{ExtractedFields, ExtractionPrompt, FieldExtractor};
use crate::config::PipelineConfig;
use crate::domain::CalendarEventDraft;
use crate::error::ExtractionError;

/// Title used when the model finds a time but no usable title.
const UNTITLED: &str = "(untitled event)";

/// Local timestamp shapes the prompt asks for. Tried in order.
const DATETIME_FORMATS: [&str; 4] = [
    "%Y-%m-%dT%H:%M:%S",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%d %H:%M",
];

/// Turns residual transcript text into a validated `CalendarEventDraft`.
pub struct CalendarEventExtractor<P> {
    provider: P,
    timezone: Tz,
    default_time_of_day: NaiveTime,
    default_duration: Duration,
}

impl<P: FieldExtractor> CalendarEventExtractor<P> {
    pub fn new(provider: P, config: &PipelineConfig) -> Self {
        Self {
            provider,
            timezone: config.timezone,
            default_time_of_day: config.default_time_of_day,
            default_duration: config.default_event_duration(),
        }
    }

    /// Extract one event from `text`, anchored to `reference` so relative
    /// expressions ("tomorrow", "next Monday") resolve unambiguously.
    pub async fn extract(
        &self,
        text: &str,
        reference: DateTime<Utc>,
    ) -> Result<CalendarEventDraft, ExtractionError> {
        let local_now = reference.with_timezone(&self.timezone);
        let prompt = build_prompt(text, local_now);

        let fields = self
            .provider
            .extract_fields(&prompt)
            .await?
            .ok_or(ExtractionError::NoTemporalInformation)?;

        debug!(?fields, "resolving extracted fields");
        self.resolve(text, fields)
    }

    /// Validate raw model fields into a draft. Policies:
    /// - missing or unparseable start is `NoTemporalInformation`
    /// - a bare date gets the configured default time of day
    /// - a missing, unparseable, or out-of-order end gets the default
    ///   duration, keeping the `end >= start` invariant
    fn resolve(
        &self,
        source_text: &str,
        fields: ExtractedFields,
    ) -> Result<CalendarEventDraft, ExtractionError> {
        let start_raw = fields
            .start_time
            .as_deref()
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .ok_or(ExtractionError::NoTemporalInformation)?;

        let start = self
            .parse_local(start_raw)
            .ok_or(ExtractionError::NoTemporalInformation)?;

        let end = fields
            .end_time
            .as_deref()
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .and_then(|raw| self.parse_local(raw))
            .filter(|end| *end >= start)
            .unwrap_or_else(|| start + self.default_duration);

        let title = fields
            .title
            .map(|t| t.trim().to_string())
            .filter(|t| !t.is_empty())
            .unwrap_or_else(|| UNTITLED.to_string());

        let location = fields
            .location
            .map(|l| l.trim().to_string())
            .filter(|l| !l.is_empty());

        Ok(CalendarEventDraft {
            title,
            start,
            end,
            location,
            source_text: source_text.to_string(),
        })
    }

    /// Parse a model-supplied timestamp in the configured time zone.
    /// Accepts full RFC 3339, ISO local datetimes, and bare dates.
    fn parse_local(&self, raw: &str) -> Option<DateTime<Tz>> {
        if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
            return Some(dt.with_timezone(&self.timezone));
        }

        for format in DATETIME_FORMATS {
            if let Ok(naive) = NaiveDateTime::parse_from_str(raw, format) {
                return self.localize(naive);
            }
        }

        if let Ok(date) = NaiveDate::parse_from_str(raw, "%Y-%m-%d") {
            return self.localize(date.and_time(self.default_time_of_day));
        }

        None
    }

    fn localize(&self, naive: NaiveDateTime) -> Option<DateTime<Tz>> {
        match self.timezone.from_local_datetime(&naive) {
            LocalResult::Single(dt) => Some(dt),
            // DST fold: take the earlier reading.
            LocalResult::Ambiguous(earliest, _) => Some(earliest),
            // DST gap: the wall time does not exist.
            LocalResult::None => None,
        }
    }
}

/// Prompt for one extraction call. The reference instant is rendered in the
/// configured zone so the model and the parser agree on what "today" means.
pub fn build_prompt(text: &str, local_now: DateTime<Tz>) -> ExtractionPrompt {
    let system = format!(
        "You are a calendar extraction assistant. The current time is {now} in the {tz} time zone.\n\
         \n\
         Resolve relative expressions against that reference: \"tomorrow\" means the next day, \
         \"next Monday\" means the Monday of the following week, \"3pm\" means 15:00.\n\
         \n\
         If the message describes no event, report has_event false. Otherwise report the title and \
         the start time as ISO 8601 local time (YYYY-MM-DDTHH:MM:SS), or a bare date (YYYY-MM-DD) \
         when no time of day is given. Report an end time or a location only when one is stated. \
         If several events are mentioned, report only the first.",
        now = local_now.format("%Y-%m-%d %A %H:%M"),
        tz = local_now.timezone().name(),
    );

    ExtractionPrompt {
        system,
        user: text.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;

    /// Provider stub returning a fixed outcome.
    struct FixedProvider(Result<Option<ExtractedFields>, ExtractionError>);

    #[async_trait]
    impl FieldExtractor for FixedProvider {
        async fn extract_fields(
            &self,
            _prompt: &ExtractionPrompt,
        ) -> Result<Option<ExtractedFields>, ExtractionError> {
            self.0.clone()
        }
    }

    fn extractor(
        outcome: Result<Option<ExtractedFields>, ExtractionError>,
    ) -> CalendarEventExtractor<FixedProvider> {
        CalendarEventExtractor::new(FixedProvider(outcome), &PipelineConfig::default())
    }

    fn taipei(y: i32, mo: u32, d: u32, h: u32, mi: u32) -> DateTime<Tz> {
        chrono_tz::Asia::Taipei
            .with_ymd_and_hms(y, mo, d, h, mi, 0)
            .unwrap()
    }

    fn reference() -> DateTime<Utc> {
        taipei(2024, 5, 1, 10, 0).with_timezone(&Utc)
    }

    fn fields(start: Option<&str>, end: Option<&str>) -> ExtractedFields {
        ExtractedFields {
            title: Some("Team sync".to_string()),
            start_time: start.map(str::to_string),
            end_time: end.map(str::to_string),
            location: None,
        }
    }

    #[tokio::test]
    async fn resolves_local_start_and_defaults_end_to_one_hour() {
        let extractor = extractor(Ok(Some(fields(Some("2024-05-02T15:00:00"), None))));
        let draft = extractor
            .extract("tomorrow 3pm meeting", reference())
            .await
            .unwrap();

        assert_eq!(draft.start, taipei(2024, 5, 2, 15, 0));
        assert_eq!(draft.end, taipei(2024, 5, 2, 16, 0));
        assert_eq!(draft.title, "Team sync");
        assert_eq!(draft.source_text, "tomorrow 3pm meeting");
    }

    #[tokio::test]
    async fn date_only_mention_gets_default_time_of_day() {
        let extractor = extractor(Ok(Some(fields(Some("2024-05-03"), None))));
        let draft = extractor.extract("friday dentist", reference()).await.unwrap();

        assert_eq!(draft.start, taipei(2024, 5, 3, 9, 0));
        assert_eq!(draft.end, taipei(2024, 5, 3, 10, 0));
    }

    #[tokio::test]
    async fn explicit_end_is_kept() {
        let extractor = extractor(Ok(Some(fields(
            Some("2024-05-02T15:00:00"),
            Some("2024-05-02T17:30:00"),
        ))));
        let draft = extractor.extract("meeting", reference()).await.unwrap();

        assert_eq!(draft.end, taipei(2024, 5, 2, 17, 30));
    }

    #[tokio::test]
    async fn end_before_start_falls_back_to_default_duration() {
        let extractor = extractor(Ok(Some(fields(
            Some("2024-05-02T15:00:00"),
            Some("2024-05-02T09:00:00"),
        ))));
        let draft = extractor.extract("meeting", reference()).await.unwrap();

        assert!(draft.end >= draft.start);
        assert_eq!(draft.end, taipei(2024, 5, 2, 16, 0));
    }

    #[tokio::test]
    async fn title_without_parseable_date_is_no_temporal_information() {
        let extractor = extractor(Ok(Some(fields(Some("sometime soon"), None))));
        let err = extractor.extract("meeting soon", reference()).await.unwrap_err();
        assert_eq!(err, ExtractionError::NoTemporalInformation);
    }

    #[tokio::test]
    async fn missing_start_is_no_temporal_information() {
        let extractor = extractor(Ok(Some(fields(None, None))));
        let err = extractor.extract("meeting", reference()).await.unwrap_err();
        assert_eq!(err, ExtractionError::NoTemporalInformation);
    }

    #[tokio::test]
    async fn provider_reporting_no_event_is_no_temporal_information() {
        let extractor = extractor(Ok(None));
        let err = extractor.extract("hello world", reference()).await.unwrap_err();
        assert_eq!(err, ExtractionError::NoTemporalInformation);
    }

    #[tokio::test]
    async fn provider_errors_pass_through() {
        let extractor = extractor(Err(ExtractionError::MalformedResponse("bad".into())));
        let err = extractor.extract("meeting", reference()).await.unwrap_err();
        assert!(matches!(err, ExtractionError::MalformedResponse(_)));
    }

    #[tokio::test]
    async fn rfc3339_start_with_offset_converts_into_configured_zone() {
        let extractor = extractor(Ok(Some(fields(Some("2024-05-02T07:00:00+00:00"), None))));
        let draft = extractor.extract("meeting", reference()).await.unwrap();

        // 07:00 UTC is 15:00 in Taipei.
        assert_eq!(draft.start, taipei(2024, 5, 2, 15, 0));
    }

    #[tokio::test]
    async fn blank_title_gets_placeholder() {
        let mut f = fields(Some("2024-05-02T15:00:00"), None);
        f.title = Some("   ".to_string());
        let extractor = extractor(Ok(Some(f)));
        let draft = extractor.extract("calendar", reference()).await.unwrap();

        assert_eq!(draft.title, UNTITLED);
    }

    #[test]
    fn prompt_carries_reference_time_and_zone() {
        let prompt = build_prompt("tomorrow 3pm meeting", taipei(2024, 5, 1, 10, 0));

        assert!(prompt.system.contains("2024-05-01 Wednesday 10:00"));
        assert!(prompt.system.contains("Asia/Taipei"));
        assert_eq!(prompt.user, "tomorrow 3pm meeting");
    }
}
