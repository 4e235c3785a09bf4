//! Google Calendar destination adapter.
//!
//! Maps a `CalendarEventDraft` onto the events.insert schema. The bearer
//! token is supplied by the host's credential layer; this adapter never
//! refreshes or loads credentials itself.

use async_trait::async_trait;
use serde::Deserialize;
use tracing::debug;

use crate::domain::{CalendarEventDraft, StoredId};
use crate::error::DestinationWriteError;

use super::DestinationWriter;

const DEFAULT_BASE_URL: &str = "https://www.googleapis.com/calendar/v3";

/// HTTP client for the Google Calendar events API.
pub struct GoogleCalendarWriter {
    access_token: String,
    calendar_id: String,
    base_url: String,
    client: reqwest::Client,
}

#[derive(Debug, Deserialize)]
struct CreatedEvent {
    id: String,
    #[serde(default, rename = "htmlLink")]
    html_link: Option<String>,
}

impl GoogleCalendarWriter {
    pub fn new(access_token: impl Into<String>) -> Self {
        Self {
            access_token: access_token.into(),
            calendar_id: "primary".to_string(),
            base_url: DEFAULT_BASE_URL.to_string(),
            client: reqwest::Client::new(),
        }
    }

    pub fn with_calendar_id(mut self, calendar_id: impl Into<String>) -> Self {
        self.calendar_id = calendar_id.into();
        self
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    /// events.insert request body for one draft.
    fn event_payload(&self, draft: &CalendarEventDraft) -> serde_json::Value {
        let timezone = draft.start.timezone().name();

        let mut payload = serde_json::json!({
            "summary": draft.title,
            "start": {
                "dateTime": draft.start.to_rfc3339(),
                "timeZone": timezone,
            },
            "end": {
                "dateTime": draft.end.to_rfc3339(),
                "timeZone": timezone,
            },
            "reminders": { "useDefault": true },
        });

        if let Some(location) = &draft.location {
            payload["location"] = serde_json::json!(location);
        }

        payload
    }
}

#[async_trait]
impl DestinationWriter for GoogleCalendarWriter {
    type Record = CalendarEventDraft;

    fn name(&self) -> &'static str {
        "calendar"
    }

    async fn write(&self, draft: &CalendarEventDraft) -> Result<StoredId, DestinationWriteError> {
        let url = format!(
            "{}/calendars/{}/events",
            self.base_url, self.calendar_id
        );

        debug!(title = %draft.title, start = %draft.start, "inserting calendar event");

        let response = self
            .client
            .post(&url)
            .bearer_auth(&self.access_token)
            .json(&self.event_payload(draft))
            .send()
            .await
            .map_err(|e| DestinationWriteError::Transport {
                destination: self.name(),
                detail: e.to_string(),
            })?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| DestinationWriteError::Transport {
                destination: self.name(),
                detail: e.to_string(),
            })?;

        if !status.is_success() {
            return Err(DestinationWriteError::Rejected {
                destination: self.name(),
                status: status.as_u16(),
                detail: body.trim().to_string(),
            });
        }

        let event: CreatedEvent =
            serde_json::from_str(&body).map_err(|e| DestinationWriteError::Rejected {
                destination: self.name(),
                status: status.as_u16(),
                detail: format!("unexpected response shape: {e}"),
            })?;

        let mut stored = StoredId::new(event.id);
        if let Some(link) = event.html_link {
            stored = stored.with_url(link);
        }

        Ok(stored)
    }
}
