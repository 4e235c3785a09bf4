//! Notion destination adapter.
//!
//! Maps a `NoteRecord` onto a page in a Notion database: a title property
//! with the derived summary, a rich-text body, a date, and a select tag
//! fixed to the pipeline's category.

use async_trait::async_trait;
use serde::Deserialize;
use tracing::debug;

use crate::domain::{NoteRecord, StoredId};
use crate::error::DestinationWriteError;

use super::DestinationWriter;

const DEFAULT_BASE_URL: &str = "https://api.notion.com";
const NOTION_VERSION: &str = "2022-06-28";

/// HTTP client for the Notion pages API.
pub struct NotionNoteWriter {
    api_key: String,
    database_id: String,
    base_url: String,
    client: reqwest::Client,
}

#[derive(Debug, Deserialize)]
struct CreatedPage {
    id: String,
    #[serde(default)]
    url: Option<String>,
}

#[derive(Debug, Deserialize)]
struct NotionErrorBody {
    #[serde(default)]
    message: String,
}

impl NotionNoteWriter {
    pub fn new(api_key: impl Into<String>, database_id: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            database_id: database_id.into(),
            base_url: DEFAULT_BASE_URL.to_string(),
            client: reqwest::Client::new(),
        }
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    /// Database page payload for one note.
    fn page_payload(&self, record: &NoteRecord) -> serde_json::Value {
        let mut properties = serde_json::json!({
            "Name": {
                "title": [{ "text": { "content": record.title } }]
            },
            "Content": {
                "rich_text": [{ "text": { "content": record.body } }]
            },
            "Date": {
                "date": { "start": record.occurred_at.to_rfc3339() }
            },
            "Tag": {
                "select": { "name": NoteRecord::TAG }
            },
        });

        if let Some(user_id) = &record.source_user_id {
            properties["User"] = serde_json::json!({
                "rich_text": [{ "text": { "content": user_id } }]
            });
        }

        serde_json::json!({
            "parent": { "database_id": self.database_id },
            "properties": properties,
        })
    }
}

#[async_trait]
impl DestinationWriter for NotionNoteWriter {
    type Record = NoteRecord;

    fn name(&self) -> &'static str {
        "notion"
    }

    async fn write(&self, record: &NoteRecord) -> Result<StoredId, DestinationWriteError> {
        let url = format!("{}/v1/pages", self.base_url);

        debug!(title = %record.title, "creating notion page");

        let response = self
            .client
            .post(&url)
            .bearer_auth(&self.api_key)
            .header("Notion-Version", NOTION_VERSION)
            .json(&self.page_payload(record))
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
            let detail = serde_json::from_str::<NotionErrorBody>(&body)
                .map(|e| e.message)
                .unwrap_or_else(|_| body.trim().to_string());

            return Err(DestinationWriteError::Rejected {
                destination: self.name(),
                status: status.as_u16(),
                detail,
            });
        }

        let page: CreatedPage =
            serde_json::from_str(&body).map_err(|e| DestinationWriteError::Rejected {
                destination: self.name(),
                status: status.as_u16(),
                detail: format!("unexpected response shape: {e}"),
            })?;

        let mut stored = StoredId::new(page.id);
        if let Some(url) = page.url {
            stored = stored.with_url(url);
        }

        Ok(stored)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn sample_note() -> NoteRecord {
        NoteRecord {
            title: "today I learned X".to_string(),
            body: "today I learned X".to_string(),
            occurred_at: chrono_tz::Asia::Taipei
                .with_ymd_and_hms(2024, 5, 1, 10, 0, 0)
                .unwrap(),
            source_user_id: Some("U123".to_string()),
        }
    }

    #[test]
    fn payload_maps_all_schema_fields() {
        let writer = NotionNoteWriter::new("secret", "db-1");
        let payload = writer.page_payload(&sample_note());

        assert_eq!(payload["parent"]["database_id"], "db-1");

        let props = &payload["properties"];
        assert_eq!(
            props["Name"]["title"][0]["text"]["content"],
            "today I learned X"
        );
        assert_eq!(props["Tag"]["select"]["name"], "voice-record");
        assert_eq!(
            props["Date"]["date"]["start"],
            "2024-05-01T10:00:00+08:00"
        );
        assert_eq!(props["User"]["rich_text"][0]["text"]["content"], "U123");
    }

    #[test]
    fn payload_omits_user_property_without_user_id() {
        let writer = NotionNoteWriter::new("secret", "db-1");
        let mut note = sample_note();
        note.source_user_id = None;

        let payload = writer.page_payload(&note);
        assert!(payload["properties"].get("User").is_none());
    }
}
