//! OpenAI chat-completions adapter for calendar field extraction.
//!
//! The model is asked to call a single `create_calendar_event` tool; the
//! tool arguments are the structured fields. Anything that does not parse
//! into the expected shape is a `MalformedResponse` so that provider
//! drift degrades into a user-visible failure instead of a crash.

use async_trait::async_trait;
use serde::Deserialize;
use tracing::debug;

use crate::error::ExtractionError;

use super::{ExtractedFields, ExtractionPrompt, FieldExtractor};

const DEFAULT_ENDPOINT: &str = "https://api.openai.com/v1/chat/completions";
const DEFAULT_MODEL: &str = "gpt-4o";

/// HTTP client for the extraction provider.
pub struct OpenAiExtractor {
    api_key: String,
    endpoint: String,
    model: String,
    client: reqwest::Client,
}

impl OpenAiExtractor {
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            endpoint: DEFAULT_ENDPOINT.to_string(),
            model: DEFAULT_MODEL.to_string(),
            client: reqwest::Client::new(),
        }
    }

    pub fn with_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.endpoint = endpoint.into();
        self
    }

    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    fn request_body(&self, prompt: &ExtractionPrompt) -> serde_json::Value {
        serde_json::json!({
            "model": self.model,
            "messages": [
                { "role": "system", "content": prompt.system },
                { "role": "user", "content": prompt.user },
            ],
            "tools": [tool_schema()],
            "tool_choice": "auto",
        })
    }
}

fn tool_schema() -> serde_json::Value {
    serde_json::json!({
        "type": "function",
        "function": {
            "name": "create_calendar_event",
            "description": "Create a calendar event",
            "parameters": {
                "type": "object",
                "properties": {
                    "has_event": { "type": "boolean" },
                    "title": { "type": "string" },
                    "start_time": { "type": "string" },
                    "end_time": { "type": "string" },
                    "location": { "type": "string" }
                },
                "required": ["has_event"]
            }
        }
    })
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    choices: Vec<Choice>,
}

#[derive(Debug, Deserialize)]
struct Choice {
    message: ChoiceMessage,
}

#[derive(Debug, Deserialize)]
struct ChoiceMessage {
    #[serde(default)]
    tool_calls: Vec<ToolCall>,
}

#[derive(Debug, Deserialize)]
struct ToolCall {
    function: FunctionCall,
}

#[derive(Debug, Deserialize)]
struct FunctionCall {
    /// JSON-encoded argument object.
    arguments: String,
}

#[derive(Debug, Deserialize)]
struct EventArgs {
    has_event: bool,
    #[serde(default)]
    title: Option<String>,
    #[serde(default)]
    start_time: Option<String>,
    #[serde(default)]
    end_time: Option<String>,
    #[serde(default)]
    location: Option<String>,
}

/// Parse one chat-completions response body into extracted fields.
///
/// `None` means the model found no event (no tool call, or
/// `has_event: false`). Only the first tool call is considered.
fn parse_response(body: &str) -> Result<Option<ExtractedFields>, ExtractionError> {
    let response: ChatResponse = serde_json::from_str(body)
        .map_err(|e| ExtractionError::MalformedResponse(e.to_string()))?;

    let call = match response
        .choices
        .first()
        .and_then(|c| c.message.tool_calls.first())
    {
        Some(call) => call,
        None => return Ok(None),
    };

    let args: EventArgs = serde_json::from_str(&call.function.arguments)
        .map_err(|e| ExtractionError::MalformedResponse(format!("tool arguments: {e}")))?;

    if !args.has_event {
        return Ok(None);
    }

    Ok(Some(ExtractedFields {
        title: args.title,
        start_time: args.start_time,
        end_time: args.end_time,
        location: args.location,
    }))
}

#[async_trait]
impl FieldExtractor for OpenAiExtractor {
    async fn extract_fields(
        &self,
        prompt: &ExtractionPrompt,
    ) -> Result<Option<ExtractedFields>, ExtractionError> {
        let response = self
            .client
            .post(&self.endpoint)
            .bearer_auth(&self.api_key)
            .json(&self.request_body(prompt))
            .send()
            .await
            .map_err(|e| ExtractionError::CallFailed(e.to_string()))?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| ExtractionError::CallFailed(e.to_string()))?;

        if !status.is_success() {
            return Err(ExtractionError::CallFailed(format!(
                "status {status}: {}",
                body.trim()
            )));
        }

        debug!(bytes = body.len(), "parsing extraction response");
        parse_response(&body)
    }
}
