//! Pipeline configuration.
//!
//! Configuration is explicit and immutable: loaded once (YAML file or
//! defaults), validated, and threaded into the orchestrator at construction.
//! The core never reads ambient state. Adapter credentials are not part of
//! this surface; the host passes them to each adapter's constructor.

use std::path::Path;

use chrono::{Duration, NaiveTime};
use chrono_tz::Tz;
use serde::Deserialize;
use thiserror::Error;

/// Errors from loading or validating a configuration file.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse config YAML: {0}")]
    Parse(#[from] serde_yaml::Error),

    #[error("invalid config: {0}")]
    Invalid(String),
}

/// Read-only settings for one pipeline instance.
#[derive(Debug, Clone, Deserialize)]
pub struct PipelineConfig {
    /// Leading keywords that select a destination.
    #[serde(default)]
    pub trigger_tokens: TriggerTokens,

    /// Event length applied when the speaker gives no end time.
    #[serde(default = "default_event_duration")]
    pub default_event_duration_minutes: u32,

    /// Start time applied when the speaker mentions a date but no time.
    #[serde(default = "default_time_of_day")]
    pub default_time_of_day: NaiveTime,

    /// IANA time zone that anchors relative expressions ("tomorrow") and
    /// localizes extracted timestamps.
    #[serde(default = "default_timezone")]
    pub timezone: Tz,

    /// Cap on derived note titles, in characters.
    #[serde(default = "default_note_title_max_chars")]
    pub note_title_max_chars: usize,
}

/// Trigger-token table. Matching is case-insensitive on the first
/// whitespace-delimited token of the transcript; only the leading token is
/// authoritative.
#[derive(Debug, Clone, Deserialize)]
pub struct TriggerTokens {
    #[serde(default = "default_note_tokens")]
    pub note: Vec<String>,

    #[serde(default = "default_calendar_tokens")]
    pub calendar: Vec<String>,
}

fn default_note_tokens() -> Vec<String> {
    vec!["notion".to_string(), "note".to_string()]
}

fn default_calendar_tokens() -> Vec<String> {
    vec!["calendar".to_string(), "cal".to_string()]
}

fn default_event_duration() -> u32 {
    60
}

fn default_time_of_day() -> NaiveTime {
    NaiveTime::from_hms_opt(9, 0, 0).expect("09:00 is a valid time of day")
}

fn default_timezone() -> Tz {
    chrono_tz::Asia::Taipei
}

fn default_note_title_max_chars() -> usize {
    100
}

impl Default for TriggerTokens {
    fn default() -> Self {
        Self {
            note: default_note_tokens(),
            calendar: default_calendar_tokens(),
        }
    }
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            trigger_tokens: TriggerTokens::default(),
            default_event_duration_minutes: default_event_duration(),
            default_time_of_day: default_time_of_day(),
            timezone: default_timezone(),
            note_title_max_chars: default_note_title_max_chars(),
        }
    }
}

impl PipelineConfig {
    /// Load a configuration from a YAML file.
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.display().to_string(),
            source,
        })?;

        Self::from_yaml(&content)
    }

    /// Parse a configuration from YAML content and validate it.
    pub fn from_yaml(content: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_yaml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    /// Check invariants the deserializer cannot express.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.default_event_duration_minutes == 0 {
            return Err(ConfigError::Invalid(
                "default_event_duration_minutes must be positive".to_string(),
            ));
        }

        if self.note_title_max_chars == 0 {
            return Err(ConfigError::Invalid(
                "note_title_max_chars must be positive".to_string(),
            ));
        }

        let all_tokens = self
            .trigger_tokens
            .note
            .iter()
            .chain(self.trigger_tokens.calendar.iter());

        for token in all_tokens {
            if token.is_empty() || token.chars().any(char::is_whitespace) {
                return Err(ConfigError::Invalid(format!(
                    "trigger token {token:?} must be a single non-empty word"
                )));
            }
        }

        Ok(())
    }

    /// Default event duration as a `chrono::Duration`.
    pub fn default_event_duration(&self) -> Duration {
        Duration::minutes(i64::from(self.default_event_duration_minutes))
    }
}
