//! Inbound message types.
//!
//! A `VoiceEvent` is handed to the pipeline by the webhook transport and is
//! consumed exactly once. Nothing here outlives the reply.

use chrono::{DateTime, Utc};

/// A voice message received from the chat platform.
///
/// Signature verification and payload decoding happen in the transport
/// layer; by the time an event reaches the pipeline, the audio has already
/// been downloaded.
#[derive(Debug, Clone)]
pub struct VoiceEvent {
    /// Platform user id, passed through to the note destination.
    pub source_user_id: String,

    /// The downloaded audio payload.
    pub audio: AudioClip,

    /// When the platform delivered the event. Relative expressions in the
    /// transcript ("tomorrow", "next Monday") are resolved against this.
    pub received_at: DateTime<Utc>,
}

/// Raw audio bytes plus the format hint the transport derived from the
/// platform (a MIME type or a bare file extension).
#[derive(Debug, Clone)]
pub struct AudioClip {
    pub bytes: Vec<u8>,
    pub format_hint: String,
}

impl AudioClip {
    pub fn new(bytes: Vec<u8>, format_hint: impl Into<String>) -> Self {
        Self {
            bytes,
            format_hint: format_hint.into(),
        }
    }
}

/// Audio container formats the transcription provider accepts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AudioFormat {
    M4a,
    Mp3,
    Ogg,
    Wav,
    Webm,
}

impl AudioFormat {
    /// Resolve a transport-provided hint. Accepts MIME types ("audio/m4a")
    /// and bare extensions ("m4a"), case-insensitively.
    pub fn from_hint(hint: &str) -> Option<Self> {
        let normalized = hint.trim().to_ascii_lowercase();
        let tail = normalized
            .rsplit(['/', '.'])
            .next()
            .unwrap_or(normalized.as_str());

        match tail {
            "m4a" | "x-m4a" | "mp4" | "aac" => Some(Self::M4a),
            "mp3" | "mpeg" => Some(Self::Mp3),
            "ogg" | "oga" | "opus" => Some(Self::Ogg),
            "wav" | "x-wav" | "wave" => Some(Self::Wav),
            "webm" => Some(Self::Webm),
            _ => None,
        }
    }

    /// MIME type sent with the transcription upload.
    pub fn mime_type(&self) -> &'static str {
        match self {
            Self::M4a => "audio/mp4",
            Self::Mp3 => "audio/mpeg",
            Self::Ogg => "audio/ogg",
            Self::Wav => "audio/wav",
            Self::Webm => "audio/webm",
        }
    }

    /// File extension used for the multipart file name.
    pub fn extension(&self) -> &'static str {
        match self {
            Self::M4a => "m4a",
            Self::Mp3 => "mp3",
            Self::Ogg => "ogg",
            Self::Wav => "wav",
            Self::Webm => "webm",
        }
    }
}

/// Plain-text transcript of one voice message. Immutable once produced.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Transcript {
    pub text: String,

    /// ISO 639-1 language code, when the provider reports one.
    pub language: Option<String>,
}

impl Transcript {
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            language: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn format_hint_accepts_mime_types_and_extensions() {
        assert_eq!(AudioFormat::from_hint("audio/m4a"), Some(AudioFormat::M4a));
        assert_eq!(AudioFormat::from_hint("m4a"), Some(AudioFormat::M4a));
        assert_eq!(AudioFormat::from_hint("voice.ogg"), Some(AudioFormat::Ogg));
        assert_eq!(AudioFormat::from_hint("AUDIO/MPEG"), Some(AudioFormat::Mp3));
    }

    #[test]
    fn format_hint_rejects_unknown_containers() {
        assert_eq!(AudioFormat::from_hint("video/avi"), None);
        assert_eq!(AudioFormat::from_hint("flac"), None);
        assert_eq!(AudioFormat::from_hint(""), None);
    }
}
