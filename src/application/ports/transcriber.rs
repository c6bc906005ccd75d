//! Transcription port interface

use async_trait::async_trait;
use thiserror::Error;

use crate::domain::audio::EncodedPayload;

/// Shown when the backend gives no reason for an empty result
pub const DEFAULT_EMPTY_MESSAGE: &str =
    "Nothing was recognized. Try speaking closer to the microphone.";

/// Shown when the backend rejects a payload without a reason
pub const DEFAULT_REJECTED_MESSAGE: &str = "Speech recognition failed";

/// Transcription errors
#[derive(Debug, Clone, Error)]
pub enum TranscriptionError {
    #[error("{0}")]
    Rejected(String),

    #[error("{0}")]
    Empty(String),

    #[error("Transcription request failed: {0}")]
    RequestFailed(String),

    #[error("Failed to parse transcription response: {0}")]
    ParseError(String),
}

impl TranscriptionError {
    /// Operator hint for rejections caused by a missing recognition model
    pub fn hint(&self) -> Option<&'static str> {
        match self {
            Self::Rejected(message) if message.contains("VOSK model") => Some(
                "Check VOSK_MODEL_PATH on the server and that the model exists under ./models",
            ),
            _ => None,
        }
    }
}

/// Port for audio transcription
#[async_trait]
pub trait Transcriber: Send + Sync {
    /// Transcribe an encoded recording to text.
    ///
    /// # Returns
    /// The trimmed, non-empty transcript or an error
    async fn transcribe(&self, audio: &EncodedPayload) -> Result<String, TranscriptionError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hint_for_missing_model() {
        let err = TranscriptionError::Rejected("VOSK model not found at ./models/ru".into());
        assert!(err.hint().unwrap().contains("VOSK_MODEL_PATH"));
    }

    #[test]
    fn no_hint_otherwise() {
        assert!(TranscriptionError::Rejected("bad wav".into()).hint().is_none());
        assert!(TranscriptionError::Empty(DEFAULT_EMPTY_MESSAGE.into())
            .hint()
            .is_none());
    }

    #[test]
    fn rejected_displays_backend_reason() {
        let err = TranscriptionError::Rejected("Expected mono 16kHz WAV".into());
        assert_eq!(err.to_string(), "Expected mono 16kHz WAV");
    }
}
