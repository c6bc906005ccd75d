//! HTTP adapter for the assistant backend
//!
//! One client serves both ports: speech recognition goes to
//! `/api/asr/transcribe`, everything else to the dialog and device routes.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::multipart::{Form, Part};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::application::ports::transcriber::{DEFAULT_EMPTY_MESSAGE, DEFAULT_REJECTED_MESSAGE};
use crate::application::ports::{AssistantApi, BackendError, Transcriber, TranscriptionError};
use crate::domain::assistant::{
    AssistantState, ChatReply, ChatRequest, CommandSequence, Device, NewDevice, ServiceWord,
    Settings, SettingsUpdate,
};
use crate::domain::audio::EncodedPayload;
use crate::domain::config::{DEFAULT_REQUEST_TIMEOUT_SECS, DEFAULT_SERVER_URL};

// Response types

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct TranscribeResponse {
    ok: bool,
    text: Option<String>,
    message: Option<String>,
    detail: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ErrorBody {
    detail: Option<serde_json::Value>,
}

#[derive(Debug, Deserialize)]
struct SettingsResponse {
    settings: Settings,
}

#[derive(Debug, Deserialize)]
struct ServiceWordsResponse {
    service_words: Vec<String>,
}

#[derive(Debug, Deserialize)]
struct SequenceResponse {
    sequence: CommandSequence,
}

#[derive(Debug, Serialize)]
struct ToggleRequest {
    is_on: bool,
}

/// reqwest-backed client for the assistant backend
#[derive(Debug, Clone)]
pub struct HttpBackend {
    base_url: String,
    client: reqwest::Client,
}

impl HttpBackend {
    /// Create a client for `base_url` with the default timeout
    pub fn new(base_url: impl Into<String>) -> Self {
        Self::with_timeout(base_url, Duration::from_secs(DEFAULT_REQUEST_TIMEOUT_SECS))
    }

    /// Create a client for `base_url` with a per-request timeout
    pub fn with_timeout(base_url: impl Into<String>, timeout: Duration) -> Self {
        let base_url = base_url.into();
        let base_url = match base_url.trim().trim_end_matches('/') {
            "" => DEFAULT_SERVER_URL.to_string(),
            trimmed => trimmed.to_string(),
        };

        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .unwrap_or_else(|_| reqwest::Client::new());

        Self { base_url, client }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Build the URL for an API path
    fn url(&self, path: &str) -> String {
        format!("{}/api/{}", self.base_url, path.trim_start_matches('/'))
    }

    /// Human-readable message from an error body: JSON `detail`, else raw text
    fn error_message(body: &str) -> String {
        let detail = serde_json::from_str::<ErrorBody>(body)
            .ok()
            .and_then(|b| b.detail)
            .map(|d| match d {
                serde_json::Value::String(s) => s,
                other => other.to_string(),
            });

        match detail {
            Some(detail) => detail,
            None if body.trim().is_empty() => "no response body".to_string(),
            None => body.trim().to_string(),
        }
    }

    /// Check status and decode the JSON body
    async fn read_json<R: DeserializeOwned>(
        response: reqwest::Response,
    ) -> Result<R, BackendError> {
        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(BackendError::Http {
                status: status.as_u16(),
                message: Self::error_message(&body),
            });
        }

        response
            .json()
            .await
            .map_err(|e| BackendError::ParseError(e.to_string()))
    }

    async fn get<R: DeserializeOwned>(&self, path: &str) -> Result<R, BackendError> {
        let url = self.url(path);
        debug!(%url, "GET");

        let response = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(|e| BackendError::RequestFailed(e.to_string()))?;

        Self::read_json(response).await
    }

    async fn post<B, R>(&self, path: &str, body: &B) -> Result<R, BackendError>
    where
        B: Serialize + ?Sized + Sync,
        R: DeserializeOwned,
    {
        let url = self.url(path);
        debug!(%url, "POST");

        let response = self
            .client
            .post(&url)
            .json(body)
            .send()
            .await
            .map_err(|e| BackendError::RequestFailed(e.to_string()))?;

        Self::read_json(response).await
    }

    /// Interpret a transcription response
    fn transcript_from(response: TranscribeResponse) -> Result<String, TranscriptionError> {
        if !response.ok {
            return Err(TranscriptionError::Rejected(
                response
                    .detail
                    .or(response.message)
                    .unwrap_or_else(|| DEFAULT_REJECTED_MESSAGE.to_string()),
            ));
        }

        let text = response.text.as_deref().map(str::trim).unwrap_or_default();
        if text.is_empty() {
            return Err(TranscriptionError::Empty(
                response
                    .message
                    .unwrap_or_else(|| DEFAULT_EMPTY_MESSAGE.to_string()),
            ));
        }

        Ok(text.to_string())
    }
}

impl Default for HttpBackend {
    fn default() -> Self {
        Self::new(DEFAULT_SERVER_URL)
    }
}

#[async_trait]
impl Transcriber for HttpBackend {
    async fn transcribe(&self, audio: &EncodedPayload) -> Result<String, TranscriptionError> {
        let url = self.url("asr/transcribe");
        debug!(%url, bytes = audio.size_bytes(), "uploading audio");

        let part = Part::bytes(audio.data().to_vec())
            .file_name(audio.file_name())
            .mime_str(audio.mime_type())
            .map_err(|e| TranscriptionError::RequestFailed(e.to_string()))?;
        let form = Form::new().part("file", part);

        let response = self
            .client
            .post(&url)
            .multipart(form)
            .send()
            .await
            .map_err(|e| TranscriptionError::RequestFailed(e.to_string()))?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| TranscriptionError::RequestFailed(e.to_string()))?;

        if !status.is_success() {
            let parsed: TranscribeResponse = serde_json::from_str(&body).unwrap_or_default();
            let message = parsed
                .detail
                .or(parsed.message)
                .filter(|m| !m.trim().is_empty())
                .unwrap_or_else(|| match body.trim() {
                    "" => DEFAULT_REJECTED_MESSAGE.to_string(),
                    raw if serde_json::from_str::<serde_json::Value>(raw).is_ok() => {
                        DEFAULT_REJECTED_MESSAGE.to_string()
                    }
                    raw => raw.to_string(),
                });
            return Err(TranscriptionError::Rejected(message));
        }

        let parsed: TranscribeResponse = serde_json::from_str(&body)
            .map_err(|e| TranscriptionError::ParseError(e.to_string()))?;

        Self::transcript_from(parsed)
    }
}

#[async_trait]
impl AssistantApi for HttpBackend {
    async fn fetch_state(&self) -> Result<AssistantState, BackendError> {
        self.get("state").await
    }

    async fn send_chat(&self, request: &ChatRequest) -> Result<ChatReply, BackendError> {
        self.post("chat/send", request).await
    }

    async fn toggle_device(&self, device_id: &str, is_on: bool) -> Result<Device, BackendError> {
        let path = format!("devices/{}/toggle", device_id);
        self.post(&path, &ToggleRequest { is_on }).await
    }

    async fn add_device(&self, device: &NewDevice) -> Result<Device, BackendError> {
        self.post("devices", device).await
    }

    async fn update_settings(&self, update: &SettingsUpdate) -> Result<Settings, BackendError> {
        let response: SettingsResponse = self.post("settings", update).await?;
        Ok(response.settings)
    }

    async fn add_service_word(&self, word: &ServiceWord) -> Result<Vec<String>, BackendError> {
        let response: ServiceWordsResponse = self.post("special/service-word", word).await?;
        Ok(response.service_words)
    }

    async fn add_sequence(
        &self,
        sequence: &CommandSequence,
    ) -> Result<CommandSequence, BackendError> {
        let response: SequenceResponse = self.post("special/sequence", sequence).await?;
        Ok(response.sequence)
    }
}
