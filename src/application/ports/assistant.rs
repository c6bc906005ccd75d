//! Assistant backend port interface

use async_trait::async_trait;
use thiserror::Error;

use crate::domain::assistant::{
    AssistantState, ChatReply, ChatRequest, CommandSequence, Device, NewDevice, ServiceWord,
    Settings, SettingsUpdate,
};

/// Backend errors
#[derive(Debug, Clone, Error)]
pub enum BackendError {
    #[error("Backend request failed: {0}")]
    RequestFailed(String),

    #[error("Backend returned HTTP {status}: {message}")]
    Http { status: u16, message: String },

    #[error("Failed to parse backend response: {0}")]
    ParseError(String),
}

impl BackendError {
    /// True for 404 responses (unknown device id and the like)
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::Http { status: 404, .. })
    }
}

/// Port for the dialog/device backend
#[async_trait]
pub trait AssistantApi: Send + Sync {
    /// Current settings and device list
    async fn fetch_state(&self) -> Result<AssistantState, BackendError>;

    /// Send one user utterance and get the assistant's reply
    async fn send_chat(&self, request: &ChatRequest) -> Result<ChatReply, BackendError>;

    /// Switch a device on or off
    async fn toggle_device(&self, device_id: &str, is_on: bool) -> Result<Device, BackendError>;

    /// Register a new device
    async fn add_device(&self, device: &NewDevice) -> Result<Device, BackendError>;

    /// Forward a partial settings update, returning the stored settings
    async fn update_settings(&self, update: &SettingsUpdate) -> Result<Settings, BackendError>;

    /// Register a service word, returning the full word list
    async fn add_service_word(&self, word: &ServiceWord) -> Result<Vec<String>, BackendError>;

    /// Store a command sequence under its name, replacing any previous one
    async fn add_sequence(
        &self,
        sequence: &CommandSequence,
    ) -> Result<CommandSequence, BackendError>;
}
