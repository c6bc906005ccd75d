//! Chat turn request/response model

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Longest text the chat endpoint accepts
pub const MAX_CHAT_CHARS: usize = 2000;

/// Name the backend gives the operation that carries a device decision
pub const DECISION_OPERATION: &str = "Принятие решений";

/// Error when chat text cannot be sent
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ChatTextError {
    #[error("Nothing to send")]
    Empty,

    #[error("Message is too long: {0} characters (max {MAX_CHAT_CHARS})")]
    TooLong(usize),
}

/// Validated, trimmed chat text
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ChatRequest {
    text: String,
}

impl ChatRequest {
    pub fn new(text: &str) -> Result<Self, ChatTextError> {
        let trimmed = text.trim();
        if trimmed.is_empty() {
            return Err(ChatTextError::Empty);
        }
        let chars = trimmed.chars().count();
        if chars > MAX_CHAT_CHARS {
            return Err(ChatTextError::TooLong(chars));
        }
        Ok(Self {
            text: trimmed.to_string(),
        })
    }

    pub fn text(&self) -> &str {
        &self.text
    }
}

/// Details attached to a backend operation
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct OperationDetails {
    #[serde(default)]
    pub action: Option<String>,
    #[serde(default)]
    pub device_id: Option<String>,
}

/// An operation the backend performed for this turn
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Operation {
    pub name: String,
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub details: Option<OperationDetails>,
}

/// Response of the chat endpoint
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct ChatReply {
    pub messages: Vec<String>,
    pub reply: Option<String>,
    pub operations: Vec<Operation>,
    pub intent: Option<String>,
}

impl ChatReply {
    /// Lines to show the user for this reply.
    ///
    /// Precedence: explicit messages, then `reply`, then a line derived from
    /// the last operation, then a bare acknowledgement.
    pub fn summary(&self) -> Vec<String> {
        if !self.messages.is_empty() {
            return self.messages.clone();
        }

        if let Some(reply) = self.reply.as_deref().filter(|r| !r.is_empty()) {
            return vec![reply.to_string()];
        }

        let line = match self.operations.last() {
            Some(Operation {
                name,
                details: Some(details),
                ..
            }) if name == DECISION_OPERATION => {
                let action = details.action.as_deref().unwrap_or("action");
                let device = details.device_id.as_deref().unwrap_or("device");
                format!("Ok: {} → {}", action, device)
            }
            _ => "Ok.".to_string(),
        };
        vec![line]
    }
}
