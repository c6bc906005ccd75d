//! Assistant settings as stored by the backend
//!
//! The client never interprets these beyond display; updates are forwarded
//! as partial documents and the backend clamps ranges.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use super::device::Device;
use super::special::CommandSequence;

/// Current assistant settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub voice_answers: bool,
    pub auto_confirm: bool,
    pub noise_suppression: bool,
    pub emergency_commands: bool,
    pub voice_timbre: String,
    pub speech_speed: f64,
    pub volume: i64,
    pub tone: String,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            voice_answers: true,
            auto_confirm: false,
            noise_suppression: true,
            emergency_commands: true,
            voice_timbre: String::new(),
            speech_speed: 1.0,
            volume: 80,
            tone: String::new(),
        }
    }
}

/// Partial settings update. Only fields that are `Some` are sent.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct SettingsUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub voice_answers: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub auto_confirm: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub noise_suppression: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub emergency_commands: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub voice_timbre: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub speech_speed: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub volume: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tone: Option<String>,
}

impl SettingsUpdate {
    /// True when no field is set
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }
}

/// Snapshot returned by the state endpoint
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct AssistantState {
    pub settings: Settings,
    pub devices: Vec<Device>,
    pub service_words: Vec<String>,
    pub sequences: BTreeMap<String, CommandSequence>,
}

impl AssistantState {
    pub fn device(&self, id: &str) -> Option<&Device> {
        self.devices.iter().find(|d| d.id == id)
    }
}
