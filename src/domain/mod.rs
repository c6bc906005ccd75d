//! Domain layer - Core business logic
//!
//! Contains the audio pipeline, the backend data model, value objects and
//! domain errors. This layer has no dependencies on external systems.

pub mod assistant;
pub mod audio;
pub mod config;
pub mod error;
pub mod recorder;

// Re-export common types
pub use assistant::{AssistantState, ChatReply, Device, DeviceType, Settings, SettingsUpdate};
pub use audio::{AudioFrame, EncodedPayload, Signal, SignalBuffer, TARGET_SAMPLE_RATE};
pub use config::AppConfig;
pub use error::*;
pub use recorder::RecorderStatus;
