//! Application layer - Use cases and port interfaces
//!
//! Contains the recorder state machine, the assistant turn workflow,
//! and trait definitions for external system interactions.

pub mod assistant;
pub mod ports;
pub mod recorder;

// Re-export use cases
pub use assistant::{
    AssistantUseCase, ChatUseCase, TextTurnOutput, TurnCallbacks, TurnError, VoiceTurnOutput,
};
pub use recorder::{encode_signal, Recorder};
