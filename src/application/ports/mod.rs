//! Port interfaces (traits) for external systems
//!
//! These traits define the boundaries between the application
//! and infrastructure layers.

pub mod assistant;
pub mod capture;
pub mod config;
pub mod transcriber;

// Re-export common types
pub use assistant::{AssistantApi, BackendError};
pub use capture::{AudioCapture, CaptureHandle, FrameSink, RecordingError};
pub use config::ConfigStore;
pub use transcriber::{Transcriber, TranscriptionError};
