//! Infrastructure layer - Adapter implementations
//!
//! Contains concrete implementations of the port interfaces,
//! integrating with external systems like the audio host, the
//! assistant backend over HTTP, and the config file.

pub mod backend;
pub mod config;
pub mod recording;

// Re-export adapters
pub use backend::HttpBackend;
pub use config::XdgConfigStore;
pub use recording::{create_capture, CpalCapture, WavFileCapture};
