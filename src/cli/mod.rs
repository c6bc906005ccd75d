//! CLI layer - Command-line interface
//!
//! Contains argument parsing, output formatting, the stop signal,
//! and the command runners.

pub mod app;
pub mod args;
pub mod config_cmd;
pub mod presenter;
pub mod signals;

// Re-export commonly used types
pub use app::{EXIT_ERROR, EXIT_SUCCESS, EXIT_USAGE_ERROR};
pub use args::{Cli, Commands, ConfigAction, DeviceAction};
pub use presenter::Presenter;
