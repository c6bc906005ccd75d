//! Configuration value objects

mod app_config;

pub use app_config::{AppConfig, DEFAULT_REQUEST_TIMEOUT_SECS, DEFAULT_SERVER_URL};
