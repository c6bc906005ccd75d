//! Assistant backend adapters

mod http;

pub use http::HttpBackend;
