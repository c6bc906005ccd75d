//! HomeVoice - voice client for a smart-home assistant backend
//!
//! This crate records an utterance from the microphone, converts it to a
//! 16 kHz mono 16-bit WAV payload, sends it to the backend's speech
//! recognizer, and forwards the transcript to the assistant's chat endpoint.
//!
//! # Architecture
//!
//! The crate follows hexagonal (ports & adapters) architecture:
//!
//! - **Domain**: Audio pipeline (frame buffer, resampler, WAV encoder), the
//!   backend data model, value objects, and errors
//! - **Application**: The recorder state machine, the assistant use case,
//!   and port interfaces (traits)
//! - **Infrastructure**: Adapter implementations (cpal, WAV file replay,
//!   HTTP backend, XDG config)
//! - **CLI**: Command-line interface, argument parsing, and the stop signal

pub mod application;
pub mod cli;
pub mod domain;
pub mod infrastructure;
