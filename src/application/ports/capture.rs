//! Audio capture port interfaces
//!
//! The recorder owns exactly one `CaptureHandle` per session. Adapters
//! deliver frames asynchronously through a `FrameSink`; the recorder reads
//! the sink once, after the handle has been released.

use std::sync::Arc;

use async_trait::async_trait;
use parking_lot::Mutex;
use thiserror::Error;

use crate::domain::audio::{AudioFrame, Signal, SignalBuffer};

/// Recording errors
#[derive(Debug, Clone, Error)]
pub enum RecordingError {
    #[error("Microphone access denied: {0}")]
    PermissionDenied(String),

    #[error("No audio input device available")]
    NoAudioDevice,

    #[error("A recording is already in progress")]
    AlreadyRecording,

    #[error("Failed to start recording: {0}")]
    StartFailed(String),

    #[error("Recording failed: {0}")]
    RecordingFailed(String),

    #[error("Failed to encode recording: {0}")]
    EncodeFailed(String),
}

/// Shared destination for captured frames.
///
/// Cloned into the capture callback; `push` is the only operation the
/// callback performs.
#[derive(Clone, Default)]
pub struct FrameSink {
    buffer: Arc<Mutex<SignalBuffer>>,
}

impl FrameSink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append one frame in delivery order
    pub fn push(&self, frame: AudioFrame) {
        self.buffer.lock().push(frame);
    }

    /// Total samples pushed so far
    pub fn sample_count(&self) -> usize {
        self.buffer.lock().sample_count()
    }

    /// Merge everything pushed so far into one signal and clear the buffer
    pub fn take_signal(&self, sample_rate: u32) -> Signal {
        self.buffer.lock().merge_and_clear(sample_rate)
    }
}

/// An open capture session on some input hardware.
pub trait CaptureHandle: Send {
    /// Native sample rate of the delivered frames
    fn sample_rate(&self) -> u32;

    /// A hardware fault reported since the session opened, if any
    fn fault(&self) -> Option<String>;

    /// Stop delivery and release every acquired resource.
    /// No frame is pushed after this returns.
    fn release(self: Box<Self>);
}

/// Port for acquiring an input stream
#[async_trait]
pub trait AudioCapture: Send + Sync {
    /// Acquire the input and start delivering frames into `sink`.
    ///
    /// May suspend until the platform grants access. On error nothing is
    /// left acquired.
    async fn open(&self, sink: FrameSink) -> Result<Box<dyn CaptureHandle>, RecordingError>;
}

/// Blanket implementation for boxed capture types
#[async_trait]
impl AudioCapture for Box<dyn AudioCapture> {
    async fn open(&self, sink: FrameSink) -> Result<Box<dyn CaptureHandle>, RecordingError> {
        self.as_ref().open(sink).await
    }
}
