//! Replays a WAV file through the capture path
//!
//! Used for headless runs: the file's samples go through the same frame
//! buffer, resampler and encoder as live microphone audio.

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use hound::{SampleFormat, WavReader};
use tracing::info;

use crate::application::ports::{AudioCapture, CaptureHandle, FrameSink, RecordingError};
use crate::domain::audio::AudioFrame;

/// Samples per pushed frame
pub const FRAME_SIZE: usize = 4096;

/// Capture adapter that reads a WAV file instead of a microphone
#[derive(Debug, Clone)]
pub struct WavFileCapture {
    path: PathBuf,
}

impl WavFileCapture {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Read the whole file as mono `f32` in [-1, 1]
    fn read_mono(path: &Path) -> Result<(Vec<f32>, u32), RecordingError> {
        let reader = WavReader::open(path).map_err(|e| {
            RecordingError::StartFailed(format!("Failed to open {}: {}", path.display(), e))
        })?;

        let spec = reader.spec();
        let read_err = |e: hound::Error| {
            RecordingError::RecordingFailed(format!("Failed to read audio samples: {}", e))
        };

        let interleaved: Vec<f32> = match spec.sample_format {
            SampleFormat::Float => reader
                .into_samples::<f32>()
                .collect::<Result<_, _>>()
                .map_err(read_err)?,
            SampleFormat::Int => {
                let scale = (1i64 << (spec.bits_per_sample.saturating_sub(1))) as f32;
                reader
                    .into_samples::<i32>()
                    .map(|s| s.map(|v| v as f32 / scale))
                    .collect::<Result<_, _>>()
                    .map_err(read_err)?
            }
        };

        let channels = spec.channels.max(1) as usize;
        let mono = if channels == 1 {
            interleaved
        } else {
            interleaved
                .chunks(channels)
                .map(|frame| frame.iter().sum::<f32>() / frame.len() as f32)
                .collect()
        };

        info!(
            path = %path.display(),
            sample_rate = spec.sample_rate,
            channels = spec.channels,
            samples = mono.len(),
            "audio file loaded"
        );

        Ok((mono, spec.sample_rate))
    }
}

#[async_trait]
impl AudioCapture for WavFileCapture {
    async fn open(&self, sink: FrameSink) -> Result<Box<dyn CaptureHandle>, RecordingError> {
        let path = self.path.clone();
        let (samples, sample_rate) = tokio::task::spawn_blocking(move || Self::read_mono(&path))
            .await
            .map_err(|e| RecordingError::StartFailed(format!("Task join error: {}", e)))??;

        for chunk in samples.chunks(FRAME_SIZE) {
            sink.push(AudioFrame::from_slice(chunk));
        }

        Ok(Box::new(FileHandle { sample_rate }))
    }
}

/// Nothing stays open once the file has been read
struct FileHandle {
    sample_rate: u32,
}

impl CaptureHandle for FileHandle {
    fn sample_rate(&self) -> u32 {
        self.sample_rate
    }

    fn fault(&self) -> Option<String> {
        None
    }

    fn release(self: Box<Self>) {}
}
