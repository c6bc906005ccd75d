//! Recording infrastructure module
//!
//! Provides the live microphone adapter (cpal) and a WAV file replay adapter.
//! Both deliver raw frames at their native rate; resampling and encoding
//! happen in the recorder after the input is released.

mod cpal_capture;
mod wav_file_capture;

pub use cpal_capture::CpalCapture;
pub use wav_file_capture::{WavFileCapture, FRAME_SIZE};

use std::path::PathBuf;

use crate::application::ports::AudioCapture;

/// Create the capture adapter for a run.
///
/// A file path replays that file; otherwise the named (or default)
/// microphone is used.
pub fn create_capture(input: Option<PathBuf>, device: Option<&str>) -> Box<dyn AudioCapture> {
    match (input, device) {
        (Some(path), _) => Box::new(WavFileCapture::new(path)),
        (None, Some(name)) => Box::new(CpalCapture::with_device(name)),
        (None, None) => Box::new(CpalCapture::new()),
    }
}
