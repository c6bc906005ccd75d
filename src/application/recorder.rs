//! Two-phase recorder: start acquires the input, stop releases it and
//! produces a 16 kHz WAV payload.
//!
//! State machine:
//!   IDLE -> RECORDING (start)
//!   RECORDING -> IDLE (stop, on every path including errors)
//!
//! The session value lives only inside the `Recording` state. `stop` moves it
//! out before doing anything else, releases the hardware, and only then runs
//! the resample/encode stages, so a failed encode cannot keep the input open.

use std::mem;
use std::time::Instant;

use tracing::{debug, info, warn};

use crate::domain::audio::{encode_wav, resample, EncodedPayload, Signal, TARGET_SAMPLE_RATE};
use crate::domain::recorder::RecorderStatus;

use super::ports::{AudioCapture, CaptureHandle, FrameSink, RecordingError};

/// Resources owned by one recording
struct RecordingSession {
    handle: Box<dyn CaptureHandle>,
    sink: FrameSink,
    started_at: Instant,
}

/// What a session leaves behind once its hardware is released
struct CapturedAudio {
    signal: Signal,
    fault: Option<String>,
    elapsed_ms: u64,
}

impl RecordingSession {
    /// Release the input and collect the merged signal.
    fn teardown(self) -> CapturedAudio {
        let sample_rate = self.handle.sample_rate();
        let fault = self.handle.fault();
        self.handle.release();

        CapturedAudio {
            signal: self.sink.take_signal(sample_rate),
            fault,
            elapsed_ms: self.started_at.elapsed().as_millis() as u64,
        }
    }
}

enum RecorderState {
    Idle,
    Recording(RecordingSession),
}

/// Microphone recorder over an `AudioCapture` adapter.
///
/// At most one session is open at a time; `start` while recording is
/// rejected with `RecordingError::AlreadyRecording` and opens nothing.
pub struct Recorder<C: AudioCapture> {
    capture: C,
    state: RecorderState,
    target_rate: u32,
}

impl<C: AudioCapture> Recorder<C> {
    /// Create a recorder producing 16 kHz payloads
    pub fn new(capture: C) -> Self {
        Self::with_target_rate(capture, TARGET_SAMPLE_RATE)
    }

    /// Create a recorder producing payloads at `target_rate`
    pub fn with_target_rate(capture: C, target_rate: u32) -> Self {
        Self {
            capture,
            state: RecorderState::Idle,
            target_rate,
        }
    }

    pub fn status(&self) -> RecorderStatus {
        match self.state {
            RecorderState::Idle => RecorderStatus::Idle,
            RecorderState::Recording(_) => RecorderStatus::Recording,
        }
    }

    pub fn is_recording(&self) -> bool {
        self.status().is_recording()
    }

    /// Milliseconds since the current session started (0 when idle)
    pub fn elapsed_ms(&self) -> u64 {
        match &self.state {
            RecorderState::Idle => 0,
            RecorderState::Recording(session) => session.started_at.elapsed().as_millis() as u64,
        }
    }

    /// Samples captured so far in the current session (0 when idle)
    pub fn captured_samples(&self) -> usize {
        match &self.state {
            RecorderState::Idle => 0,
            RecorderState::Recording(session) => session.sink.sample_count(),
        }
    }

    /// Acquire the input and start buffering frames.
    ///
    /// On error the recorder stays idle and nothing is held.
    pub async fn start(&mut self) -> Result<(), RecordingError> {
        if let RecorderState::Recording(_) = self.state {
            warn!("start requested while already recording");
            return Err(RecordingError::AlreadyRecording);
        }

        let sink = FrameSink::new();
        let handle = self.capture.open(sink.clone()).await?;

        info!(sample_rate = handle.sample_rate(), "recording started");
        self.state = RecorderState::Recording(RecordingSession {
            handle,
            sink,
            started_at: Instant::now(),
        });
        Ok(())
    }

    /// End the session and return the encoded recording.
    ///
    /// Returns `Ok(None)` when idle, without touching any hardware. The
    /// recorder is idle again when this returns, whatever the outcome.
    pub async fn stop(&mut self) -> Result<Option<EncodedPayload>, RecordingError> {
        let session = match mem::replace(&mut self.state, RecorderState::Idle) {
            RecorderState::Idle => {
                debug!("stop requested while idle");
                return Ok(None);
            }
            RecorderState::Recording(session) => session,
        };

        let captured = session.teardown();
        info!(
            elapsed_ms = captured.elapsed_ms,
            samples = captured.signal.len(),
            "recording stopped, input released"
        );

        if let Some(fault) = &captured.fault {
            warn!(%fault, "capture fault during session, encoding partial audio");
        }

        let target_rate = self.target_rate;
        let payload =
            tokio::task::spawn_blocking(move || encode_signal(captured.signal, target_rate))
                .await
                .map_err(|e| {
                    RecordingError::RecordingFailed(format!("Encode task error: {}", e))
                })??;

        Ok(Some(payload))
    }
}

impl<C: AudioCapture> Drop for Recorder<C> {
    fn drop(&mut self) {
        if let RecorderState::Recording(session) = mem::replace(&mut self.state, RecorderState::Idle)
        {
            warn!("recorder dropped while recording, releasing input");
            let _ = session.teardown();
        }
    }
}

/// Resample a merged signal to `target_rate` and wrap it as WAV.
pub fn encode_signal(signal: Signal, target_rate: u32) -> Result<EncodedPayload, RecordingError> {
    let source_rate = signal.sample_rate();
    let source_len = signal.len();

    let resampled =
        resample(signal, target_rate).map_err(|e| RecordingError::EncodeFailed(e.to_string()))?;

    debug!(
        source_rate,
        source_len,
        target_rate,
        target_len = resampled.len(),
        "resampled recording"
    );

    encode_wav(&resampled).map_err(|e| RecordingError::EncodeFailed(e.to_string()))
}
