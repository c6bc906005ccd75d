//! Live microphone capture using cpal
//!
//! `cpal::Stream` is not `Send`, so each session owns a dedicated thread that
//! builds the stream, reports readiness, and parks until released. Frames go
//! straight from the data callback into the session's `FrameSink` at the
//! device's native rate; conversion to 16 kHz happens after release.

use std::sync::mpsc;
use std::sync::Arc;
use std::thread::JoinHandle;

use async_trait::async_trait;
use cpal::traits::{DeviceTrait, HostTrait, StreamTrait};
use cpal::{FromSample, SampleFormat, SizedSample, StreamConfig};
use parking_lot::Mutex;
use tokio::sync::oneshot;
use tracing::{debug, info, warn};

use crate::application::ports::{AudioCapture, CaptureHandle, FrameSink, RecordingError};
use crate::domain::audio::AudioFrame;

type FaultSlot = Arc<Mutex<Option<String>>>;

/// Microphone capture through the platform's default audio host
#[derive(Debug, Clone, Default)]
pub struct CpalCapture {
    device_name: Option<String>,
}

impl CpalCapture {
    /// Capture from the default input device
    pub fn new() -> Self {
        Self::default()
    }

    /// Capture from the input device with this exact name
    pub fn with_device(name: impl Into<String>) -> Self {
        Self {
            device_name: Some(name.into()),
        }
    }

    /// Names of all input devices on the default host
    pub fn input_device_names() -> Result<Vec<String>, RecordingError> {
        let host = cpal::default_host();
        let devices = host
            .input_devices()
            .map_err(|e| RecordingError::StartFailed(format!("Failed to list devices: {}", e)))?;
        Ok(devices.filter_map(|d| d.name().ok()).collect())
    }

    fn select_device(host: &cpal::Host, name: Option<&str>) -> Result<cpal::Device, RecordingError> {
        let Some(wanted) = name else {
            return host
                .default_input_device()
                .ok_or(RecordingError::NoAudioDevice);
        };

        let devices = host
            .input_devices()
            .map_err(|e| RecordingError::StartFailed(format!("Failed to list devices: {}", e)))?;

        for device in devices {
            if device.name().map(|n| n == wanted).unwrap_or(false) {
                return Ok(device);
            }
        }

        Err(RecordingError::StartFailed(format!(
            "Input device not found: {}",
            wanted
        )))
    }

    /// Map a stream construction failure onto the recorder's error kinds
    fn classify(message: String) -> RecordingError {
        let lower = message.to_lowercase();
        if lower.contains("permission") || lower.contains("denied") {
            RecordingError::PermissionDenied(message)
        } else if lower.contains("not available") || lower.contains("no longer available") {
            RecordingError::NoAudioDevice
        } else {
            RecordingError::StartFailed(message)
        }
    }

    /// Body of the stream thread. Sends the native rate once the stream is
    /// playing, then blocks until `stop_rx` fires or its sender is dropped.
    fn run_stream(
        device_name: Option<String>,
        sink: FrameSink,
        fault: FaultSlot,
        ready_tx: oneshot::Sender<Result<u32, RecordingError>>,
        stop_rx: mpsc::Receiver<()>,
    ) {
        let stream = match Self::start_stream(device_name.as_deref(), sink, fault) {
            Ok((stream, sample_rate)) => {
                if ready_tx.send(Ok(sample_rate)).is_err() {
                    // Caller went away before the stream was ready
                    return;
                }
                stream
            }
            Err(e) => {
                let _ = ready_tx.send(Err(e));
                return;
            }
        };

        let _ = stop_rx.recv();
        drop(stream);
        debug!("input stream closed");
    }

    fn start_stream(
        device_name: Option<&str>,
        sink: FrameSink,
        fault: FaultSlot,
    ) -> Result<(cpal::Stream, u32), RecordingError> {
        let host = cpal::default_host();
        let device = Self::select_device(&host, device_name)?;

        let supported = device
            .default_input_config()
            .map_err(|e| Self::classify(format!("Failed to get input config: {}", e)))?;
        let sample_format = supported.sample_format();
        let config = supported.config();

        debug!(
            device = %device.name().unwrap_or_default(),
            sample_rate = config.sample_rate.0,
            channels = config.channels,
            ?sample_format,
            "opening input stream"
        );

        let stream = match sample_format {
            SampleFormat::F32 => build_stream::<f32>(&device, &config, sink, fault),
            SampleFormat::I16 => build_stream::<i16>(&device, &config, sink, fault),
            SampleFormat::U16 => build_stream::<u16>(&device, &config, sink, fault),
            other => {
                return Err(RecordingError::StartFailed(format!(
                    "Unsupported sample format: {:?}",
                    other
                )))
            }
        }
        .map_err(|e| Self::classify(e.to_string()))?;

        stream
            .play()
            .map_err(|e| Self::classify(e.to_string()))?;

        Ok((stream, config.sample_rate.0))
    }
}

/// Build an input stream that pushes mono `f32` frames into `sink`
fn build_stream<T>(
    device: &cpal::Device,
    config: &StreamConfig,
    sink: FrameSink,
    fault: FaultSlot,
) -> Result<cpal::Stream, cpal::BuildStreamError>
where
    T: SizedSample,
    f32: FromSample<T>,
{
    let channels = config.channels as usize;
    device.build_input_stream(
        config,
        move |data: &[T], _: &cpal::InputCallbackInfo| {
            sink.push(AudioFrame::new(downmix(data, channels)));
        },
        move |err| {
            warn!(error = %err, "audio stream error");
            let mut slot = fault.lock();
            if slot.is_none() {
                *slot = Some(err.to_string());
            }
        },
        None,
    )
}

/// Average interleaved channels into one `f32` channel
fn downmix<T>(data: &[T], channels: usize) -> Vec<f32>
where
    T: Copy,
    f32: FromSample<T>,
{
    let channels = channels.max(1);
    data.chunks(channels)
        .map(|frame| {
            let sum: f32 = frame.iter().map(|&s| f32::from_sample_(s)).sum();
            sum / frame.len() as f32
        })
        .collect()
}

#[async_trait]
impl AudioCapture for CpalCapture {
    async fn open(&self, sink: FrameSink) -> Result<Box<dyn CaptureHandle>, RecordingError> {
        let (ready_tx, ready_rx) = oneshot::channel();
        let (stop_tx, stop_rx) = mpsc::channel();
        let fault: FaultSlot = Arc::new(Mutex::new(None));

        let device_name = self.device_name.clone();
        let thread_fault = Arc::clone(&fault);
        let thread = std::thread::Builder::new()
            .name("home-voice-capture".into())
            .spawn(move || Self::run_stream(device_name, sink, thread_fault, ready_tx, stop_rx))
            .map_err(|e| RecordingError::StartFailed(format!("Failed to spawn thread: {}", e)))?;

        let outcome = ready_rx.await.unwrap_or_else(|_| {
            Err(RecordingError::StartFailed(
                "Capture thread exited unexpectedly".into(),
            ))
        });

        match outcome {
            Ok(sample_rate) => {
                info!(sample_rate, "microphone opened");
                Ok(Box::new(CpalHandle {
                    sample_rate,
                    fault,
                    stop_tx,
                    thread: Some(thread),
                }))
            }
            Err(e) => {
                let _ = thread.join();
                Err(e)
            }
        }
    }
}

/// Handle to a running stream thread
struct CpalHandle {
    sample_rate: u32,
    fault: FaultSlot,
    stop_tx: mpsc::Sender<()>,
    thread: Option<JoinHandle<()>>,
}

impl CpalHandle {
    fn shutdown(&mut self) {
        if let Some(thread) = self.thread.take() {
            let _ = self.stop_tx.send(());
            if thread.join().is_err() {
                warn!("capture thread panicked");
            }
            info!("microphone released");
        }
    }
}

impl CaptureHandle for CpalHandle {
    fn sample_rate(&self) -> u32 {
        self.sample_rate
    }

    fn fault(&self) -> Option<String> {
        self.fault.lock().clone()
    }

    fn release(mut self: Box<Self>) {
        self.shutdown();
    }
}

impl Drop for CpalHandle {
    fn drop(&mut self) {
        self.shutdown();
    }
}
