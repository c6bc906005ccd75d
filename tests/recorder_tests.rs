//! Recorder lifecycle tests with a scripted capture device

use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Arc;
use std::thread::JoinHandle;
use std::time::Duration;

use async_trait::async_trait;
use parking_lot::Mutex;

use home_voice::application::ports::{AudioCapture, CaptureHandle, FrameSink, RecordingError};
use home_voice::application::Recorder;
use home_voice::domain::audio::{AudioFrame, WavHeader};
use home_voice::domain::RecorderStatus;

/// What the scripted device does when opened
#[derive(Clone)]
enum Script {
    /// Deliver `frame_len`-sample frames from a background thread until released
    Stream { rate: u32, frame_len: usize },
    /// Deliver `frames` frames, then report a fault and go quiet
    FaultAfter {
        rate: u32,
        frame_len: usize,
        frames: usize,
    },
    /// Refuse to open
    Deny,
}

#[derive(Default)]
struct Counters {
    opened: AtomicUsize,
    released: AtomicUsize,
    pushed_after_release: AtomicBool,
}

struct ScriptedCapture {
    script: Script,
    counters: Arc<Counters>,
}

impl ScriptedCapture {
    fn new(script: Script) -> (Self, Arc<Counters>) {
        let counters = Arc::new(Counters::default());
        (
            Self {
                script,
                counters: Arc::clone(&counters),
            },
            counters,
        )
    }
}

struct ScriptedHandle {
    rate: u32,
    running: Arc<AtomicBool>,
    fault: Arc<Mutex<Option<String>>>,
    worker: Option<JoinHandle<()>>,
    counters: Arc<Counters>,
}

impl CaptureHandle for ScriptedHandle {
    fn sample_rate(&self) -> u32 {
        self.rate
    }

    fn fault(&self) -> Option<String> {
        self.fault.lock().clone()
    }

    fn release(mut self: Box<Self>) {
        self.running.store(false, Ordering::SeqCst);
        if let Some(worker) = self.worker.take() {
            worker.join().unwrap();
        }
        self.counters.released.fetch_add(1, Ordering::SeqCst);
    }
}

#[async_trait]
impl AudioCapture for ScriptedCapture {
    async fn open(&self, sink: FrameSink) -> Result<Box<dyn CaptureHandle>, RecordingError> {
        let (rate, frame_len, limit) = match self.script {
            Script::Deny => {
                return Err(RecordingError::PermissionDenied(
                    "NotAllowedError: user dismissed the prompt".into(),
                ))
            }
            Script::Stream { rate, frame_len } => (rate, frame_len, None),
            Script::FaultAfter {
                rate,
                frame_len,
                frames,
            } => (rate, frame_len, Some(frames)),
        };

        self.counters.opened.fetch_add(1, Ordering::SeqCst);

        let running = Arc::new(AtomicBool::new(true));
        let fault = Arc::new(Mutex::new(None));

        let worker = {
            let running = Arc::clone(&running);
            let fault = Arc::clone(&fault);
            let counters = Arc::clone(&self.counters);
            std::thread::spawn(move || {
                let mut delivered = 0usize;
                while running.load(Ordering::SeqCst) {
                    if limit == Some(delivered) {
                        *fault.lock() = Some("device unplugged".to_string());
                        break;
                    }
                    sink.push(AudioFrame::new(vec![0.1; frame_len]));
                    delivered += 1;
                    std::thread::sleep(Duration::from_millis(2));
                }
                if counters.released.load(Ordering::SeqCst) > 0 {
                    counters.pushed_after_release.store(true, Ordering::SeqCst);
                }
            })
        };

        Ok(Box::new(ScriptedHandle {
            rate,
            running,
            fault,
            worker: Some(worker),
            counters: Arc::clone(&self.counters),
        }))
    }
}

/// Poll until the open session has buffered at least `samples`
async fn wait_for_samples(recorder: &Recorder<ScriptedCapture>, samples: usize) {
    for _ in 0..1000 {
        if recorder.captured_samples() >= samples {
            return;
        }
        tokio::time::sleep(Duration::from_millis(5)).await;
    }
    panic!("capture did not deliver {} samples in time", samples);
}

#[tokio::test]
async fn full_cycle_releases_before_returning() {
    let (capture, counters) = ScriptedCapture::new(Script::Stream {
        rate: 48000,
        frame_len: 4800,
    });
    let mut recorder = Recorder::new(capture);

    recorder.start().await.unwrap();
    assert_eq!(recorder.status(), RecorderStatus::Recording);
    wait_for_samples(&recorder, 4800 * 3).await;

    let payload = recorder.stop().await.unwrap().unwrap();
    assert_eq!(recorder.status(), RecorderStatus::Idle);
    assert_eq!(counters.opened.load(Ordering::SeqCst), 1);
    assert_eq!(counters.released.load(Ordering::SeqCst), 1);
    assert!(!counters.pushed_after_release.load(Ordering::SeqCst));

    let header = WavHeader::parse(payload.data()).unwrap();
    assert_eq!(header.sample_rate, 16000);
    assert_eq!(header.channels, 1);
    assert_eq!(header.bits_per_sample, 16);
    // Whole 4800-sample frames at 48 kHz decimate to 1600 samples each
    assert!(header.sample_count >= 1600 * 3);
    assert_eq!(header.sample_count % 1600, 0);
    assert_eq!(payload.size_bytes(), 44 + 2 * header.sample_count);
}

#[tokio::test]
async fn odd_native_rate_follows_length_law() {
    let (capture, _) = ScriptedCapture::new(Script::FaultAfter {
        rate: 44100,
        frame_len: 4096,
        frames: 5,
    });
    let mut recorder = Recorder::new(capture);

    recorder.start().await.unwrap();
    wait_for_samples(&recorder, 5 * 4096).await;
    let payload = recorder.stop().await.unwrap().unwrap();

    let expected = (5.0 * 4096.0 / (44100.0_f64 / 16000.0)).round() as usize;
    assert_eq!(payload.sample_count(), expected);
}

#[tokio::test]
async fn mid_session_fault_still_encodes_partial_audio() {
    let (capture, counters) = ScriptedCapture::new(Script::FaultAfter {
        rate: 16000,
        frame_len: 1000,
        frames: 3,
    });
    let mut recorder = Recorder::new(capture);

    recorder.start().await.unwrap();
    wait_for_samples(&recorder, 3000).await;

    let payload = recorder.stop().await.unwrap().unwrap();
    assert_eq!(payload.sample_count(), 3000);
    assert_eq!(counters.released.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn denied_permission_leaves_recorder_idle() {
    let (capture, counters) = ScriptedCapture::new(Script::Deny);
    let mut recorder = Recorder::new(capture);

    let err = recorder.start().await.unwrap_err();
    assert!(matches!(err, RecordingError::PermissionDenied(_)));
    assert_eq!(recorder.status(), RecorderStatus::Idle);
    assert_eq!(counters.opened.load(Ordering::SeqCst), 0);

    assert!(recorder.stop().await.unwrap().is_none());
    assert_eq!(counters.released.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn second_start_does_not_open_another_handle() {
    let (capture, counters) = ScriptedCapture::new(Script::Stream {
        rate: 48000,
        frame_len: 512,
    });
    let mut recorder = Recorder::new(capture);

    recorder.start().await.unwrap();
    let err = recorder.start().await.unwrap_err();
    assert!(matches!(err, RecordingError::AlreadyRecording));
    assert_eq!(counters.opened.load(Ordering::SeqCst), 1);

    recorder.stop().await.unwrap();
    assert_eq!(counters.released.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn stop_is_idempotent() {
    let (capture, counters) = ScriptedCapture::new(Script::Stream {
        rate: 48000,
        frame_len: 480,
    });
    let mut recorder = Recorder::new(capture);

    recorder.start().await.unwrap();
    assert!(recorder.stop().await.unwrap().is_some());
    assert!(recorder.stop().await.unwrap().is_none());
    assert!(recorder.stop().await.unwrap().is_none());
    assert_eq!(counters.released.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn sessions_do_not_share_audio() {
    let (capture, counters) = ScriptedCapture::new(Script::FaultAfter {
        rate: 16000,
        frame_len: 100,
        frames: 2,
    });
    let mut recorder = Recorder::new(capture);

    for _ in 0..3 {
        recorder.start().await.unwrap();
        wait_for_samples(&recorder, 200).await;
        let payload = recorder.stop().await.unwrap().unwrap();
        assert_eq!(payload.sample_count(), 200);
    }
    assert_eq!(counters.opened.load(Ordering::SeqCst), 3);
    assert_eq!(counters.released.load(Ordering::SeqCst), 3);
}
