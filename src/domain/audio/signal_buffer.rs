//! Append-only accumulator for streamed audio frames

use super::frame::{AudioFrame, Signal};

/// Collects variable-length frames in arrival order.
///
/// `push` is the only mutation during capture; `merge_and_clear` is the
/// single read once capture has ended.
#[derive(Debug, Default)]
pub struct SignalBuffer {
    frames: Vec<AudioFrame>,
    total_samples: usize,
}

impl SignalBuffer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a frame. Never drops, never reorders.
    pub fn push(&mut self, frame: AudioFrame) {
        self.total_samples += frame.len();
        self.frames.push(frame);
    }

    /// Number of frames pushed since the last merge
    pub fn frame_count(&self) -> usize {
        self.frames.len()
    }

    /// Total samples across all pushed frames
    pub fn sample_count(&self) -> usize {
        self.total_samples
    }

    pub fn is_empty(&self) -> bool {
        self.total_samples == 0
    }

    /// Concatenate all frames into one signal and reset to empty.
    pub fn merge_and_clear(&mut self, sample_rate: u32) -> Signal {
        let mut merged = Vec::with_capacity(self.total_samples);
        for frame in self.frames.drain(..) {
            merged.extend_from_slice(frame.samples());
        }
        self.total_samples = 0;
        Signal::new(merged, sample_rate)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn merge_preserves_order_and_length() {
        let mut buffer = SignalBuffer::new();
        buffer.push(AudioFrame::new(vec![0.1, 0.2]));
        buffer.push(AudioFrame::new(vec![0.3]));
        buffer.push(AudioFrame::new(vec![0.4, 0.5, 0.6]));

        assert_eq!(buffer.frame_count(), 3);
        assert_eq!(buffer.sample_count(), 6);

        let signal = buffer.merge_and_clear(48000);
        assert_eq!(signal.samples(), &[0.1, 0.2, 0.3, 0.4, 0.5, 0.6]);
        assert_eq!(signal.sample_rate(), 48000);
    }

    #[test]
    fn merge_resets_state() {
        let mut buffer = SignalBuffer::new();
        buffer.push(AudioFrame::new(vec![1.0; 4096]));
        let _ = buffer.merge_and_clear(44100);

        assert!(buffer.is_empty());
        assert_eq!(buffer.frame_count(), 0);
        assert!(buffer.merge_and_clear(44100).is_empty());
    }

    #[test]
    fn empty_frames_are_kept_but_add_nothing() {
        let mut buffer = SignalBuffer::new();
        buffer.push(AudioFrame::new(vec![]));
        buffer.push(AudioFrame::new(vec![0.5]));
        assert_eq!(buffer.frame_count(), 2);
        assert_eq!(buffer.merge_and_clear(16000).samples(), &[0.5]);
    }

    #[test]
    fn merge_of_empty_buffer() {
        let mut buffer = SignalBuffer::new();
        let signal = buffer.merge_and_clear(16000);
        assert!(signal.is_empty());
        assert_eq!(signal.sample_rate(), 16000);
    }
}
