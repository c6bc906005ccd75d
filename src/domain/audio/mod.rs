//! Offline audio pipeline: frame buffering, rate conversion and WAV encoding

pub mod frame;
pub mod payload;
pub mod resampler;
pub mod signal_buffer;
pub mod wav;

pub use frame::{AudioFrame, Signal};
pub use payload::EncodedPayload;
pub use resampler::{resample, ResampleError};
pub use signal_buffer::SignalBuffer;
pub use wav::{encode_wav, EncodeError, HeaderError, WavHeader};

/// Rate every recording is converted to before encoding
pub const TARGET_SAMPLE_RATE: u32 = 16000;
