//! PCM16 mono WAV container
//!
//! Layout (little-endian), 44-byte header followed by one `i16` per sample:
//!
//! | Offset | Size | Field           | Value                |
//! |--------|------|-----------------|----------------------|
//! | 0      | 4    | chunk id        | `RIFF`               |
//! | 4      | 4    | chunk size      | 36 + 2 * samples     |
//! | 8      | 4    | format          | `WAVE`               |
//! | 12     | 4    | subchunk1 id    | `fmt `               |
//! | 16     | 4    | subchunk1 size  | 16                   |
//! | 20     | 2    | audio format    | 1 (PCM)              |
//! | 22     | 2    | channels        | 1                    |
//! | 24     | 4    | sample rate     | rate                 |
//! | 28     | 4    | byte rate       | rate * 2             |
//! | 32     | 2    | block align     | 2                    |
//! | 34     | 2    | bits per sample | 16                   |
//! | 36     | 4    | subchunk2 id    | `data`               |
//! | 40     | 4    | subchunk2 size  | 2 * samples          |
//!
//! `hound` writes exactly this layout for a 16-bit mono integer spec.

use std::io::Cursor;

use hound::{SampleFormat, WavReader, WavSpec, WavWriter};
use thiserror::Error;

use super::frame::Signal;
use super::payload::EncodedPayload;

/// Size of the fixed header
pub const HEADER_LEN: usize = 44;

const CHANNELS: u16 = 1;
const BITS_PER_SAMPLE: u16 = 16;
const BYTES_PER_SAMPLE: usize = 2;

/// Largest sample count whose RIFF chunk size still fits in a `u32`
pub const MAX_SAMPLES: usize = (u32::MAX as usize - 36) / BYTES_PER_SAMPLE;

/// Encoding errors
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EncodeError {
    #[error("Signal too long for a WAV container: {0} samples")]
    TooLong(usize),

    #[error("Failed to write WAV data: {0}")]
    Container(String),
}

/// Header parsing errors
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum HeaderError {
    #[error("Not a valid WAV header: {0}")]
    Malformed(String),

    #[error("Unsupported WAV format: {0}")]
    Unsupported(String),
}

fn pcm16_spec(sample_rate: u32) -> WavSpec {
    WavSpec {
        channels: CHANNELS,
        sample_rate,
        bits_per_sample: BITS_PER_SAMPLE,
        sample_format: SampleFormat::Int,
    }
}

/// Quantize one sample to PCM16.
///
/// Clamped to [-1, 1]; negatives scale by 32768 and non-negatives by 32767.
/// The product is taken in `f64` and rounded half away from zero.
pub fn quantize(sample: f32) -> i16 {
    let s = f64::from(sample.clamp(-1.0, 1.0));
    let scaled = if s < 0.0 { s * 32768.0 } else { s * 32767.0 };
    scaled.round() as i16
}

/// Encode a mono signal as a PCM16 WAV byte stream.
///
/// Output length is always `44 + 2 * signal.len()`.
pub fn encode_wav(signal: &Signal) -> Result<EncodedPayload, EncodeError> {
    let count = signal.len();
    if count > MAX_SAMPLES {
        return Err(EncodeError::TooLong(count));
    }

    let rate = signal.sample_rate();
    let container = |e: hound::Error| EncodeError::Container(e.to_string());

    let mut cursor = Cursor::new(Vec::with_capacity(HEADER_LEN + BYTES_PER_SAMPLE * count));
    let mut writer = WavWriter::new(&mut cursor, pcm16_spec(rate)).map_err(container)?;
    for &sample in signal.samples() {
        writer.write_sample(quantize(sample)).map_err(container)?;
    }
    writer.finalize().map_err(container)?;

    Ok(EncodedPayload::new(cursor.into_inner(), rate, count))
}

/// Fields recovered from a WAV header
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WavHeader {
    pub sample_rate: u32,
    pub channels: u16,
    pub bits_per_sample: u16,
    pub sample_count: usize,
}

impl WavHeader {
    /// Parse the header of an integer PCM WAV byte stream.
    pub fn parse(bytes: &[u8]) -> Result<Self, HeaderError> {
        let reader = WavReader::new(Cursor::new(bytes)).map_err(|e| match e {
            hound::Error::Unsupported | hound::Error::InvalidSampleFormat => {
                HeaderError::Unsupported(e.to_string())
            }
            other => HeaderError::Malformed(other.to_string()),
        })?;

        let spec = reader.spec();
        if spec.sample_format != SampleFormat::Int {
            return Err(HeaderError::Unsupported("floating point samples".to_string()));
        }

        Ok(Self {
            sample_rate: spec.sample_rate,
            channels: spec.channels,
            bits_per_sample: spec.bits_per_sample,
            sample_count: reader.duration() as usize,
        })
    }
}
