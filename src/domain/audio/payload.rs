//! Encoded audio payload value object

use std::fmt;

/// MIME type of every payload this crate produces
pub const WAV_MIME_TYPE: &str = "audio/wav";

/// File name used when uploading a payload
pub const WAV_FILE_NAME: &str = "audio.wav";

/// Value object representing an encoded recording ready for upload.
/// Holds the container bytes plus the rate and sample count they encode.
#[derive(Clone, PartialEq, Eq)]
pub struct EncodedPayload {
    data: Vec<u8>,
    sample_rate: u32,
    sample_count: usize,
}

impl EncodedPayload {
    pub(crate) fn new(data: Vec<u8>, sample_rate: u32, sample_count: usize) -> Self {
        Self {
            data,
            sample_rate,
            sample_count,
        }
    }

    /// Get the raw container bytes
    pub fn data(&self) -> &[u8] {
        &self.data
    }

    /// Consume and return the raw container bytes
    pub fn into_data(self) -> Vec<u8> {
        self.data
    }

    pub fn sample_rate(&self) -> u32 {
        self.sample_rate
    }

    pub fn sample_count(&self) -> usize {
        self.sample_count
    }

    /// True when the payload carries no samples (header only)
    pub fn is_silent(&self) -> bool {
        self.sample_count == 0
    }

    pub fn mime_type(&self) -> &'static str {
        WAV_MIME_TYPE
    }

    pub fn file_name(&self) -> &'static str {
        WAV_FILE_NAME
    }

    /// Get the size in bytes
    pub fn size_bytes(&self) -> usize {
        self.data.len()
    }

    /// Duration of the encoded audio in milliseconds
    pub fn duration_ms(&self) -> u64 {
        if self.sample_rate == 0 {
            return 0;
        }
        self.sample_count as u64 * 1000 / self.sample_rate as u64
    }

    /// Get human-readable size
    pub fn human_readable_size(&self) -> String {
        let bytes = self.size_bytes();
        if bytes < 1024 {
            format!("{} B", bytes)
        } else if bytes < 1024 * 1024 {
            format!("{:.1} KB", bytes as f64 / 1024.0)
        } else {
            format!("{:.1} MB", bytes as f64 / (1024.0 * 1024.0))
        }
    }
}

impl fmt::Debug for EncodedPayload {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EncodedPayload")
            .field("bytes", &self.data.len())
            .field("sample_rate", &self.sample_rate)
            .field("sample_count", &self.sample_count)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn human_readable_size_bytes() {
        let payload = EncodedPayload::new(vec![0u8; 500], 16000, 228);
        assert_eq!(payload.human_readable_size(), "500 B");
    }

    #[test]
    fn human_readable_size_kb() {
        let payload = EncodedPayload::new(vec![0u8; 2048], 16000, 1002);
        assert_eq!(payload.human_readable_size(), "2.0 KB");
    }

    #[test]
    fn human_readable_size_mb() {
        let payload = EncodedPayload::new(vec![0u8; 2 * 1024 * 1024], 16000, 0);
        assert_eq!(payload.human_readable_size(), "2.0 MB");
    }

    #[test]
    fn duration_from_samples() {
        let payload = EncodedPayload::new(vec![], 16000, 24000);
        assert_eq!(payload.duration_ms(), 1500);
    }

    #[test]
    fn upload_metadata() {
        let payload = EncodedPayload::new(vec![], 16000, 0);
        assert_eq!(payload.mime_type(), "audio/wav");
        assert_eq!(payload.file_name(), "audio.wav");
        assert!(payload.is_silent());
    }

    #[test]
    fn debug_does_not_dump_bytes() {
        let payload = EncodedPayload::new(vec![7u8; 64], 16000, 10);
        let debug = format!("{:?}", payload);
        assert!(debug.contains("bytes: 64"));
        assert!(!debug.contains("7, 7"));
    }
}
