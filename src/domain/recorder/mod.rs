//! Recorder lifecycle states

use std::fmt;

/// Externally visible recorder state.
///
/// The session data itself only exists inside the recorder while
/// `Recording`; this enum is what callers observe.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum RecorderStatus {
    #[default]
    Idle,
    Recording,
}

impl RecorderStatus {
    /// Get the string representation
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Idle => "idle",
            Self::Recording => "recording",
        }
    }

    pub fn is_recording(&self) -> bool {
        *self == Self::Recording
    }
}

impl fmt::Display for RecorderStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
