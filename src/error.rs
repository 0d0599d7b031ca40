use thiserror::Error;

use crate::protocol::voice::FrameError;
use crate::transport::{TopicError, TransportError};
use crate::types::ConfigError;

/// Errors that can occur while sending or receiving voice frames
#[derive(Debug, Error)]
pub enum VoiceError {
    /// Frame encoding or decoding failed
    #[error("frame error: {0}")]
    Frame(#[from] FrameError),

    /// Topic could not be parsed
    #[error("topic error: {0}")]
    Topic(#[from] TopicError),

    /// Transport refused or dropped a message
    #[error("transport error: {0}")]
    Transport(#[from] TransportError),

    /// Configuration is unusable
    #[error("config error: {0}")]
    Config(#[from] ConfigError),
}

impl VoiceError {
    /// Whether the error concerns a single frame and later frames may succeed
    #[must_use]
    pub fn is_per_frame(&self) -> bool {
        matches!(self, Self::Frame(_))
    }
}
