use super::{FrameSource, Topic};
use crate::error::VoiceError;
use crate::protocol::voice::{VerifiedFrame, verify};

/// A frame taken off the bus, with its validity already checked
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReceivedFrame {
    /// Topic the frame arrived on
    pub topic: Topic,
    /// Decoded header, payload and checksum verdict
    pub frame: VerifiedFrame,
}

/// Pulls messages from a source and verifies each as a voice frame
#[derive(Debug)]
pub struct VoiceReceiver<R> {
    source: R,
    received: u64,
    corrupted: u64,
}

impl<R: FrameSource> VoiceReceiver<R> {
    /// Wrap a frame source
    pub fn new(source: R) -> Self {
        Self {
            source,
            received: 0,
            corrupted: 0,
        }
    }

    /// Receive and verify the next frame
    ///
    /// Frames failing the checksum are returned with `valid == false`;
    /// dropping them is the caller's decision. Returns `Ok(None)` once the
    /// source is closed.
    ///
    /// # Errors
    ///
    /// Returns `VoiceError::Frame` for a message too short to hold its
    /// header or declared payload. The message is consumed either way.
    pub async fn next_frame(&mut self) -> Result<Option<ReceivedFrame>, VoiceError> {
        let Some(message) = self.source.recv().await else {
            return Ok(None);
        };

        let frame = verify(&message.payload).inspect_err(|e| {
            tracing::error!(
                topic = %message.topic,
                len = message.payload.len(),
                error = %e,
                "malformed voice frame"
            );
        })?;

        self.received += 1;
        if !frame.valid {
            self.corrupted += 1;
            tracing::warn!(
                topic = %message.topic,
                seq = frame.header.frame_seq,
                expected = frame.header.checksum,
                computed = frame.computed_checksum(),
                "voice frame failed checksum"
            );
        }

        Ok(Some(ReceivedFrame {
            topic: message.topic,
            frame,
        }))
    }

    /// Well-formed frames received so far, valid or not
    pub fn received(&self) -> u64 {
        self.received
    }

    /// Frames received with a checksum mismatch
    pub fn corrupted(&self) -> u64 {
        self.corrupted
    }

    /// Unwrap the underlying source
    pub fn into_inner(self) -> R {
        self.source
    }
}
