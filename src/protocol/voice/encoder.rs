use std::fmt;
use std::time::{SystemTime, UNIX_EPOCH};

use bytes::Bytes;

use super::constants::MAX_PAYLOAD_LEN;
use super::frame::VoiceFrame;
use super::header::{FrameError, FrameFlag, VoiceHeader};
use crate::types::AudioConfig;

/// Source of the 16-bit header timestamp
pub type Clock = Box<dyn Fn() -> u16 + Send + Sync>;

/// Unix time in seconds, truncated to 16 bits
#[must_use]
pub fn unix_clock() -> u16 {
    let secs = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map_or(0, |d| d.as_secs());
    (secs & 0xFFFF) as u16
}

/// Builds consecutive frames for one audio stream
///
/// Holds the stream's audio parameters and sequence counter. The counter
/// advances by one per frame and wraps at 65536.
pub struct FrameEncoder {
    config: AudioConfig,
    sequence: u16,
    clock: Clock,
}

impl fmt::Debug for FrameEncoder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FrameEncoder")
            .field("config", &self.config)
            .field("sequence", &self.sequence)
            .finish_non_exhaustive()
    }
}

impl FrameEncoder {
    /// Create an encoder starting at sequence 0, stamped with [`unix_clock`]
    #[must_use]
    pub fn new(config: AudioConfig) -> Self {
        Self {
            config,
            sequence: 0,
            clock: Box::new(unix_clock),
        }
    }

    /// Replace the timestamp source
    #[must_use]
    pub fn with_clock(mut self, clock: impl Fn() -> u16 + Send + Sync + 'static) -> Self {
        self.clock = Box::new(clock);
        self
    }

    /// Start from `sequence` instead of 0
    #[must_use]
    pub fn with_sequence(mut self, sequence: u16) -> Self {
        self.sequence = sequence;
        self
    }

    /// Audio parameters stamped on every frame
    #[must_use]
    pub fn config(&self) -> &AudioConfig {
        &self.config
    }

    /// Sequence number the next frame will carry
    #[must_use]
    pub fn sequence(&self) -> u16 {
        self.sequence
    }

    /// Reset the sequence counter
    pub fn reset(&mut self) {
        self.sequence = 0;
    }

    /// Build the next frame with the given flag
    ///
    /// # Errors
    ///
    /// Returns `FrameError::PayloadTooLarge` for payloads over 65535 bytes.
    pub fn next_frame(
        &mut self,
        data: impl Into<Bytes>,
        flag: FrameFlag,
    ) -> Result<VoiceFrame, FrameError> {
        let header = VoiceHeader::new(
            self.config.format,
            self.config.sample_rate,
            self.config.channels,
            flag,
            self.sequence,
            (self.clock)(),
        );
        let frame = VoiceFrame::new(header, data)?;
        self.sequence = self.sequence.wrapping_add(1);

        tracing::trace!(
            seq = frame.header.frame_seq,
            flag = ?flag,
            payload_len = frame.header.payload_len,
            "encoded voice frame"
        );
        Ok(frame)
    }

    /// Encode a complete utterance as one `Full` frame
    ///
    /// # Errors
    ///
    /// Returns `FrameError::PayloadTooLarge` for payloads over 65535 bytes.
    pub fn encode_full(&mut self, data: &[u8]) -> Result<Bytes, FrameError> {
        Ok(self
            .next_frame(Bytes::copy_from_slice(data), FrameFlag::Full)?
            .encode())
    }

    /// Encode one piece of a streamed utterance
    ///
    /// # Errors
    ///
    /// Returns `FrameError::PayloadTooLarge` for payloads over 65535 bytes.
    pub fn encode_stream(&mut self, data: &[u8], is_last: bool) -> Result<Bytes, FrameError> {
        let flag = if is_last {
            FrameFlag::Last
        } else {
            FrameFlag::Fragment
        };
        Ok(self.next_frame(Bytes::copy_from_slice(data), flag)?.encode())
    }

    /// Split `data` into `Fragment` frames closed by one `Last` frame
    ///
    /// Empty input yields a single empty `Last` frame.
    ///
    /// # Errors
    ///
    /// Returns `FrameError::InvalidFragmentSize` if `max_fragment` is zero or
    /// does not fit the 16-bit length field.
    pub fn encode_fragments(
        &mut self,
        data: &[u8],
        max_fragment: usize,
    ) -> Result<Vec<Bytes>, FrameError> {
        if max_fragment == 0 || max_fragment > MAX_PAYLOAD_LEN {
            return Err(FrameError::InvalidFragmentSize(max_fragment));
        }

        if data.is_empty() {
            return Ok(vec![self.encode_stream(&[], true)?]);
        }

        let count = data.len().div_ceil(max_fragment);
        let mut frames = Vec::with_capacity(count);
        for (i, chunk) in data.chunks(max_fragment).enumerate() {
            frames.push(self.encode_stream(chunk, i + 1 == count)?);
        }
        Ok(frames)
    }
}
