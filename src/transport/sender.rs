use super::{FrameSink, Topic};
use crate::error::VoiceError;
use crate::protocol::voice::FrameEncoder;
use crate::types::VoiceConfig;

/// Encodes audio and publishes it on one topic
#[derive(Debug)]
pub struct VoiceSender<S> {
    sink: S,
    topic: Topic,
    encoder: FrameEncoder,
    max_fragment_size: usize,
}

impl<S: FrameSink> VoiceSender<S> {
    /// Create a sender from a validated config
    ///
    /// # Errors
    ///
    /// Returns `VoiceError::Config` if the config does not validate.
    pub fn new(sink: S, config: &VoiceConfig) -> Result<Self, VoiceError> {
        config.validate()?;
        Ok(Self {
            sink,
            topic: config.topic()?,
            encoder: FrameEncoder::new(config.audio),
            max_fragment_size: config.max_fragment_size,
        })
    }

    /// Replace the frame encoder, e.g. to inject a clock or starting sequence
    #[must_use]
    pub fn with_encoder(mut self, encoder: FrameEncoder) -> Self {
        self.encoder = encoder;
        self
    }

    /// Destination topic
    pub fn topic(&self) -> &Topic {
        &self.topic
    }

    /// Sequence number of the next frame
    pub fn sequence(&self) -> u16 {
        self.encoder.sequence()
    }

    /// Publish a complete utterance as one `Full` frame
    ///
    /// Returns the sequence number the frame was sent with.
    ///
    /// # Errors
    ///
    /// Returns `VoiceError` if the payload is too large or the publish fails.
    pub async fn send_full(&mut self, data: &[u8]) -> Result<u16, VoiceError> {
        let seq = self.encoder.sequence();
        let frame = self.encoder.encode_full(data)?;
        let frame_len = frame.len();

        self.sink.publish(&self.topic, frame).await.inspect_err(|e| {
            tracing::error!(topic = %self.topic, seq, error = %e, "voice publish failed");
        })?;

        let audio = self.encoder.config();
        tracing::debug!(
            topic = %self.topic,
            seq,
            format = %audio.format,
            sample_rate = audio.sample_rate,
            channels = audio.channels,
            frame_len,
            "published full voice frame"
        );
        Ok(seq)
    }

    /// Publish an utterance as fragments of at most the configured size
    ///
    /// Returns the number of frames published.
    ///
    /// # Errors
    ///
    /// Returns `VoiceError` if encoding or any publish fails; frames already
    /// published stay published.
    pub async fn send_stream(&mut self, data: &[u8]) -> Result<usize, VoiceError> {
        let first_seq = self.encoder.sequence();
        let frames = self
            .encoder
            .encode_fragments(data, self.max_fragment_size)?;
        let count = frames.len();

        for (i, frame) in frames.into_iter().enumerate() {
            let seq = first_seq.wrapping_add(i as u16);
            let frame_len = frame.len();
            self.sink.publish(&self.topic, frame).await.inspect_err(|e| {
                tracing::error!(topic = %self.topic, seq, error = %e, "voice publish failed");
            })?;
            tracing::trace!(
                topic = %self.topic,
                seq,
                is_last = i + 1 == count,
                frame_len,
                "published voice fragment"
            );
        }

        tracing::debug!(
            topic = %self.topic,
            first_seq,
            frames = count,
            bytes = data.len(),
            "published fragmented voice stream"
        );
        Ok(count)
    }
}
