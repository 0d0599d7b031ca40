//! Bus fault injection for testing

use async_trait::async_trait;
use bytes::{Bytes, BytesMut};
use rand::Rng;

use crate::transport::{FrameSink, Topic, TransportError};

/// Fault probabilities applied to each published frame
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct FaultProfile {
    /// Probability a frame is silently dropped (0.0 to 1.0)
    pub loss_rate: f64,
    /// Probability one random bit of a frame is flipped (0.0 to 1.0)
    pub corruption_rate: f64,
}

impl FaultProfile {
    /// No faults
    #[must_use]
    pub fn perfect() -> Self {
        Self {
            loss_rate: 0.0,
            corruption_rate: 0.0,
        }
    }

    /// Every frame gets one bit flipped
    #[must_use]
    pub fn always_corrupt() -> Self {
        Self {
            loss_rate: 0.0,
            corruption_rate: 1.0,
        }
    }

    /// Occasional loss and corruption
    #[must_use]
    pub fn noisy() -> Self {
        Self {
            loss_rate: 0.05,
            corruption_rate: 0.05,
        }
    }

    /// Should this frame be dropped?
    #[must_use]
    pub fn should_drop(&self) -> bool {
        self.loss_rate > 0.0 && rand::thread_rng().gen_bool(self.loss_rate.min(1.0))
    }

    /// Should this frame be corrupted?
    #[must_use]
    pub fn should_corrupt(&self) -> bool {
        self.corruption_rate > 0.0 && rand::thread_rng().gen_bool(self.corruption_rate.min(1.0))
    }
}

/// Flip one uniformly chosen bit of `frame`
///
/// Empty input is returned unchanged.
#[must_use]
pub fn flip_random_bit(frame: &[u8]) -> Bytes {
    let mut buf = BytesMut::from(frame);
    if !buf.is_empty() {
        let bit = rand::thread_rng().gen_range(0..buf.len() * 8);
        buf[bit / 8] ^= 1 << (bit % 8);
    }
    buf.freeze()
}

/// `FrameSink` wrapper that drops and corrupts frames per a [`FaultProfile`]
#[derive(Debug)]
pub struct FaultySink<S> {
    inner: S,
    profile: FaultProfile,
}

impl<S> FaultySink<S> {
    /// Wrap `inner`
    pub fn new(inner: S, profile: FaultProfile) -> Self {
        Self { inner, profile }
    }
}

#[async_trait]
impl<S: FrameSink> FrameSink for FaultySink<S> {
    async fn publish(&self, topic: &Topic, frame: Bytes) -> Result<(), TransportError> {
        if self.profile.should_drop() {
            tracing::trace!(%topic, len = frame.len(), "fault injection: dropped frame");
            return Ok(());
        }
        let frame = if self.profile.should_corrupt() {
            tracing::trace!(%topic, len = frame.len(), "fault injection: flipped bit");
            flip_random_bit(&frame)
        } else {
            frame
        };
        self.inner.publish(topic, frame).await
    }
}
