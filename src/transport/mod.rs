//! Message bus boundary
//!
//! The codec never touches the network. This module defines what it needs
//! from a message-oriented transport (one frame per message, delivered
//! whole) and the glue that encodes, publishes, receives and verifies.

mod assembler;
mod receiver;
mod sender;
mod topic;

#[cfg(feature = "tokio-runtime")]
mod channel;


use async_trait::async_trait;
use bytes::Bytes;
use thiserror::Error;

pub use assembler::{AssemblyEvent, FragmentAssembler, RejectReason, Utterance};
pub use receiver::{ReceivedFrame, VoiceReceiver};
pub use sender::VoiceSender;
pub use topic::{Direction, TOPIC_LEVELS, Topic, TopicError};

#[cfg(feature = "tokio-runtime")]
pub use channel::{ChannelSink, ChannelSource, channel};

/// One message taken off the bus
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Message {
    /// Topic the message arrived on
    pub topic: Topic,
    /// Raw frame bytes
    pub payload: Bytes,
}

/// Publishing half of a message-oriented transport
#[async_trait]
pub trait FrameSink: Send + Sync {
    /// Publish one encoded frame as a single message
    async fn publish(&self, topic: &Topic, frame: Bytes) -> Result<(), TransportError>;
}

/// Receiving half of a message-oriented transport
#[async_trait]
pub trait FrameSource: Send {
    /// Next message, or `None` once the transport is closed
    async fn recv(&mut self) -> Option<Message>;
}

/// Transport errors
#[derive(Debug, Error)]
pub enum TransportError {
    /// The other half of the transport is gone
    #[error("transport closed")]
    Closed,

    /// The transport refused the message
    #[error("publish to {topic} failed: {message}")]
    PublishFailed {
        /// Destination topic
        topic: String,
        /// Description of the failure
        message: String,
    },
}
