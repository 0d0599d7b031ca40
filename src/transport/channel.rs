//! In-process transport over a tokio channel

use async_trait::async_trait;
use bytes::Bytes;
use tokio::sync::mpsc;

use super::{FrameSink, FrameSource, Message, Topic, TransportError};

/// Create a connected sink/source pair holding up to `capacity` messages
#[must_use]
pub fn channel(capacity: usize) -> (ChannelSink, ChannelSource) {
    let (tx, rx) = mpsc::channel(capacity);
    (ChannelSink { tx }, ChannelSource { rx })
}

/// Publishing half of [`channel`]
#[derive(Debug, Clone)]
pub struct ChannelSink {
    tx: mpsc::Sender<Message>,
}

#[async_trait]
impl FrameSink for ChannelSink {
    async fn publish(&self, topic: &Topic, frame: Bytes) -> Result<(), TransportError> {
        self.tx
            .send(Message {
                topic: topic.clone(),
                payload: frame,
            })
            .await
            .map_err(|_| TransportError::Closed)
    }
}

/// Receiving half of [`channel`]
#[derive(Debug)]
pub struct ChannelSource {
    rx: mpsc::Receiver<Message>,
}

#[async_trait]
impl FrameSource for ChannelSource {
    async fn recv(&mut self) -> Option<Message> {
        self.rx.recv().await
    }
}
