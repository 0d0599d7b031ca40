use crate::error::*;
use crate::protocol::voice::FrameError;
use crate::transport::{TopicError, TransportError};
use crate::types::ConfigError;

#[test]
fn test_error_display() {
    let err: VoiceError = FrameError::TruncatedFrame {
        needed: 39,
        have: 20,
    }
    .into();
    assert_eq!(
        err.to_string(),
        "frame error: truncated frame: need 39 bytes, have 20"
    );
}

#[test]
fn test_error_is_per_frame() {
    let frame: VoiceError = FrameError::PayloadTooLarge(70_000).into();
    assert!(frame.is_per_frame());

    let transport: VoiceError = TransportError::Closed.into();
    assert!(!transport.is_per_frame());

    let config: VoiceError = ConfigError::InvalidFragmentSize(0).into();
    assert!(!config.is_per_frame());
}

#[test]
fn test_error_from_topic() {
    let err: VoiceError = TopicError::Empty.into();
    assert!(matches!(err, VoiceError::Topic(TopicError::Empty)));
}

#[test]
fn test_error_send_sync() {
    fn assert_send_sync<T: Send + Sync>() {}
    assert_send_sync::<VoiceError>();
}
