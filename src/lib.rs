//! # voice-frame
//!
//! Compact binary framing for audio carried over a message bus.
//!
//! ## Features
//!
//! - 12-byte bit-packed voice header codec
//! - CRC16-CCITT integrity over header and payload
//! - Frame sequencing and fragmentation for streamed audio
//! - Transport-agnostic send/receive glue with fragment reassembly
//!
//! ## Example
//!
//! ```rust
//! use voice_frame::protocol::voice::{AudioFormat, FrameFlag, VoiceHeader, assemble, verify};
//!
//! # fn example() -> Result<(), voice_frame::VoiceError> {
//! let header = VoiceHeader::new(AudioFormat::Opus, 16_000, 1, FrameFlag::Full, 1, 1000);
//! let wire = assemble(header, b"OPUS_DUMMY_FRAME_1234567890")?;
//!
//! let received = verify(&wire)?;
//! assert!(received.valid);
//! assert_eq!(received.header.payload_len, 27);
//! # Ok(())
//! # }
//! # example().unwrap();
//! ```
//!
//! # Architecture
//!
//! - **Codec**: `protocol::voice` - pure, stateless pack/unpack and checksum
//! - **Stream**: `FrameEncoder` - sequence numbers, timestamps, fragmentation
//! - **Transport**: `transport` - bus topics, sink/source traits, reassembly

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

// Public modules
/// Error types
pub mod error;
/// Configuration types
pub mod types;

/// Testing utilities
pub mod testing;

pub mod protocol;
pub mod transport;

#[cfg(test)]
mod error_tests;

// Re-exports
pub use error::VoiceError;
pub use protocol::voice::{
    AudioFormat, FrameEncoder, FrameError, FrameFlag, VerifiedFrame, VoiceFrame, VoiceHeader,
    assemble, crc16_ccitt, verify,
};
pub use transport::{FragmentAssembler, Topic, VoiceReceiver, VoiceSender};
pub use types::{AudioConfig, VoiceConfig};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Prelude for common imports
pub mod prelude {
    pub use crate::{
        AudioConfig, AudioFormat, FrameEncoder, FrameFlag, VerifiedFrame, VoiceConfig,
        VoiceError, VoiceFrame, VoiceHeader, assemble, verify,
    };
}
