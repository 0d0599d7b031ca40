pub mod fault;

pub use fault::{FaultProfile, FaultySink, flip_random_bit};

use crate::protocol::voice::{AudioFormat, FrameFlag, VoiceHeader};

/// Payload used by the reference device firmware
pub const DUMMY_OPUS_PAYLOAD: &[u8] = b"OPUS_DUMMY_FRAME_1234567890";

/// Header the reference device firmware sends with [`DUMMY_OPUS_PAYLOAD`]
///
/// 16 kHz mono Opus, full frame, sequence 1, timestamp 1000.
#[must_use]
pub fn reference_header() -> VoiceHeader {
    VoiceHeader::new(AudioFormat::Opus, 16_000, 1, FrameFlag::Full, 1, 1000)
}
