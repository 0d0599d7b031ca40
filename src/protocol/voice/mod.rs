//! Voice frame protocol
//!
//! Audio travels over the message bus as a 12-byte bit-packed header
//! followed by the raw payload. The header carries a CRC16-CCITT computed
//! over the header (with its checksum field zeroed) and the payload.
//!
//! ```text
//!  0                   1                   2                   3
//!  0 1 2 3 4 5 6 7 8 9 0 1 2 3 4 5 6 7 8 9 0 1 2 3 4 5 6 7 8 9 0 1
//! +-------+---------------+-------------------------------+---+---+
//! |  ver  |  audio_type   |          sample_rate          | ch| f |
//! +-------+---------------+-------------------------------+---+---+
//! |           frame_seq           |           timestamp           |
//! +-------------------------------+-------------------------------+
//! |          payload_len          |             crc16             |
//! +-------------------------------+-------------------------------+
//! ```

mod crc;
mod encoder;
mod frame;
mod header;

#[cfg(test)]
mod crc_tests;
#[cfg(test)]
mod encoder_tests;
#[cfg(test)]
mod header_proptest;

pub use crc::{CRC16_INIT, CRC16_POLY, Crc16, crc16_ccitt};
pub use encoder::{Clock, FrameEncoder, unix_clock};
pub use frame::{VerifiedFrame, VoiceFrame, assemble, frame_checksum, verify};
pub use header::{AudioFormat, FrameError, FrameFlag, VoiceHeader, audio_format_name};

/// Voice protocol constants
pub mod constants {
    /// Packed header size
    pub const HEADER_SIZE: usize = 12;

    /// Current header version
    pub const VOICE_VERSION: u8 = 0x01;

    /// Largest payload the 16-bit length field can describe
    pub const MAX_PAYLOAD_LEN: usize = u16::MAX as usize;
}
