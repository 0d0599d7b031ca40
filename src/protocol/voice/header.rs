use thiserror::Error;

use super::constants::{HEADER_SIZE, VOICE_VERSION};

/// Audio codec carried in a voice frame
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
#[repr(u8)]
pub enum AudioFormat {
    /// Raw PCM
    Pcm = 0x01,
    /// Advanced Audio Coding
    Aac = 0x02,
    /// Opus
    Opus = 0x03,
    /// MPEG-1 Layer III
    Mp3 = 0x04,
    /// G.711 A-law
    G711A = 0x05,
    /// G.711 mu-law
    G711U = 0x06,
    /// RIFF/WAVE container
    Wav = 0x07,
}

impl AudioFormat {
    /// Parse from the header's `audio_type` byte
    #[must_use]
    pub fn from_byte(b: u8) -> Option<Self> {
        match b {
            0x01 => Some(Self::Pcm),
            0x02 => Some(Self::Aac),
            0x03 => Some(Self::Opus),
            0x04 => Some(Self::Mp3),
            0x05 => Some(Self::G711A),
            0x06 => Some(Self::G711U),
            0x07 => Some(Self::Wav),
            _ => None,
        }
    }

    /// Short lowercase name, also used as a file extension
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Pcm => "pcm",
            Self::Aac => "aac",
            Self::Opus => "opus",
            Self::Mp3 => "mp3",
            Self::G711A => "g711a",
            Self::G711U => "g711u",
            Self::Wav => "wav",
        }
    }

    /// File extension for stored payloads
    #[must_use]
    pub fn extension(self) -> &'static str {
        self.as_str()
    }
}

impl std::fmt::Display for AudioFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Name of a raw `audio_type` value, `"unknown"` when unregistered
#[must_use]
pub fn audio_format_name(audio_type: u8) -> &'static str {
    AudioFormat::from_byte(audio_type).map_or("unknown", AudioFormat::as_str)
}

/// Frame boundary indicator (2 bits on the wire)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum FrameFlag {
    /// Complete utterance in a single frame
    Full = 0x01,
    /// Non-final piece of a fragmented utterance
    Fragment = 0x02,
    /// Final piece of a fragmented utterance
    Last = 0x03,
}

impl FrameFlag {
    /// Parse from the low 2 bits of `b`
    #[must_use]
    pub fn from_bits(b: u8) -> Option<Self> {
        match b & 0x03 {
            0x01 => Some(Self::Full),
            0x02 => Some(Self::Fragment),
            0x03 => Some(Self::Last),
            _ => None,
        }
    }

    /// True for `Fragment` and `Last`
    #[must_use]
    pub fn is_fragmented(self) -> bool {
        matches!(self, Self::Fragment | Self::Last)
    }
}

/// Voice frame header (12 bytes on the wire)
///
/// Fields are stored in plain integers; `version`, `channel_count` and
/// `frame_flag` are narrower on the wire and are masked by [`pack`](Self::pack).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct VoiceHeader {
    /// Format version (4 bits)
    pub version: u8,
    /// Codec identifier (8 bits)
    pub audio_type: u8,
    /// Sample rate in Hz (16 bits)
    pub sample_rate: u16,
    /// Channel count (2 bits)
    pub channel_count: u8,
    /// Frame boundary flag (2 bits)
    pub frame_flag: u8,
    /// Per-stream sequence number, wraps
    pub frame_seq: u16,
    /// Truncated timestamp, wraps
    pub timestamp: u16,
    /// Payload length in bytes
    pub payload_len: u16,
    /// CRC16 over header (checksum zeroed) and payload
    pub checksum: u16,
}

impl VoiceHeader {
    /// Packed header size
    pub const SIZE: usize = HEADER_SIZE;

    /// Create a header at the current version with checksum and length unset
    #[must_use]
    pub fn new(
        format: AudioFormat,
        sample_rate: u16,
        channel_count: u8,
        flag: FrameFlag,
        frame_seq: u16,
        timestamp: u16,
    ) -> Self {
        Self {
            version: VOICE_VERSION,
            audio_type: format as u8,
            sample_rate,
            channel_count,
            frame_flag: flag as u8,
            frame_seq,
            timestamp,
            payload_len: 0,
            checksum: 0,
        }
    }

    /// Typed codec, if registered
    #[must_use]
    pub fn audio_format(&self) -> Option<AudioFormat> {
        AudioFormat::from_byte(self.audio_type)
    }

    /// Typed frame flag, if recognised
    #[must_use]
    pub fn frame_kind(&self) -> Option<FrameFlag> {
        FrameFlag::from_bits(self.frame_flag)
    }

    /// Check that every sub-byte field fits its wire width
    ///
    /// # Errors
    ///
    /// Returns `FrameError::FieldOutOfRange` naming the first offending field.
    pub fn validate(&self) -> Result<(), FrameError> {
        let narrow = [
            ("version", self.version, 0x0F),
            ("channel_count", self.channel_count, 0x03),
            ("frame_flag", self.frame_flag, 0x03),
        ];
        for (field, value, max) in narrow {
            if value > max {
                return Err(FrameError::FieldOutOfRange { field, value, max });
            }
        }
        Ok(())
    }

    /// Pack header to bytes
    ///
    /// Values wider than their field are truncated to the low bits; a
    /// warning is logged when that happens.
    #[must_use]
    pub fn pack(&self) -> [u8; HEADER_SIZE] {
        if let Err(FrameError::FieldOutOfRange { field, value, max }) = self.validate() {
            tracing::warn!(
                field,
                value,
                stored = value & max,
                "voice header field truncated to wire width"
            );
        }

        let mut buf = [0u8; HEADER_SIZE];

        // Byte 0: version(4) | audio_type high(4)
        buf[0] = ((self.version & 0x0F) << 4) | (self.audio_type >> 4);

        // Byte 1: audio_type low(4) | sample_rate[15:12]
        buf[1] = ((self.audio_type & 0x0F) << 4) | ((self.sample_rate >> 12) as u8 & 0x0F);

        // Byte 2: sample_rate[11:4]
        buf[2] = (self.sample_rate >> 4) as u8;

        // Byte 3: sample_rate[3:0] | channel_count(2) | frame_flag(2)
        buf[3] = ((self.sample_rate as u8 & 0x0F) << 4)
            | ((self.channel_count & 0x03) << 2)
            | (self.frame_flag & 0x03);

        buf[4..6].copy_from_slice(&self.frame_seq.to_be_bytes());
        buf[6..8].copy_from_slice(&self.timestamp.to_be_bytes());
        buf[8..10].copy_from_slice(&self.payload_len.to_be_bytes());
        buf[10..12].copy_from_slice(&self.checksum.to_be_bytes());

        buf
    }

    /// Pack with the checksum field forced to zero
    #[must_use]
    pub fn pack_zeroed(&self) -> [u8; HEADER_SIZE] {
        Self {
            checksum: 0,
            ..*self
        }
        .pack()
    }

    /// Unpack header from the first 12 bytes of `buf`
    ///
    /// # Errors
    ///
    /// Returns `FrameError::TruncatedHeader` if `buf` is shorter than 12 bytes.
    pub fn unpack(buf: &[u8]) -> Result<Self, FrameError> {
        if buf.len() < HEADER_SIZE {
            return Err(FrameError::TruncatedHeader {
                needed: HEADER_SIZE,
                have: buf.len(),
            });
        }

        Ok(Self {
            version: buf[0] >> 4,
            audio_type: ((buf[0] & 0x0F) << 4) | (buf[1] >> 4),
            sample_rate: (u16::from(buf[1] & 0x0F) << 12)
                | (u16::from(buf[2]) << 4)
                | u16::from(buf[3] >> 4),
            channel_count: (buf[3] >> 2) & 0x03,
            frame_flag: buf[3] & 0x03,
            frame_seq: u16::from_be_bytes([buf[4], buf[5]]),
            timestamp: u16::from_be_bytes([buf[6], buf[7]]),
            payload_len: u16::from_be_bytes([buf[8], buf[9]]),
            checksum: u16::from_be_bytes([buf[10], buf[11]]),
        })
    }
}

/// Voice frame codec errors
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FrameError {
    #[error("truncated header: need {needed} bytes, have {have}")]
    TruncatedHeader { needed: usize, have: usize },

    #[error("truncated frame: need {needed} bytes, have {have}")]
    TruncatedFrame { needed: usize, have: usize },

    #[error("payload too large: {0} bytes (max 65535)")]
    PayloadTooLarge(usize),

    #[error("{field} out of range: {value} (max {max})")]
    FieldOutOfRange {
        field: &'static str,
        value: u8,
        max: u8,
    },

    #[error("invalid fragment size: {0}")]
    InvalidFragmentSize(usize),
}
