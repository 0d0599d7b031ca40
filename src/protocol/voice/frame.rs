use bytes::{BufMut, Bytes, BytesMut};

use super::constants::{HEADER_SIZE, MAX_PAYLOAD_LEN};
use super::crc::Crc16;
use super::header::{FrameError, VoiceHeader};

/// Checksum of a header (checksum field zeroed) followed by its payload
#[must_use]
pub fn frame_checksum(header: &VoiceHeader, payload: &[u8]) -> u16 {
    let mut crc = Crc16::new();
    crc.update(&header.pack_zeroed());
    crc.update(payload);
    crc.finalize()
}

/// Assembled voice frame: header plus payload
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VoiceFrame {
    /// Header with `payload_len` and `checksum` filled in
    pub header: VoiceHeader,
    /// Opaque audio payload
    pub payload: Bytes,
}

impl VoiceFrame {
    /// Seal `header` around `payload`
    ///
    /// Sets `payload_len`, computes the checksum over the zeroed header and
    /// the payload, then stores it in the header.
    ///
    /// # Errors
    ///
    /// Returns `FrameError::PayloadTooLarge` if the payload does not fit the
    /// 16-bit length field.
    pub fn new(mut header: VoiceHeader, payload: impl Into<Bytes>) -> Result<Self, FrameError> {
        let payload = payload.into();
        header.payload_len = u16::try_from(payload.len())
            .map_err(|_| FrameError::PayloadTooLarge(payload.len()))?;
        header.checksum = frame_checksum(&header, &payload);
        Ok(Self { header, payload })
    }

    /// Total encoded size
    #[must_use]
    pub fn len(&self) -> usize {
        HEADER_SIZE + self.payload.len()
    }

    /// True when the payload is empty
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.payload.is_empty()
    }

    /// Encode to a freshly allocated buffer
    #[must_use]
    pub fn encode(&self) -> Bytes {
        let mut buf = BytesMut::with_capacity(self.len());
        buf.put_slice(&self.header.pack());
        buf.put_slice(&self.payload);
        buf.freeze()
    }
}

/// Build the wire bytes of a frame from a header and payload
///
/// Any `payload_len` or `checksum` already present in `header` is replaced.
///
/// # Errors
///
/// Returns `FrameError::PayloadTooLarge` for payloads over 65535 bytes.
pub fn assemble(header: VoiceHeader, payload: &[u8]) -> Result<Bytes, FrameError> {
    if payload.len() > MAX_PAYLOAD_LEN {
        return Err(FrameError::PayloadTooLarge(payload.len()));
    }
    Ok(VoiceFrame::new(header, Bytes::copy_from_slice(payload))?.encode())
}

/// Result of checking a received frame
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VerifiedFrame {
    /// Header as transmitted
    pub header: VoiceHeader,
    /// Copy of the declared payload
    pub payload: Bytes,
    /// Whether the transmitted checksum matches the recomputed one
    pub valid: bool,
}

impl VerifiedFrame {
    /// Checksum recomputed over the received bytes
    #[must_use]
    pub fn computed_checksum(&self) -> u16 {
        frame_checksum(&self.header, &self.payload)
    }

    /// Convert into a `VoiceFrame`, discarding the validity flag
    #[must_use]
    pub fn into_frame(self) -> VoiceFrame {
        VoiceFrame {
            header: self.header,
            payload: self.payload,
        }
    }
}

/// Parse and check one frame
///
/// Bytes past `12 + payload_len` are ignored. A checksum mismatch is
/// reported through `valid`, not as an error.
///
/// # Errors
///
/// Returns `FrameError::TruncatedHeader` or `FrameError::TruncatedFrame`
/// when the buffer is shorter than the header or the declared payload.
pub fn verify(buf: &[u8]) -> Result<VerifiedFrame, FrameError> {
    let header = VoiceHeader::unpack(buf)?;
    let needed = HEADER_SIZE + usize::from(header.payload_len);
    if buf.len() < needed {
        return Err(FrameError::TruncatedFrame {
            needed,
            have: buf.len(),
        });
    }

    let payload = &buf[HEADER_SIZE..needed];
    let computed = frame_checksum(&header, payload);
    let valid = computed == header.checksum;
    if !valid {
        tracing::debug!(
            seq = header.frame_seq,
            expected = header.checksum,
            computed,
            "voice frame checksum mismatch"
        );
    }

    Ok(VerifiedFrame {
        header,
        payload: Bytes::copy_from_slice(payload),
        valid,
    })
}
