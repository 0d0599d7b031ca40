use proptest::prelude::*;

use super::{FrameError, VoiceFrame, VoiceHeader, crc16_ccitt, verify};

prop_compose! {
    fn in_range_header()(
        version in 0u8..=0x0F,
        audio_type in any::<u8>(),
        sample_rate in any::<u16>(),
        channel_count in 0u8..=3,
        frame_flag in 0u8..=3,
        frame_seq in any::<u16>(),
        timestamp in any::<u16>(),
        payload_len in any::<u16>(),
        checksum in any::<u16>(),
    ) -> VoiceHeader {
        VoiceHeader {
            version,
            audio_type,
            sample_rate,
            channel_count,
            frame_flag,
            frame_seq,
            timestamp,
            payload_len,
            checksum,
        }
    }
}

proptest! {
    #[test]
    fn test_header_pack_unpack_roundtrip(header in in_range_header()) {
        let decoded = VoiceHeader::unpack(&header.pack()).expect("unpack failed");
        prop_assert_eq!(decoded, header);
    }

    #[test]
    fn test_header_pack_masks_narrow_fields(
        header in in_range_header(),
        version in any::<u8>(),
        channel_count in any::<u8>(),
        frame_flag in any::<u8>(),
    ) {
        let wide = VoiceHeader { version, channel_count, frame_flag, ..header };
        let decoded = VoiceHeader::unpack(&wide.pack()).expect("unpack failed");

        prop_assert_eq!(decoded.version, version & 0x0F);
        prop_assert_eq!(decoded.channel_count, channel_count & 0x03);
        prop_assert_eq!(decoded.frame_flag, frame_flag & 0x03);
        prop_assert_eq!(decoded.sample_rate, header.sample_rate);
        prop_assert_eq!(decoded.audio_type, header.audio_type);
    }

    #[test]
    fn test_unpack_any_bytes(bytes in proptest::collection::vec(any::<u8>(), 0..64)) {
        // Should not panic; errors only below the header size
        let result = VoiceHeader::unpack(&bytes);
        prop_assert_eq!(result.is_err(), bytes.len() < 12);
    }

    #[test]
    fn test_unpack_pack_is_identity_on_bytes(bytes in proptest::array::uniform12(any::<u8>())) {
        let header = VoiceHeader::unpack(&bytes).expect("unpack failed");
        prop_assert_eq!(header.pack(), bytes);
    }

    #[test]
    fn test_verify_any_bytes(bytes in proptest::collection::vec(any::<u8>(), 0..128)) {
        // Should not panic, only structural errors
        match verify(&bytes) {
            Ok(frame) => prop_assert_eq!(frame.payload.len(), usize::from(frame.header.payload_len)),
            Err(e) => {
                let structural = matches!(
                    e,
                    FrameError::TruncatedHeader { .. } | FrameError::TruncatedFrame { .. }
                );
                prop_assert!(structural, "unexpected error {:?}", e);
            }
        }
    }

    #[test]
    fn test_crc16_deterministic(bytes in proptest::collection::vec(any::<u8>(), 0..256)) {
        prop_assert_eq!(crc16_ccitt(&bytes), crc16_ccitt(&bytes));
    }

    #[test]
    fn test_single_bit_flip_detected(
        header in in_range_header(),
        payload in proptest::collection::vec(any::<u8>(), 0..256),
        bit in any::<prop::sample::Index>(),
    ) {
        let wire = VoiceFrame::new(header, payload).expect("payload fits").encode();
        let mut tampered = wire.to_vec();
        let bit = bit.index(tampered.len() * 8);
        tampered[bit / 8] ^= 1 << (bit % 8);

        // A flip in payload_len (bytes 8..10) changes how many bytes are
        // covered, so detection there is probabilistic rather than certain.
        let in_length_field = (64..80).contains(&bit);
        match verify(&tampered) {
            Ok(frame) if !in_length_field => {
                prop_assert!(!frame.valid, "flip of bit {} went undetected", bit);
            }
            Ok(_) => {}
            Err(e) => {
                let truncated = matches!(e, FrameError::TruncatedFrame { .. });
                prop_assert!(truncated, "unexpected error {:?}", e);
            }
        }
    }
}
