use super::*;

#[test]
fn test_crc16_check_value() {
    // Standard check input for CRC-16/CCITT-FALSE
    assert_eq!(crc16_ccitt(b"123456789"), 0x29B1);
}

#[test]
fn test_crc16_empty_is_initial_register() {
    assert_eq!(crc16_ccitt(&[]), CRC16_INIT);
}

#[test]
fn test_crc16_single_zero_byte() {
    assert_eq!(crc16_ccitt(&[0x00]), 0xE1F0);
}

#[test]
fn test_crc16_deterministic() {
    let data: Vec<u8> = (0..=255).collect();
    assert_eq!(crc16_ccitt(&data), crc16_ccitt(&data));
}

#[test]
fn test_incremental_matches_one_shot() {
    let data = b"OPUS_DUMMY_FRAME_1234567890";

    for split in 0..=data.len() {
        let mut crc = Crc16::new();
        crc.update(&data[..split]);
        crc.update(&data[split..]);
        assert_eq!(crc.finalize(), crc16_ccitt(data), "split at {split}");
    }
}

#[test]
fn test_default_hasher_is_fresh() {
    assert_eq!(Crc16::default(), Crc16::new());
    assert_eq!(Crc16::default().finalize(), 0xFFFF);
}

#[test]
fn test_crc16_detects_byte_change() {
    assert_ne!(crc16_ccitt(b"voice"), crc16_ccitt(b"voicf"));
}
