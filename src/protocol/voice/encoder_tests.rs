use super::*;
use crate::types::AudioConfig;

fn encoder() -> FrameEncoder {
    FrameEncoder::new(AudioConfig::default()).with_clock(|| 1000)
}

#[test]
fn test_encode_full_stamps_config() {
    let mut enc = FrameEncoder::new(AudioConfig::new(44100, 2, AudioFormat::Pcm)).with_clock(|| 7);
    let wire = enc.encode_full(b"pcm").unwrap();
    let frame = verify(&wire).unwrap();

    assert!(frame.valid);
    assert_eq!(frame.header.version, constants::VOICE_VERSION);
    assert_eq!(frame.header.audio_format(), Some(AudioFormat::Pcm));
    assert_eq!(frame.header.sample_rate, 44100);
    assert_eq!(frame.header.channel_count, 2);
    assert_eq!(frame.header.frame_kind(), Some(FrameFlag::Full));
    assert_eq!(frame.header.frame_seq, 0);
    assert_eq!(frame.header.timestamp, 7);
}

#[test]
fn test_sequence_advances_per_frame() {
    let mut enc = encoder();

    for expected in 0..5u16 {
        assert_eq!(enc.sequence(), expected);
        let wire = enc.encode_full(b"x").unwrap();
        assert_eq!(verify(&wire).unwrap().header.frame_seq, expected);
    }
    assert_eq!(enc.sequence(), 5);
}

#[test]
fn test_sequence_wraps() {
    let mut enc = encoder().with_sequence(u16::MAX);

    let wire = enc.encode_full(b"a").unwrap();
    assert_eq!(verify(&wire).unwrap().header.frame_seq, u16::MAX);

    let wire = enc.encode_full(b"b").unwrap();
    assert_eq!(verify(&wire).unwrap().header.frame_seq, 0);
}

#[test]
fn test_reset() {
    let mut enc = encoder().with_sequence(10);
    enc.encode_full(b"a").unwrap();
    assert_eq!(enc.sequence(), 11);

    enc.reset();
    assert_eq!(enc.sequence(), 0);
}

#[test]
fn test_failed_encode_does_not_consume_sequence() {
    let mut enc = encoder();
    let too_big = vec![0u8; 70_000];

    assert_eq!(
        enc.encode_full(&too_big),
        Err(FrameError::PayloadTooLarge(70_000))
    );
    assert_eq!(enc.sequence(), 0);
}

#[test]
fn test_encode_stream_flags() {
    let mut enc = encoder();

    let fragment = verify(&enc.encode_stream(b"one", false).unwrap()).unwrap();
    let last = verify(&enc.encode_stream(b"two", true).unwrap()).unwrap();

    assert_eq!(fragment.header.frame_kind(), Some(FrameFlag::Fragment));
    assert_eq!(last.header.frame_kind(), Some(FrameFlag::Last));
    assert_eq!(last.header.frame_seq, fragment.header.frame_seq + 1);
}

#[test]
fn test_encode_fragments_splits_and_terminates() {
    let mut enc = encoder();
    let data: Vec<u8> = (0..250u8).collect();

    let frames = enc.encode_fragments(&data, 100).unwrap();
    assert_eq!(frames.len(), 3);

    let decoded: Vec<_> = frames.iter().map(|f| verify(f).unwrap()).collect();
    assert!(decoded.iter().all(|f| f.valid));

    assert_eq!(decoded[0].header.frame_kind(), Some(FrameFlag::Fragment));
    assert_eq!(decoded[1].header.frame_kind(), Some(FrameFlag::Fragment));
    assert_eq!(decoded[2].header.frame_kind(), Some(FrameFlag::Last));

    assert_eq!(decoded[0].payload.len(), 100);
    assert_eq!(decoded[1].payload.len(), 100);
    assert_eq!(decoded[2].payload.len(), 50);

    let seqs: Vec<u16> = decoded.iter().map(|f| f.header.frame_seq).collect();
    assert_eq!(seqs, vec![0, 1, 2]);

    let joined: Vec<u8> = decoded.iter().flat_map(|f| f.payload.to_vec()).collect();
    assert_eq!(joined, data);
}

#[test]
fn test_encode_fragments_exact_multiple() {
    let mut enc = encoder();
    let frames = enc.encode_fragments(&[1u8; 200], 100).unwrap();

    assert_eq!(frames.len(), 2);
    let last = verify(&frames[1]).unwrap();
    assert_eq!(last.header.frame_kind(), Some(FrameFlag::Last));
    assert_eq!(last.payload.len(), 100);
}

#[test]
fn test_encode_fragments_single_chunk_is_last() {
    let mut enc = encoder();
    let frames = enc.encode_fragments(b"short", 100).unwrap();

    assert_eq!(frames.len(), 1);
    assert_eq!(
        verify(&frames[0]).unwrap().header.frame_kind(),
        Some(FrameFlag::Last)
    );
}

#[test]
fn test_encode_fragments_empty_input() {
    let mut enc = encoder();
    let frames = enc.encode_fragments(&[], 100).unwrap();

    assert_eq!(frames.len(), 1);
    let frame = verify(&frames[0]).unwrap();
    assert_eq!(frame.header.frame_kind(), Some(FrameFlag::Last));
    assert!(frame.payload.is_empty());
}

#[test]
fn test_encode_fragments_invalid_size() {
    let mut enc = encoder();

    assert_eq!(
        enc.encode_fragments(b"data", 0),
        Err(FrameError::InvalidFragmentSize(0))
    );
    assert_eq!(
        enc.encode_fragments(b"data", 65536),
        Err(FrameError::InvalidFragmentSize(65536))
    );
    assert_eq!(enc.sequence(), 0);
}

#[test]
fn test_unix_clock_truncates() {
    let secs = std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .unwrap()
        .as_secs();
    let stamp = unix_clock();

    // Allow for the second ticking over between the two reads
    let diff = stamp.wrapping_sub((secs & 0xFFFF) as u16);
    assert!(diff <= 1, "clock drifted by {diff}");
}

#[test]
fn test_encoder_debug_omits_clock() {
    let enc = encoder();
    let dbg = format!("{enc:?}");

    assert!(dbg.contains("FrameEncoder"));
    assert!(dbg.contains("sequence: 0"));
}
