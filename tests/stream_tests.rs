//! Byte-range streaming integration tests
//!
//! Exercise the streaming engine the way an HTTP boundary would: an
//! unranged request for the whole stream, sequential ranged requests that
//! must reassemble into the identical byte sequence, and the bookkeeping a
//! 206 responder relies on.

mod helpers;

use echoslice::audio::stream::{stream_chunk, stream_range, StreamOptions};
use echoslice::audio::wav::HEADER_SIZE;
use echoslice::Error;
use helpers::audio_generator::write_sine_wav;
use std::path::PathBuf;
use tempfile::TempDir;

/// Half-second mono 16 kHz fixture: 8000 frames, 16000 payload bytes.
fn fixture(dir: &TempDir) -> PathBuf {
    let path = dir.path().join("stream.wav");
    write_sine_wav(&path, 16_000, 1, 0.5, 440.0, 0.5);
    path
}

fn parse_header(data: &[u8]) -> (u32, u16, i32, u16) {
    let sample_rate = u32::from_le_bytes(data[24..28].try_into().unwrap());
    let channels = u16::from_le_bytes(data[22..24].try_into().unwrap());
    let data_size = i32::from_le_bytes(data[40..44].try_into().unwrap());
    let bit_depth = u16::from_le_bytes(data[34..36].try_into().unwrap());
    (sample_rate, channels, data_size, bit_depth)
}

#[test]
fn test_unranged_request_returns_full_stream() {
    let dir = TempDir::new().unwrap();
    let path = fixture(&dir);

    let response = stream_range(&path, None, &StreamOptions::default()).unwrap();

    assert!(!response.partial);
    assert_eq!(response.total_size, (HEADER_SIZE + 16_000) as u64);
    assert_eq!(response.data.len() as u64, response.total_size);
    assert_eq!(&response.data[0..4], b"RIFF");
}

#[test]
fn test_header_is_consistent_with_total_size() {
    let dir = TempDir::new().unwrap();
    let path = fixture(&dir);

    let response = stream_range(&path, None, &StreamOptions::default()).unwrap();
    let (sample_rate, channels, data_size, bit_depth) = parse_header(&response.data);

    assert_eq!(sample_rate, 16_000);
    assert_eq!(channels, 1);
    assert_eq!(bit_depth, 16);
    assert_eq!(data_size as u64 + HEADER_SIZE as u64, response.total_size);
}

#[test]
fn test_sequential_ranges_reassemble_the_stream() {
    let dir = TempDir::new().unwrap();
    let path = fixture(&dir);
    let opts = StreamOptions::default();

    let full = stream_range(&path, None, &opts).unwrap();

    let mut assembled = Vec::new();
    let mut offset = 0u64;
    let step = 1024u64;
    while offset < full.total_size {
        let header = format!("bytes={}-{}", offset, offset + step - 1);
        let part = stream_range(&path, Some(&header), &opts).unwrap();
        assert!(part.partial);
        assert_eq!(part.content_start, offset);
        assert!(!part.data.is_empty(), "empty chunk at offset {}", offset);
        assembled.extend_from_slice(&part.data);
        offset += part.data.len() as u64;
    }

    assert_eq!(assembled, full.data);
}

#[test]
fn test_overlapping_ranges_agree_byte_for_byte() {
    let dir = TempDir::new().unwrap();
    let path = fixture(&dir);
    let opts = StreamOptions::default();

    let full = stream_range(&path, None, &opts).unwrap();
    let part = stream_range(&path, Some("bytes=144-343"), &opts).unwrap();

    assert_eq!(part.data.len(), 200);
    assert_eq!(&part.data[..], &full.data[144..344]);
}

#[test]
fn test_range_content_bookkeeping() {
    let dir = TempDir::new().unwrap();
    let path = fixture(&dir);

    let response = stream_range(&path, Some("bytes=100-199"), &StreamOptions::default()).unwrap();

    assert!(response.partial);
    assert_eq!(response.data.len(), 100);
    assert_eq!(response.content_start, 100);
    assert_eq!(response.content_end, 199);
    assert_eq!(response.total_size, (HEADER_SIZE + 16_000) as u64);
}

#[test]
fn test_range_past_end_of_stream_is_empty() {
    let dir = TempDir::new().unwrap();
    let path = fixture(&dir);

    let total = (HEADER_SIZE + 16_000) as u64;
    let header = format!("bytes={}-", total + 10);
    let response = stream_range(&path, Some(&header), &StreamOptions::default()).unwrap();

    assert!(response.data.is_empty());
    assert_eq!(response.content_start, total + 10);
}

#[test]
fn test_speed_scales_declared_rate_only() {
    let dir = TempDir::new().unwrap();
    let path = fixture(&dir);

    let opts = StreamOptions {
        speed: 2.0,
        ..StreamOptions::default()
    };
    let response = stream_range(&path, None, &opts).unwrap();
    let (sample_rate, _, data_size, _) = parse_header(&response.data);

    assert_eq!(sample_rate, 32_000);
    assert_eq!(data_size, 16_000);
}

#[test]
fn test_time_expansion_scales_declared_rate() {
    let dir = TempDir::new().unwrap();
    let path = fixture(&dir);

    // A 10x bat-detector recording played back at the original pitch.
    let opts = StreamOptions {
        time_expansion: 10.0,
        ..StreamOptions::default()
    };
    let response = stream_range(&path, None, &opts).unwrap();
    let (sample_rate, _, _, _) = parse_header(&response.data);

    assert_eq!(sample_rate, 160_000);
}

#[test]
fn test_time_window_limits_stream_size() {
    let dir = TempDir::new().unwrap();
    let path = fixture(&dir);

    // With a 10x expansion factor, 0.025 s of original time covers
    // 0.25 s of file time: 4000 frames, 8000 payload bytes.
    let opts = StreamOptions {
        time_expansion: 10.0,
        start_time: Some(0.0),
        end_time: Some(0.025),
        ..StreamOptions::default()
    };
    let response = stream_range(&path, None, &opts).unwrap();

    assert_eq!(response.total_size, (HEADER_SIZE + 8_000) as u64);
}

#[test]
fn test_window_past_end_yields_header_only_stream() {
    let dir = TempDir::new().unwrap();
    let path = fixture(&dir);

    let opts = StreamOptions {
        start_time: Some(1.0),
        ..StreamOptions::default()
    };
    let response = stream_range(&path, None, &opts).unwrap();

    assert_eq!(response.total_size, HEADER_SIZE as u64);
    assert_eq!(response.data.len(), HEADER_SIZE);
    let (_, _, data_size, _) = parse_header(&response.data);
    assert_eq!(data_size, 0);
}

#[test]
fn test_resampled_stream_declares_target_rate() {
    let dir = TempDir::new().unwrap();
    let path = fixture(&dir);

    let opts = StreamOptions {
        target_samplerate: Some(8_000),
        ..StreamOptions::default()
    };
    let response = stream_range(&path, None, &opts).unwrap();
    let (sample_rate, _, data_size, _) = parse_header(&response.data);

    // 8000 file frames at half rate: 4000 output frames, 8000 bytes.
    assert_eq!(sample_rate, 8_000);
    assert_eq!(data_size, 8_000);
    assert_eq!(response.total_size, (HEADER_SIZE + 8_000) as u64);
}

#[test]
fn test_zero_target_samplerate_rejected() {
    let dir = TempDir::new().unwrap();
    let path = fixture(&dir);

    let opts = StreamOptions {
        target_samplerate: Some(0),
        ..StreamOptions::default()
    };
    let err = stream_chunk(&path, 0, 1024, &opts).unwrap_err();
    assert!(matches!(err, Error::InvalidParameter(_)));
}

#[test]
fn test_missing_file_is_not_found() {
    let err = stream_chunk(
        std::path::Path::new("/no/such/stream.wav"),
        0,
        1024,
        &StreamOptions::default(),
    )
    .unwrap_err();
    assert!(matches!(err, Error::NotFound(_)));
}

#[test]
fn test_chunk_offsets_are_stateless() {
    let dir = TempDir::new().unwrap();
    let path = fixture(&dir);
    let opts = StreamOptions::default();

    // The same byte offset must decode to the same bytes regardless of
    // what was requested before it.
    let first = stream_chunk(&path, 2_044, 512, &opts).unwrap();
    let _unrelated = stream_chunk(&path, 10_044, 128, &opts).unwrap();
    let second = stream_chunk(&path, 2_044, 512, &opts).unwrap();

    assert_eq!(first.data, second.data);
    assert_eq!(first.start, 2_044);
    assert_eq!(first.end, 2_044 + first.data.len() as u64);
}
