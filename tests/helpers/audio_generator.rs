//! Deterministic WAV fixture generation
//!
//! Bioacoustics recordings span ordinary microphone rates up to the
//! several-hundred-kilohertz rates of bat detectors, so the generators
//! take the sample rate as a parameter instead of assuming 44.1 kHz.

use hound::{SampleFormat, WavSpec, WavWriter};
use std::f64::consts::PI;
use std::path::Path;

/// Write a sine-wave WAV file with the given shape.
///
/// Every channel carries the same signal, which keeps channel-count
/// assertions independent of channel content.
pub fn write_sine_wav(
    path: &Path,
    sample_rate: u32,
    channels: u16,
    duration_s: f64,
    frequency_hz: f64,
    amplitude: f64,
) {
    let spec = WavSpec {
        channels,
        sample_rate,
        bits_per_sample: 16,
        sample_format: SampleFormat::Int,
    };

    let mut writer = WavWriter::create(path, spec).expect("create fixture wav");
    let total_frames = (sample_rate as f64 * duration_s).round() as u64;

    for frame in 0..total_frames {
        let t = frame as f64 / sample_rate as f64;
        let value = (2.0 * PI * frequency_hz * t).sin() * amplitude;
        let sample = (value * i16::MAX as f64) as i16;
        for _ in 0..channels {
            writer.write_sample(sample).expect("write fixture sample");
        }
    }

    writer.finalize().expect("finalize fixture wav");
}

/// Write a silent WAV file.
pub fn write_silent_wav(path: &Path, sample_rate: u32, channels: u16, duration_s: f64) {
    let spec = WavSpec {
        channels,
        sample_rate,
        bits_per_sample: 16,
        sample_format: SampleFormat::Int,
    };

    let mut writer = WavWriter::create(path, spec).expect("create fixture wav");
    let total_frames = (sample_rate as f64 * duration_s).round() as u64;

    for _ in 0..total_frames * channels as u64 {
        writer.write_sample(0i16).expect("write fixture sample");
    }

    writer.finalize().expect("finalize fixture wav");
}
