//! Minimal RIFF/WAVE header and PCM encoding
//!
//! The streaming engine fabricates a WAVE container on the fly, so the
//! header is built by hand: 44 bytes, linear PCM, little-endian fields in
//! the canonical order. The declared sizes must stay consistent with the
//! bytes the stream will actually produce.

use crate::error::{Error, Result};
use crate::audio::waveform::Waveform;

/// Size of the fixed streaming header in bytes.
pub const HEADER_SIZE: usize = 44;

/// Build a 44-byte WAVE header for a linear PCM payload.
///
/// Pure function of its arguments; the streaming engine calls it exactly
/// once per logical stream, on the chunk that starts at byte zero.
pub fn wav_header(sample_rate: u32, channels: u16, data_size: u32, bit_depth: u16) -> [u8; 44] {
    let byte_rate = sample_rate * channels as u32 * bit_depth as u32 / 8;
    let block_align = channels * bit_depth / 8;

    let mut header = [0u8; HEADER_SIZE];
    header[0..4].copy_from_slice(b"RIFF");
    header[4..8].copy_from_slice(&(data_size as i32).wrapping_add(36).to_le_bytes());
    header[8..12].copy_from_slice(b"WAVE");
    header[12..16].copy_from_slice(b"fmt ");
    header[16..20].copy_from_slice(&16i32.to_le_bytes());
    header[20..22].copy_from_slice(&1u16.to_le_bytes()); // linear PCM
    header[22..24].copy_from_slice(&channels.to_le_bytes());
    header[24..28].copy_from_slice(&sample_rate.to_le_bytes());
    header[28..32].copy_from_slice(&byte_rate.to_le_bytes());
    header[32..34].copy_from_slice(&block_align.to_le_bytes());
    header[34..36].copy_from_slice(&bit_depth.to_le_bytes());
    header[36..40].copy_from_slice(b"data");
    header[40..44].copy_from_slice(&(data_size as i32).to_le_bytes());
    header
}

/// Quantize channel-major f32 frames to interleaved little-endian PCM.
///
/// Supports 8, 16, 24 and 32 bit integer PCM. Samples are clamped to
/// [-1.0, 1.0] before quantization.
pub fn encode_pcm(samples: &[Vec<f32>], bit_depth: u16) -> Result<Vec<u8>> {
    let channels = samples.len();
    let frames = samples.first().map(|c| c.len()).unwrap_or(0);
    let mut out = Vec::with_capacity(frames * channels * bit_depth as usize / 8);

    for frame in 0..frames {
        for plane in samples {
            let s = plane[frame].clamp(-1.0, 1.0);
            match bit_depth {
                8 => {
                    // WAVE 8-bit PCM is unsigned, centered at 128.
                    let v = (s * 127.0).round() as i16 + 128;
                    out.push(v as u8);
                }
                16 => {
                    let v = (s * i16::MAX as f32).round() as i16;
                    out.extend_from_slice(&v.to_le_bytes());
                }
                24 => {
                    let v = (s * 8_388_607.0).round() as i32;
                    out.extend_from_slice(&v.to_le_bytes()[0..3]);
                }
                32 => {
                    let v = (s as f64 * i32::MAX as f64).round() as i64;
                    let v = v.clamp(i32::MIN as i64, i32::MAX as i64) as i32;
                    out.extend_from_slice(&v.to_le_bytes());
                }
                other => {
                    return Err(Error::InvalidParameter(format!(
                        "unsupported bit depth: {}",
                        other
                    )))
                }
            }
        }
    }

    Ok(out)
}

/// Encode a loaded clip as one complete WAVE file (header plus payload),
/// ready to be served as a download attachment.
pub fn encode_wav(waveform: &Waveform, bit_depth: u16) -> Result<Vec<u8>> {
    let payload = encode_pcm(&waveform.samples, bit_depth)?;
    let header = wav_header(
        waveform.sample_rate,
        waveform.num_channels() as u16,
        payload.len() as u32,
        bit_depth,
    );
    let mut out = Vec::with_capacity(HEADER_SIZE + payload.len());
    out.extend_from_slice(&header);
    out.extend_from_slice(&payload);
    Ok(out)
}
