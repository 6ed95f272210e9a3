//! Byte-range streaming engine
//!
//! Maps an HTTP byte-range request onto file-domain frame offsets, decodes
//! only the frames that chunk needs, and emits a synthetic WAVE container
//! whose header stays consistent with the full (unranged) stream no matter
//! how the stream is chunked.
//!
//! There is no cross-request state: every request reconstructs its frame
//! offset from the byte offset alone, so the offset arithmetic here must be
//! a deterministic function of `(byte_start, window, rates)`. Overlapping
//! ranges then decode to identical bytes at identical absolute positions.
//!
//! Three clocks are in play. Original time is what callers speak; file
//! time is original time multiplied by the recorder's time-expansion
//! factor; output time is file time rescaled by `target_rate / native_rate`
//! when resampling was requested. Byte offsets live in the output domain,
//! frame reads in the file domain. The header's declared rate additionally
//! folds in the playback speed and the expansion factor so a fixed-rate
//! player reproduces both.

use crate::audio::decoder::Decoder;
use crate::audio::resampler;
use crate::audio::wav;
use crate::error::{Error, Result};
use std::path::Path;
use tracing::{debug, warn};

/// Output frames produced per chunk when the caller does not bound the
/// read. Matches the transfer size a scrubbing player requests.
pub const DEFAULT_CHUNK_FRAMES: usize = 8192;

/// Bit depth of the synthesized PCM stream.
pub const DEFAULT_BIT_DEPTH: u16 = 16;

/// Parameters of a streaming request that stay fixed across its chunks.
#[derive(Debug, Clone)]
pub struct StreamOptions {
    /// Playback speed multiplier baked into the declared header rate.
    pub speed: f64,
    /// Recorder time-expansion factor of the source file.
    pub time_expansion: f64,
    /// Window start in original time, seconds. Defaults to 0.
    pub start_time: Option<f64>,
    /// Window end in original time, seconds. Defaults to end of file.
    pub end_time: Option<f64>,
    pub bit_depth: u16,
    /// Resample the stream to this rate. `None` streams at the native rate.
    pub target_samplerate: Option<u32>,
}

impl Default for StreamOptions {
    fn default() -> Self {
        Self {
            speed: 1.0,
            time_expansion: 1.0,
            start_time: None,
            end_time: None,
            bit_depth: DEFAULT_BIT_DEPTH,
            target_samplerate: None,
        }
    }
}

/// One contiguous piece of the synthetic stream.
#[derive(Debug, Clone)]
pub struct StreamChunk {
    pub data: Vec<u8>,
    /// Absolute byte offset of the first payload byte.
    pub start: u64,
    /// Absolute byte offset one past the last payload byte.
    pub end: u64,
    /// Size of the whole stream: PCM payload plus header.
    pub total_size: u64,
}

/// Parsed `Range: bytes=<start>-[<end>]` header. `end` is inclusive.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ByteRange {
    pub start: u64,
    pub end: Option<u64>,
}

impl ByteRange {
    pub fn parse(header: &str) -> Result<Self> {
        let spec = header
            .trim()
            .strip_prefix("bytes=")
            .ok_or_else(|| Error::InvalidParameter(format!("malformed Range header: {header}")))?;

        let mut parts = spec.splitn(2, '-');
        let start = parts
            .next()
            .unwrap_or("")
            .trim()
            .parse::<u64>()
            .map_err(|_| Error::InvalidParameter(format!("malformed Range header: {header}")))?;

        let end = match parts.next().map(str::trim) {
            None | Some("") => None,
            Some(s) => Some(s.parse::<u64>().map_err(|_| {
                Error::InvalidParameter(format!("malformed Range header: {header}"))
            })?),
        };

        if let Some(end) = end {
            if end < start {
                return Err(Error::InvalidParameter(format!(
                    "inverted Range header: {header}"
                )));
            }
        }

        Ok(Self { start, end })
    }
}

/// Everything a 200/206 responder needs for one range request.
#[derive(Debug, Clone)]
pub struct RangeResponse {
    pub data: Vec<u8>,
    /// False when no Range header was given (serve 200, full content).
    pub partial: bool,
    pub content_start: u64,
    /// Inclusive end offset for a `Content-Range` header.
    pub content_end: u64,
    pub total_size: u64,
}

/// Produce one chunk of the synthetic stream starting at `byte_start`.
///
/// `max_output_frames` bounds the chunk length in output-domain frames;
/// the actual payload may be shorter near the end of the window. A
/// `byte_start` past the end of the stream returns an empty chunk with
/// `end == start` rather than an error, matching HTTP range semantics.
pub fn stream_chunk(
    path: &Path,
    byte_start: u64,
    max_output_frames: usize,
    opts: &StreamOptions,
) -> Result<StreamChunk> {
    if let Some(target) = opts.target_samplerate {
        if target == 0 {
            return Err(Error::InvalidParameter(
                "target_samplerate must be positive".to_string(),
            ));
        }
    }

    let mut decoder = Decoder::open(path)?;
    let info = decoder.info();
    let native_rate = info.sample_rate;
    let expansion = if opts.time_expansion > 0.0 {
        opts.time_expansion
    } else {
        1.0
    };
    let header_size = wav::HEADER_SIZE as u64;

    let output_rate = opts.target_samplerate.unwrap_or(native_rate);
    let bytes_per_frame = info.channels as u64 * opts.bit_depth as u64 / 8;
    if bytes_per_frame == 0 {
        return Err(Error::InvalidParameter(format!(
            "unsupported bit depth: {}",
            opts.bit_depth
        )));
    }

    // Original-time window to file-domain frames, clamped into the file.
    let start_time = opts.start_time.unwrap_or(0.0).max(0.0);
    let start_frame =
        ((start_time * expansion * native_rate as f64).floor() as u64).min(info.frames);
    let end_frame = match opts.end_time {
        Some(t) => ((t * expansion * native_rate as f64).floor() as u64)
            .min(info.frames)
            .max(start_frame),
        None => info.frames,
    };
    let window_frames = end_frame - start_frame;

    // Size of the whole output stream. Declared once here and again in the
    // header, so both must come from the same expression.
    let output_frames_total = scale_frames(window_frames, output_rate, native_rate);
    let data_size = output_frames_total * bytes_per_frame;
    let total_size = data_size + header_size;

    if byte_start > total_size {
        debug!(
            "range start {} past end of stream ({} bytes), returning empty chunk",
            byte_start, total_size
        );
        return Ok(StreamChunk {
            data: Vec::new(),
            start: byte_start,
            end: byte_start,
            total_size,
        });
    }

    // Byte offset to file-domain frame offset. Offsets inside the header
    // region clamp to the payload start: callers are expected to request
    // the whole header (byte 0) or begin strictly after it.
    let offset = if byte_start > header_size {
        let output_offset = (byte_start - header_size) / bytes_per_frame;
        let file_offset = scale_frames(output_offset, native_rate, output_rate);
        (start_frame + file_offset).min(end_frame)
    } else {
        start_frame
    };

    // File-domain frames needed to synthesize the requested output frames.
    let frames_to_read = ceil_scale_frames(max_output_frames as u64, native_rate, output_rate)
        .min(end_frame - offset) as usize;

    let samples = if frames_to_read > 0 {
        decoder.read(offset, frames_to_read)?
    } else {
        vec![Vec::new(); info.channels as usize]
    };

    // Resample only when a target was explicitly requested. On failure the
    // chunk degrades to the native rate and every declared size is
    // recomputed to match, rather than failing the request.
    let mut effective_rate = output_rate;
    let mut effective_data_size = data_size;
    let samples = match opts.target_samplerate {
        Some(target) if target != native_rate => {
            match resampler::resample(&samples, native_rate, target) {
                Ok(resampled) => resampled,
                Err(e) => {
                    warn!(
                        "resampling stream from {} Hz to {} Hz failed, using original rate: {}",
                        native_rate, target, e
                    );
                    effective_rate = native_rate;
                    effective_data_size = window_frames * bytes_per_frame;
                    samples
                }
            }
        }
        _ => samples,
    };

    let payload = wav::encode_pcm(&samples, opts.bit_depth)?;

    let data = if byte_start == 0 {
        let header_rate = (effective_rate as f64 * opts.speed * expansion).round() as u32;
        let header = wav::wav_header(
            header_rate,
            info.channels,
            effective_data_size as u32,
            opts.bit_depth,
        );
        let mut data = Vec::with_capacity(header.len() + payload.len());
        data.extend_from_slice(&header);
        data.extend_from_slice(&payload);
        data
    } else {
        payload
    };

    let end = byte_start + data.len() as u64;
    Ok(StreamChunk {
        data,
        start: byte_start,
        end,
        total_size: effective_data_size + header_size,
    })
}

/// Serve one HTTP range request against the synthetic stream.
///
/// With no `Range` header the entire stream is produced in one piece (a
/// 200 response); with one, the chunk is sized from the requested byte
/// count, capped at [`DEFAULT_CHUNK_FRAMES`], and truncated to the
/// inclusive range end (a 206 response).
pub fn stream_range(path: &Path, range: Option<&str>, opts: &StreamOptions) -> Result<RangeResponse> {
    let parsed = range.map(ByteRange::parse).transpose()?;

    let (byte_start, requested_end) = match parsed {
        Some(r) => (r.start, r.end),
        None => (0, None),
    };

    let max_output_frames = match (parsed, requested_end) {
        // Unranged requests deliver the full stream in one piece.
        (None, _) => u32::MAX as usize,
        (Some(_), Some(end)) => {
            let requested_bytes = end - byte_start + 1;
            let frames = requested_bytes * 8 / opts.bit_depth as u64;
            (frames as usize).min(DEFAULT_CHUNK_FRAMES).max(1)
        }
        (Some(_), None) => DEFAULT_CHUNK_FRAMES,
    };

    let mut chunk = stream_chunk(path, byte_start, max_output_frames, opts)?;

    if let Some(end) = requested_end {
        let limit = (end - byte_start + 1) as usize;
        if chunk.data.len() > limit {
            chunk.data.truncate(limit);
            chunk.end = chunk.start + chunk.data.len() as u64;
        }
    }

    Ok(RangeResponse {
        partial: parsed.is_some(),
        content_start: chunk.start,
        content_end: chunk.end.saturating_sub(1),
        total_size: chunk.total_size,
        data: chunk.data,
    })
}

/// `frames * numerator / denominator`, rounded down, without overflow.
fn scale_frames(frames: u64, numerator: u32, denominator: u32) -> u64 {
    if denominator == 0 {
        return 0;
    }
    (frames as u128 * numerator as u128 / denominator as u128) as u64
}

/// `frames * numerator / denominator`, rounded up, without overflow.
fn ceil_scale_frames(frames: u64, numerator: u32, denominator: u32) -> u64 {
    if denominator == 0 {
        return 0;
    }
    let n = frames as u128 * numerator as u128;
    ((n + denominator as u128 - 1) / denominator as u128) as u64
}
