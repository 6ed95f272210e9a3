//! Full-clip audio loader
//!
//! Produces one contiguous, time-indexed waveform for an arbitrary
//! (possibly out-of-bounds) window of a recording, expressed in the
//! recording's original time domain. Handles time-expanded recordings,
//! optional resampling and optional band-pass filtering.
//!
//! Frame arithmetic runs at the recording's effective sample rate: the
//! declared rate when the dataset has one, otherwise the decoder rate
//! corrected by the time-expansion factor. That choice makes a one-second
//! original-time request map to one second of coordinates on the returned
//! time axis even when the file itself plays slower than real time.

use crate::audio::decoder::Decoder;
use crate::audio::filter;
use crate::audio::resampler;
use crate::audio::waveform::Waveform;
use crate::config::Config;
use crate::error::Result;
use crate::types::{AudioParameters, Recording};
use tracing::{debug, warn};

/// Load a window of a recording as a time-indexed waveform.
///
/// `start_time` defaults to 0 and `end_time` to the recording's nominal
/// duration. Both are clamped into the range the file can actually cover,
/// so over-long requests shrink instead of erroring and a window entirely
/// past the end yields an empty (but valid) waveform.
pub fn load_clip(
    recording: &Recording,
    start_time: Option<f64>,
    end_time: Option<f64>,
    params: &AudioParameters,
    config: &Config,
) -> Result<Waveform> {
    let path = config.resolve(&recording.path)?;
    let mut decoder = Decoder::open(&path)?;
    let info = decoder.info();

    let expansion = recording.time_expansion;
    let native_rate = info.sample_rate;

    let effective_rate = match recording.samplerate {
        Some(rate) if rate > 0 => rate,
        _ if expansion > 0.0 => (native_rate as f64 * expansion).round() as u32,
        _ => native_rate,
    };

    let requested_start = start_time.unwrap_or(0.0);
    let requested_end = end_time.unwrap_or(recording.duration);

    // Longest window the file can cover, in original time.
    let max_original_time = if native_rate > 0 && expansion > 0.0 {
        (info.frames as f64 / native_rate as f64) / expansion
    } else if recording.duration > 0.0 {
        recording.duration
    } else {
        f64::INFINITY
    };

    let load_start = requested_start.max(0.0).min(max_original_time);
    let load_end = requested_end.min(max_original_time).max(load_start);

    let mut frame_offset = (load_start * effective_rate as f64).floor() as u64;
    frame_offset = frame_offset.min(info.frames);

    let mut expected_frames = ((load_end - load_start) * effective_rate as f64).floor() as u64;
    if frame_offset + expected_frames > info.frames {
        expected_frames = info.frames - frame_offset;
    }
    let expected_frames = expected_frames as usize;

    debug!(
        "Loading clip {} [{:.3}s, {:.3}s): {} frames at offset {}",
        recording.uuid, load_start, load_end, expected_frames, frame_offset
    );

    let decoded = if expected_frames > 0 && frame_offset < info.frames {
        decoder.read(frame_offset, expected_frames)?
    } else {
        Vec::new()
    };

    // The decoder's channel count wins; the recording's nominal count is
    // only a fallback when the decoder reports none.
    let channels = if info.channels > 0 {
        info.channels as usize
    } else if recording.channels > 0 {
        recording.channels as usize
    } else {
        1
    };

    let mut samples = vec![vec![0.0f32; expected_frames]; channels];
    for (plane, decoded_plane) in samples.iter_mut().zip(decoded.into_iter()) {
        let frames_to_copy = decoded_plane.len().min(expected_frames);
        plane[..frames_to_copy].copy_from_slice(&decoded_plane[..frames_to_copy]);
    }

    let mut current_rate = effective_rate;

    if params.resample && params.samplerate != current_rate {
        if expected_frames > 0 {
            match resampler::resample(&samples, current_rate, params.samplerate) {
                Ok(resampled) => {
                    samples = resampled;
                    current_rate = params.samplerate;
                }
                Err(e) => {
                    warn!(
                        "resampling clip {} from {} Hz to {} Hz failed, keeping original rate: {}",
                        recording.uuid, current_rate, params.samplerate, e
                    );
                }
            }
        } else {
            current_rate = params.samplerate;
        }
    }

    if params.low_freq.is_some() || params.high_freq.is_some() {
        filter::apply_bandpass(
            &mut samples,
            current_rate,
            params.low_freq,
            params.high_freq,
            params.filter_order,
        )?;
    }

    let actual_start = if effective_rate > 0 {
        frame_offset as f64 / effective_rate as f64
    } else {
        0.0
    };

    // A negative requested start extends the axis left without inventing
    // samples; otherwise the axis begins at the first real sample.
    let extent_start = if requested_start < 0.0 {
        requested_start
    } else {
        actual_start
    };

    Ok(Waveform {
        recording: recording.uuid,
        source: recording.path.clone(),
        samples,
        sample_rate: current_rate,
        start_time: actual_start,
        extent_start,
        units: "V",
    })
}
