//! Centered short-time Fourier transform
//!
//! Magnitude-squared, one-sided spectrum via realfft. Framing is centered:
//! frame `t` covers samples `[t*hop - n_fft/2, t*hop + n_fft/2)` with
//! constant zero padding outside the signal, which gives
//! `len / hop + 1` frames for a signal of `len` samples.

use crate::error::{Error, Result};
use realfft::RealFftPlanner;

/// Power STFT stored frequency-major: `data[bin * frames + frame]`.
pub struct PowerStft {
    pub data: Vec<f32>,
    pub bins: usize,
    pub frames: usize,
}

/// Compute the magnitude-squared STFT of a single channel.
///
/// The analysis window is zero-padded symmetrically when it is shorter
/// than `n_fft` (only possible for degenerate one-sample windows).
pub fn stft_power(
    samples: &[f32],
    window: &[f32],
    n_fft: usize,
    hop_length: usize,
) -> Result<PowerStft> {
    let bins = n_fft / 2 + 1;
    let frames = samples.len() / hop_length + 1;

    let mut padded_window = vec![0.0f32; n_fft];
    let left = (n_fft - window.len().min(n_fft)) / 2;
    for (i, w) in window.iter().take(n_fft).enumerate() {
        padded_window[left + i] = *w;
    }

    let mut planner = RealFftPlanner::<f32>::new();
    let fft = planner.plan_fft_forward(n_fft);
    let mut input = fft.make_input_vec();
    let mut spectrum = fft.make_output_vec();
    let mut scratch = fft.make_scratch_vec();

    let mut data = vec![0.0f32; bins * frames];
    let pad = (n_fft / 2) as isize;

    for frame in 0..frames {
        let frame_start = frame as isize * hop_length as isize - pad;
        for (i, slot) in input.iter_mut().enumerate() {
            let idx = frame_start + i as isize;
            let sample = if idx >= 0 && (idx as usize) < samples.len() {
                samples[idx as usize]
            } else {
                0.0
            };
            *slot = sample * padded_window[i];
        }

        fft.process_with_scratch(&mut input, &mut spectrum, &mut scratch)
            .map_err(|e| Error::Internal(format!("stft fft failed: {}", e)))?;

        for (bin, c) in spectrum.iter().enumerate() {
            data[bin * frames + frame] = c.re * c.re + c.im * c.im;
        }
    }

    Ok(PowerStft { data, bins, frames })
}
