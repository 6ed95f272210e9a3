//! Spectrogram synthesis
//!
//! Turns a loaded clip into a power spectrogram: centered STFT scaled to a
//! power-spectral-density estimate, optional PCEN, decibel conversion and
//! display normalization. The output carries frequency and time coordinate
//! axes so a renderer can place it without re-deriving the framing.

pub mod pcen;
pub mod scale;
pub mod stft;
pub mod window;

use crate::audio::loader::load_clip;
use crate::config::Config;
use crate::error::{Error, Result};
use crate::types::{AudioParameters, Recording, SpectrogramParameters};
use tracing::debug;
use window::Window;

/// A single-channel power spectrogram with coordinate axes.
///
/// Values are frequency-major: `data[bin * frames + frame]`, scaled to
/// [0, 1] after decibel conversion. Frequency bin `b` is centered at
/// `b * freq_step` Hz; time frame `t` at `time_start + t * time_step`
/// seconds in the recording's original time domain.
#[derive(Debug, Clone)]
pub struct Spectrogram {
    pub data: Vec<f32>,
    pub bins: usize,
    pub frames: usize,
    pub freq_step: f64,
    pub time_start: f64,
    pub time_step: f64,
    /// Units of the underlying quantity before decibel scaling.
    pub units: &'static str,
}

impl Spectrogram {
    pub fn value(&self, bin: usize, frame: usize) -> f32 {
        self.data[bin * self.frames + frame]
    }

    pub fn freq_axis(&self) -> Vec<f64> {
        (0..self.bins).map(|b| b as f64 * self.freq_step).collect()
    }

    pub fn time_axis(&self) -> Vec<f64> {
        (0..self.frames)
            .map(|t| self.time_start + t as f64 * self.time_step)
            .collect()
    }
}

/// Compute a spectrogram for a window of a recording.
///
/// The clip is loaded with `audio_params`, one channel is selected before
/// any heavier computation, and the STFT framing is derived from the
/// clip's actual time step rather than the nominal recording rate.
pub fn compute_spectrogram(
    recording: &Recording,
    start_time: f64,
    end_time: f64,
    audio_params: &AudioParameters,
    params: &SpectrogramParameters,
    config: &Config,
) -> Result<Spectrogram> {
    let clip = load_clip(
        recording,
        Some(start_time),
        Some(end_time),
        audio_params,
        config,
    )?;

    let channel = clip.channel(params.channel).ok_or_else(|| {
        Error::InvalidParameter(format!(
            "channel {} out of range for a {}-channel clip",
            params.channel,
            clip.num_channels()
        ))
    })?;

    let time_step = clip.time_step();
    if time_step <= 0.0 {
        return Err(Error::InvalidParameter(
            "audio data must include a positive time step".to_string(),
        ));
    }
    let samplerate = (1.0 / time_step).round() as u32;

    let hop_size = ((1.0 - params.overlap) * params.window_size).max(1.0 / samplerate as f64);
    let win_length = ((params.window_size * samplerate as f64).round() as usize).max(1);
    let hop_length = ((hop_size * samplerate as f64).round() as usize).max(1);
    let n_fft = win_length.max(2);

    debug!(
        "Spectrogram for {}: win {} hop {} n_fft {} over {} frames",
        recording.uuid,
        win_length,
        hop_length,
        n_fft,
        channel.len()
    );

    let window = Window::from_name(&params.window).sample(win_length);
    let mut stft = stft::stft_power(channel, &window, n_fft, hop_length)?;

    // Scale |X|^2 to a power-spectral-density estimate.
    let window_energy: f32 = window.iter().map(|w| w * w).sum();
    if samplerate > 0 && window_energy > 0.0 {
        let psd_scale = 1.0 / (samplerate as f32 * window_energy);
        for v in stft.data.iter_mut() {
            *v *= psd_scale;
        }
    }

    // Fold one-sided spectrum energy: double everything except DC, and
    // except Nyquist when the transform length is even.
    let frames = stft.frames;
    if n_fft % 2 == 0 && stft.bins > 2 {
        for bin in 1..stft.bins - 1 {
            for v in stft.data[bin * frames..(bin + 1) * frames].iter_mut() {
                *v *= 2.0;
            }
        }
    } else if stft.bins > 1 {
        for bin in 1..stft.bins {
            for v in stft.data[bin * frames..(bin + 1) * frames].iter_mut() {
                *v *= 2.0;
            }
        }
    }

    if params.pcen {
        pcen::apply_pcen(&mut stft.data, stft.bins, stft.frames);
    }

    scale::power_to_db(&mut stft.data, params.min_db, params.max_db);
    scale::normalize(&mut stft.data, params.min_db, params.max_db, params.normalize);

    let hop_seconds = hop_length as f64 / samplerate as f64;

    Ok(Spectrogram {
        data: stft.data,
        bins: stft.bins,
        frames: stft.frames,
        freq_step: samplerate as f64 / n_fft as f64,
        time_start: clip.start_time + hop_seconds / 2.0,
        time_step: hop_seconds,
        units: "V**2/Hz",
    })
}
