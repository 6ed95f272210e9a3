//! Time-indexed waveform type
//!
//! A loaded clip: channel-major f32 planes plus the metadata downstream
//! consumers need to locate the samples in the recording's original time
//! domain. Transient, recomputed on every request, never persisted.

use std::path::PathBuf;
use uuid::Uuid;

/// A clip of decoded audio with an attached time axis.
///
/// `start_time` is the time of the first sample; `extent_start` is the
/// leftmost time coordinate, which only differs when a negative start time
/// was requested (pre-roll that exists as coordinates, not as samples).
/// Consumers must use the axis to know true coverage, not the values they
/// originally asked for.
#[derive(Debug, Clone)]
pub struct Waveform {
    /// Recording this clip was cut from.
    pub recording: Uuid,
    /// Recording path as stored by the dataset (relative to the audio root).
    pub source: PathBuf,
    /// Channel-major sample planes; all planes have equal length.
    pub samples: Vec<Vec<f32>>,
    pub sample_rate: u32,
    /// Time of the first sample, seconds in the original domain.
    pub start_time: f64,
    /// Leftmost time coordinate; equal to `start_time` unless the request
    /// began before zero.
    pub extent_start: f64,
    /// Physical units of the sample values.
    pub units: &'static str,
}

impl Waveform {
    pub fn num_channels(&self) -> usize {
        self.samples.len()
    }

    pub fn frames(&self) -> usize {
        self.samples.first().map(|c| c.len()).unwrap_or(0)
    }

    /// Seconds between consecutive samples; zero when the rate is unknown.
    pub fn time_step(&self) -> f64 {
        if self.sample_rate > 0 {
            1.0 / self.sample_rate as f64
        } else {
            0.0
        }
    }

    pub fn duration(&self) -> f64 {
        self.frames() as f64 * self.time_step()
    }

    pub fn end_time(&self) -> f64 {
        self.start_time + self.duration()
    }

    pub fn channel(&self, index: usize) -> Option<&[f32]> {
        self.samples.get(index).map(|c| c.as_slice())
    }

    /// Interleave the planes for PCM encoding: `[c0, c1, c0, c1, ...]`.
    pub fn interleaved(&self) -> Vec<f32> {
        let channels = self.num_channels();
        let frames = self.frames();
        let mut out = Vec::with_capacity(channels * frames);
        for frame in 0..frames {
            for plane in &self.samples {
                out.push(plane[frame]);
            }
        }
        out
    }
}
