//! Core domain types
//!
//! The recording descriptor mirrors what the dataset subsystem stores about
//! a file on disk; the parameter structs are the caller-facing knobs for
//! audio loading and spectrogram synthesis. All parameter structs
//! deserialize with defaults so a query-string boundary can build them
//! directly, and the defaults are a pass-through (no resample, no filter).

use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use uuid::Uuid;

/// Immutable description of a recording on disk.
///
/// Owned by the dataset subsystem; this crate only reads it. `path` is
/// relative to the configured audio root. `samplerate` and `channels` are
/// nominal values from import-time metadata and may be absent or stale;
/// the decoder-reported values win wherever the two disagree.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Recording {
    pub uuid: Uuid,
    pub path: PathBuf,
    /// Nominal duration in seconds, in the original (time-corrected) domain.
    pub duration: f64,
    /// Nominal sample rate; `None` or zero means unknown.
    pub samplerate: Option<u32>,
    pub channels: u16,
    /// Factor by which the recorder stretched real time when writing the
    /// file. File-domain time equals original time multiplied by this.
    #[serde(default = "default_time_expansion")]
    pub time_expansion: f64,
}

fn default_time_expansion() -> f64 {
    1.0
}

/// Options for loading audio clips.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AudioParameters {
    /// Resample the clip to `samplerate` after loading.
    pub resample: bool,
    /// Target rate for resampling; ignored unless `resample` is set.
    pub samplerate: u32,
    /// High-pass cutoff in Hz; `None` disables the high-pass stage.
    pub low_freq: Option<f64>,
    /// Low-pass cutoff in Hz; `None` disables the low-pass stage.
    pub high_freq: Option<f64>,
    /// Nominal filter order approximated by the biquad cascade.
    pub filter_order: u32,
}

impl Default for AudioParameters {
    fn default() -> Self {
        Self {
            resample: false,
            samplerate: 44_100,
            low_freq: None,
            high_freq: None,
            filter_order: 5,
        }
    }
}

/// Options for spectrogram synthesis.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SpectrogramParameters {
    /// Analysis window length in seconds.
    pub window_size: f64,
    /// Fraction of the window shared by consecutive frames, in [0, 1).
    pub overlap: f64,
    /// Window function name; unrecognized names fall back to Hann.
    pub window: String,
    /// Which channel of the clip to analyze.
    pub channel: usize,
    #[serde(rename = "min_dB")]
    pub min_db: f32,
    #[serde(rename = "max_dB")]
    pub max_db: f32,
    /// Scale the output relative to its own extremes instead of the fixed
    /// decibel range.
    pub normalize: bool,
    /// Apply per-channel energy normalization before decibel conversion.
    pub pcen: bool,
}

impl Default for SpectrogramParameters {
    fn default() -> Self {
        Self {
            window_size: 0.025,
            overlap: 0.5,
            window: "hann".to_string(),
            channel: 0,
            min_db: -100.0,
            max_db: 0.0,
            normalize: false,
            pcen: false,
        }
    }
}
