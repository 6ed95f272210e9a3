//! # echoslice
//!
//! Audio core for a bioacoustics annotation platform: on-demand,
//! byte-range-accurate audio slicing and streaming with sample-rate,
//! time-expansion and playback-speed transforms, plus spectrogram
//! synthesis over loaded clips.
//!
//! **Architecture:** symphonia for decoding, rubato for resampling,
//! realfft for the short-time Fourier transform. Each request is an
//! independent computation over read-only recording metadata; file handles
//! live only as long as the request that opened them.
//!
//! The surrounding application (routes, persistence, permissions) is an
//! external collaborator: it supplies a [`types::Recording`] descriptor
//! and a [`Config`] naming the audio root, and consumes waveforms, byte
//! chunks and spectrogram arrays.

pub mod audio;
pub mod config;
pub mod error;
pub mod spectrogram;
pub mod types;

pub use config::Config;
pub use error::{Error, Result};
