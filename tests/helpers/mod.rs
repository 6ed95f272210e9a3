//! Shared fixtures for integration tests

pub mod audio_generator;

use echoslice::types::Recording;
use std::path::PathBuf;
use uuid::Uuid;

/// Build a recording descriptor for a fixture file.
pub fn recording(
    relative_path: &str,
    duration: f64,
    samplerate: Option<u32>,
    channels: u16,
    time_expansion: f64,
) -> Recording {
    Recording {
        uuid: Uuid::new_v4(),
        path: PathBuf::from(relative_path),
        duration,
        samplerate,
        channels,
        time_expansion,
    }
}
