//! Sample-rate conversion using rubato
//!
//! Band-limited resampling for both full-clip loading and streaming
//! chunks. The whole input is processed as a single chunk, which keeps the
//! conversion a pure function of the input samples.

use crate::error::{Error, Result};
use rubato::{FastFixedIn, PolynomialDegree, Resampler as RubatoResampler};
use tracing::debug;

/// Resample channel-major audio from `source_rate` to `target_rate`.
///
/// Channel count is always preserved. A same-rate call returns the input
/// unchanged, and zero-length input produces zero-length output without
/// constructing a resampler.
///
/// # Errors
/// [`Error::Resample`] when the converter cannot be constructed for the
/// requested ratio or processing fails. Callers are expected to catch this
/// variant and fall back to the source rate rather than abort.
pub fn resample(input: &[Vec<f32>], source_rate: u32, target_rate: u32) -> Result<Vec<Vec<f32>>> {
    if source_rate == target_rate {
        return Ok(input.to_vec());
    }
    if input.is_empty() {
        return Ok(Vec::new());
    }

    let channels = input.len();
    let input_frames = input[0].len();
    if input_frames == 0 {
        return Ok(vec![Vec::new(); channels]);
    }
    if source_rate == 0 || target_rate == 0 {
        return Err(Error::Resample(format!(
            "cannot resample from {} Hz to {} Hz",
            source_rate, target_rate
        )));
    }

    debug!(
        "Resampling {} frames from {} Hz to {} Hz ({} channels)",
        input_frames, source_rate, target_rate, channels
    );

    let mut resampler = FastFixedIn::<f32>::new(
        target_rate as f64 / source_rate as f64,
        1.0,
        PolynomialDegree::Septic,
        input_frames,
        channels,
    )
    .map_err(|e| Error::Resample(format!("failed to create resampler: {}", e)))?;

    let output = resampler
        .process(input, None)
        .map_err(|e| Error::Resample(format!("resampling failed: {}", e)))?;

    debug!(
        "Resampled {} input frames to {} output frames",
        input_frames,
        output.first().map(|c| c.len()).unwrap_or(0)
    );

    Ok(output)
}
