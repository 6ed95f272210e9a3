//! Band-pass filtering via cascaded biquad sections
//!
//! A nominal filter order is approximated by running `ceil(order / 2)`
//! passes of a second-order Butterworth-Q section over each channel, the
//! usual cascade construction for steeper rolloffs.

use crate::error::{Error, Result};

const BUTTERWORTH_Q: f64 = std::f64::consts::FRAC_1_SQRT_2;

/// One second-order IIR section, coefficients normalized by a0.
struct Biquad {
    b0: f64,
    b1: f64,
    b2: f64,
    a1: f64,
    a2: f64,
}

impl Biquad {
    fn lowpass(sample_rate: f64, cutoff: f64) -> Self {
        let w0 = 2.0 * std::f64::consts::PI * cutoff / sample_rate;
        let alpha = w0.sin() / (2.0 * BUTTERWORTH_Q);
        let cos_w0 = w0.cos();
        let a0 = 1.0 + alpha;
        Self {
            b0: ((1.0 - cos_w0) / 2.0) / a0,
            b1: (1.0 - cos_w0) / a0,
            b2: ((1.0 - cos_w0) / 2.0) / a0,
            a1: (-2.0 * cos_w0) / a0,
            a2: (1.0 - alpha) / a0,
        }
    }

    fn highpass(sample_rate: f64, cutoff: f64) -> Self {
        let w0 = 2.0 * std::f64::consts::PI * cutoff / sample_rate;
        let alpha = w0.sin() / (2.0 * BUTTERWORTH_Q);
        let cos_w0 = w0.cos();
        let a0 = 1.0 + alpha;
        Self {
            b0: ((1.0 + cos_w0) / 2.0) / a0,
            b1: (-(1.0 + cos_w0)) / a0,
            b2: ((1.0 + cos_w0) / 2.0) / a0,
            a1: (-2.0 * cos_w0) / a0,
            a2: (1.0 - alpha) / a0,
        }
    }

    /// Transposed direct form II, fresh state per invocation.
    fn apply(&self, samples: &mut [f32]) {
        let mut z1 = 0.0f64;
        let mut z2 = 0.0f64;
        for s in samples.iter_mut() {
            let x = *s as f64;
            let y = self.b0 * x + z1;
            z1 = self.b1 * x - self.a1 * y + z2;
            z2 = self.b2 * x - self.a2 * y;
            *s = y as f32;
        }
    }
}

/// Validate band edges against the clip's Nyquist frequency.
fn validate_band(sample_rate: u32, low_freq: Option<f64>, high_freq: Option<f64>) -> Result<()> {
    let nyquist = sample_rate as f64 / 2.0;

    if let Some(low) = low_freq {
        if low <= 0.0 {
            return Err(Error::InvalidParameter(
                "low_freq must be greater than 0 Hz".to_string(),
            ));
        }
        if low >= nyquist {
            return Err(Error::InvalidParameter(
                "low_freq must be less than the Nyquist frequency".to_string(),
            ));
        }
    }

    if let Some(high) = high_freq {
        if high <= 0.0 {
            return Err(Error::InvalidParameter(
                "high_freq must be greater than 0 Hz".to_string(),
            ));
        }
        if high >= nyquist {
            return Err(Error::InvalidParameter(
                "high_freq must be less than the Nyquist frequency".to_string(),
            ));
        }
    }

    if let (Some(low), Some(high)) = (low_freq, high_freq) {
        if low >= high {
            return Err(Error::InvalidParameter(
                "low_freq must be less than high_freq".to_string(),
            ));
        }
    }

    Ok(())
}

/// Apply the configured high-pass and low-pass cascades in place.
///
/// Validation always runs, even for an empty clip, so bad cutoffs surface
/// as [`Error::InvalidParameter`] regardless of the window requested.
pub fn apply_bandpass(
    samples: &mut [Vec<f32>],
    sample_rate: u32,
    low_freq: Option<f64>,
    high_freq: Option<f64>,
    order: u32,
) -> Result<()> {
    validate_band(sample_rate, low_freq, high_freq)?;

    if sample_rate == 0 || samples.iter().all(|c| c.is_empty()) {
        return Ok(());
    }

    let passes = order.max(1).div_ceil(2);

    if let Some(low) = low_freq {
        let section = Biquad::highpass(sample_rate as f64, low);
        for plane in samples.iter_mut() {
            for _ in 0..passes {
                section.apply(plane);
            }
        }
    }

    if let Some(high) = high_freq {
        let section = Biquad::lowpass(sample_rate as f64, high);
        for plane in samples.iter_mut() {
            for _ in 0..passes {
                section.apply(plane);
            }
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn dc_signal(frames: usize) -> Vec<Vec<f32>> {
        vec![vec![1.0; frames]]
    }

    #[test]
    fn test_negative_low_freq_rejected() {
        let mut samples = dc_signal(100);
        let err = apply_bandpass(&mut samples, 16_000, Some(-1.0), None, 5).unwrap_err();
        assert!(matches!(err, Error::InvalidParameter(_)));
    }

    #[test]
    fn test_low_equal_high_rejected() {
        let mut samples = dc_signal(100);
        let err = apply_bandpass(&mut samples, 16_000, Some(2000.0), Some(2000.0), 5).unwrap_err();
        assert!(matches!(err, Error::InvalidParameter(_)));
    }

    #[test]
    fn test_high_at_nyquist_rejected() {
        let mut samples = dc_signal(100);
        let err = apply_bandpass(&mut samples, 16_000, None, Some(8000.0), 5).unwrap_err();
        assert!(matches!(err, Error::InvalidParameter(_)));
    }

    #[test]
    fn test_validation_runs_on_empty_clip() {
        let mut samples: Vec<Vec<f32>> = vec![Vec::new()];
        let err = apply_bandpass(&mut samples, 16_000, Some(-1.0), None, 5).unwrap_err();
        assert!(matches!(err, Error::InvalidParameter(_)));
    }

    #[test]
    fn test_highpass_attenuates_dc() {
        let mut samples = dc_signal(4000);
        apply_bandpass(&mut samples, 16_000, Some(1000.0), None, 5).unwrap();
        // After settling, DC should be strongly suppressed.
        let tail: f32 = samples[0][3000..].iter().map(|s| s.abs()).sum::<f32>() / 1000.0;
        assert!(tail < 0.01, "residual DC after high-pass: {}", tail);
    }

    #[test]
    fn test_lowpass_preserves_dc() {
        let mut samples = dc_signal(4000);
        apply_bandpass(&mut samples, 16_000, None, Some(1000.0), 5).unwrap();
        let tail: f32 = samples[0][3000..].iter().sum::<f32>() / 1000.0;
        assert!((tail - 1.0).abs() < 0.05, "DC through low-pass: {}", tail);
    }

    #[test]
    fn test_no_cutoffs_is_identity() {
        let mut samples = vec![vec![0.25f32; 64]];
        let original = samples.clone();
        apply_bandpass(&mut samples, 16_000, None, None, 5).unwrap();
        assert_eq!(samples, original);
    }
}
