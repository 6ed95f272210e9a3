//! Per-channel energy normalization
//!
//! Perceptual loudness compensation for spectrogram power: each frequency
//! bin is smoothed over time with a first-order IIR filter seeded by its
//! first frame, then compressed through a gain/bias/power nonlinearity.

const SMOOTH: f32 = 0.025;
const GAIN: f32 = 0.98;
const BIAS: f32 = 2.0;
const POWER: f32 = 0.5;
const EPS: f32 = 1e-6;

/// Apply PCEN in place to a frequency-major power spectrogram.
pub fn apply_pcen(data: &mut [f32], bins: usize, frames: usize) {
    if frames == 0 || bins == 0 {
        return;
    }

    let bias_pow = BIAS.powf(POWER);
    let mut smoothed = vec![0.0f32; frames];

    for bin in 0..bins {
        let row = &mut data[bin * frames..(bin + 1) * frames];

        smoothed[0] = row[0];
        for t in 1..frames {
            smoothed[t] = SMOOTH * row[t] + (1.0 - SMOOTH) * smoothed[t - 1];
        }

        for t in 0..frames {
            let smooth_term = (-GAIN * (EPS.ln() + (smoothed[t] / EPS).ln_1p())).exp();
            row[t] = bias_pow * (POWER * (row[t] * smooth_term / BIAS).ln_1p()).exp_m1();
        }
    }
}
