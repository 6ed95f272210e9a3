//! Analysis window functions
//!
//! Periodic (DFT-even) variants, which is what short-time analysis wants.
//! Unrecognized window names fall back to Hann rather than erroring, so a
//! UI sending an exotic name still gets a usable spectrogram.

use tracing::debug;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Window {
    Hann,
    Hamming,
    Bartlett,
    Blackman,
}

impl Window {
    pub fn from_name(name: &str) -> Self {
        match name.to_ascii_lowercase().as_str() {
            "hann" | "hanning" => Window::Hann,
            "hamming" => Window::Hamming,
            "bartlett" => Window::Bartlett,
            "blackman" => Window::Blackman,
            other => {
                debug!("unknown window function {:?}, falling back to hann", other);
                Window::Hann
            }
        }
    }

    /// Sample the window at `length` points (periodic convention).
    pub fn sample(&self, length: usize) -> Vec<f32> {
        if length == 0 {
            return vec![1.0];
        }
        let n = length as f32;
        (0..length)
            .map(|i| {
                let x = i as f32 / n;
                match self {
                    Window::Hann => 0.5 - 0.5 * (2.0 * std::f32::consts::PI * x).cos(),
                    Window::Hamming => 0.54 - 0.46 * (2.0 * std::f32::consts::PI * x).cos(),
                    Window::Bartlett => {
                        let t = 2.0 * x;
                        if t <= 1.0 {
                            t
                        } else {
                            2.0 - t
                        }
                    }
                    Window::Blackman => {
                        0.42 - 0.5 * (2.0 * std::f32::consts::PI * x).cos()
                            + 0.08 * (4.0 * std::f32::consts::PI * x).cos()
                    }
                }
            })
            .collect()
    }
}
