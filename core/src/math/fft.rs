use num_complex::Complex64;
use rustfft::{num_traits::Zero, Fft, FftPlanner};
use std::sync::Arc;

/// Helper that wraps the `rustfft` planner for a fixed transform size.
pub struct FftHelper {
    forward: Arc<dyn Fft<f64>>,
    inverse: Arc<dyn Fft<f64>>,
    size: usize,
}

impl FftHelper {
    pub fn new(size: usize) -> Self {
        let mut planner = FftPlanner::new();
        let forward = planner.plan_fft_forward(size);
        let inverse = planner.plan_fft_inverse(size);
        Self {
            forward,
            inverse,
            size,
        }
    }

    pub fn size(&self) -> usize {
        self.size
    }

    /// Forward transform of a real sequence, zero-padded to the helper size.
    pub fn forward(&self, input: &[f64]) -> Vec<Complex64> {
        let mut buffer: Vec<Complex64> = input
            .iter()
            .map(|&value| Complex64::new(value, 0.0))
            .collect();
        buffer.resize(self.size, Complex64::zero());
        self.forward.process(&mut buffer);
        buffer
    }

    /// Normalized inverse transform keeping only the real part.
    pub fn inverse_real(&self, mut spectrum: Vec<Complex64>) -> Vec<f64> {
        spectrum.resize(self.size, Complex64::zero());
        self.inverse.process(&mut spectrum);
        let scale = 1.0 / self.size as f64;
        spectrum.iter().map(|c| c.re * scale).collect()
    }
}

/// Bin frequencies of an FFT of `size` samples spaced `dt` apart, in FFT order.
pub fn fft_frequencies(size: usize, dt: f64) -> Vec<f64> {
    let span = size as f64 * dt;
    let positive = (size + 1) / 2;
    (0..size)
        .map(|k| {
            if k < positive {
                k as f64 / span
            } else {
                (k as f64 - size as f64) / span
            }
        })
        .collect()
}

/// Filters a real sequence with a transfer function defined on `f >= 0`.
///
/// The sequence is zero-padded to twice its length so the response does not
/// wrap around, and negative-frequency bins use the conjugate response so the
/// output stays real.
pub fn filter_real<F>(values: &[f64], dt: f64, response: F) -> Vec<f64>
where
    F: Fn(f64) -> Complex64,
{
    if values.is_empty() {
        return Vec::new();
    }
    let helper = FftHelper::new(2 * values.len());
    let mut spectrum = helper.forward(values);
    for (bin, freq) in spectrum
        .iter_mut()
        .zip(fft_frequencies(helper.size(), dt))
    {
        let gain = if freq >= 0.0 {
            response(freq)
        } else {
            response(-freq).conj()
        };
        *bin *= gain;
    }
    let mut filtered = helper.inverse_real(spectrum);
    filtered.truncate(values.len());
    filtered
}
