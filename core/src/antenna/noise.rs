use ndarray::Array1;
use num_complex::Complex64;
use rand::Rng;
use rand_distr::StandardNormal;

use crate::prelude::{AntennaResult, ValueType, Waveform};

/// Boltzmann constant (J/K).
pub const BOLTZMANN: f64 = 1.380_649e-23;

/// Band-limited Johnson-Nyquist noise of a resistive antenna.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ThermalNoise {
    f_low: f64,
    f_high: f64,
    rms: f64,
}

impl ThermalNoise {
    pub fn new(temperature: f64, resistance: f64, f_low: f64, f_high: f64) -> Self {
        let rms = (BOLTZMANN * temperature * resistance * (f_high - f_low)).sqrt();
        Self { f_low, f_high, rms }
    }

    /// Target voltage RMS.
    pub fn rms(&self) -> f64 {
        self.rms
    }

    /// Draws a noise voltage waveform on `times`.
    ///
    /// White Gaussian samples are band-limited to `[f_low, f_high]` and then
    /// rescaled so the waveform RMS equals [`rms`](Self::rms).
    pub fn generate<R: Rng + ?Sized>(
        &self,
        times: &Array1<f64>,
        rng: &mut R,
    ) -> AntennaResult<Waveform> {
        let white: Vec<f64> = (0..times.len())
            .map(|_| rng.sample(StandardNormal))
            .collect();
        let draft = Waveform::new(times.clone(), Array1::from(white), ValueType::Voltage)?;

        let (f_low, f_high) = (self.f_low, self.f_high);
        let banded = draft.filter_frequencies(|f| {
            if f >= f_low && f <= f_high {
                Complex64::new(1.0, 0.0)
            } else {
                Complex64::new(0.0, 0.0)
            }
        });

        let current = banded.rms();
        if current == 0.0 {
            return Ok(banded);
        }
        Ok(banded.scaled(self.rms / current))
    }
}
