use std::f64::consts::PI;

use num_complex::Complex64;

use crate::prelude::{AntennaError, AntennaResult};

/// Analog Butterworth bandpass between two corner frequencies.
///
/// The order is that of the lowpass prototype, so the rolloff on each side of
/// the band matches a prototype of that order.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ButterworthBandpass {
    f_low: f64,
    f_high: f64,
    order: usize,
}

impl ButterworthBandpass {
    pub fn new(f_low: f64, f_high: f64, order: usize) -> AntennaResult<Self> {
        if !(f_low > 0.0 && f_high > f_low) {
            return Err(AntennaError::InvalidInput(format!(
                "passband [{}, {}] Hz is not a positive interval",
                f_low, f_high
            )));
        }
        if order == 0 {
            return Err(AntennaError::InvalidInput("filter order must be positive".into()));
        }
        Ok(Self {
            f_low,
            f_high,
            order,
        })
    }

    pub fn f_low(&self) -> f64 {
        self.f_low
    }

    pub fn f_high(&self) -> f64 {
        self.f_high
    }

    /// Complex transfer function at frequency `f` (Hz).
    pub fn response(&self, f: f64) -> Complex64 {
        let omega = 2.0 * PI * f.abs();
        if omega == 0.0 {
            return Complex64::new(0.0, 0.0);
        }
        let omega_low = 2.0 * PI * self.f_low;
        let omega_high = 2.0 * PI * self.f_high;
        let band = omega_high - omega_low;
        let s = Complex64::new(0.0, omega);
        // lowpass-to-bandpass substitution
        let p = (s * s + omega_low * omega_high) / (s * band);

        let n = self.order as f64;
        let denominator = (1..=self.order).fold(Complex64::new(1.0, 0.0), |acc, k| {
            let angle = PI * (2.0 * k as f64 + n - 1.0) / (2.0 * n);
            acc * (p - Complex64::from_polar(1.0, angle))
        });
        let h = denominator.inv();
        if f < 0.0 {
            h.conj()
        } else {
            h
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn unity_gain_at_geometric_center() {
        let filter = ButterworthBandpass::new(150e6, 850e6, 2).unwrap();
        let center = (150e6_f64 * 850e6).sqrt();
        assert_relative_eq!(filter.response(center).norm(), 1.0, epsilon = 1e-9);
    }

    #[test]
    fn half_power_at_corners() {
        let filter = ButterworthBandpass::new(150e6, 850e6, 2).unwrap();
        let expected = std::f64::consts::FRAC_1_SQRT_2;
        assert_relative_eq!(filter.response(150e6).norm(), expected, epsilon = 1e-9);
        assert_relative_eq!(filter.response(850e6).norm(), expected, epsilon = 1e-9);
    }

    #[test]
    fn blocks_dc_and_far_out_of_band() {
        let filter = ButterworthBandpass::new(150e6, 850e6, 2).unwrap();
        assert_eq!(filter.response(0.0).norm(), 0.0);
        assert!(filter.response(10e6).norm() < 1e-2);
        assert!(filter.response(10e9).norm() < 1e-2);
    }

    #[test]
    fn rejects_inverted_band() {
        assert!(ButterworthBandpass::new(850e6, 150e6, 2).is_err());
    }
}
