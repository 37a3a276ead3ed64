use serde::{Deserialize, Serialize};

use crate::prelude::{AntennaError, AntennaResult, Waveform};

/// Mean and RMS of the diode response to pure noise.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct NoiseCalibration {
    pub mean: f64,
    pub rms: f64,
}

/// Threshold band decision on tunnel diode output.
#[derive(Debug, Clone, PartialEq)]
pub struct TriggerDecision {
    threshold: f64,
    calibration: Option<NoiseCalibration>,
}

impl TriggerDecision {
    /// `threshold` counts noise RMS deviations from the noise mean; its sign is ignored.
    pub fn new(threshold: f64) -> Self {
        Self {
            threshold,
            calibration: None,
        }
    }

    pub fn with_calibration(threshold: f64, calibration: NoiseCalibration) -> Self {
        Self {
            threshold,
            calibration: Some(calibration),
        }
    }

    pub fn threshold(&self) -> f64 {
        self.threshold
    }

    pub fn calibration(&self) -> Option<NoiseCalibration> {
        self.calibration
    }

    /// Records mean and RMS of the diode response to a noise-only waveform.
    pub fn calibrate(&mut self, noise_response: &Waveform) -> AntennaResult<NoiseCalibration> {
        let calibration = NoiseCalibration {
            mean: noise_response.mean(),
            rms: noise_response.rms(),
        };
        if !(calibration.mean.is_finite() && calibration.rms.is_finite()) {
            return Err(AntennaError::InvalidInput(
                "noise calibration produced non-finite statistics".into(),
            ));
        }
        self.calibration = Some(calibration);
        Ok(calibration)
    }

    /// `(low, high)` trigger levels.
    pub fn band(&self) -> AntennaResult<(f64, f64)> {
        let calibration = self.calibration.ok_or(AntennaError::MissingCalibration)?;
        let spread = calibration.rms * self.threshold.abs();
        Ok((calibration.mean - spread, calibration.mean + spread))
    }

    /// True when the diode output leaves the band on either side.
    pub fn decide(&self, diode_output: &Waveform) -> AntennaResult<bool> {
        let (low, high) = self.band()?;
        Ok(diode_output.min() < low || diode_output.max() > high)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::prelude::ValueType;

    fn unit_noise(threshold: f64) -> TriggerDecision {
        TriggerDecision::with_calibration(threshold, NoiseCalibration { mean: 0.0, rms: 1.0 })
    }

    fn power(values: Vec<f64>) -> Waveform {
        Waveform::from_values(1e-10, values, ValueType::Power).unwrap()
    }

    #[test]
    fn excursion_above_band_triggers() {
        let decision = unit_noise(5.0);
        assert!(decision.decide(&power(vec![0.0, 1.0, 6.2, 0.5])).unwrap());
    }

    #[test]
    fn excursion_below_band_triggers() {
        let decision = unit_noise(5.0);
        assert!(decision.decide(&power(vec![0.0, -5.5, 0.5])).unwrap());
    }

    #[test]
    fn values_inside_band_do_not_trigger() {
        let decision = unit_noise(5.0);
        assert!(!decision.decide(&power(vec![-4.99, 0.0, 4.99, 3.0])).unwrap());
    }

    #[test]
    fn negative_threshold_uses_magnitude() {
        let decision = unit_noise(-5.0);
        assert_eq!(decision.band().unwrap(), (-5.0, 5.0));
    }

    #[test]
    fn uncalibrated_decision_is_refused() {
        let decision = TriggerDecision::new(5.0);
        assert!(matches!(
            decision.decide(&power(vec![0.0, 100.0])),
            Err(AntennaError::MissingCalibration)
        ));
    }

    #[test]
    fn calibration_uses_rms_not_standard_deviation() {
        let mut decision = TriggerDecision::new(2.0);
        let calibration = decision.calibrate(&power(vec![3.0, 3.0, 3.0, 3.0])).unwrap();
        assert_eq!(calibration, NoiseCalibration { mean: 3.0, rms: 3.0 });
        assert_eq!(decision.band().unwrap(), (-3.0, 9.0));
    }
}
