use nalgebra::Vector3;
use serde::{Deserialize, Serialize};

use crate::antenna::SPEED_OF_LIGHT;

/// Construction parameters of an [`AntennaModel`](crate::antenna::AntennaModel).
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AntennaConfig {
    /// Position in meters; `z` is elevation relative to the ice surface.
    pub position: Vector3<f64>,
    pub center_frequency: f64,
    pub bandwidth: f64,
    /// Ohms.
    pub resistance: f64,
    pub orientation: Vector3<f64>,
    /// Meters; a half-wave dipole at the center frequency when absent.
    pub effective_height: Option<f64>,
    pub efficiency: f64,
    /// Order of the analog Butterworth prototype shaping the passband.
    pub filter_order: usize,
    pub noisy: bool,
    /// Seed for the noise generator; drawn from entropy when absent.
    pub seed: Option<u64>,
}

impl Default for AntennaConfig {
    fn default() -> Self {
        Self {
            position: Vector3::zeros(),
            center_frequency: 500e6,
            bandwidth: 700e6,
            resistance: 100.0,
            orientation: Vector3::new(0.0, 0.0, 1.0),
            effective_height: None,
            efficiency: 1.0,
            filter_order: 2,
            noisy: true,
            seed: None,
        }
    }
}

impl AntennaConfig {
    pub fn f_low(&self) -> f64 {
        self.center_frequency - self.bandwidth / 2.0
    }

    pub fn f_high(&self) -> f64 {
        self.center_frequency + self.bandwidth / 2.0
    }

    pub fn resolved_effective_height(&self) -> f64 {
        self.effective_height
            .unwrap_or(SPEED_OF_LIGHT / self.center_frequency / 2.0)
    }
}
