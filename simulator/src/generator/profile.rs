use anyhow::{bail, Context};
use aracore::prelude::{ValueType, Waveform};
use aracore::SPEED_OF_LIGHT;
use nalgebra::Vector3;
use serde::{Deserialize, Serialize};

/// Upper bound on the samples of one synthesized pulse.
const MAX_SAMPLES: usize = 10_000_000;

/// Incident radio pulse shared by every antenna of the station.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct EventConfig {
    /// Emission point (m).
    pub source: [f64; 3],
    /// Electric field direction; projected on each antenna axis.
    pub polarization: [f64; 3],
    /// Peak field strength (V/m).
    pub amplitude: f64,
    pub width_ns: f64,
    pub duration_ns: f64,
    pub dt_ns: f64,
    /// Arrival time of the pulse at the nearest antenna.
    pub offset_ns: f64,
    /// Refractive index of the ice used for relative arrival times.
    pub refractive_index: f64,
}

impl Default for EventConfig {
    fn default() -> Self {
        Self {
            source: [400.0, 250.0, -900.0],
            polarization: [0.2, 0.1, 0.97],
            amplitude: 1e-3,
            width_ns: 1.0,
            duration_ns: 400.0,
            dt_ns: 0.1,
            offset_ns: 100.0,
            refractive_index: 1.78,
        }
    }
}

impl EventConfig {
    pub fn source(&self) -> Vector3<f64> {
        Vector3::from(self.source)
    }

    pub fn polarization(&self) -> Vector3<f64> {
        Vector3::from(self.polarization)
    }

    /// Propagation time from the source to `position` (s).
    pub fn travel_time(&self, position: &Vector3<f64>) -> f64 {
        (position - self.source()).norm() * self.refractive_index / SPEED_OF_LIGHT
    }

    /// Rejects timing and medium parameters that cannot describe a sampled pulse.
    pub fn validate(&self) -> anyhow::Result<()> {
        let positive = [
            ("dt_ns", self.dt_ns),
            ("width_ns", self.width_ns),
            ("duration_ns", self.duration_ns),
            ("refractive_index", self.refractive_index),
        ];
        for (field, value) in positive {
            if !(value.is_finite() && value > 0.0) {
                bail!("event {} must be positive and finite, got {}", field, value);
            }
        }
        if !self.offset_ns.is_finite() || !self.amplitude.is_finite() {
            bail!("event offset and amplitude must be finite");
        }
        if self.duration_ns / self.dt_ns > MAX_SAMPLES as f64 {
            bail!(
                "event of {} ns at {} ns spacing exceeds {} samples",
                self.duration_ns,
                self.dt_ns,
                MAX_SAMPLES
            );
        }
        Ok(())
    }

    fn sample_count(&self) -> usize {
        (self.duration_ns / self.dt_ns).round().max(2.0) as usize
    }
}

/// Bipolar Gaussian-derivative field pulse peaking at `amplitude`, centered `delay` seconds in.
pub fn build_field_pulse(event: &EventConfig, delay: f64) -> anyhow::Result<Waveform> {
    event.validate()?;
    let dt = event.dt_ns * 1e-9;
    let sigma = event.width_ns * 1e-9;
    let center = event.offset_ns * 1e-9 + delay;
    // normalizes the derivative shape so its extremum equals the amplitude
    let peak_scale = 0.5_f64.exp();

    let values = (0..event.sample_count())
        .map(|i| {
            let x = (i as f64 * dt - center) / sigma;
            -event.amplitude * peak_scale * x * (-0.5 * x * x).exp()
        })
        .collect();

    Waveform::from_values(dt, values, ValueType::Field).context("building incident field pulse")
}

/// One pulse per antenna, delayed by the extra travel time relative to the nearest antenna.
pub fn build_station_pulses(
    event: &EventConfig,
    positions: &[Vector3<f64>],
) -> anyhow::Result<Vec<Waveform>> {
    event.validate()?;
    let times: Vec<f64> = positions.iter().map(|p| event.travel_time(p)).collect();
    let first = times.iter().copied().fold(f64::INFINITY, f64::min);
    times
        .iter()
        .map(|t| build_field_pulse(event, t - first))
        .collect()
}
