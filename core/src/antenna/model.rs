use std::sync::Arc;

use log::debug;
use nalgebra::Vector3;
use ndarray::Array1;
use num_complex::Complex64;
use rand::rngs::StdRng;
use rand::SeedableRng;

use crate::antenna::config::AntennaConfig;
use crate::antenna::noise::ThermalNoise;
use crate::antenna::passband::ButterworthBandpass;
use crate::environment::IceModel;
use crate::math::geometry::{normalize, LocalFrame};
use crate::math::interp::interp;
use crate::prelude::{AntennaError, AntennaResult, Receiver, ValueType, Waveform};
use crate::response::ResponseTable;

/// Dipole-like antenna with an empirical directional response.
///
/// Everything but the received-signal history is fixed at construction.
pub struct AntennaModel {
    frame: LocalFrame,
    effective_height: f64,
    resistance: f64,
    temperature: f64,
    efficiency: f64,
    noisy: bool,
    passband: ButterworthBandpass,
    noise: ThermalNoise,
    rng: StdRng,
    response: Option<Arc<ResponseTable>>,
    signals: Vec<Waveform>,
}

impl AntennaModel {
    pub fn new(
        config: AntennaConfig,
        ice: &dyn IceModel,
        response: Option<Arc<ResponseTable>>,
    ) -> AntennaResult<Self> {
        if !(config.resistance > 0.0) {
            return Err(AntennaError::InvalidInput(format!(
                "resistance must be positive, got {}",
                config.resistance
            )));
        }
        let effective_height = config.resolved_effective_height();
        if !(effective_height > 0.0) {
            return Err(AntennaError::InvalidInput(format!(
                "effective height must be positive, got {}",
                effective_height
            )));
        }

        let frame = LocalFrame::new(config.position, &config.orientation)?;
        let (f_low, f_high) = (config.f_low(), config.f_high());
        let passband = ButterworthBandpass::new(f_low, f_high, config.filter_order)?;
        let temperature = ice.temperature(config.position.z);
        let noise = ThermalNoise::new(temperature, config.resistance, f_low, f_high);
        let rng = match config.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };

        debug!(
            "antenna at {:?}: height {:.3} m, {:.1} K, noise rms {:.3e} V",
            config.position, effective_height, temperature, noise.rms()
        );

        Ok(Self {
            frame,
            effective_height,
            resistance: config.resistance,
            temperature,
            efficiency: config.efficiency,
            noisy: config.noisy,
            passband,
            noise,
            rng,
            response,
            signals: Vec::new(),
        })
    }

    pub fn position(&self) -> &Vector3<f64> {
        self.frame.origin()
    }

    pub fn frame(&self) -> &LocalFrame {
        &self.frame
    }

    pub fn effective_height(&self) -> f64 {
        self.effective_height
    }

    /// Field-to-voltage conversion factor, `1 / effective_height`.
    pub fn antenna_factor(&self) -> f64 {
        1.0 / self.effective_height
    }

    pub fn resistance(&self) -> f64 {
        self.resistance
    }

    /// Ambient temperature in Kelvin.
    pub fn temperature(&self) -> f64 {
        self.temperature
    }

    pub fn efficiency(&self) -> f64 {
        self.efficiency
    }

    pub fn is_noisy(&self) -> bool {
        self.noisy
    }

    pub fn freq_range(&self) -> (f64, f64) {
        (self.passband.f_low(), self.passband.f_high())
    }

    pub fn response_table(&self) -> Option<&Arc<ResponseTable>> {
        self.response.as_ref()
    }

    /// Transfer function of the antenna passband.
    pub fn response(&self, frequency: f64) -> Complex64 {
        self.passband.response(frequency)
    }

    /// Tabulated gain against frequency toward `(theta, phi)` in radians.
    pub fn directional_gains(&self, theta: f64, phi: f64) -> (Vec<f64>, Vec<f64>) {
        match &self.response {
            Some(table) => table.interpolated_gain(theta, phi),
            None => ResponseTable::flat().interpolated_gain(theta, phi),
        }
    }

    /// Thermal noise voltage on the given time points.
    pub fn make_noise(&mut self, times: &Array1<f64>) -> AntennaResult<Waveform> {
        self.noise.generate(times, &mut self.rng)
    }

    pub fn clear_signals(&mut self) {
        self.signals.clear();
    }
}

impl Receiver for AntennaModel {
    /// Filters `signal` through the passband and the directional response
    /// toward `origin`, projects it on the dipole axis, and stores the result.
    fn receive(
        &mut self,
        signal: &Waveform,
        origin: Option<Vector3<f64>>,
        polarization: Option<Vector3<f64>>,
    ) -> AntennaResult<()> {
        let conversion = match signal.value_type() {
            ValueType::Voltage => 1.0,
            ValueType::Field => 1.0 / self.antenna_factor(),
            other => {
                return Err(AntennaError::ValueType {
                    expected: "voltage or field",
                    found: other,
                })
            }
        };
        let p_gain = match polarization {
            Some(p) => self.polarization_gain(&normalize(&p)?),
            None => 1.0,
        };

        let passband = self.passband;
        let mut received = signal
            .as_value_type(ValueType::Voltage)
            .filter_frequencies(|f| passband.response(f));

        if let Some(origin) = origin {
            let (_, theta, phi) = self.frame.to_local_spherical(&origin);
            let (freqs, gains) = self.directional_gains(theta, phi);
            received =
                received.filter_frequencies(|f| Complex64::new(interp(f, &freqs, &gains), 0.0));
        }

        let factor = p_gain * self.efficiency * conversion;
        debug!(
            "received {} waveform ({} samples), scale {:.4}",
            signal.value_type(),
            signal.len(),
            factor
        );
        self.signals.push(received.scaled(factor));
        Ok(())
    }

    /// Projection of the (normalized) polarization onto the dipole axis.
    fn polarization_gain(&self, polarization: &Vector3<f64>) -> f64 {
        self.frame.z_axis().dot(polarization)
    }

    fn signals(&self) -> &[Waveform] {
        &self.signals
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::environment::ConstantTemperature;
    use crate::response::{GridPoint, ResponseData};
    use approx::assert_relative_eq;

    fn quiet_config() -> AntennaConfig {
        AntennaConfig {
            position: Vector3::new(0.0, 0.0, -200.0),
            noisy: false,
            seed: Some(11),
            ..Default::default()
        }
    }

    fn impulse(value_type: ValueType) -> Waveform {
        let mut values = vec![0.0; 256];
        values[64] = 1.0;
        Waveform::from_values(1e-10, values, value_type).unwrap()
    }

    fn uniform_table(gain: f64) -> ResponseTable {
        let mut data = ResponseData::new();
        for frequency in [1e8, 1e9] {
            data.add_frequency(frequency);
            for theta in (0..180).step_by(5) {
                for phi in (0..360).step_by(5) {
                    data.insert(frequency, theta, phi, GridPoint { gain, phase: 0.0 });
                }
            }
        }
        ResponseTable::from_data(&data).unwrap()
    }

    #[test]
    fn receive_appends_one_waveform() {
        let mut antenna =
            AntennaModel::new(quiet_config(), &ConstantTemperature(240.0), None).unwrap();
        let before = antenna.signals().len();
        antenna
            .receive(&impulse(ValueType::Voltage), None, None)
            .unwrap();
        assert_eq!(antenna.signals().len(), before + 1);
        assert_eq!(antenna.signals()[0].value_type(), ValueType::Voltage);
    }

    #[test]
    fn power_input_is_rejected_without_side_effects() {
        let mut antenna =
            AntennaModel::new(quiet_config(), &ConstantTemperature(240.0), None).unwrap();
        let result = antenna.receive(&impulse(ValueType::Power), None, None);
        assert!(matches!(
            result,
            Err(AntennaError::ValueType {
                found: ValueType::Power,
                ..
            })
        ));
        assert!(antenna.signals().is_empty());
    }

    #[test]
    fn field_input_is_scaled_by_effective_height() {
        let mut antenna =
            AntennaModel::new(quiet_config(), &ConstantTemperature(240.0), None).unwrap();
        antenna
            .receive(&impulse(ValueType::Voltage), None, None)
            .unwrap();
        antenna
            .receive(&impulse(ValueType::Field), None, None)
            .unwrap();
        let voltage = &antenna.signals()[0];
        let field = &antenna.signals()[1];
        for (v, f) in voltage.values().iter().zip(field.values().iter()) {
            assert_relative_eq!(*f, v * 0.3, epsilon = 1e-12);
        }
        assert_eq!(field.value_type(), ValueType::Voltage);
    }

    #[test]
    fn polarization_projects_onto_axis() {
        let antenna =
            AntennaModel::new(quiet_config(), &ConstantTemperature(240.0), None).unwrap();
        assert_relative_eq!(antenna.polarization_gain(&Vector3::z()), 1.0);
        assert_relative_eq!(antenna.polarization_gain(&Vector3::x()), 0.0);
        let tilted = normalize(&Vector3::new(1.0, 0.0, 1.0)).unwrap();
        assert_relative_eq!(
            antenna.polarization_gain(&tilted),
            std::f64::consts::FRAC_1_SQRT_2,
            epsilon = 1e-12
        );
    }

    #[test]
    fn horizontal_polarization_is_suppressed() {
        let mut antenna =
            AntennaModel::new(quiet_config(), &ConstantTemperature(240.0), None).unwrap();
        antenna
            .receive(
                &impulse(ValueType::Field),
                None,
                Some(Vector3::new(3.0, 0.0, 0.0)),
            )
            .unwrap();
        assert!(antenna.signals()[0].values().iter().all(|v| v.abs() < 1e-15));
    }

    #[test]
    fn zero_polarization_is_invalid() {
        let mut antenna =
            AntennaModel::new(quiet_config(), &ConstantTemperature(240.0), None).unwrap();
        let result = antenna.receive(&impulse(ValueType::Field), None, Some(Vector3::zeros()));
        assert!(matches!(result, Err(AntennaError::InvalidInput(_))));
        assert!(antenna.signals().is_empty());
    }

    #[test]
    fn directional_gain_scales_the_waveform() {
        let mut flat =
            AntennaModel::new(quiet_config(), &ConstantTemperature(240.0), None).unwrap();
        let mut halved = AntennaModel::new(
            quiet_config(),
            &ConstantTemperature(240.0),
            Some(Arc::new(uniform_table(0.5))),
        )
        .unwrap();
        let origin = Some(Vector3::new(100.0, 50.0, -150.0));
        flat.receive(&impulse(ValueType::Voltage), origin, None)
            .unwrap();
        halved
            .receive(&impulse(ValueType::Voltage), origin, None)
            .unwrap();
        for (a, b) in flat.signals()[0]
            .values()
            .iter()
            .zip(halved.signals()[0].values().iter())
        {
            assert_relative_eq!(*b, a * 0.5, epsilon = 1e-12);
        }
    }

    fn angular_table() -> ResponseTable {
        let mut data = ResponseData::new();
        for frequency in [1e8, 1e9] {
            data.add_frequency(frequency);
            for theta in (0..180).step_by(5) {
                for phi in (0..360).step_by(5) {
                    // azimuthal term vanishes on the axis, where phi is undefined
                    let (t, p) = (theta as f64, phi as f64);
                    let gain = 1.0 + t / 180.0 + t * p / (180.0 * 720.0);
                    data.insert(frequency, theta, phi, GridPoint { gain, phase: 0.0 });
                }
            }
        }
        ResponseTable::from_data(&data).unwrap()
    }

    fn peak_ratio(origin: Vector3<f64>, orientation: Vector3<f64>) -> f64 {
        let config = AntennaConfig {
            orientation,
            ..quiet_config()
        };
        let mut flat =
            AntennaModel::new(config.clone(), &ConstantTemperature(240.0), None).unwrap();
        let mut shaped = AntennaModel::new(
            config,
            &ConstantTemperature(240.0),
            Some(Arc::new(angular_table())),
        )
        .unwrap();
        flat.receive(&impulse(ValueType::Voltage), Some(origin), None)
            .unwrap();
        shaped
            .receive(&impulse(ValueType::Voltage), Some(origin), None)
            .unwrap();
        shaped.signals()[0].max() / flat.signals()[0].max()
    }

    #[test]
    fn gain_follows_direction_in_the_local_frame() {
        let antenna =
            AntennaModel::new(quiet_config(), &ConstantTemperature(240.0), None).unwrap();
        let position = *antenna.position();
        let frame = antenna.frame();
        let up = position + frame.z_axis() * 100.0;
        let along_x = position + frame.x_axis() * 100.0;
        let along_y = position + frame.y_axis() * 100.0;
        let below = position - frame.z_axis() * 100.0;
        let z = Vector3::z();

        // theta = 0
        assert_relative_eq!(peak_ratio(up, z), 1.0, epsilon = 1e-6);
        // theta = 90, phi = 0
        assert_relative_eq!(peak_ratio(along_x, z), 1.5, epsilon = 1e-6);
        // theta = 90, phi = 90
        assert_relative_eq!(peak_ratio(along_y, z), 1.5625, epsilon = 1e-6);
        // theta = 180 wraps back onto the theta = 0 row
        assert_relative_eq!(peak_ratio(below, z), 1.0, epsilon = 1e-6);
    }

    #[test]
    fn gain_uses_the_antenna_axis_not_world_vertical() {
        let position = quiet_config().position;
        let tilted = Vector3::x();
        assert_relative_eq!(
            peak_ratio(position + Vector3::new(100.0, 0.0, 0.0), tilted),
            1.0,
            epsilon = 1e-6
        );
        let overhead = peak_ratio(position + Vector3::new(0.0, 0.0, 100.0), tilted);
        assert!(overhead >= 1.5 - 1e-6);
    }

    #[test]
    fn temperature_comes_from_ice_model() {
        let antenna =
            AntennaModel::new(quiet_config(), &ConstantTemperature(233.0), None).unwrap();
        assert_eq!(antenna.temperature(), 233.0);
        assert_relative_eq!(antenna.antenna_factor(), 1.0 / 0.3);
    }

    #[test]
    fn degenerate_orientation_is_rejected() {
        let config = AntennaConfig {
            orientation: Vector3::zeros(),
            ..quiet_config()
        };
        assert!(AntennaModel::new(config, &ConstantTemperature(240.0), None).is_err());
    }
}
