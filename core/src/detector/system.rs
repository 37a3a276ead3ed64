use std::sync::Arc;

use nalgebra::Vector3;
use ndarray::Array1;
use serde::{Deserialize, Serialize};

use crate::antenna::{AntennaConfig, AntennaModel};
use crate::detector::preset::{Polarization, ResponseTables};
use crate::detector::report::TriggerReport;
use crate::environment::IceModel;
use crate::prelude::{AntennaResult, Detector, ProcessingStage, Receiver, Waveform};
use crate::processing::{AnalogFrontEnd, NoiseCalibration, TriggerDecision, TunnelDiodeEnvelope};
use crate::response::ResponseTable;
use crate::telemetry::{LogManager, MetricsRecorder, MetricsSnapshot};

/// Duration of the noise waveform used for trigger calibration (s).
pub const CALIBRATION_DURATION: f64 = 1e-6;
/// Number of time points of the calibration waveform.
pub const CALIBRATION_POINTS: usize = 10001;

/// Amplifier settings plus the antenna parameters of a system.
///
/// `antenna.position` is overwritten by the position given to the system.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SystemOptions {
    pub amplification: f64,
    pub amplifier_clipping: f64,
    pub antenna: AntennaConfig,
}

impl Default for SystemOptions {
    fn default() -> Self {
        Self {
            amplification: 1.0,
            amplifier_clipping: 3.0,
            antenna: AntennaConfig::default(),
        }
    }
}

/// One ARA channel: antenna, amplifier, tunnel diode and calibrated trigger.
pub struct AntennaSystem {
    name: String,
    antenna: AntennaModel,
    front_end: AnalogFrontEnd,
    diode: TunnelDiodeEnvelope,
    decision: TriggerDecision,
    logger: LogManager,
    metrics: MetricsRecorder,
    /// Decisions of the latest evaluation, dropped whenever the stored signals change.
    last_hits: Option<Vec<bool>>,
}

impl AntennaSystem {
    /// Builds the antenna and calibrates the trigger band against its own noise.
    pub fn new(
        name: impl Into<String>,
        position: Vector3<f64>,
        threshold: f64,
        options: SystemOptions,
        ice: &dyn IceModel,
        response: Option<Arc<ResponseTable>>,
    ) -> AntennaResult<Self> {
        let name = name.into();
        let mut antenna_config = options.antenna;
        antenna_config.position = position;

        let antenna = AntennaModel::new(antenna_config, ice, response)?;
        let front_end = AnalogFrontEnd::new(options.amplification, options.amplifier_clipping)?;
        let diode = TunnelDiodeEnvelope::new(antenna.resistance())?;

        let mut system = Self {
            logger: LogManager::new(name.clone()),
            name,
            antenna,
            front_end,
            diode,
            decision: TriggerDecision::new(threshold),
            metrics: MetricsRecorder::new(),
            last_hits: None,
        };
        system.calibrate()?;
        Ok(system)
    }

    /// Vertically polarized (bicone) channel.
    pub fn vpol(
        name: impl Into<String>,
        position: Vector3<f64>,
        threshold: f64,
        options: SystemOptions,
        ice: &dyn IceModel,
        tables: &ResponseTables,
    ) -> AntennaResult<Self> {
        Self::with_polarization(Polarization::Vpol, name, position, threshold, options, ice, tables)
    }

    /// Horizontally polarized (quad-slot) channel.
    pub fn hpol(
        name: impl Into<String>,
        position: Vector3<f64>,
        threshold: f64,
        options: SystemOptions,
        ice: &dyn IceModel,
        tables: &ResponseTables,
    ) -> AntennaResult<Self> {
        Self::with_polarization(Polarization::Hpol, name, position, threshold, options, ice, tables)
    }

    /// Preset channel: the flavour's table and a vertical orientation.
    pub fn with_polarization(
        polarization: Polarization,
        name: impl Into<String>,
        position: Vector3<f64>,
        threshold: f64,
        mut options: SystemOptions,
        ice: &dyn IceModel,
        tables: &ResponseTables,
    ) -> AntennaResult<Self> {
        options.antenna.orientation = Vector3::new(0.0, 0.0, 1.0);
        Self::new(
            name,
            position,
            threshold,
            options,
            ice,
            Some(tables.table(polarization)),
        )
    }

    fn calibrate(&mut self) -> AntennaResult<NoiseCalibration> {
        let times = Array1::linspace(0.0, CALIBRATION_DURATION, CALIBRATION_POINTS);
        let noise = self.antenna.make_noise(&times)?;
        let response = self.diode.tunnel_diode(&noise)?;
        let calibration = self.decision.calibrate(&response)?;
        self.logger.record(&format!(
            "trigger calibrated: mean {:.4e}, rms {:.4e}, threshold {}",
            calibration.mean,
            calibration.rms,
            self.decision.threshold()
        ));
        Ok(calibration)
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn antenna(&self) -> &AntennaModel {
        &self.antenna
    }

    pub fn calibration(&self) -> Option<NoiseCalibration> {
        self.decision.calibration()
    }

    pub fn threshold(&self) -> f64 {
        self.decision.threshold()
    }

    pub fn metrics(&self) -> MetricsSnapshot {
        self.metrics.snapshot()
    }

    /// Passes an incident signal to the antenna.
    pub fn receive(
        &mut self,
        signal: &Waveform,
        origin: Option<Vector3<f64>>,
        polarization: Option<Vector3<f64>>,
    ) -> AntennaResult<()> {
        self.antenna.receive(signal, origin, polarization)?;
        self.last_hits = None;
        self.metrics.record_received();
        Ok(())
    }

    pub fn signals(&self) -> &[Waveform] {
        self.antenna.signals()
    }

    pub fn clear_signals(&mut self) {
        self.antenna.clear_signals();
        self.last_hits = None;
    }

    pub fn tunnel_diode(&self, signal: &Waveform) -> AntennaResult<Waveform> {
        self.diode.tunnel_diode(signal)
    }

    /// Stored waveform plus a fresh noise realization when the antenna is noisy.
    fn full_waveform(&mut self, index: usize) -> AntennaResult<Waveform> {
        let signal = self.antenna.signals()[index].clone();
        if !self.antenna.is_noisy() {
            return Ok(signal);
        }
        let noise = self.antenna.make_noise(signal.times())?;
        signal.add(&noise)
    }

    /// Trigger decision for every stored waveform, drawn with fresh noise.
    pub fn triggered_signals(&mut self) -> AntennaResult<Vec<bool>> {
        let mut hits = Vec::with_capacity(self.antenna.signals().len());
        for index in 0..self.antenna.signals().len() {
            let waveform = self.full_waveform(index)?;
            hits.push(self.trigger(&waveform)?);
        }
        self.last_hits = Some(hits.clone());
        Ok(hits)
    }

    /// Decisions of the latest evaluation, evaluating only if none is current.
    fn latest_hits(&mut self) -> AntennaResult<Vec<bool>> {
        match &self.last_hits {
            Some(hits) => Ok(hits.clone()),
            None => self.triggered_signals(),
        }
    }

    /// Whether any stored waveform fired in the latest evaluation.
    pub fn is_hit(&mut self) -> AntennaResult<bool> {
        Ok(self.latest_hits()?.into_iter().any(|hit| hit))
    }

    /// Summary of the latest evaluation of the stored waveforms.
    pub fn report(&mut self) -> AntennaResult<TriggerReport> {
        let hits = self.latest_hits()?;
        let position = self.antenna.position();
        Ok(TriggerReport {
            name: self.name.clone(),
            position: [position.x, position.y, position.z],
            waveforms: hits.len(),
            triggered: hits.iter().any(|hit| *hit),
            hits,
            calibration: self.calibration(),
            metrics: self.metrics.snapshot(),
        })
    }
}

impl Detector for AntennaSystem {
    fn front_end(&self, signal: &Waveform) -> AntennaResult<Waveform> {
        self.front_end.front_end(signal)
    }

    /// Runs the amplifier and tunnel diode, then checks the calibrated band.
    fn trigger(&self, signal: &Waveform) -> AntennaResult<bool> {
        let stages: [&dyn ProcessingStage; 2] = [&self.front_end, &self.diode];
        let mut shaped = signal.clone();
        for stage in stages {
            shaped = stage.execute(&shaped)?;
            self.logger
                .detail(&format!("{} -> peak {:.4e}", stage.name(), shaped.max()));
        }
        let fired = self.decision.decide(&shaped)?;
        self.metrics.record_evaluation(fired);
        Ok(fired)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::environment::ConstantTemperature;
    use crate::prelude::{AntennaError, ValueType};
    use crate::response::{GridPoint, ResponseData};

    fn options(seed: u64, noisy: bool) -> SystemOptions {
        SystemOptions {
            antenna: AntennaConfig {
                seed: Some(seed),
                noisy,
                ..Default::default()
            },
            ..Default::default()
        }
    }

    fn quiet_system(threshold: f64) -> AntennaSystem {
        AntennaSystem::new(
            "test",
            Vector3::new(0.0, 0.0, -200.0),
            threshold,
            options(5, false),
            &ConstantTemperature(240.0),
            None,
        )
        .unwrap()
    }

    fn zeros(len: usize) -> Waveform {
        Waveform::from_values(1e-10, vec![0.0; len], ValueType::Voltage).unwrap()
    }

    fn pulse(amplitude: f64) -> Waveform {
        let values = (0..2000)
            .map(|i| {
                let t = i as f64 * 1e-10 - 50e-9;
                amplitude * (-(t * t) / (2.0 * (1e-9_f64).powi(2))).exp()
            })
            .collect();
        Waveform::from_values(1e-10, values, ValueType::Voltage).unwrap()
    }

    #[test]
    fn calibration_runs_during_setup() {
        let system = quiet_system(5.0);
        let calibration = system.calibration().unwrap();
        assert!(calibration.rms > 0.0);
        // leading negative lobes pull the noise response below zero
        assert!(calibration.mean < 0.0);
    }

    #[test]
    fn silence_does_not_trigger() {
        let system = quiet_system(5.0);
        assert!(!system.trigger(&zeros(2000)).unwrap());
    }

    #[test]
    fn strong_pulse_triggers() {
        let system = quiet_system(5.0);
        assert!(system.trigger(&pulse(1e-3)).unwrap());
        assert_eq!(system.metrics().fired, 1);
    }

    #[test]
    fn front_end_clips_before_the_diode() {
        let system = quiet_system(5.0);
        let clipped = system.front_end(&pulse(10.0)).unwrap();
        assert_eq!(clipped.max(), 3.0);
    }

    #[test]
    fn triggering_power_waveform_is_refused() {
        let system = quiet_system(5.0);
        let input = Waveform::from_values(1e-10, vec![0.0; 10], ValueType::Power).unwrap();
        assert!(matches!(
            system.trigger(&input),
            Err(AntennaError::ValueType { .. })
        ));
    }

    #[test]
    fn stored_waveforms_are_evaluated_in_order() {
        let mut system = quiet_system(5.0);
        system.receive(&zeros(2000), None, None).unwrap();
        system.receive(&pulse(1e-3), None, None).unwrap();
        assert_eq!(system.triggered_signals().unwrap(), vec![false, true]);
        assert!(system.is_hit().unwrap());

        let report = system.report().unwrap();
        assert_eq!(report.waveforms, 2);
        assert!(report.triggered);
        assert_eq!(report.metrics.received, 2);
        assert!(report.to_json_line().unwrap().contains("\"name\":\"test\""));
    }

    #[test]
    fn report_describes_the_latest_noise_draw() {
        let mut system = AntennaSystem::new(
            "noisy",
            Vector3::new(10.0, 0.0, -180.0),
            1.0,
            options(7, true),
            &ConstantTemperature(240.0),
            None,
        )
        .unwrap();
        for _ in 0..20 {
            system.receive(&zeros(500), None, None).unwrap();
        }
        let hits = system.triggered_signals().unwrap();
        let any = system.is_hit().unwrap();
        let report = system.report().unwrap();

        assert_eq!(report.hits, hits);
        assert_eq!(report.triggered, any);
        assert_eq!(report.waveforms, 20);
        assert_eq!(report.metrics.evaluated, 20);

        system.receive(&zeros(500), None, None).unwrap();
        let refreshed = system.report().unwrap();
        assert_eq!(refreshed.waveforms, 21);
        assert_eq!(refreshed.metrics.evaluated, 41);
    }

    #[test]
    fn noisy_system_is_reproducible_for_a_seed() {
        let build = || {
            AntennaSystem::new(
                "noisy",
                Vector3::new(10.0, 0.0, -180.0),
                3.0,
                options(42, true),
                &ConstantTemperature(240.0),
                None,
            )
            .unwrap()
        };
        let mut a = build();
        let mut b = build();
        assert_eq!(a.calibration(), b.calibration());
        a.receive(&zeros(500), None, None).unwrap();
        b.receive(&zeros(500), None, None).unwrap();
        assert_eq!(a.triggered_signals().unwrap(), b.triggered_signals().unwrap());
    }

    #[test]
    fn presets_point_up_and_use_their_table() {
        let mut data = ResponseData::new();
        data.add_frequency(2e8);
        for theta in (0..180).step_by(5) {
            for phi in (0..360).step_by(5) {
                data.insert(2e8, theta, phi, GridPoint { gain: 0.7, phase: 0.0 });
            }
        }
        let tables = ResponseTables::new(
            ResponseTable::from_data(&data).unwrap(),
            ResponseTable::flat(),
        );
        let mut tilted = options(1, false);
        tilted.antenna.orientation = Vector3::new(1.0, 0.0, 0.0);

        let vpol = AntennaSystem::vpol(
            "V1",
            Vector3::new(0.0, 0.0, -190.0),
            5.0,
            tilted.clone(),
            &ConstantTemperature(240.0),
            &tables,
        )
        .unwrap();
        let hpol = AntennaSystem::hpol(
            "H1",
            Vector3::new(0.0, 0.0, -170.0),
            5.0,
            tilted,
            &ConstantTemperature(240.0),
            &tables,
        )
        .unwrap();

        assert_eq!(vpol.antenna().frame().z_axis(), &Vector3::new(0.0, 0.0, 1.0));
        assert_eq!(vpol.antenna().response_table().unwrap().frequencies(), &[2e8]);
        assert!(hpol.antenna().response_table().unwrap().is_empty());
        assert_eq!(hpol.name(), "H1");
    }
}
