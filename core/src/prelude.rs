use std::fmt;

use nalgebra::Vector3;
use ndarray::Array1;
use num_complex::Complex64;
use serde::{Deserialize, Serialize};

use crate::math::fft::filter_real;
use crate::math::stats::StatsHelper;

/// Physical quantity carried by a [`Waveform`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ValueType {
    Voltage,
    Field,
    Power,
}

impl ValueType {
    pub fn label(self) -> &'static str {
        match self {
            ValueType::Voltage => "voltage",
            ValueType::Field => "field",
            ValueType::Power => "power",
        }
    }
}

impl fmt::Display for ValueType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Uniformly sampled waveform tagged with its value type.
#[derive(Debug, Clone, PartialEq)]
pub struct Waveform {
    times: Array1<f64>,
    values: Array1<f64>,
    value_type: ValueType,
}

impl Waveform {
    /// Builds a waveform, requiring at least two samples on an increasing time axis.
    pub fn new(
        times: Array1<f64>,
        values: Array1<f64>,
        value_type: ValueType,
    ) -> AntennaResult<Self> {
        if times.len() != values.len() {
            return Err(AntennaError::InvalidInput(format!(
                "{} times but {} values",
                times.len(),
                values.len()
            )));
        }
        if times.len() < 2 {
            return Err(AntennaError::InvalidInput(
                "waveform needs at least two samples".into(),
            ));
        }
        if !(times[1] > times[0]) {
            return Err(AntennaError::InvalidInput(
                "time axis must be increasing".into(),
            ));
        }
        Ok(Self {
            times,
            values,
            value_type,
        })
    }

    /// Samples starting at `t = 0` with spacing `dt`.
    pub fn from_values(dt: f64, values: Vec<f64>, value_type: ValueType) -> AntennaResult<Self> {
        let times = Array1::from_iter((0..values.len()).map(|i| i as f64 * dt));
        Self::new(times, Array1::from(values), value_type)
    }

    pub fn zeros(times: Array1<f64>, value_type: ValueType) -> AntennaResult<Self> {
        let values = Array1::zeros(times.len());
        Self::new(times, values, value_type)
    }

    pub fn times(&self) -> &Array1<f64> {
        &self.times
    }

    pub fn values(&self) -> &Array1<f64> {
        &self.values
    }

    pub fn value_type(&self) -> ValueType {
        self.value_type
    }

    pub fn dt(&self) -> f64 {
        self.times[1] - self.times[0]
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn min(&self) -> f64 {
        self.values.iter().copied().fold(f64::INFINITY, f64::min)
    }

    pub fn max(&self) -> f64 {
        self.values.iter().copied().fold(f64::NEG_INFINITY, f64::max)
    }

    pub fn mean(&self) -> f64 {
        self.values.as_slice().map_or(0.0, StatsHelper::mean)
    }

    pub fn rms(&self) -> f64 {
        self.values.as_slice().map_or(0.0, StatsHelper::rms)
    }

    /// Copy of this waveform reinterpreted as another value type.
    pub fn as_value_type(&self, value_type: ValueType) -> Self {
        Self {
            times: self.times.clone(),
            values: self.values.clone(),
            value_type,
        }
    }

    /// Same time axis, new samples. Callers keep the lengths equal.
    pub(crate) fn with_values(&self, values: Array1<f64>, value_type: ValueType) -> Self {
        debug_assert_eq!(values.len(), self.times.len());
        Self {
            times: self.times.clone(),
            values,
            value_type,
        }
    }

    pub fn scaled(&self, factor: f64) -> Self {
        self.with_values(self.values.mapv(|v| v * factor), self.value_type)
    }

    /// Applies a frequency-domain transfer function given for non-negative frequencies (Hz).
    pub fn filter_frequencies<F>(&self, response: F) -> Self
    where
        F: Fn(f64) -> Complex64,
    {
        let filtered = filter_real(&self.values.to_vec(), self.dt(), response);
        self.with_values(Array1::from(filtered), self.value_type)
    }

    /// Sample-wise sum with another waveform on the same time axis.
    pub fn add(&self, other: &Waveform) -> AntennaResult<Self> {
        if self.len() != other.len() {
            return Err(AntennaError::InvalidInput(format!(
                "cannot add waveforms of {} and {} samples",
                self.len(),
                other.len()
            )));
        }
        if self.value_type != other.value_type {
            return Err(AntennaError::ValueType {
                expected: self.value_type.label(),
                found: other.value_type,
            });
        }
        Ok(self.with_values(&self.values + &other.values, self.value_type))
    }
}

/// Common error type for the antenna and trigger chain.
#[derive(thiserror::Error, Debug)]
pub enum AntennaError {
    #[error("cannot parse line {line}: '{text}'")]
    DataFormat { line: usize, text: String },
    #[error("response grid incomplete: no entry for {frequency} Hz at theta {theta}, phi {phi}")]
    IncompleteGrid { frequency: f64, theta: i32, phi: i32 },
    #[error("value type must be {expected}, given {found}")]
    ValueType {
        expected: &'static str,
        found: ValueType,
    },
    #[error("trigger evaluated before noise calibration")]
    MissingCalibration,
    #[error("invalid input: {0}")]
    InvalidInput(String),
    #[error("i/o failure: {0}")]
    Io(#[from] std::io::Error),
    #[error("serialization failure: {0}")]
    Serialization(#[from] serde_json::Error),
}

pub type AntennaResult<T> = Result<T, AntennaError>;

/// Single waveform-to-waveform step of the analog chain.
pub trait ProcessingStage {
    fn name(&self) -> &'static str;
    fn execute(&self, input: &Waveform) -> AntennaResult<Waveform>;
}

/// Capability of turning incident signals into stored antenna output.
pub trait Receiver {
    fn receive(
        &mut self,
        signal: &Waveform,
        origin: Option<Vector3<f64>>,
        polarization: Option<Vector3<f64>>,
    ) -> AntennaResult<()>;

    fn polarization_gain(&self, polarization: &Vector3<f64>) -> f64;

    fn signals(&self) -> &[Waveform];
}

/// Capability of shaping a received waveform and deciding whether it fires.
pub trait Detector {
    fn front_end(&self, signal: &Waveform) -> AntennaResult<Waveform>;
    fn trigger(&self, signal: &Waveform) -> AntennaResult<bool>;
}
