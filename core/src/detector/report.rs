use serde::{Deserialize, Serialize};

use crate::prelude::AntennaResult;
use crate::processing::NoiseCalibration;
use crate::telemetry::MetricsSnapshot;

/// Serializable summary of one antenna system after an event.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TriggerReport {
    pub name: String,
    pub position: [f64; 3],
    pub waveforms: usize,
    pub hits: Vec<bool>,
    pub triggered: bool,
    pub calibration: Option<NoiseCalibration>,
    pub metrics: MetricsSnapshot,
}

impl TriggerReport {
    pub fn to_json_line(&self) -> AntennaResult<String> {
        Ok(serde_json::to_string(self)?)
    }
}
