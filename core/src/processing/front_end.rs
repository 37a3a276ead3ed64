use serde::{Deserialize, Serialize};

use crate::prelude::{AntennaError, AntennaResult, ProcessingStage, Waveform};

/// Amplifier with symmetric hard clipping.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AnalogFrontEnd {
    amplification: f64,
    clip: f64,
}

impl Default for AnalogFrontEnd {
    fn default() -> Self {
        Self {
            amplification: 1.0,
            clip: 3.0,
        }
    }
}

impl AnalogFrontEnd {
    pub fn new(amplification: f64, clip: f64) -> AntennaResult<Self> {
        if !amplification.is_finite() {
            return Err(AntennaError::InvalidInput(format!(
                "amplification must be finite, got {}",
                amplification
            )));
        }
        if !(clip >= 0.0) {
            return Err(AntennaError::InvalidInput(format!(
                "clipping level must be non-negative, got {}",
                clip
            )));
        }
        Ok(Self {
            amplification,
            clip,
        })
    }

    pub fn amplification(&self) -> f64 {
        self.amplification
    }

    pub fn clip(&self) -> f64 {
        self.clip
    }

    pub fn front_end(&self, signal: &Waveform) -> AntennaResult<Waveform> {
        if let Some(bad) = signal.values().iter().find(|v| !v.is_finite()) {
            return Err(AntennaError::InvalidInput(format!(
                "non-finite sample {} entering front end",
                bad
            )));
        }
        let (gain, clip) = (self.amplification, self.clip);
        let values = signal.values().mapv(|v| (v * gain).clamp(-clip, clip));
        Ok(signal.with_values(values, signal.value_type()))
    }
}

impl ProcessingStage for AnalogFrontEnd {
    fn name(&self) -> &'static str {
        "front_end"
    }

    fn execute(&self, input: &Waveform) -> AntennaResult<Waveform> {
        self.front_end(input)
    }
}
