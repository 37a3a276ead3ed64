use anyhow::Context;
use aracore::detector::{Polarization, SystemOptions};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

use crate::generator::profile::EventConfig;

/// One channel of the simulated station.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct AntennaEntry {
    pub name: String,
    pub polarization: Polarization,
    pub position: [f64; 3],
}

#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(default)]
pub struct RunConfig {
    /// Vpol response table; a flat response when absent.
    pub vpol_response: Option<PathBuf>,
    pub hpol_response: Option<PathBuf>,
    pub threshold: f64,
    pub seed: Option<u64>,
    pub system: SystemOptions,
    pub antennas: Vec<AntennaEntry>,
    pub event: EventConfig,
}

impl Default for RunConfig {
    fn default() -> Self {
        Self {
            vpol_response: None,
            hpol_response: None,
            threshold: 6.0,
            seed: None,
            system: SystemOptions::default(),
            antennas: default_station(),
            event: EventConfig::default(),
        }
    }
}

/// Two strings of one Vpol and one Hpol each, roughly ARA spacing.
fn default_station() -> Vec<AntennaEntry> {
    let mut antennas = Vec::new();
    for (string, (x, y)) in [(10.0, 0.0), (-10.0, 0.0)].into_iter().enumerate() {
        antennas.push(AntennaEntry {
            name: format!("S{}V", string + 1),
            polarization: Polarization::Vpol,
            position: [x, y, -200.0],
        });
        antennas.push(AntennaEntry {
            name: format!("S{}H", string + 1),
            polarization: Polarization::Hpol,
            position: [x, y, -180.0],
        });
    }
    antennas
}

impl RunConfig {
    pub fn load<P: AsRef<Path>>(path: P) -> anyhow::Result<Self> {
        let path_ref = path.as_ref();
        let contents = fs::read_to_string(path_ref)
            .with_context(|| format!("reading run config {}", path_ref.display()))?;
        let config: RunConfig = serde_yaml::from_str(&contents)
            .with_context(|| format!("parsing run config {}", path_ref.display()))?;
        config
            .event
            .validate()
            .with_context(|| format!("invalid event in {}", path_ref.display()))?;
        Ok(config)
    }

    pub fn with_overrides(mut self, threshold: Option<f64>, seed: Option<u64>) -> Self {
        if let Some(threshold) = threshold {
            self.threshold = threshold;
        }
        if seed.is_some() {
            self.seed = seed;
        }
        self
    }
}
