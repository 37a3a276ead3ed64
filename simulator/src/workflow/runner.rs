use crate::generator::profile::build_station_pulses;
use crate::workflow::config::RunConfig;
use anyhow::Context;
use aracore::detector::{AntennaSystem, ResponseTables, TriggerReport};
use aracore::environment::SouthPoleIce;
use aracore::response::{load_response_file, ResponseTable};
use log::info;
use nalgebra::Vector3;
use std::path::Path;

pub struct RunResult {
    pub seed: u64,
    pub reports: Vec<TriggerReport>,
}

impl RunResult {
    pub fn triggered_count(&self) -> usize {
        self.reports.iter().filter(|r| r.triggered).count()
    }
}

#[derive(Clone)]
pub struct Runner {
    config: RunConfig,
}

fn load_or_flat(path: Option<&Path>) -> anyhow::Result<ResponseTable> {
    match path {
        Some(path) => load_response_file(path)
            .with_context(|| format!("loading response table {}", path.display())),
        None => Ok(ResponseTable::flat()),
    }
}

impl Runner {
    pub fn new(config: RunConfig) -> Self {
        Self { config }
    }

    pub fn execute(&self) -> anyhow::Result<RunResult> {
        let config = &self.config;
        let tables = ResponseTables::new(
            load_or_flat(config.vpol_response.as_deref())?,
            load_or_flat(config.hpol_response.as_deref())?,
        );
        let seed = config.seed.unwrap_or_else(rand::random);
        info!("event seed {}", seed);

        let positions: Vec<Vector3<f64>> = config
            .antennas
            .iter()
            .map(|a| Vector3::from(a.position))
            .collect();
        let pulses = build_station_pulses(&config.event, &positions)?;
        let source = config.event.source();
        let polarization = config.event.polarization();

        let mut reports = Vec::with_capacity(config.antennas.len());
        for (index, ((entry, position), pulse)) in config
            .antennas
            .iter()
            .zip(positions)
            .zip(pulses.iter())
            .enumerate()
        {
            let mut options = config.system.clone();
            options.antenna.seed = Some(seed.wrapping_add(index as u64));

            let mut system = AntennaSystem::with_polarization(
                entry.polarization,
                entry.name.clone(),
                position,
                config.threshold,
                options,
                &SouthPoleIce,
                &tables,
            )
            .with_context(|| format!("building antenna system {}", entry.name))?;

            system
                .receive(pulse, Some(source), Some(polarization))
                .with_context(|| format!("receiving event on {}", entry.name))?;
            let report = system
                .report()
                .with_context(|| format!("evaluating trigger on {}", entry.name))?;
            reports.push(report);
        }

        Ok(RunResult { seed, reports })
    }
}
