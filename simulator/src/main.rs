use anyhow::Context;
use clap::Parser;
use std::fs::{self, OpenOptions};
use std::io::Write;
use std::path::PathBuf;
use workflow::config::RunConfig;
use workflow::runner::Runner;

mod generator;
mod workflow;

#[derive(Parser)]
#[command(author, version, about = "Offline ARA antenna trigger simulation")]
struct Args {
    /// Load a run config from YAML
    #[arg(long)]
    config: Option<PathBuf>,
    /// Trigger threshold in multiples of the noise RMS
    #[arg(long)]
    threshold: Option<f64>,
    /// Seed for the antenna noise generators
    #[arg(long)]
    seed: Option<u64>,
    /// Append one JSON line per antenna to this file
    #[arg(long)]
    report: Option<PathBuf>,
}

fn main() -> anyhow::Result<()> {
    env_logger::init();
    let args = Args::parse();

    let run_config = match args.config {
        Some(path) => RunConfig::load(path)?,
        None => RunConfig::default(),
    }
    .with_overrides(args.threshold, args.seed);

    let runner = Runner::new(run_config);
    let result = runner.execute().context("running event simulation")?;

    println!(
        "Event (seed {}) -> {} of {} antennas triggered",
        result.seed,
        result.triggered_count(),
        result.reports.len()
    );
    for report in &result.reports {
        let calibration = report
            .calibration
            .map(|c| format!("mean {:.3e}, rms {:.3e}", c.mean, c.rms))
            .unwrap_or_else(|| "uncalibrated".to_string());
        println!(
            "  {:<6} triggered={} ({})",
            report.name, report.triggered, calibration
        );
    }

    if let Some(report_path) = args.report {
        if let Some(parent) = report_path.parent() {
            fs::create_dir_all(parent)?;
        }
        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&report_path)
            .with_context(|| format!("opening report {}", report_path.display()))?;
        for report in &result.reports {
            let line = serde_json::to_string(report).context("serializing trigger report")?;
            writeln!(file, "{}", line)?;
        }
    }

    Ok(())
}
