//! `spaceport` - run the spaceport traffic simulation from the command line.
//!
//! Configuration comes from `--config <file.json>` when given, otherwise from
//! `SPACEPORT_*` environment variables (a `.env` file is honoured). The short
//! flags override either source.

use std::path::PathBuf;

use anyhow::Context;
use clap::Parser;
use tracing::info;

use spaceport_tower::config::SimulationConfig;
use spaceport_tower::core::{AppResult, PadId};
use spaceport_tower::runtime::Simulation;
use spaceport_tower::util::init_tracing;

#[derive(Parser, Debug)]
#[command(name = "spaceport")]
#[command(version)]
#[command(about = "Concurrent spaceport traffic simulation", long_about = None)]
struct Args {
    /// Ground job probability (launch and assembly share it)
    #[arg(short = 'p', long = "probability")]
    probability: Option<f64>,

    /// Simulation time in seconds
    #[arg(short = 't', long = "time")]
    time: Option<u64>,

    /// Random seed
    #[arg(short = 's', long = "seed")]
    seed: Option<u64>,

    /// Seconds before the queue report starts printing
    #[arg(short = 'n', long = "log-start")]
    log_start: Option<u64>,

    /// Base tick in milliseconds
    #[arg(long = "tick-ms")]
    tick_ms: Option<u64>,

    /// JSON configuration file
    #[arg(long)]
    config: Option<PathBuf>,

    /// Completion log path
    #[arg(long)]
    log_path: Option<PathBuf>,

    /// Do not print the periodic queue report
    #[arg(long)]
    quiet: bool,
}

impl Args {
    fn apply(&self, mut cfg: SimulationConfig) -> SimulationConfig {
        if let Some(p) = self.probability {
            cfg.ground_probability = p;
        }
        if let Some(t) = self.time {
            cfg.horizon_secs = t;
        }
        if let Some(s) = self.seed {
            cfg.seed = s;
        }
        if let Some(n) = self.log_start {
            cfg.log_start_secs = n;
        }
        if let Some(ms) = self.tick_ms {
            cfg.tick_ms = ms;
        }
        if let Some(path) = &self.log_path {
            cfg.log_path.clone_from(path);
        }
        if self.quiet {
            cfg.report = false;
        }
        cfg
    }
}

fn main() -> AppResult<()> {
    init_tracing("info");
    let args = Args::parse();

    let base = match &args.config {
        Some(path) => SimulationConfig::read_json_file(path)
            .with_context(|| format!("loading {}", path.display()))?,
        None => SimulationConfig::from_env().context("reading SPACEPORT_* environment")?,
    };
    let cfg = args.apply(base);

    // Validation happens once, after every flag has been applied.
    let sim = Simulation::new(cfg).context("invalid configuration")?;
    let summary = sim.run().context("simulation failed")?;

    info!(
        run_id = %summary.run_id,
        minted = summary.minted,
        completed = summary.records.len(),
        pad_a = summary.completed_on(PadId::A),
        pad_b = summary.completed_on(PadId::B),
        still_queued = summary.remaining.total(),
        log = %sim.config().log_path.display(),
        wall_time = ?summary.wall_time,
        "done"
    );
    Ok(())
}
