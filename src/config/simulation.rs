//! Simulation configuration: read once at startup, immutable for the run.

use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::core::SchedulerError;

const fn default_tick_ms() -> u64 {
    2000
}
const fn default_horizon_secs() -> u64 {
    120
}
const fn default_seed() -> u64 {
    10
}
const fn default_ground_probability() -> f64 {
    0.2
}
const fn default_emergency_period() -> u32 {
    40
}
const fn default_dispatch_threshold() -> usize {
    3
}
fn default_log_path() -> PathBuf {
    PathBuf::from("job.log")
}
const fn default_true() -> bool {
    true
}

/// Root simulation configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SimulationConfig {
    /// Base tick `t` in milliseconds.
    #[serde(default = "default_tick_ms")]
    pub tick_ms: u64,
    /// Simulation horizon in seconds.
    #[serde(default = "default_horizon_secs")]
    pub horizon_secs: u64,
    /// Random seed for the generators.
    #[serde(default = "default_seed")]
    pub seed: u64,
    /// Probability `p` of a ground job (launch and assembly share it).
    #[serde(default = "default_ground_probability")]
    pub ground_probability: f64,
    /// Ticks between emergency bursts.
    #[serde(default = "default_emergency_period")]
    pub emergency_period: u32,
    /// Seconds after start before the reporter begins printing.
    #[serde(default)]
    pub log_start_secs: u64,
    /// Staging backlog at which landings are held and ground work is forced.
    #[serde(default = "default_dispatch_threshold")]
    pub dispatch_threshold: usize,
    /// Pause between control tower passes; defaults to a twentieth of a tick.
    #[serde(default)]
    pub tower_backoff_ms: Option<u64>,
    /// Bound on every queue; defaults to `4 * (horizon_ticks + 1)`.
    #[serde(default)]
    pub queue_capacity: Option<usize>,
    /// Completion log file.
    #[serde(default = "default_log_path")]
    pub log_path: PathBuf,
    /// Whether the periodic snapshot reporter runs.
    #[serde(default = "default_true")]
    pub report: bool,
    /// Pre-seed one departure into the launch queue before workers start.
    #[serde(default = "default_true")]
    pub seed_initial_launch: bool,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            tick_ms: default_tick_ms(),
            horizon_secs: default_horizon_secs(),
            seed: default_seed(),
            ground_probability: default_ground_probability(),
            emergency_period: default_emergency_period(),
            log_start_secs: 0,
            dispatch_threshold: default_dispatch_threshold(),
            tower_backoff_ms: None,
            queue_capacity: None,
            log_path: default_log_path(),
            report: true,
            seed_initial_launch: true,
        }
    }
}

impl SimulationConfig {
    /// Builder-style tick override.
    #[must_use]
    pub const fn with_tick_ms(mut self, tick_ms: u64) -> Self {
        self.tick_ms = tick_ms;
        self
    }

    /// Builder-style horizon override.
    #[must_use]
    pub const fn with_horizon_secs(mut self, horizon_secs: u64) -> Self {
        self.horizon_secs = horizon_secs;
        self
    }

    /// Builder-style seed override.
    #[must_use]
    pub const fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    /// Builder-style ground probability override.
    #[must_use]
    pub const fn with_ground_probability(mut self, p: f64) -> Self {
        self.ground_probability = p;
        self
    }

    /// Builder-style emergency period override.
    #[must_use]
    pub const fn with_emergency_period(mut self, ticks: u32) -> Self {
        self.emergency_period = ticks;
        self
    }

    /// Builder-style reporter toggle.
    #[must_use]
    pub const fn with_report(mut self, report: bool) -> Self {
        self.report = report;
        self
    }

    /// Builder-style log path override.
    #[must_use]
    pub fn with_log_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.log_path = path.into();
        self
    }

    /// Base tick.
    #[must_use]
    pub const fn tick(&self) -> Duration {
        Duration::from_millis(self.tick_ms)
    }

    /// Simulation horizon.
    #[must_use]
    pub const fn horizon(&self) -> Duration {
        Duration::from_secs(self.horizon_secs)
    }

    /// End boundary checked by every loop: one second past the horizon.
    #[must_use]
    pub fn end_time(&self) -> Duration {
        self.horizon() + Duration::from_secs(1)
    }

    /// Number of whole ticks in the horizon.
    #[must_use]
    pub fn horizon_ticks(&self) -> u64 {
        if self.tick_ms == 0 {
            return 0;
        }
        self.horizon_secs.saturating_mul(1000) / self.tick_ms
    }

    /// Bound applied to every queue.
    #[must_use]
    pub fn queue_capacity(&self) -> usize {
        self.queue_capacity.unwrap_or_else(|| {
            let ticks = usize::try_from(self.horizon_ticks()).unwrap_or(usize::MAX);
            ticks.saturating_add(1).saturating_mul(4)
        })
    }

    /// Pause between control tower passes.
    #[must_use]
    pub fn tower_backoff(&self) -> Duration {
        let ms = self.tower_backoff_ms.unwrap_or(self.tick_ms / 20).max(1);
        Duration::from_millis(ms)
    }

    /// Validate configuration values.
    ///
    /// # Errors
    ///
    /// `SchedulerError::InvalidConfig` naming the first bad field.
    pub fn validate(&self) -> Result<(), SchedulerError> {
        let invalid = |msg: &str| Err(SchedulerError::InvalidConfig(msg.into()));
        if self.tick_ms == 0 {
            return invalid("tick_ms must be greater than 0");
        }
        if self.horizon_secs == 0 {
            return invalid("horizon_secs must be greater than 0");
        }
        if !(0.0..=1.0).contains(&self.ground_probability) {
            return invalid("ground_probability must be within [0, 1]");
        }
        if self.emergency_period == 0 {
            return invalid("emergency_period must be greater than 0");
        }
        if self.dispatch_threshold == 0 {
            return invalid("dispatch_threshold must be greater than 0");
        }
        if self.queue_capacity() == 0 {
            return invalid("queue_capacity must be greater than 0");
        }
        if self.log_start_secs > self.horizon_secs {
            return invalid("log_start_secs must not exceed horizon_secs");
        }
        Ok(())
    }

    /// Parse configuration from a JSON string without validating it, for
    /// callers that apply further overrides first.
    ///
    /// # Errors
    ///
    /// `SchedulerError::InvalidConfig` when the input is not valid JSON for
    /// this shape.
    pub fn parse_json_str(input: &str) -> Result<Self, SchedulerError> {
        serde_json::from_str(input)
            .map_err(|e| SchedulerError::InvalidConfig(format!("parse error: {e}")))
    }

    /// Parse configuration from a JSON string and validate.
    ///
    /// # Errors
    ///
    /// `SchedulerError::InvalidConfig` on parse or validation failure.
    pub fn from_json_str(input: &str) -> Result<Self, SchedulerError> {
        let cfg = Self::parse_json_str(input)?;
        cfg.validate()?;
        Ok(cfg)
    }

    /// Read and parse a JSON configuration file without validating it.
    ///
    /// # Errors
    ///
    /// `SchedulerError::Io` when the file cannot be read, otherwise as
    /// [`Self::parse_json_str`].
    pub fn read_json_file(path: impl AsRef<Path>) -> Result<Self, SchedulerError> {
        let raw = std::fs::read_to_string(path)?;
        Self::parse_json_str(&raw)
    }

    /// Read, parse and validate a JSON configuration file.
    ///
    /// # Errors
    ///
    /// As [`Self::read_json_file`], plus validation failures.
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self, SchedulerError> {
        let cfg = Self::read_json_file(path)?;
        cfg.validate()?;
        Ok(cfg)
    }

    /// Build configuration from `SPACEPORT_*` environment variables, loading a
    /// `.env` file first when present. Unset variables keep their defaults.
    ///
    /// Values are parsed but not validated, so later overrides can still
    /// correct them; call [`Self::validate`] (or `Simulation::new`) last.
    ///
    /// # Errors
    ///
    /// `SchedulerError::InvalidConfig` when a variable does not parse.
    pub fn from_env() -> Result<Self, SchedulerError> {
        let _ = dotenvy::dotenv();
        Self::from_vars(|key| std::env::var(key).ok())
    }

    /// Build configuration from an arbitrary variable lookup.
    ///
    /// # Errors
    ///
    /// As [`Self::from_env`].
    pub fn from_vars<F>(lookup: F) -> Result<Self, SchedulerError>
    where
        F: Fn(&str) -> Option<String>,
    {
        fn parse<T: std::str::FromStr>(key: &str, raw: &str) -> Result<T, SchedulerError> {
            raw.trim()
                .parse()
                .map_err(|_| SchedulerError::InvalidConfig(format!("{key}: cannot parse `{raw}`")))
        }

        let mut cfg = Self::default();
        if let Some(v) = lookup("SPACEPORT_TICK_MS") {
            cfg.tick_ms = parse("SPACEPORT_TICK_MS", &v)?;
        }
        if let Some(v) = lookup("SPACEPORT_HORIZON_SECS") {
            cfg.horizon_secs = parse("SPACEPORT_HORIZON_SECS", &v)?;
        }
        if let Some(v) = lookup("SPACEPORT_SEED") {
            cfg.seed = parse("SPACEPORT_SEED", &v)?;
        }
        if let Some(v) = lookup("SPACEPORT_GROUND_PROBABILITY") {
            cfg.ground_probability = parse("SPACEPORT_GROUND_PROBABILITY", &v)?;
        }
        if let Some(v) = lookup("SPACEPORT_EMERGENCY_PERIOD") {
            cfg.emergency_period = parse("SPACEPORT_EMERGENCY_PERIOD", &v)?;
        }
        if let Some(v) = lookup("SPACEPORT_LOG_START_SECS") {
            cfg.log_start_secs = parse("SPACEPORT_LOG_START_SECS", &v)?;
        }
        if let Some(v) = lookup("SPACEPORT_LOG_PATH") {
            cfg.log_path = PathBuf::from(v);
        }
        Ok(cfg)
    }
}
