//! Job generators: one periodic loop per traffic class.

use std::sync::Arc;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use tracing::{debug, error, info};

use crate::core::{Job, JobClass, SchedulerError, SpaceportContext};

/// How a generator decides to fire on a tick.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum FiringRule {
    /// Fire with this probability each tick.
    Probability(f64),
    /// Fire a pair every `period` ticks.
    PairEvery(u32),
}

/// Periodic job source for one class.
pub struct JobGenerator {
    ctx: Arc<SpaceportContext>,
    class: JobClass,
    rule: FiringRule,
    rng: StdRng,
}

impl JobGenerator {
    /// Generator for `class` with the standard firing rules: landings with
    /// probability `1 - p`, departures and assembly with `p / 2` each,
    /// emergencies in pairs every `emergency_period` ticks.
    #[must_use]
    pub fn new(
        ctx: Arc<SpaceportContext>,
        class: JobClass,
        ground_probability: f64,
        emergency_period: u32,
        seed: u64,
    ) -> Self {
        let rule = match class {
            JobClass::Landing => FiringRule::Probability(1.0 - ground_probability),
            JobClass::Departure | JobClass::Assembly => {
                FiringRule::Probability(ground_probability / 2.0)
            }
            JobClass::Emergency => FiringRule::PairEvery(emergency_period),
        };
        Self::with_rule(ctx, class, rule, seed)
    }

    /// Generator with an explicit firing rule. The RNG stream is derived from
    /// `seed` and the class so each generator is reproducible on its own.
    #[must_use]
    pub fn with_rule(ctx: Arc<SpaceportContext>, class: JobClass, rule: FiringRule, seed: u64) -> Self {
        let salt = match class {
            JobClass::Landing => 0x4c41_4e44,
            JobClass::Departure => 0x4445_5054,
            JobClass::Assembly => 0x4153_4d42,
            JobClass::Emergency => 0x454d_5247,
        };
        Self {
            ctx,
            class,
            rule,
            rng: StdRng::seed_from_u64(seed ^ salt),
        }
    }

    /// Traffic class this generator mints.
    #[must_use]
    pub const fn class(&self) -> JobClass {
        self.class
    }

    /// Tick until the simulation ends. Returns the number of jobs minted.
    ///
    /// # Errors
    ///
    /// `SchedulerError::QueueFull` when the staging queue overflows; the run is
    /// aborted before returning.
    pub fn run(mut self) -> Result<u64, SchedulerError> {
        info!(class = %self.class, "generator started");
        let tick = self.ctx.timing().tick;
        let mut ticks: u32 = 0;
        let mut minted: u64 = 0;
        while self.ctx.is_running() {
            self.ctx.sleep(tick);
            if !self.ctx.is_running() {
                break;
            }
            ticks += 1;
            match self.on_tick(ticks) {
                Ok(n) => minted += n,
                Err(e) => {
                    error!(class = %self.class, error = %e, "generator aborting simulation");
                    self.ctx.abort();
                    return Err(e);
                }
            }
        }
        info!(class = %self.class, minted, "generator stopped");
        Ok(minted)
    }

    /// Apply the firing rule for tick number `tick` (1-based). Returns the
    /// number of jobs staged.
    ///
    /// # Errors
    ///
    /// `SchedulerError::QueueFull` when the staging queue overflows.
    pub fn on_tick(&mut self, tick: u32) -> Result<u64, SchedulerError> {
        match self.rule {
            FiringRule::Probability(p) => {
                if self.rng.random::<f64>() < p {
                    let job = self.ctx.mint(self.class);
                    debug!(job_id = job.id, class = %self.class, "job generated");
                    self.ctx.stage(job)?;
                    return Ok(1);
                }
                Ok(0)
            }
            FiringRule::PairEvery(period) => {
                if period == 0 || tick % period != 0 {
                    return Ok(0);
                }
                let first = self.ctx.reserve_ids(2);
                let now = self.ctx.now();
                let mut staged = self.ctx.staging(self.class).lock();
                for id in [first, first + 1] {
                    staged.append(Job::new(id, self.class, now))?;
                }
                debug!(first_id = first, class = %self.class, "job pair generated");
                Ok(2)
            }
        }
    }
}

impl std::fmt::Debug for JobGenerator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("JobGenerator")
            .field("class", &self.class)
            .field("rule", &self.rule)
            .finish_non_exhaustive()
    }
}
