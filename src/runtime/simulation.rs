//! Full simulation run on dedicated OS threads.
//!
//! One thread per generator (4), per pad (2), the control tower, the
//! completion-log consumer and, optionally, the reporter. Workers share the
//! context behind an `Arc`; completion records flow to the consumer over an
//! unbounded channel. Pads emit at most one record per service tick, so the
//! channel never outgrows the work already done.
//!
//! # Shutdown
//!
//! Every loop stops on its own once the clock passes the end time. A fatal
//! error in any thread raises the context's abort flag so the others stop at
//! their next check; the first error is returned after all threads joined.

use std::io::Write;
use std::sync::Arc;
use std::thread::{self, JoinHandle};
use std::time::{Duration, Instant};

use crossbeam_channel::unbounded;
use tracing::{error, info, info_span, warn, Span};
use uuid::Uuid;

use crate::builders::build_context;
use crate::config::SimulationConfig;
use crate::core::{
    drain_completions, CompletionRecord, CompletionSink, ControlTower, FileJobLog, JobClass,
    JobGenerator, PadId, PadWorker, SchedulerError, SpaceportContext, SpaceportSnapshot,
};
use crate::runtime::Reporter;
use crate::util::{Clock, SystemClock};

/// Outcome of a finished run.
#[derive(Debug, Clone)]
pub struct SimulationSummary {
    /// Identifier attached to every log line of the run.
    pub run_id: Uuid,
    /// Ids handed out, including the pre-seeded launch.
    pub minted: u64,
    /// Completion records in emission order.
    pub records: Vec<CompletionRecord>,
    /// Jobs still queued when the run ended.
    pub remaining: SpaceportSnapshot,
    /// Wall time the run took.
    pub wall_time: Duration,
}

impl SimulationSummary {
    /// Whether every minted job is accounted for exactly once, either as a
    /// completion record or as a queued job.
    #[must_use]
    pub fn is_conserved(&self) -> bool {
        let mut ids: Vec<u64> = self
            .records
            .iter()
            .map(|r| r.id)
            .chain(self.remaining.ids())
            .collect();
        ids.sort_unstable();
        let expected: Vec<u64> = (1..=self.minted).collect();
        ids == expected
    }

    /// Completed jobs served by `pad`.
    #[must_use]
    pub fn completed_on(&self, pad: PadId) -> usize {
        self.records.iter().filter(|r| r.pad == pad).count()
    }
}

/// A configured, not yet started simulation.
#[derive(Debug, Clone)]
pub struct Simulation {
    config: SimulationConfig,
    run_id: Uuid,
}

impl Simulation {
    /// Validate configuration and prepare a run.
    ///
    /// # Errors
    ///
    /// `SchedulerError::InvalidConfig` when validation fails.
    pub fn new(config: SimulationConfig) -> Result<Self, SchedulerError> {
        config.validate()?;
        Ok(Self {
            config,
            run_id: Uuid::new_v4(),
        })
    }

    /// Configuration in use.
    #[must_use]
    pub const fn config(&self) -> &SimulationConfig {
        &self.config
    }

    /// Run identifier.
    #[must_use]
    pub const fn run_id(&self) -> Uuid {
        self.run_id
    }

    /// Run on the wall clock, logging to the configured job log file and
    /// reporting to stdout when enabled.
    ///
    /// # Errors
    ///
    /// The first fatal error raised by any thread.
    pub fn run(&self) -> Result<SimulationSummary, SchedulerError> {
        let sink = FileJobLog::create(&self.config.log_path)?;
        let report: Option<Box<dyn Write + Send>> = if self.config.report {
            Some(Box::new(std::io::stdout()))
        } else {
            None
        };
        self.run_with(Arc::new(SystemClock::start()), sink, report)
    }

    /// Run with an explicit clock, completion sink and optional report output.
    ///
    /// # Errors
    ///
    /// The first fatal error raised by any thread. A sink failure takes
    /// precedence over the errors it causes in the pad workers.
    pub fn run_with<S>(
        &self,
        clock: Arc<dyn Clock>,
        mut sink: S,
        report: Option<Box<dyn Write + Send>>,
    ) -> Result<SimulationSummary, SchedulerError>
    where
        S: CompletionSink + 'static,
    {
        let span = info_span!("simulation", run_id = %self.run_id);
        let _entered = span.enter();
        let started = Instant::now();
        let cfg = &self.config;
        let ctx = build_context(cfg, clock)?;
        info!(
            tick_ms = cfg.tick_ms,
            horizon_secs = cfg.horizon_secs,
            seed = cfg.seed,
            ground_probability = cfg.ground_probability,
            capacity = cfg.queue_capacity(),
            "simulation starting"
        );

        let (tx, rx) = unbounded::<CompletionRecord>();
        let consumer = {
            let ctx = Arc::clone(&ctx);
            spawn_named("sp-log", &span, move || {
                let result = drain_completions(&rx, &mut sink);
                if result.is_err() {
                    ctx.abort();
                }
                result
            })?
        };

        let mut workers: Vec<(String, JoinHandle<Result<(), SchedulerError>>)> = Vec::new();
        let spawned = self.spawn_workers(&ctx, &span, &tx, report, &mut workers);
        drop(tx);
        if let Err(e) = spawned {
            ctx.abort();
            if let Some(worker_error) = join_all(workers) {
                warn!(error = %worker_error, "worker failed during startup abort");
            }
            if let Err(log_error) = join_consumer(consumer) {
                error!(error = %log_error, "completion log failed during startup abort");
            }
            return Err(e);
        }

        let worker_error = join_all(workers);
        let records = join_consumer(consumer)?;
        if let Some(e) = worker_error {
            return Err(e);
        }

        let summary = SimulationSummary {
            run_id: self.run_id,
            minted: ctx.issued_ids(),
            records,
            remaining: ctx.snapshot(),
            wall_time: started.elapsed(),
        };
        info!(
            minted = summary.minted,
            completed = summary.records.len(),
            still_queued = summary.remaining.total(),
            "simulation finished"
        );
        if !summary.is_conserved() {
            warn!("job accounting mismatch between records and queues");
        }
        Ok(summary)
    }

    fn spawn_workers(
        &self,
        ctx: &Arc<SpaceportContext>,
        span: &Span,
        tx: &crossbeam_channel::Sender<CompletionRecord>,
        report: Option<Box<dyn Write + Send>>,
        workers: &mut Vec<(String, JoinHandle<Result<(), SchedulerError>>)>,
    ) -> Result<(), SchedulerError> {
        let cfg = &self.config;

        for class in JobClass::ALL {
            let generator = JobGenerator::new(
                Arc::clone(ctx),
                class,
                cfg.ground_probability,
                cfg.emergency_period,
                cfg.seed,
            );
            let name = format!("sp-gen-{}", class.code());
            let handle = spawn_named(&name, span, move || generator.run().map(|_| ()))?;
            workers.push((name, handle));
        }

        for pad in [PadId::A, PadId::B] {
            let worker = PadWorker::new(Arc::clone(ctx), pad, tx.clone());
            let name = format!("sp-pad-{pad}");
            let handle = spawn_named(&name, span, move || worker.run().map(|_| ()))?;
            workers.push((name, handle));
        }

        let tower = ControlTower::new(Arc::clone(ctx));
        workers.push(("sp-tower".into(), spawn_named("sp-tower", span, move || tower.run())?));

        if let Some(out) = report {
            let offset = Duration::from_secs(cfg.log_start_secs);
            let reporter = Reporter::new(Arc::clone(ctx), offset, out);
            let handle = spawn_named("sp-report", span, move || reporter.run().map(|_| ()))?;
            workers.push(("sp-report".into(), handle));
        }
        Ok(())
    }
}

/// Spawn a named thread running inside `span`.
fn spawn_named<T, F>(name: &str, span: &Span, f: F) -> Result<JoinHandle<T>, SchedulerError>
where
    T: Send + 'static,
    F: FnOnce() -> T + Send + 'static,
{
    let span = span.clone();
    let handle = thread::Builder::new().name(name.to_owned()).spawn(move || {
        let _entered = span.enter();
        f()
    })?;
    Ok(handle)
}

/// Join the completion-log consumer, turning a panic into an error.
fn join_consumer(
    handle: JoinHandle<Result<Vec<CompletionRecord>, SchedulerError>>,
) -> Result<Vec<CompletionRecord>, SchedulerError> {
    handle.join().unwrap_or_else(|_| {
        error!(worker = "sp-log", "worker panicked");
        Err(SchedulerError::WorkerPanicked("sp-log".into()))
    })
}

/// Join every worker, returning the first error (a panic counts as one).
fn join_all(workers: Vec<(String, JoinHandle<Result<(), SchedulerError>>)>) -> Option<SchedulerError> {
    let mut first = None;
    for (name, handle) in workers {
        let outcome = match handle.join() {
            Ok(result) => result,
            Err(_) => {
                error!(worker = %name, "worker panicked");
                Err(SchedulerError::WorkerPanicked(name))
            }
        };
        if let Err(e) = outcome {
            first.get_or_insert(e);
        }
    }
    first
}
