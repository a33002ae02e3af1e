//! # Spaceport Tower
//!
//! A concurrent spaceport traffic simulation. Generator threads mint landing,
//! launch, assembly and emergency jobs on a fixed tick; a control tower moves
//! them from staging queues onto two service pads; one worker per pad serves
//! its jobs for a class-dependent number of ticks and reports each completion
//! to a single log consumer.
//!
//! ## Layout
//!
//! - [`core`]: jobs, pads, the shared context, generators, the control tower
//!   and the pad workers.
//! - [`config`]: the immutable run configuration (JSON, environment, builder).
//! - [`builders`]: construct the shared context from configuration.
//! - [`infra`]: the bounded FIFO used for every queue.
//! - [`runtime`]: thread orchestration and the periodic reporter.
//! - [`util`]: clocks and tracing setup.
//!
//! ```rust,no_run
//! use spaceport_tower::config::SimulationConfig;
//! use spaceport_tower::runtime::Simulation;
//!
//! let cfg = SimulationConfig::default().with_tick_ms(50).with_horizon_secs(5);
//! let summary = Simulation::new(cfg)?.run()?;
//! println!("{} jobs completed", summary.records.len());
//! # Ok::<(), spaceport_tower::core::SchedulerError>(())
//! ```
//!
//! Tests drive the same loops on a [`util::ManualClock`], where sleeping
//! advances simulated time instead of blocking.

#![deny(missing_docs)]
#![deny(unsafe_code)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![warn(clippy::nursery)]

/// Jobs, pads, scheduling state and the worker loops.
pub mod core;
/// Configuration model for a simulation run.
pub mod config;
/// Builders to construct the shared context from configuration.
pub mod builders;
/// Queue storage.
pub mod infra;
/// Thread orchestration and reporting.
pub mod runtime;
/// Shared utilities.
pub mod util;
