//! Runtime: thread orchestration for a full simulation run and the periodic
//! snapshot reporter.

pub mod reporter;
pub mod simulation;

pub use reporter::Reporter;
pub use simulation::{Simulation, SimulationSummary};
