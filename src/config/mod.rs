//! Configuration models for the simulation run.

pub mod simulation;

pub use simulation::SimulationConfig;
