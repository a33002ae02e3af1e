//! Builders to construct scheduler components from configuration.

pub mod context_builder;

pub use context_builder::build_context;
