//! Error types for scheduler operations.

use thiserror::Error;

/// Errors produced by scheduler components.
///
/// None of these are recoverable at runtime: a worker that hits one stops,
/// raises the run's abort flag and hands the error back to the runtime.
#[derive(Debug, Error)]
pub enum SchedulerError {
    /// A queue reached its fixed bound.
    #[error("queue full: {queue} reached capacity {capacity}")]
    QueueFull {
        /// Name of the queue that overflowed.
        queue: &'static str,
        /// Configured bound.
        capacity: usize,
    },
    /// Configuration rejected at startup.
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),
    /// The completion log consumer went away.
    #[error("completion sink closed")]
    SinkClosed,
    /// Log file failure.
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    /// A simulation thread panicked.
    #[error("worker panicked: {0}")]
    WorkerPanicked(String),
}

/// Application-facing result using anyhow for higher-level contexts.
pub type AppResult<T> = Result<T, anyhow::Error>;
