//! Core scheduling: jobs, pads, the shared context and the worker loops.

pub mod error;
pub mod job;
pub mod pad;
pub mod context;
pub mod snapshot;
pub mod generator;
pub mod pad_worker;
pub mod tower;
pub mod audit;

pub use error::{AppResult, SchedulerError};
pub use job::{CompletionRecord, Job, JobClass, JobId, PadId};
pub use pad::{InFlight, Pad, PadState, ServiceTable, Slot};
pub use context::{SpaceportContext, Timing};
pub use snapshot::{QueueEntry, SpaceportSnapshot};
pub use generator::{FiringRule, JobGenerator};
pub use pad_worker::PadWorker;
pub use tower::{ControlTower, DispatchReport};
pub use audit::{
    drain_completions, format_log_line, CompletionSink, FileJobLog, InMemoryCompletionSink,
    JOB_LOG_HEADER,
};
