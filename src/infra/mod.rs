//! Infrastructure adapters: bounded queue storage.

pub mod queue;
pub use queue::JobQueue;
