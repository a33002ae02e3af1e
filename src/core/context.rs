//! Shared scheduler context: every queue, both pads, the id counter and the
//! run boundary, constructed once and handed to each worker behind an `Arc`.
//!
//! Lock order, wherever more than one lock is held: one staging queue, then
//! Pad A, then Pad B. Nothing ever holds two staging queues at once.

use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;

use parking_lot::Mutex;

use crate::core::pad::{Pad, ServiceTable};
use crate::core::snapshot::{QueueEntry, SpaceportSnapshot};
use crate::core::{Job, JobClass, JobId, PadId, SchedulerError};
use crate::infra::JobQueue;
use crate::util::Clock;

/// Fixed parameters every worker reads.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Timing {
    /// Base tick `t`.
    pub tick: Duration,
    /// Loops stop once the clock reaches this.
    pub end_time: Duration,
    /// Control tower pause between passes.
    pub tower_backoff: Duration,
}

/// Process-wide simulation state.
pub struct SpaceportContext {
    timing: Timing,
    dispatch_threshold: usize,
    clock: Arc<dyn Clock>,
    next_id: AtomicU64,
    aborted: AtomicBool,
    /// Emergency staging queue.
    pub emergency: Mutex<JobQueue>,
    /// Landing staging queue.
    pub land: Mutex<JobQueue>,
    /// Launch (departure) staging queue.
    pub launch: Mutex<JobQueue>,
    /// Assembly staging queue.
    pub assembly: Mutex<JobQueue>,
    /// Launch pad.
    pub pad_a: Pad,
    /// Assembly pad.
    pub pad_b: Pad,
}

impl SpaceportContext {
    /// Build a context with empty queues bounded at `capacity`.
    #[must_use]
    pub fn new(
        timing: Timing,
        dispatch_threshold: usize,
        capacity: usize,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            timing,
            dispatch_threshold,
            clock,
            next_id: AtomicU64::new(1),
            aborted: AtomicBool::new(false),
            emergency: Mutex::new(JobQueue::new("emergency", capacity)),
            land: Mutex::new(JobQueue::new("land", capacity)),
            launch: Mutex::new(JobQueue::new("launch", capacity)),
            assembly: Mutex::new(JobQueue::new("assembly", capacity)),
            pad_a: Pad::new(PadId::A, ServiceTable::pad_a(), timing.tick, capacity),
            pad_b: Pad::new(PadId::B, ServiceTable::pad_b(), timing.tick, capacity),
        }
    }

    /// Run timing.
    #[must_use]
    pub const fn timing(&self) -> &Timing {
        &self.timing
    }

    /// Staging backlog threshold used by the control tower.
    #[must_use]
    pub const fn dispatch_threshold(&self) -> usize {
        self.dispatch_threshold
    }

    /// Current simulation time.
    #[must_use]
    pub fn now(&self) -> Duration {
        self.clock.now()
    }

    /// Suspend the caller on the run's clock.
    pub fn sleep(&self, duration: Duration) {
        self.clock.sleep(duration);
    }

    /// Whether loops should keep going: end time not reached, no abort raised.
    #[must_use]
    pub fn is_running(&self) -> bool {
        !self.aborted.load(Ordering::Acquire) && self.now() < self.timing.end_time
    }

    /// Stop every loop at its next check. Used when a worker hits a fatal error.
    pub fn abort(&self) {
        self.aborted.store(true, Ordering::Release);
    }

    /// Whether [`Self::abort`] was called.
    #[must_use]
    pub fn is_aborted(&self) -> bool {
        self.aborted.load(Ordering::Acquire)
    }

    /// Reserve `count` consecutive ids, returning the first.
    pub fn reserve_ids(&self, count: u64) -> JobId {
        self.next_id.fetch_add(count, Ordering::AcqRel)
    }

    /// Number of ids handed out so far.
    #[must_use]
    pub fn issued_ids(&self) -> u64 {
        self.next_id.load(Ordering::Acquire) - 1
    }

    /// Mint a job of `class` stamped with the current time.
    pub fn mint(&self, class: JobClass) -> Job {
        Job::new(self.reserve_ids(1), class, self.now())
    }

    /// Staging queue fed by the generator of `class`.
    #[must_use]
    pub const fn staging(&self, class: JobClass) -> &Mutex<JobQueue> {
        match class {
            JobClass::Landing => &self.land,
            JobClass::Departure => &self.launch,
            JobClass::Assembly => &self.assembly,
            JobClass::Emergency => &self.emergency,
        }
    }

    /// Pad by id.
    #[must_use]
    pub const fn pad(&self, id: PadId) -> &Pad {
        match id {
            PadId::A => &self.pad_a,
            PadId::B => &self.pad_b,
        }
    }

    /// Append a freshly minted job to its staging queue.
    ///
    /// # Errors
    ///
    /// `SchedulerError::QueueFull` when the staging queue is at capacity.
    pub fn stage(&self, job: Job) -> Result<(), SchedulerError> {
        self.staging(job.class).lock().append(job)
    }

    /// Enumerate every queue, one lock at a time. Each queue is internally
    /// consistent; a job moving between queues may show up in either or
    /// neither.
    #[must_use]
    pub fn snapshot(&self) -> SpaceportSnapshot {
        fn staged(queue: &Mutex<JobQueue>) -> Vec<QueueEntry> {
            let guard = queue.lock();
            let mut out = Vec::with_capacity(guard.len());
            out.extend(guard.iter().map(QueueEntry::from));
            out
        }
        fn on_pad(pad: &Pad) -> Vec<QueueEntry> {
            pad.lock()
                .entries()
                .into_iter()
                .map(|(id, class)| QueueEntry { id, class })
                .collect()
        }

        SpaceportSnapshot {
            at: self.now(),
            pad_a: on_pad(&self.pad_a),
            pad_b: on_pad(&self.pad_b),
            land: staged(&self.land),
            launch: staged(&self.launch),
            assembly: staged(&self.assembly),
            emergency: staged(&self.emergency),
        }
    }
}

impl std::fmt::Debug for SpaceportContext {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SpaceportContext")
            .field("timing", &self.timing)
            .field("dispatch_threshold", &self.dispatch_threshold)
            .field("issued_ids", &self.issued_ids())
            .field("aborted", &self.is_aborted())
            .finish_non_exhaustive()
    }
}
