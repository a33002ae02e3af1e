//! Service pads: per-class duration tables, in-flight tracking and the
//! remaining-time estimator the control tower consults.
//!
//! A pad's logical queue is its in-flight job (the head, currently being
//! served) followed by its waiting jobs. Both live under one mutex so the
//! "queue head" and "pad busy" views can never disagree.

use std::time::Duration;

use parking_lot::{Mutex, MutexGuard};
use serde::{Deserialize, Serialize};

use crate::core::{Job, JobClass, JobId, PadId, SchedulerError};
use crate::infra::JobQueue;
use crate::util::clock::signed_millis;

/// Service durations per job class, in base ticks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServiceTable {
    /// Landing duration.
    pub landing: u32,
    /// Departure duration.
    pub departure: u32,
    /// Assembly duration.
    pub assembly: u32,
    /// Emergency duration.
    pub emergency: u32,
}

impl ServiceTable {
    /// Pad A: departures take 2 ticks, everything else 1.
    #[must_use]
    pub const fn pad_a() -> Self {
        Self {
            landing: 1,
            departure: 2,
            assembly: 1,
            emergency: 1,
        }
    }

    /// Pad B: assembly takes 6 ticks, everything else 1.
    #[must_use]
    pub const fn pad_b() -> Self {
        Self {
            landing: 1,
            departure: 1,
            assembly: 6,
            emergency: 1,
        }
    }

    /// Default table for a pad.
    #[must_use]
    pub const fn for_pad(pad: PadId) -> Self {
        match pad {
            PadId::A => Self::pad_a(),
            PadId::B => Self::pad_b(),
        }
    }

    /// Duration of `class` in ticks.
    #[must_use]
    pub const fn ticks(&self, class: JobClass) -> u32 {
        match class {
            JobClass::Landing => self.landing,
            JobClass::Departure => self.departure,
            JobClass::Assembly => self.assembly,
            JobClass::Emergency => self.emergency,
        }
    }

    /// Duration of `class` in simulation time.
    #[must_use]
    pub fn duration(&self, class: JobClass, tick: Duration) -> Duration {
        tick * self.ticks(class)
    }
}

/// Where an admitted job lands in the pad's waiting line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Slot {
    /// Tail of the line.
    Tail,
    /// Directly behind the in-flight job, or behind emergencies already
    /// waiting there.
    Immediate,
    /// Behind a job already holding the immediate slot. Placement matches
    /// [`Slot::Immediate`]; the distinction records why the pad was chosen.
    Deferred,
}

/// The job a pad is serving.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InFlight {
    /// Job being served.
    pub job: Job,
    /// When service began.
    pub started_at: Duration,
}

/// Mutable pad contents, only reachable through [`Pad::lock`].
#[derive(Debug)]
pub struct PadState {
    id: PadId,
    in_flight: Option<InFlight>,
    waiting: JobQueue,
}

impl PadState {
    /// Whether a job is being served.
    #[must_use]
    pub const fn is_busy(&self) -> bool {
        self.in_flight.is_some()
    }

    /// In-flight job, if any.
    #[must_use]
    pub const fn in_flight(&self) -> Option<&InFlight> {
        self.in_flight.as_ref()
    }

    /// Jobs waiting behind the in-flight one.
    #[must_use]
    pub const fn waiting(&self) -> &JobQueue {
        &self.waiting
    }

    /// Jobs on the pad, in-flight included.
    #[must_use]
    pub fn len(&self) -> usize {
        self.waiting.len() + usize::from(self.in_flight.is_some())
    }

    /// Whether the pad holds no job at all.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.in_flight.is_none() && self.waiting.is_empty()
    }

    /// Put `job` on this pad at `slot`, recording the assignment.
    ///
    /// # Errors
    ///
    /// `SchedulerError::QueueFull` when the pad's queue is at capacity.
    pub fn admit(&mut self, mut job: Job, slot: Slot) -> Result<(), SchedulerError> {
        job.assign(self.id);
        match slot {
            Slot::Tail => self.waiting.append(job),
            Slot::Immediate | Slot::Deferred => {
                // Emergencies already waiting keep their place, so emergencies
                // are served in arrival order.
                let ahead = self
                    .waiting
                    .iter()
                    .take_while(|j| j.class == JobClass::Emergency)
                    .count();
                match ahead {
                    0 => self.waiting.insert_immediate(job),
                    1 => self.waiting.insert_deferred(job),
                    n => self.waiting.insert_at(n, job),
                }
            }
        }
    }

    /// Move the next waiting job into service. Returns the new in-flight job,
    /// or `None` when the pad is already busy or has nothing waiting.
    pub fn begin_next(&mut self, now: Duration) -> Option<&InFlight> {
        if self.in_flight.is_some() {
            return None;
        }
        let job = self.waiting.remove_head()?;
        self.in_flight = Some(InFlight {
            job,
            started_at: now,
        });
        self.in_flight.as_ref()
    }

    /// Take the in-flight job off the pad, stamping its end time.
    pub fn finish(&mut self, now: Duration) -> Option<InFlight> {
        let mut done = self.in_flight.take()?;
        done.job.end_time = Some(now);
        Some(done)
    }

    /// `(id, class)` of every job on the pad, in-flight first.
    #[must_use]
    pub fn entries(&self) -> Vec<(JobId, JobClass)> {
        let mut out = Vec::with_capacity(self.len());
        out.extend(self.in_flight.iter().map(|f| (f.job.id, f.job.class)));
        out.extend(self.waiting.iter().map(|j| (j.id, j.class)));
        out
    }
}

/// A service pad with its duration table and guarded state.
#[derive(Debug)]
pub struct Pad {
    id: PadId,
    table: ServiceTable,
    tick: Duration,
    state: Mutex<PadState>,
}

impl Pad {
    /// Create an idle pad whose queue holds at most `capacity` jobs.
    #[must_use]
    pub fn new(id: PadId, table: ServiceTable, tick: Duration, capacity: usize) -> Self {
        let name = match id {
            PadId::A => "pad_a",
            PadId::B => "pad_b",
        };
        Self {
            id,
            table,
            tick,
            state: Mutex::new(PadState {
                id,
                in_flight: None,
                waiting: JobQueue::new(name, capacity),
            }),
        }
    }

    /// Pad identifier.
    #[must_use]
    pub const fn id(&self) -> PadId {
        self.id
    }

    /// Duration table.
    #[must_use]
    pub const fn table(&self) -> &ServiceTable {
        &self.table
    }

    /// Time this pad takes to serve `class`.
    #[must_use]
    pub fn service_duration(&self, class: JobClass) -> Duration {
        self.table.duration(class, self.tick)
    }

    /// Lock the pad's state.
    pub fn lock(&self) -> MutexGuard<'_, PadState> {
        self.state.lock()
    }

    /// Estimated time until this pad can accept more work, in milliseconds.
    ///
    /// `started_at + duration(class) + bonus - now`, where `bonus` is one tick
    /// when an emergency already sits directly behind the in-flight job. May be
    /// negative once the job is logically done but not yet dequeued. `None`
    /// when the pad is not serving anything.
    #[must_use]
    pub fn estimate_remaining_ms(&self, state: &PadState, now: Duration) -> Option<i64> {
        let in_flight = state.in_flight.as_ref()?;
        let bonus = if state
            .waiting
            .peek_head()
            .is_some_and(|j| j.class == JobClass::Emergency)
        {
            self.tick
        } else {
            Duration::ZERO
        };
        let free_at = in_flight.started_at + self.service_duration(in_flight.job.class) + bonus;
        Some(signed_millis(free_at, now))
    }

    /// Whether the pad counts as idle for emergency routing: nothing in
    /// flight, or an in-flight job whose estimate has already run out.
    #[must_use]
    pub fn is_effectively_idle(&self, state: &PadState, now: Duration) -> bool {
        self.estimate_remaining_ms(state, now).is_none_or(|ms| ms <= 0)
    }

    /// Total service time of every job on the pad, in-flight included, using
    /// this pad's table.
    #[must_use]
    pub fn projected_load(&self, state: &PadState) -> Duration {
        let ticks: u32 = state
            .in_flight
            .iter()
            .map(|f| f.job.class)
            .chain(state.waiting.iter().map(|j| j.class))
            .map(|class| self.table.ticks(class))
            .sum();
        self.tick * ticks
    }
}
