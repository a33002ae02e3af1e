//! Jobs, job classes and completion records.

use std::fmt;
use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Process-wide job identifier, strictly increasing in assignment order.
pub type JobId = u64;

/// Traffic class of a job. Fixed at creation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum JobClass {
    /// Incoming spacecraft.
    Landing,
    /// Outgoing launch.
    Departure,
    /// Ground assembly work.
    Assembly,
    /// Emergency landing; always generated in pairs.
    Emergency,
}

impl JobClass {
    /// All classes in generator order.
    pub const ALL: [Self; 4] = [Self::Landing, Self::Departure, Self::Assembly, Self::Emergency];

    /// One-letter code used in logs and reports.
    #[must_use]
    pub const fn code(self) -> char {
        match self {
            Self::Landing => 'L',
            Self::Departure => 'D',
            Self::Assembly => 'A',
            Self::Emergency => 'E',
        }
    }
}

impl fmt::Display for JobClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.code())
    }
}

/// One of the two service pads.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PadId {
    /// Launch pad; serves departures, landings and emergencies.
    A,
    /// Assembly pad; serves assembly, landings and emergencies.
    B,
}

impl fmt::Display for PadId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::A => f.write_str("A"),
            Self::B => f.write_str("B"),
        }
    }
}

/// A unit of traffic moving through the spaceport.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Job {
    /// Unique identifier.
    pub id: JobId,
    /// Traffic class.
    pub class: JobClass,
    /// Creation time since simulation start.
    pub request_time: Duration,
    /// Completion time; `None` until the pad finishes it.
    pub end_time: Option<Duration>,
    /// Pad chosen by the control tower; `None` while staged.
    pub assigned_pad: Option<PadId>,
}

impl Job {
    /// Mint a staged job.
    #[must_use]
    pub const fn new(id: JobId, class: JobClass, request_time: Duration) -> Self {
        Self {
            id,
            class,
            request_time,
            end_time: None,
            assigned_pad: None,
        }
    }

    /// Record the tower's pad choice. A pad is assigned once; later calls keep
    /// the first choice.
    pub fn assign(&mut self, pad: PadId) {
        if self.assigned_pad.is_none() {
            self.assigned_pad = Some(pad);
        }
    }
}

/// Record emitted once per finished job, after it left its pad queue.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CompletionRecord {
    /// Job identifier.
    pub id: JobId,
    /// Job class.
    pub class: JobClass,
    /// Request time since simulation start.
    pub request_time: Duration,
    /// When the pad started serving the job.
    pub started_at: Duration,
    /// Completion time since simulation start.
    pub end_time: Duration,
    /// `end_time - request_time`.
    pub turnaround: Duration,
    /// Pad that served the job.
    pub pad: PadId,
}

impl CompletionRecord {
    /// Build the record for a finished job.
    #[must_use]
    pub fn new(job: &Job, pad: PadId, started_at: Duration, end_time: Duration) -> Self {
        Self {
            id: job.id,
            class: job.class,
            request_time: job.request_time,
            started_at,
            end_time,
            turnaround: end_time.saturating_sub(job.request_time),
            pad,
        }
    }

    /// Time the pad spent serving the job.
    #[must_use]
    pub const fn service_time(&self) -> Duration {
        self.end_time.saturating_sub(self.started_at)
    }
}
