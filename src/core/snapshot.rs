//! Point-in-time view of all six queues for the reporter.

use std::fmt::Write as _;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::core::{Job, JobClass, JobId};

/// One queued job as seen by a snapshot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct QueueEntry {
    /// Job identifier.
    pub id: JobId,
    /// Job class.
    pub class: JobClass,
}

impl From<&Job> for QueueEntry {
    fn from(job: &Job) -> Self {
        Self {
            id: job.id,
            class: job.class,
        }
    }
}

/// Contents of every queue, head first. Pad lists start with the in-flight job.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SpaceportSnapshot {
    /// When the snapshot started.
    pub at: Duration,
    /// Pad A queue.
    pub pad_a: Vec<QueueEntry>,
    /// Pad B queue.
    pub pad_b: Vec<QueueEntry>,
    /// Landing staging queue.
    pub land: Vec<QueueEntry>,
    /// Launch staging queue.
    pub launch: Vec<QueueEntry>,
    /// Assembly staging queue.
    pub assembly: Vec<QueueEntry>,
    /// Emergency staging queue.
    pub emergency: Vec<QueueEntry>,
}

impl SpaceportSnapshot {
    /// Jobs seen across all queues.
    #[must_use]
    pub fn total(&self) -> usize {
        self.pad_a.len()
            + self.pad_b.len()
            + self.land.len()
            + self.launch.len()
            + self.assembly.len()
            + self.emergency.len()
    }

    /// Every id seen, in no particular order.
    #[must_use]
    pub fn ids(&self) -> Vec<JobId> {
        self.all().map(|e| e.id).collect()
    }

    fn all(&self) -> impl Iterator<Item = &QueueEntry> {
        self.pad_a
            .iter()
            .chain(&self.pad_b)
            .chain(&self.land)
            .chain(&self.launch)
            .chain(&self.assembly)
            .chain(&self.emergency)
    }

    /// Ids of `class` jobs, pads first (A then B) followed by the staging
    /// queue for that class.
    #[must_use]
    pub fn ids_of(&self, class: JobClass) -> Vec<JobId> {
        let staged = match class {
            JobClass::Landing => &self.land,
            JobClass::Departure => &self.launch,
            JobClass::Assembly => &self.assembly,
            JobClass::Emergency => &self.emergency,
        };
        self.pad_a
            .iter()
            .chain(&self.pad_b)
            .filter(|e| e.class == class)
            .chain(staged)
            .map(|e| e.id)
            .collect()
    }

    /// Six-line terminal report labelled with `at_secs`.
    #[must_use]
    pub fn render(&self, at_secs: u64) -> String {
        let rows = [
            ("landing", JobClass::Landing),
            ("launch", JobClass::Departure),
            ("assembly", JobClass::Assembly),
            ("emergency", JobClass::Emergency),
        ];

        let mut out = String::new();
        for (label, class) in rows {
            let _ = write!(out, "At {at_secs} sec {label:<11}: ");
            for id in self.ids_of(class) {
                let _ = write!(out, "{id} ");
            }
            out.push('\n');
        }
        for (label, pad) in [("padA", &self.pad_a), ("padB", &self.pad_b)] {
            let _ = write!(out, "At {at_secs} sec {label:<11}: ");
            for entry in pad {
                let _ = write!(out, "{}({}) ", entry.id, entry.class.code());
            }
            out.push('\n');
        }
        out
    }
}
