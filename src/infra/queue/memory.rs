//! In-memory bounded job queue with priority insertion near the head.

use std::collections::vec_deque;
use std::collections::VecDeque;

use crate::core::{Job, SchedulerError};

/// Bounded, order-preserving queue of jobs.
///
/// Ordering is FIFO except for the two priority insertions used by emergency
/// dispatch. All operations are O(1) amortised; iteration is O(n).
#[derive(Debug)]
pub struct JobQueue {
    name: &'static str,
    capacity: usize,
    jobs: VecDeque<Job>,
}

impl JobQueue {
    /// Create an empty queue holding at most `capacity` jobs.
    #[must_use]
    pub fn new(name: &'static str, capacity: usize) -> Self {
        Self {
            name,
            capacity,
            jobs: VecDeque::with_capacity(capacity.min(1024)),
        }
    }

    /// Queue name used in errors and logs.
    #[must_use]
    pub const fn name(&self) -> &'static str {
        self.name
    }

    /// Fixed bound.
    #[must_use]
    pub const fn capacity(&self) -> usize {
        self.capacity
    }

    fn ensure_room(&self) -> Result<(), SchedulerError> {
        if self.jobs.len() >= self.capacity {
            return Err(SchedulerError::QueueFull {
                queue: self.name,
                capacity: self.capacity,
            });
        }
        Ok(())
    }

    /// Append at the tail (normal arrival).
    ///
    /// # Errors
    ///
    /// `SchedulerError::QueueFull` when the bound is reached.
    pub fn append(&mut self, job: Job) -> Result<(), SchedulerError> {
        self.ensure_room()?;
        self.jobs.push_back(job);
        Ok(())
    }

    /// Insert as the new head so the job is served next.
    ///
    /// # Errors
    ///
    /// `SchedulerError::QueueFull` when the bound is reached.
    pub fn insert_immediate(&mut self, job: Job) -> Result<(), SchedulerError> {
        self.ensure_room()?;
        self.jobs.push_front(job);
        Ok(())
    }

    /// Insert at the second position, directly behind the current head.
    /// On an empty queue the job becomes the head.
    ///
    /// # Errors
    ///
    /// `SchedulerError::QueueFull` when the bound is reached.
    pub fn insert_deferred(&mut self, job: Job) -> Result<(), SchedulerError> {
        self.ensure_room()?;
        let at = self.jobs.len().min(1);
        self.jobs.insert(at, job);
        Ok(())
    }

    /// Insert at position `index` (clamped to the length), shifting later
    /// jobs back by one.
    ///
    /// # Errors
    ///
    /// `SchedulerError::QueueFull` when the bound is reached.
    pub fn insert_at(&mut self, index: usize, job: Job) -> Result<(), SchedulerError> {
        self.ensure_room()?;
        let at = index.min(self.jobs.len());
        self.jobs.insert(at, job);
        Ok(())
    }

    /// Read the head without removing it.
    #[must_use]
    pub fn peek_head(&self) -> Option<&Job> {
        self.jobs.front()
    }

    /// Remove and return the head.
    pub fn remove_head(&mut self) -> Option<Job> {
        self.jobs.pop_front()
    }

    /// Number of queued jobs.
    #[must_use]
    pub fn len(&self) -> usize {
        self.jobs.len()
    }

    /// Whether the queue holds no jobs.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.jobs.is_empty()
    }

    /// Iterate head to tail.
    pub fn iter(&self) -> vec_deque::Iter<'_, Job> {
        self.jobs.iter()
    }
}

impl<'a> IntoIterator for &'a JobQueue {
    type Item = &'a Job;
    type IntoIter = vec_deque::Iter<'a, Job>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}
