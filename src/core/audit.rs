//! Completion log sinks.
//!
//! Provides an in-memory sink for tests and the fixed-format `job.log` writer.
//! Sinks are owned by a single consumer thread fed through a channel, so only
//! one writer touches a sink at a time.

use std::collections::VecDeque;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};
use std::sync::Arc;

use crossbeam_channel::Receiver;
use parking_lot::Mutex;
use tracing::{debug, info};

use crate::core::{CompletionRecord, SchedulerError};

/// Completion sink abstraction.
pub trait CompletionSink: Send {
    /// Record one finished job.
    ///
    /// # Errors
    ///
    /// `SchedulerError::Io` when the record cannot be persisted.
    fn record(&mut self, record: &CompletionRecord) -> Result<(), SchedulerError>;

    /// Flush buffered output. The default does nothing.
    ///
    /// # Errors
    ///
    /// `SchedulerError::Io` on write failure.
    fn flush(&mut self) -> Result<(), SchedulerError> {
        Ok(())
    }
}

/// In-memory sink for testing and dev. Clones share one buffer, so a test can
/// keep a handle while the consumer thread owns another.
#[derive(Debug, Clone)]
pub struct InMemoryCompletionSink {
    records: Arc<Mutex<VecDeque<CompletionRecord>>>,
    max_records: usize,
}

impl InMemoryCompletionSink {
    /// Create a sink keeping the most recent `max_records`.
    #[must_use]
    pub fn new(max_records: usize) -> Self {
        Self {
            records: Arc::new(Mutex::new(VecDeque::with_capacity(max_records.min(1024)))),
            max_records,
        }
    }

    /// Retrieve a snapshot of stored records.
    #[must_use]
    pub fn records(&self) -> Vec<CompletionRecord> {
        self.records.lock().iter().cloned().collect()
    }
}

impl CompletionSink for InMemoryCompletionSink {
    fn record(&mut self, record: &CompletionRecord) -> Result<(), SchedulerError> {
        let mut records = self.records.lock();
        if records.len() >= self.max_records {
            records.pop_front();
        }
        records.push_back(record.clone());
        Ok(())
    }
}

/// Header written at the top of every job log.
pub const JOB_LOG_HEADER: &str = "EventID  Status  Request_Time  End_Time  Turnaround_Time  Pad\n\
-------------------------------------------------------------\n";

/// Fixed-width log line for one record, times in whole seconds.
#[must_use]
pub fn format_log_line(record: &CompletionRecord) -> String {
    format!(
        "{:<9}{:<8}{:<14}{:<10}{:<17}{}\n",
        record.id,
        record.class.code(),
        record.request_time.as_secs(),
        record.end_time.as_secs(),
        record.turnaround.as_secs(),
        record.pad,
    )
}

/// Append-only, human-readable job log file.
#[derive(Debug)]
pub struct FileJobLog {
    path: PathBuf,
    out: BufWriter<File>,
}

impl FileJobLog {
    /// Create (truncating) the log at `path` and write the header.
    ///
    /// # Errors
    ///
    /// `SchedulerError::Io` when the file cannot be created or written.
    pub fn create(path: impl AsRef<Path>) -> Result<Self, SchedulerError> {
        let path = path.as_ref().to_path_buf();
        let mut out = BufWriter::new(File::create(&path)?);
        out.write_all(JOB_LOG_HEADER.as_bytes())?;
        out.flush()?;
        info!(path = %path.display(), "job log created");
        Ok(Self { path, out })
    }

    /// Log file location.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl CompletionSink for FileJobLog {
    fn record(&mut self, record: &CompletionRecord) -> Result<(), SchedulerError> {
        self.out.write_all(format_log_line(record).as_bytes())?;
        self.out.flush()?;
        Ok(())
    }

    fn flush(&mut self) -> Result<(), SchedulerError> {
        self.out.flush()?;
        Ok(())
    }
}

/// Consume records until every sender is dropped. Returns the records seen.
///
/// # Errors
///
/// The first sink failure; remaining records are not consumed.
pub fn drain_completions<S>(
    completions: &Receiver<CompletionRecord>,
    sink: &mut S,
) -> Result<Vec<CompletionRecord>, SchedulerError>
where
    S: CompletionSink + ?Sized,
{
    let mut seen = Vec::new();
    for record in completions {
        sink.record(&record)?;
        debug!(job_id = record.id, pad = %record.pad, "completion logged");
        seen.push(record);
    }
    sink.flush()?;
    Ok(seen)
}
