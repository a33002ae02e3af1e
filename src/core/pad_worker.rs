//! Pad worker loop: `Idle -> Serving -> Idle` until the simulation ends.

use std::sync::Arc;

use crossbeam_channel::Sender;
use tracing::{debug, error, info};

use crate::core::{CompletionRecord, PadId, SchedulerError, SpaceportContext};

/// Worker serving one pad.
#[derive(Debug)]
pub struct PadWorker {
    ctx: Arc<SpaceportContext>,
    pad: PadId,
    completions: Sender<CompletionRecord>,
}

impl PadWorker {
    /// Worker for `pad`, emitting one record per finished job on `completions`.
    #[must_use]
    pub const fn new(
        ctx: Arc<SpaceportContext>,
        pad: PadId,
        completions: Sender<CompletionRecord>,
    ) -> Self {
        Self {
            ctx,
            pad,
            completions,
        }
    }

    /// Serve jobs until the simulation ends. Returns the number served.
    ///
    /// A job already in service always runs to completion; the end boundary is
    /// only checked between jobs.
    ///
    /// # Errors
    ///
    /// `SchedulerError::SinkClosed` when the completion consumer is gone; the
    /// run is aborted before returning.
    pub fn run(self) -> Result<u64, SchedulerError> {
        info!(pad = %self.pad, "pad worker started");
        let mut served: u64 = 0;
        while self.ctx.is_running() {
            match self.serve_next() {
                Ok(true) => served += 1,
                Ok(false) => self.ctx.sleep(self.ctx.timing().tick),
                Err(e) => {
                    error!(pad = %self.pad, error = %e, "pad worker aborting simulation");
                    self.ctx.abort();
                    return Err(e);
                }
            }
        }
        info!(pad = %self.pad, served, "pad worker stopped");
        Ok(served)
    }

    /// Serve the next waiting job, if any: start it, block for its service
    /// time, take it off the pad and emit its record. Returns `false` when the
    /// pad had nothing waiting.
    ///
    /// # Errors
    ///
    /// `SchedulerError::SinkClosed` when the record cannot be delivered.
    pub fn serve_next(&self) -> Result<bool, SchedulerError> {
        let pad = self.ctx.pad(self.pad);
        let (job_id, class, started_at) = {
            let mut state = pad.lock();
            let Some(in_flight) = state.begin_next(self.ctx.now()) else {
                return Ok(false);
            };
            (in_flight.job.id, in_flight.job.class, in_flight.started_at)
        };

        let service = pad.service_duration(class);
        debug!(pad = %self.pad, job_id, class = %class, ?service, "serving");
        self.ctx.sleep(service);

        let done = pad.lock().finish(self.ctx.now());
        let Some(done) = done else {
            return Ok(false);
        };
        let end_time = done.job.end_time.unwrap_or(started_at + service);
        let record = CompletionRecord::new(&done.job, self.pad, done.started_at, end_time);
        debug!(pad = %self.pad, job_id, turnaround = ?record.turnaround, "completed");
        self.completions
            .send(record)
            .map_err(|_| SchedulerError::SinkClosed)?;
        Ok(true)
    }
}
