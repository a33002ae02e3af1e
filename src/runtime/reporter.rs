//! Periodic terminal report of every queue's contents.

use std::io::Write;
use std::sync::Arc;
use std::time::Duration;

use tracing::{error, info};

use crate::core::{SchedulerError, SpaceportContext};

/// Time between reports.
pub const REPORT_INTERVAL: Duration = Duration::from_secs(1);

/// Prints a snapshot once per [`REPORT_INTERVAL`], starting after an offset.
pub struct Reporter {
    ctx: Arc<SpaceportContext>,
    start_offset: Duration,
    out: Box<dyn Write + Send>,
}

impl Reporter {
    /// Reporter writing to `out`, silent until `start_offset` has elapsed.
    #[must_use]
    pub fn new(ctx: Arc<SpaceportContext>, start_offset: Duration, out: Box<dyn Write + Send>) -> Self {
        Self {
            ctx,
            start_offset,
            out,
        }
    }

    /// Report until the simulation ends. Returns the number of reports.
    ///
    /// # Errors
    ///
    /// `SchedulerError::Io` when the output cannot be written; the run is
    /// aborted before returning.
    pub fn run(mut self) -> Result<u64, SchedulerError> {
        let wait = self.start_offset.saturating_sub(self.ctx.now());
        if !wait.is_zero() {
            self.ctx.sleep(wait);
        }
        info!(offset = ?self.start_offset, "reporter started");

        let mut at_secs = self.start_offset.as_secs();
        let mut reports: u64 = 0;
        while self.ctx.is_running() {
            if let Err(e) = self.report(at_secs) {
                error!(error = %e, "reporter aborting simulation");
                self.ctx.abort();
                return Err(e);
            }
            reports += 1;
            at_secs += 1;
            self.ctx.sleep(REPORT_INTERVAL);
        }
        info!(reports, "reporter stopped");
        Ok(reports)
    }

    fn report(&mut self, at_secs: u64) -> Result<(), SchedulerError> {
        let text = self.ctx.snapshot().render(at_secs);
        writeln!(self.out, "{text}")?;
        self.out.flush()?;
        Ok(())
    }
}

impl std::fmt::Debug for Reporter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Reporter")
            .field("start_offset", &self.start_offset)
            .finish_non_exhaustive()
    }
}
