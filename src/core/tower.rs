//! Control tower: the dispatcher moving staged jobs onto the two pads.
//!
//! Every pass runs four policy steps in fixed priority order:
//!
//! 1. **Emergency draining**: each staged emergency goes to an idle pad at the
//!    immediate slot (Pad A first), or, with both pads busy, to the pad that
//!    will stay busy longer, at the deferred slot.
//! 2. **Landing dispatch**: while both ground backlogs are below the
//!    threshold, the oldest landing goes to the pad with less projected work.
//! 3. **Launch dispatch**: to Pad A when it is empty, or unconditionally once
//!    the launch backlog reaches the threshold.
//! 4. **Assembly dispatch**: the same, for Pad B.
//!
//! Steps take only the locks they need and release them before the next step;
//! pad workers and generators interleave freely between steps.

use std::sync::Arc;

use tracing::{debug, error, info, warn};

use crate::core::pad::{Pad, PadState, Slot};
use crate::core::{JobClass, PadId, SchedulerError, SpaceportContext};

/// Jobs moved by one pass, per step.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DispatchReport {
    /// Emergencies assigned.
    pub emergencies: usize,
    /// Landings assigned.
    pub landings: usize,
    /// Launches assigned to Pad A.
    pub launches: usize,
    /// Assembly jobs assigned to Pad B.
    pub assemblies: usize,
}

impl DispatchReport {
    /// Total jobs moved.
    #[must_use]
    pub const fn moved(&self) -> usize {
        self.emergencies + self.landings + self.launches + self.assemblies
    }
}

/// The dispatcher.
#[derive(Debug, Clone)]
pub struct ControlTower {
    ctx: Arc<SpaceportContext>,
}

impl ControlTower {
    /// Create a tower over the shared context.
    #[must_use]
    pub const fn new(ctx: Arc<SpaceportContext>) -> Self {
        Self { ctx }
    }

    /// Run passes until the simulation ends, pausing briefly between passes.
    ///
    /// # Errors
    ///
    /// The first fatal error a pass hits; the run is aborted before returning.
    pub fn run(&self) -> Result<(), SchedulerError> {
        info!("control tower started");
        let mut passes: u64 = 0;
        let mut moved: usize = 0;
        while self.ctx.is_running() {
            match self.pass() {
                Ok(report) => moved += report.moved(),
                Err(e) => {
                    error!(error = %e, "control tower aborting simulation");
                    self.ctx.abort();
                    return Err(e);
                }
            }
            passes += 1;
            self.ctx.sleep(self.ctx.timing().tower_backoff);
        }
        info!(passes, moved, "control tower stopped");
        Ok(())
    }

    /// One dispatcher pass: the four policy steps in priority order.
    ///
    /// # Errors
    ///
    /// `SchedulerError::QueueFull` when a pad queue overflows.
    pub fn pass(&self) -> Result<DispatchReport, SchedulerError> {
        Ok(DispatchReport {
            emergencies: self.drain_emergencies()?,
            landings: usize::from(self.dispatch_landing()?),
            launches: usize::from(self.dispatch_ground(JobClass::Departure)?),
            assemblies: usize::from(self.dispatch_ground(JobClass::Assembly)?),
        })
    }

    /// Assign every staged emergency. Returns how many were moved.
    ///
    /// # Errors
    ///
    /// `SchedulerError::QueueFull` when the chosen pad queue is full.
    pub fn drain_emergencies(&self) -> Result<usize, SchedulerError> {
        let ctx = &self.ctx;
        let mut staged = ctx.emergency.lock();
        if staged.is_empty() {
            return Ok(0);
        }
        let mut a = ctx.pad_a.lock();
        let mut b = ctx.pad_b.lock();

        let mut moved = 0;
        while let Some(job) = staged.remove_head() {
            let now = ctx.now();
            let (pad, slot) = route_emergency(&ctx.pad_a, &a, &ctx.pad_b, &b, now);
            debug!(job_id = job.id, pad = %pad, ?slot, "emergency assigned");
            match pad {
                PadId::A => a.admit(job, slot)?,
                PadId::B => b.admit(job, slot)?,
            }
            moved += 1;
        }
        Ok(moved)
    }

    /// Send the oldest landing to the less loaded pad, unless either ground
    /// backlog has reached the threshold. Returns whether a landing moved.
    ///
    /// # Errors
    ///
    /// `SchedulerError::QueueFull` when the chosen pad queue is full.
    pub fn dispatch_landing(&self) -> Result<bool, SchedulerError> {
        let ctx = &self.ctx;
        let threshold = ctx.dispatch_threshold();
        // Ground backlogs are read before the land queue is locked so no two
        // staging locks are ever held together.
        let launch_backlog = ctx.launch.lock().len();
        let assembly_backlog = ctx.assembly.lock().len();
        if launch_backlog >= threshold || assembly_backlog >= threshold {
            return Ok(false);
        }

        let mut land = ctx.land.lock();
        if land.is_empty() {
            return Ok(false);
        }

        let mut a = ctx.pad_a.lock();
        let mut b = ctx.pad_b.lock();
        let load_a = ctx.pad_a.projected_load(&a);
        let load_b = ctx.pad_b.projected_load(&b);
        let Some(job) = land.remove_head() else {
            return Ok(false);
        };
        let job_id = job.id;
        if load_a < load_b {
            a.admit(job, Slot::Tail)?;
            debug!(job_id, pad = "A", ?load_a, ?load_b, "landing assigned");
        } else {
            b.admit(job, Slot::Tail)?;
            debug!(job_id, pad = "B", ?load_a, ?load_b, "landing assigned");
        }
        Ok(true)
    }

    /// Launch (`Departure`) to Pad A or assembly to Pad B: dispatch when the
    /// pad is empty, or force one job through once the staging backlog reaches
    /// the threshold. Returns whether a job moved.
    ///
    /// # Errors
    ///
    /// `SchedulerError::QueueFull` when the pad queue is full.
    pub fn dispatch_ground(&self, class: JobClass) -> Result<bool, SchedulerError> {
        let ctx = &self.ctx;
        let pad = match class {
            JobClass::Departure => &ctx.pad_a,
            JobClass::Assembly => &ctx.pad_b,
            JobClass::Landing | JobClass::Emergency => return Ok(false),
        };
        let mut staged = ctx.staging(class).lock();
        let mut state = pad.lock();

        let backlog = staged.len();
        let forced = backlog >= ctx.dispatch_threshold();
        if !(forced || (state.is_empty() && backlog > 0)) {
            return Ok(false);
        }
        let Some(job) = staged.remove_head() else {
            return Ok(false);
        };
        if forced {
            warn!(job_id = job.id, backlog, pad = %pad.id(), "staging backlog at threshold, forcing dispatch");
        } else {
            debug!(job_id = job.id, pad = %pad.id(), "ground job assigned");
        }
        state.admit(job, Slot::Tail)?;
        Ok(true)
    }
}

/// Pick a pad and slot for one emergency.
///
/// Pad A if idle, else Pad B if idle (both immediate). With both busy, the pad
/// with the larger remaining estimate takes it at the deferred slot; equal
/// estimates go to Pad B.
fn route_emergency(
    pad_a: &Pad,
    a: &PadState,
    pad_b: &Pad,
    b: &PadState,
    now: std::time::Duration,
) -> (PadId, Slot) {
    if pad_a.is_effectively_idle(a, now) {
        return (PadId::A, Slot::Immediate);
    }
    if pad_b.is_effectively_idle(b, now) {
        return (PadId::B, Slot::Immediate);
    }
    let remaining_a = pad_a.estimate_remaining_ms(a, now).unwrap_or(0).max(0);
    let remaining_b = pad_b.estimate_remaining_ms(b, now).unwrap_or(0).max(0);
    if remaining_a > remaining_b {
        (PadId::A, Slot::Deferred)
    } else {
        (PadId::B, Slot::Deferred)
    }
}
