//! Builder for the shared scheduler context.

use std::sync::Arc;

use tracing::debug;

use crate::config::SimulationConfig;
use crate::core::{JobClass, SchedulerError, SpaceportContext, Timing};
use crate::util::Clock;

/// Build the shared context from configuration on the given clock.
///
/// Validates the configuration, sizes every queue from the horizon and, when
/// `seed_initial_launch` is set, stages one departure before any worker runs.
///
/// # Errors
///
/// `SchedulerError::InvalidConfig` when validation fails.
pub fn build_context(
    cfg: &SimulationConfig,
    clock: Arc<dyn Clock>,
) -> Result<Arc<SpaceportContext>, SchedulerError> {
    cfg.validate()?;

    let timing = Timing {
        tick: cfg.tick(),
        end_time: cfg.end_time(),
        tower_backoff: cfg.tower_backoff(),
    };
    let capacity = cfg.queue_capacity();
    let ctx = SpaceportContext::new(timing, cfg.dispatch_threshold, capacity, clock);

    if cfg.seed_initial_launch {
        let job = ctx.mint(JobClass::Departure);
        debug!(job_id = job.id, "initial launch staged");
        ctx.stage(job)?;
    }

    Ok(Arc::new(ctx))
}
