//! Simulation clocks.
//!
//! Every timestamp in the simulation is a [`Duration`] measured from the start
//! of the run. Workers never read the wall clock directly; they go through a
//! [`Clock`] so tests can drive time by hand.

use std::thread;
use std::time::{Duration, Instant};

use parking_lot::Mutex;

/// Source of simulation time shared by every worker thread.
pub trait Clock: Send + Sync {
    /// Time elapsed since the simulation started.
    fn now(&self) -> Duration;

    /// Suspend the calling thread for `duration` of simulation time.
    fn sleep(&self, duration: Duration);
}

/// Wall-clock time anchored at construction.
#[derive(Debug, Clone, Copy)]
pub struct SystemClock {
    start: Instant,
}

impl SystemClock {
    /// Start a clock whose zero is "now".
    #[must_use]
    pub fn start() -> Self {
        Self {
            start: Instant::now(),
        }
    }
}

impl Default for SystemClock {
    fn default() -> Self {
        Self::start()
    }
}

impl Clock for SystemClock {
    fn now(&self) -> Duration {
        self.start.elapsed()
    }

    fn sleep(&self, duration: Duration) {
        thread::sleep(duration);
    }
}

/// Hand-driven clock for deterministic tests.
///
/// `sleep` advances the clock instead of blocking, so a single-threaded loop
/// driven by a `ManualClock` runs through its whole horizon instantly.
#[derive(Debug, Default)]
pub struct ManualClock {
    now: Mutex<Duration>,
}

impl ManualClock {
    /// Create a clock reading `start`.
    #[must_use]
    pub const fn at(start: Duration) -> Self {
        Self {
            now: Mutex::new(start),
        }
    }

    /// Move the clock forward.
    pub fn advance(&self, by: Duration) {
        *self.now.lock() += by;
    }

    /// Jump the clock to an absolute reading.
    pub fn set(&self, to: Duration) {
        *self.now.lock() = to;
    }
}

impl Clock for ManualClock {
    fn now(&self) -> Duration {
        *self.now.lock()
    }

    fn sleep(&self, duration: Duration) {
        self.advance(duration);
        thread::yield_now();
    }
}

/// Signed difference `a - b` in milliseconds.
#[must_use]
pub fn signed_millis(a: Duration, b: Duration) -> i64 {
    let a = i64::try_from(a.as_millis()).unwrap_or(i64::MAX);
    let b = i64::try_from(b.as_millis()).unwrap_or(i64::MAX);
    a.saturating_sub(b)
}
