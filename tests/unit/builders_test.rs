//! Tests for context builder

use std::sync::Arc;
use std::time::Duration;

use spaceport_tower::builders::build_context;
use spaceport_tower::config::SimulationConfig;
use spaceport_tower::core::JobClass;
use spaceport_tower::util::ManualClock;

#[test]
fn test_build_context_from_config() {
    let cfg = SimulationConfig::default().with_tick_ms(500).with_horizon_secs(10);
    let ctx = build_context(&cfg, Arc::new(ManualClock::default())).unwrap();
    assert_eq!(ctx.timing().tick, Duration::from_millis(500));
    assert_eq!(ctx.timing().end_time, Duration::from_secs(11));
    assert_eq!(ctx.timing().tower_backoff, Duration::from_millis(25));
    assert_eq!(ctx.dispatch_threshold(), 3);
    assert_eq!(ctx.land.lock().capacity(), 4 * 21);
    assert_eq!(ctx.issued_ids(), 1);
    assert_eq!(ctx.launch.lock().peek_head().unwrap().class, JobClass::Departure);
}

#[test]
fn test_build_context_without_seed_launch() {
    let cfg = SimulationConfig {
        seed_initial_launch: false,
        ..SimulationConfig::default()
    };
    let ctx = build_context(&cfg, Arc::new(ManualClock::default())).unwrap();
    assert_eq!(ctx.issued_ids(), 0);
    assert!(ctx.launch.lock().is_empty());
    assert_eq!(ctx.mint(JobClass::Landing).id, 1);
}

#[test]
fn test_context_runs_until_end_time() {
    let clock = Arc::new(ManualClock::default());
    let cfg = SimulationConfig::default().with_horizon_secs(5);
    let ctx = build_context(&cfg, clock.clone()).unwrap();
    assert!(ctx.is_running());
    clock.set(Duration::from_secs(6));
    assert!(!ctx.is_running());
}

#[test]
fn test_abort_stops_run() {
    let ctx = build_context(&SimulationConfig::default(), Arc::new(ManualClock::default())).unwrap();
    ctx.abort();
    assert!(ctx.is_aborted());
    assert!(!ctx.is_running());
}
