//! Tests for utility functions

use std::time::Duration;

use spaceport_tower::util::{signed_millis, Clock, ManualClock, SystemClock};

#[test]
fn test_manual_clock_advance_and_set() {
    let clock = ManualClock::default();
    assert_eq!(clock.now(), Duration::ZERO);
    clock.advance(Duration::from_secs(4));
    assert_eq!(clock.now(), Duration::from_secs(4));
    clock.set(Duration::from_millis(1500));
    assert_eq!(clock.now(), Duration::from_millis(1500));
}

#[test]
fn test_manual_clock_sleep_does_not_block() {
    let clock = ManualClock::at(Duration::from_secs(1));
    clock.sleep(Duration::from_secs(3600));
    assert_eq!(clock.now(), Duration::from_secs(3601));
}

#[test]
fn test_system_clock_starts_near_zero() {
    let clock = SystemClock::start();
    assert!(clock.now() < Duration::from_secs(1));
}

#[test]
fn test_signed_millis() {
    let a = Duration::from_millis(2500);
    let b = Duration::from_millis(4000);
    assert_eq!(signed_millis(a, b), -1500);
    assert_eq!(signed_millis(b, a), 1500);
    assert_eq!(signed_millis(a, a), 0);
}
