//! Tests for error types

use spaceport_tower::core::SchedulerError;

#[test]
fn test_queue_full_error() {
    let err = SchedulerError::QueueFull {
        queue: "land",
        capacity: 4,
    };
    assert_eq!(format!("{err}"), "queue full: land reached capacity 4");
}

#[test]
fn test_invalid_config_error() {
    let err = SchedulerError::InvalidConfig("tick_ms must be greater than 0".into());
    assert_eq!(
        format!("{err}"),
        "invalid configuration: tick_ms must be greater than 0"
    );
}

#[test]
fn test_sink_closed_error() {
    assert_eq!(format!("{}", SchedulerError::SinkClosed), "completion sink closed");
}

#[test]
fn test_io_error_converts() {
    let io = std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied");
    let err: SchedulerError = io.into();
    assert!(matches!(err, SchedulerError::Io(_)));
    assert_eq!(format!("{err}"), "io error: denied");
}

#[test]
fn test_worker_panicked_error() {
    let err = SchedulerError::WorkerPanicked("sp-tower".into());
    assert_eq!(format!("{err}"), "worker panicked: sp-tower");
}
