//! Tests for configuration validation

use std::io::Write;
use std::time::Duration;

use spaceport_tower::config::SimulationConfig;
use spaceport_tower::core::SchedulerError;

#[test]
fn test_default_config_is_valid() {
    assert!(SimulationConfig::default().validate().is_ok());
}

#[test]
fn test_invalid_values_are_rejected() {
    let cases = [
        SimulationConfig::default().with_tick_ms(0),
        SimulationConfig::default().with_horizon_secs(0),
        SimulationConfig::default().with_ground_probability(1.5),
        SimulationConfig::default().with_ground_probability(-0.1),
        SimulationConfig::default().with_emergency_period(0),
        SimulationConfig {
            dispatch_threshold: 0,
            ..SimulationConfig::default()
        },
        SimulationConfig {
            queue_capacity: Some(0),
            ..SimulationConfig::default()
        },
        SimulationConfig {
            log_start_secs: 500,
            ..SimulationConfig::default()
        },
    ];
    for cfg in cases {
        assert!(
            matches!(cfg.validate(), Err(SchedulerError::InvalidConfig(_))),
            "accepted {cfg:?}"
        );
    }
}

#[test]
fn test_json_fills_defaults() {
    let cfg = SimulationConfig::from_json_str(r#"{ "tick_ms": 100, "seed": 7 }"#).unwrap();
    assert_eq!(cfg.tick(), Duration::from_millis(100));
    assert_eq!(cfg.seed, 7);
    assert_eq!(cfg.horizon_secs, 120);
    assert_eq!(cfg.emergency_period, 40);
    assert!(cfg.report);
    assert_eq!(cfg.horizon_ticks(), 1200);
    assert_eq!(cfg.queue_capacity(), 4 * 1201);
    assert_eq!(cfg.tower_backoff(), Duration::from_millis(5));
}

#[test]
fn test_json_rejects_invalid() {
    let err = SimulationConfig::from_json_str(r#"{ "ground_probability": 2.0 }"#).unwrap_err();
    assert!(matches!(err, SchedulerError::InvalidConfig(_)));
    let err = SimulationConfig::from_json_str("not json").unwrap_err();
    assert!(err.to_string().contains("parse error"));
}

#[test]
fn test_explicit_overrides() {
    let cfg = SimulationConfig::from_json_str(
        r#"{ "tower_backoff_ms": 7, "queue_capacity": 16, "log_path": "out/run.log" }"#,
    )
    .unwrap();
    assert_eq!(cfg.tower_backoff(), Duration::from_millis(7));
    assert_eq!(cfg.queue_capacity(), 16);
    assert_eq!(cfg.log_path, std::path::PathBuf::from("out/run.log"));
}

#[test]
fn test_json_file_round_trip() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    let cfg = SimulationConfig::default().with_seed(99).with_horizon_secs(30);
    write!(file, "{}", serde_json::to_string(&cfg).unwrap()).unwrap();
    let loaded = SimulationConfig::from_json_file(file.path()).unwrap();
    assert_eq!(loaded, cfg);
}

#[test]
fn test_missing_file_is_io_error() {
    let dir = tempfile::tempdir().unwrap();
    let err = SimulationConfig::from_json_file(dir.path().join("absent.json")).unwrap_err();
    assert!(matches!(err, SchedulerError::Io(_)));
}

#[test]
fn test_vars_override_log_settings() {
    let cfg = SimulationConfig::from_vars(|k| match k {
        "SPACEPORT_LOG_START_SECS" => Some("20".into()),
        "SPACEPORT_LOG_PATH" => Some("/tmp/jobs.log".into()),
        "SPACEPORT_EMERGENCY_PERIOD" => Some(" 10 ".into()),
        _ => None,
    })
    .unwrap();
    assert_eq!(cfg.log_start_secs, 20);
    assert_eq!(cfg.emergency_period, 10);
    assert_eq!(cfg.log_path, std::path::PathBuf::from("/tmp/jobs.log"));
}
