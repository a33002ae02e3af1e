//! Tests for completion sinks

use std::time::Duration;

use spaceport_tower::core::{
    drain_completions, format_log_line, CompletionRecord, CompletionSink, FileJobLog,
    InMemoryCompletionSink, Job, JobClass, PadId, JOB_LOG_HEADER,
};

fn record(id: u64, class: JobClass, pad: PadId) -> CompletionRecord {
    let job = Job::new(id, class, Duration::from_secs(10));
    CompletionRecord::new(&job, pad, Duration::from_secs(12), Duration::from_secs(16))
}

#[test]
fn test_in_memory_sink() {
    let mut sink = InMemoryCompletionSink::new(10);
    sink.record(&record(1, JobClass::Departure, PadId::A)).unwrap();
    let records = sink.records();
    assert_eq!(records.len(), 1);
    assert_eq!(records[0].id, 1);
    assert_eq!(records[0].turnaround, Duration::from_secs(6));
    assert_eq!(records[0].service_time(), Duration::from_secs(4));
}

#[test]
fn test_in_memory_sink_overflow() {
    let mut sink = InMemoryCompletionSink::new(2);
    for id in 1..=3 {
        sink.record(&record(id, JobClass::Landing, PadId::B)).unwrap();
    }
    let ids: Vec<u64> = sink.records().iter().map(|r| r.id).collect();
    assert_eq!(ids, vec![2, 3]);
}

#[test]
fn test_log_line_columns() {
    let line = format_log_line(&record(104, JobClass::Emergency, PadId::A));
    assert_eq!(&line[0..9], "104      ");
    assert_eq!(&line[9..17], "E       ");
    assert_eq!(&line[17..31], "10            ");
    assert_eq!(&line[31..41], "16        ");
    assert_eq!(&line[41..58], "6                ");
    assert_eq!(&line[58..], "A\n");
}

#[test]
fn test_file_job_log() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("job.log");
    let mut log = FileJobLog::create(&path).unwrap();
    assert_eq!(log.path(), path.as_path());
    log.record(&record(1, JobClass::Departure, PadId::A)).unwrap();
    log.record(&record(2, JobClass::Assembly, PadId::B)).unwrap();
    log.flush().unwrap();

    let text = std::fs::read_to_string(&path).unwrap();
    assert!(text.starts_with(JOB_LOG_HEADER));
    let body: Vec<&str> = text[JOB_LOG_HEADER.len()..].lines().collect();
    assert_eq!(body.len(), 2);
    assert!(body[0].starts_with("1        D"));
    assert!(body[1].ends_with('B'));
}

#[test]
fn test_file_job_log_truncates() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("job.log");
    std::fs::write(&path, "stale contents\n").unwrap();
    drop(FileJobLog::create(&path).unwrap());
    assert_eq!(std::fs::read_to_string(&path).unwrap(), JOB_LOG_HEADER);
}

#[test]
fn test_drain_preserves_order() {
    let (tx, rx) = crossbeam_channel::bounded(4);
    let producer = std::thread::spawn(move || {
        for id in 1..=10 {
            tx.send(record(id, JobClass::Landing, PadId::A)).unwrap();
        }
    });
    let mut sink = InMemoryCompletionSink::new(100);
    let seen = drain_completions(&rx, &mut sink).unwrap();
    producer.join().unwrap();
    let ids: Vec<u64> = seen.iter().map(|r| r.id).collect();
    assert_eq!(ids, (1..=10).collect::<Vec<_>>());
}
