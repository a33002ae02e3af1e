//! Tests for the bounded job queue

use std::time::Duration;

use spaceport_tower::core::{Job, JobClass, SchedulerError};
use spaceport_tower::infra::JobQueue;

fn job(id: u64, class: JobClass) -> Job {
    Job::new(id, class, Duration::from_secs(id))
}

fn ids(queue: &JobQueue) -> Vec<u64> {
    queue.iter().map(|j| j.id).collect()
}

#[test]
fn test_fifo_order() {
    let mut q = JobQueue::new("land", 8);
    for id in 1..=3 {
        q.append(job(id, JobClass::Landing)).unwrap();
    }
    assert_eq!(q.peek_head().unwrap().id, 1);
    assert_eq!(q.remove_head().unwrap().id, 1);
    assert_eq!(ids(&q), vec![2, 3]);
}

#[test]
fn test_empty_queue() {
    let mut q = JobQueue::new("launch", 2);
    assert!(q.is_empty());
    assert!(q.peek_head().is_none());
    assert!(q.remove_head().is_none());
}

#[test]
fn test_immediate_goes_to_front() {
    let mut q = JobQueue::new("pad_a", 8);
    q.append(job(1, JobClass::Landing)).unwrap();
    q.append(job(2, JobClass::Landing)).unwrap();
    q.insert_immediate(job(9, JobClass::Emergency)).unwrap();
    assert_eq!(ids(&q), vec![9, 1, 2]);
}

#[test]
fn test_deferred_goes_second() {
    let mut q = JobQueue::new("pad_b", 8);
    q.append(job(1, JobClass::Emergency)).unwrap();
    q.append(job(2, JobClass::Landing)).unwrap();
    q.insert_deferred(job(9, JobClass::Emergency)).unwrap();
    assert_eq!(ids(&q), vec![1, 9, 2]);
}

#[test]
fn test_deferred_into_empty_queue() {
    let mut q = JobQueue::new("pad_b", 8);
    q.insert_deferred(job(4, JobClass::Emergency)).unwrap();
    assert_eq!(ids(&q), vec![4]);
}

#[test]
fn test_capacity_is_enforced_for_every_insert() {
    let mut q = JobQueue::new("assembly", 2);
    q.append(job(1, JobClass::Assembly)).unwrap();
    q.append(job(2, JobClass::Assembly)).unwrap();
    for result in [
        q.append(job(3, JobClass::Assembly)),
        q.insert_immediate(job(4, JobClass::Emergency)),
        q.insert_deferred(job(5, JobClass::Emergency)),
        q.insert_at(1, job(6, JobClass::Emergency)),
    ] {
        assert!(matches!(
            result,
            Err(SchedulerError::QueueFull {
                queue: "assembly",
                capacity: 2
            })
        ));
    }
    assert_eq!(q.len(), 2);
    assert_eq!(q.name(), "assembly");
    assert_eq!(q.capacity(), 2);
}
