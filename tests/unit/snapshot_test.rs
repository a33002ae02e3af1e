//! Tests for queue snapshots and the terminal report

use std::sync::Arc;
use std::time::Duration;

use spaceport_tower::core::{JobClass, PadId, Slot, SpaceportContext, Timing};
use spaceport_tower::util::ManualClock;

fn context() -> SpaceportContext {
    let timing = Timing {
        tick: Duration::from_secs(2),
        end_time: Duration::from_secs(121),
        tower_backoff: Duration::from_millis(100),
    };
    SpaceportContext::new(timing, 3, 32, Arc::new(ManualClock::default()))
}

#[test]
fn test_snapshot_lists_every_queue() {
    let ctx = context();
    let landing = ctx.mint(JobClass::Landing); // 1
    let launch = ctx.mint(JobClass::Departure); // 2
    let assembly = ctx.mint(JobClass::Assembly); // 3
    ctx.stage(landing).unwrap();
    {
        let mut a = ctx.pad_a.lock();
        a.admit(launch, Slot::Tail).unwrap();
        a.begin_next(Duration::ZERO);
    }
    ctx.pad_b.lock().admit(assembly, Slot::Tail).unwrap();

    let snap = ctx.snapshot();
    assert_eq!(snap.total(), 3);
    let mut ids = snap.ids();
    ids.sort_unstable();
    assert_eq!(ids, vec![1, 2, 3]);
    assert_eq!(snap.ids_of(JobClass::Departure), vec![2]);
    assert_eq!(snap.pad_a.len(), 1);
    assert_eq!(snap.pad_b[0].class, JobClass::Assembly);
}

#[test]
fn test_pad_entries_list_in_flight_first() {
    let ctx = context();
    {
        let mut b = ctx.pad(PadId::B).lock();
        b.admit(ctx.mint(JobClass::Assembly), Slot::Tail).unwrap();
        b.begin_next(Duration::ZERO);
        b.admit(ctx.mint(JobClass::Landing), Slot::Tail).unwrap();
        b.admit(ctx.mint(JobClass::Emergency), Slot::Immediate).unwrap();
    }
    let snap = ctx.snapshot();
    let ids: Vec<u64> = snap.pad_b.iter().map(|e| e.id).collect();
    assert_eq!(ids, vec![1, 3, 2]);
}

#[test]
fn test_render_report() {
    let ctx = context();
    ctx.stage(ctx.mint(JobClass::Landing)).unwrap();
    ctx.stage(ctx.mint(JobClass::Emergency)).unwrap();
    ctx.pad_a.lock().admit(ctx.mint(JobClass::Departure), Slot::Tail).unwrap();

    let text = ctx.snapshot().render(7);
    let lines: Vec<&str> = text.lines().collect();
    assert_eq!(
        lines,
        vec![
            "At 7 sec landing    : 1 ",
            "At 7 sec launch     : 3 ",
            "At 7 sec assembly   : ",
            "At 7 sec emergency  : 2 ",
            "At 7 sec padA       : 3(D) ",
            "At 7 sec padB       : ",
        ]
    );
}
