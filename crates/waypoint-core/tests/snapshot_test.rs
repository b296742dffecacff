//! Snapshot hook contract: persisted exactly once per successful mutation,
//! never on failure, with rollback when the hook itself fails; and the
//! export/reload round trip.

use std::cell::Cell;
use std::rc::Rc;

use waypoint_core::{
    MemoryStore, NewTask, Plan, PlanEngine, SnapshotStore, Task, TaskStatus,
};
use waypoint_test_utils::seeded_engine;

// ---------------------------------------------------------------------------
// Persistence cadence
// ---------------------------------------------------------------------------

#[test]
fn every_successful_mutation_persists_exactly_once() {
    let (mut engine, store) = seeded_engine("g", &[("a", &[]), ("b", &["a"])]);
    let base = store.save_count();

    engine.start_next_task().unwrap();
    assert_eq!(store.save_count(), base + 1);

    engine.complete_task(1, "ok").unwrap();
    assert_eq!(store.save_count(), base + 2);

    engine
        .add_task(NewTask {
            name: "c".into(),
            dependencies: vec![],
            reasoning: String::new(),
            after_id: None,
        })
        .unwrap();
    assert_eq!(store.save_count(), base + 3);

    engine.skip_task(3, "later").unwrap();
    assert_eq!(store.save_count(), base + 4);
}

#[test]
fn queries_never_persist() {
    let (engine, store) = seeded_engine("g", &[("a", &[])]);
    let base = store.save_count();

    let _ = engine.task_list(None);
    let _ = engine.plan_status();
    let _ = engine.executable_tasks();
    let _ = engine.dependency_graph();
    let _ = engine.export_plan();
    let _ = engine.current_task();

    assert_eq!(store.save_count(), base);
}

#[test]
fn failed_operations_never_persist() {
    let (mut engine, store) = seeded_engine("g", &[("a", &[])]);
    let base = store.save_count();

    assert!(engine.complete_task(1, "not started").is_err());
    assert!(engine.remove_task(99).is_err());
    assert!(engine.resume_plan().is_err());

    assert_eq!(store.save_count(), base);
}

// ---------------------------------------------------------------------------
// Hook failure rollback
// ---------------------------------------------------------------------------

/// A store whose `save` can be made to fail on demand.
#[derive(Clone)]
struct FlakyStore {
    fail: Rc<Cell<bool>>,
}

impl SnapshotStore for FlakyStore {
    fn load(&self) -> anyhow::Result<Option<Plan>> {
        Ok(None)
    }

    fn save(&self, _plan: &Plan) -> anyhow::Result<()> {
        if self.fail.get() {
            anyhow::bail!("disk full");
        }
        Ok(())
    }
}

#[test]
fn hook_failure_rolls_the_plan_back() {
    let fail = Rc::new(Cell::new(false));
    let store = FlakyStore { fail: fail.clone() };
    let mut engine = PlanEngine::open(Box::new(store)).unwrap();
    engine
        .initialize_plan("g", &waypoint_test_utils::seeds(&[("a", &[])]))
        .unwrap();

    fail.set(true);
    let err = engine.start_next_task().unwrap_err();
    assert_eq!(err.code(), "TOOL_EXECUTION_ERROR");

    // The start was undone: task a is still pending, nothing is current.
    assert_eq!(engine.task(1).unwrap().status, TaskStatus::Pending);
    assert_eq!(engine.plan_status().current_task_id, None);

    // Once the store recovers the same operation goes through.
    fail.set(false);
    assert_eq!(engine.start_next_task().unwrap().id, 1);
}

// ---------------------------------------------------------------------------
// Round trip
// ---------------------------------------------------------------------------

#[test]
fn export_reload_roundtrip_preserves_reports() {
    let (mut engine, _) = seeded_engine("g", &[("a", &[]), ("b", &["a"]), ("c", &["a"])]);
    engine.start_next_task().unwrap();
    engine.complete_task(1, "done").unwrap();
    engine.fail_task(3, "nope", false).unwrap();

    let exported = engine.export_plan();
    let reloaded =
        PlanEngine::open(Box::new(MemoryStore::with_plan(exported))).expect("snapshot is valid");

    assert_eq!(reloaded.plan_status(), engine.plan_status());
    assert_eq!(reloaded.task_list(None).tasks, engine.task_list(None).tasks);
    assert_eq!(reloaded.dependency_graph(), engine.dependency_graph());
}

#[test]
fn export_is_a_deep_copy() {
    let (mut engine, _) = seeded_engine("g", &[("a", &[])]);
    let exported = engine.export_plan();
    engine.start_next_task().unwrap();
    // The earlier export is unaffected by later engine mutations.
    assert_eq!(exported.tasks[0].status, TaskStatus::Pending);
}

#[test]
fn open_rejects_a_corrupt_snapshot() {
    let mut plan = Plan::empty();
    let mut a = Task::new(1, "a", vec![], "");
    let mut b = Task::new(2, "b", vec![], "");
    a.status = TaskStatus::InProgress;
    b.status = TaskStatus::InProgress;
    plan.tasks.push(a);
    plan.tasks.push(b);
    plan.current_task_id = Some(1);

    let result = PlanEngine::open(Box::new(MemoryStore::with_plan(plan)));
    let err = result.err().expect("two in-progress tasks must be rejected");
    assert!(
        err.to_string().contains("persisted plan is invalid"),
        "unexpected error: {err}"
    );
}

#[test]
fn open_resumes_from_the_persisted_snapshot() {
    let (mut engine, store) = seeded_engine("g", &[("a", &[]), ("b", &["a"])]);
    engine.start_next_task().unwrap();
    engine.complete_task(1, "ok").unwrap();
    drop(engine);

    // A new session on the same store picks up where the last one left off.
    let mut resumed = PlanEngine::open(Box::new(store)).unwrap();
    assert_eq!(resumed.task(1).unwrap().status, TaskStatus::Completed);
    let next = resumed.start_next_task().unwrap();
    assert_eq!(next.id, 2);
}
