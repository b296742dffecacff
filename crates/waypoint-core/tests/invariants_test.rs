//! Structural invariant checks across operation sequences.
//!
//! After every operation -- successful or not -- the exported plan must
//! still be a DAG, at most one task may be in progress, and
//! `current_task_id` must mirror exactly that task.

use waypoint_core::{NewTask, PlanEngine, TaskStatus, TaskUpdate};
use waypoint_test_utils::seeded_engine;

/// Assert the invariants the engine promises after any call.
fn check_invariants(engine: &PlanEngine, context: &str) {
    let plan = engine.export_plan();
    plan.validate()
        .unwrap_or_else(|e| panic!("invariant broken after {context}: {e}"));

    let in_progress = plan
        .tasks
        .iter()
        .filter(|t| t.status == TaskStatus::InProgress)
        .count();
    assert!(in_progress <= 1, "{in_progress} tasks in progress after {context}");
    assert_eq!(
        plan.current_task_id.is_some(),
        in_progress == 1,
        "current_task_id mirror broken after {context}"
    );
}

#[test]
fn invariants_hold_across_a_mixed_operation_sequence() {
    let (mut engine, _) = seeded_engine(
        "stress",
        &[
            ("a", &[]),
            ("b", &["a"]),
            ("c", &["a"]),
            ("d", &["b", "c"]),
            ("e", &[]),
        ],
    );
    check_invariants(&engine, "init");

    // Each step is (description, operation). Failures are expected for
    // some steps; the invariants must hold either way.
    let steps: Vec<(&str, Box<dyn FnMut(&mut PlanEngine) -> bool>)> = vec![
        ("start a", Box::new(|e| e.start_next_task().is_ok())),
        ("double start", Box::new(|e| e.start_next_task().is_ok())),
        ("complete wrong task", Box::new(|e| e.complete_task(2, "x").is_ok())),
        ("complete a", Box::new(|e| e.complete_task(1, "done").is_ok())),
        (
            "add patch after a",
            Box::new(|e| {
                e.add_task(NewTask {
                    name: "patch".into(),
                    dependencies: vec![1],
                    reasoning: String::new(),
                    after_id: Some(1),
                })
                .is_ok()
            }),
        ),
        ("start next ready", Box::new(|e| e.start_next_task().is_ok())),
        ("fail b", Box::new(|e| e.fail_task(2, "broke", true).is_ok())),
        ("skip c", Box::new(|e| e.skip_task(3, "moot").is_ok())),
        (
            "cycle attempt",
            Box::new(|e| {
                e.update_task(
                    4,
                    TaskUpdate {
                        dependencies: Some(vec![4]),
                        ..Default::default()
                    },
                )
                .is_ok()
            }),
        ),
        ("remove depended-upon", Box::new(|e| e.remove_task(1).is_ok())),
        ("start next", Box::new(|e| e.start_next_task().is_ok())),
        ("pause", Box::new(|e| e.pause_plan().is_ok())),
        ("resume", Box::new(|e| e.resume_plan().is_ok())),
        ("reset", Box::new(|e| e.reset_plan().is_ok())),
        ("start after reset", Box::new(|e| e.start_next_task().is_ok())),
    ];

    for (context, mut op) in steps {
        let _ = op(&mut engine);
        check_invariants(&engine, context);
    }
}

#[test]
fn acyclicity_survives_every_successful_mutation() {
    let (mut engine, _) = seeded_engine("dag", &[("a", &[]), ("b", &["a"])]);

    for i in 0..10 {
        let anchor = if i % 2 == 0 { Some(1) } else { None };
        engine
            .add_task(NewTask {
                name: format!("t{i}"),
                dependencies: vec![1],
                reasoning: String::new(),
                after_id: anchor,
            })
            .unwrap();
        assert!(
            waypoint_core::analyzer::find_cycle(&engine.export_plan()).is_none(),
            "cycle after insertion {i}"
        );
    }
}
