//! Shared fixtures for waypoint integration tests.
//!
//! Builds seeded engines backed by a [`MemoryStore`] so tests can both
//! drive the engine and observe what it persisted.

use waypoint_core::{MemoryStore, PlanEngine, TaskRef, TaskSeed};

/// Build seed tasks from `(name, dependency-names)` pairs.
pub fn seeds(specs: &[(&str, &[&str])]) -> Vec<TaskSeed> {
    specs
        .iter()
        .map(|(name, deps)| TaskSeed {
            name: (*name).to_owned(),
            reasoning: format!("reasoning for {name}"),
            dependencies: deps
                .iter()
                .map(|d| TaskRef::Name((*d).to_owned()))
                .collect(),
        })
        .collect()
}

/// An engine initialized with the given goal and tasks, plus a handle to
/// the memory store it persists into.
///
/// Panics on setup failure; fixtures have no error path worth testing.
pub fn seeded_engine(goal: &str, specs: &[(&str, &[&str])]) -> (PlanEngine, MemoryStore) {
    let store = MemoryStore::new();
    let mut engine =
        PlanEngine::open(Box::new(store.clone())).expect("opening on an empty store cannot fail");
    engine
        .initialize_plan(goal, &seeds(specs))
        .unwrap_or_else(|e| panic!("failed to initialize fixture plan: {e}"));
    (engine, store)
}

/// An engine with an empty plan and a memory store handle.
pub fn empty_engine() -> (PlanEngine, MemoryStore) {
    let store = MemoryStore::new();
    let engine =
        PlanEngine::open(Box::new(store.clone())).expect("opening on an empty store cannot fail");
    (engine, store)
}
