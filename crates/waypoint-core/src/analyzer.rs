//! Dependency analysis over the task store.
//!
//! Pure functions: satisfaction tests, dependent lookup, and cycle
//! detection. Cycle checks run before any edge is committed, so the stored
//! graph stays acyclic at all times.

use std::collections::{HashMap, HashSet, VecDeque};

use crate::error::EngineError;
use crate::model::{Plan, Task, TaskId, TaskStatus};

/// Whether every dependency of `task` resolves to an existing task with
/// status `completed`.
///
/// A dangling dependency id counts as unsatisfied, not as an error: the
/// task simply never becomes executable until the reference is fixed.
pub fn dependencies_satisfied(plan: &Plan, task: &Task) -> bool {
    task.dependencies.iter().all(|dep_id| {
        plan.task(*dep_id)
            .is_some_and(|dep| dep.status == TaskStatus::Completed)
    })
}

/// Ids of all tasks whose dependency set references `id`, in store order.
pub fn dependents_of(plan: &Plan, id: TaskId) -> Vec<TaskId> {
    plan.tasks
        .iter()
        .filter(|t| t.dependencies.contains(&id))
        .map(|t| t.id)
        .collect()
}

/// Validate a proposed dependency set for the candidate node `candidate`
/// (a not-yet-assigned id for additions, the task's own id for edits).
///
/// Existence is checked first so the more specific error wins: a dangling
/// id reports `INVALID_DEPENDENCY` even if a cycle would also exist.
pub fn validate_dependencies(
    plan: &Plan,
    candidate: TaskId,
    dependencies: &[TaskId],
) -> Result<(), EngineError> {
    for dep_id in dependencies {
        if plan.task(*dep_id).is_none() {
            return Err(EngineError::InvalidDependency { id: *dep_id });
        }
    }
    for dep_id in dependencies {
        if reaches(plan, *dep_id, candidate) {
            return Err(EngineError::CircularDependency {
                id: candidate,
                dependency: *dep_id,
            });
        }
    }
    Ok(())
}

/// Reachability over the existing dependency edges: is there a path from
/// `from` to `to` by repeatedly following dependency ids?
///
/// Visited tracking is per search start, which guarantees termination on
/// any finite graph. A `from == to` start is a path of length zero, which
/// is how self-references are caught.
fn reaches(plan: &Plan, from: TaskId, to: TaskId) -> bool {
    let mut visited: HashSet<TaskId> = HashSet::new();
    let mut stack = vec![from];
    while let Some(id) = stack.pop() {
        if id == to {
            return true;
        }
        if !visited.insert(id) {
            continue;
        }
        if let Some(task) = plan.task(id) {
            stack.extend(task.dependencies.iter().copied());
        }
    }
    false
}

/// Detect a cycle anywhere in the stored graph using Kahn's algorithm.
///
/// Returns the ids of tasks that could not be topologically sorted (the
/// members of at least one cycle), or `None` for a DAG. Used when adopting
/// whole graphs at once (initialization, snapshot load); incremental
/// mutations use [`validate_dependencies`] instead.
pub fn find_cycle(plan: &Plan) -> Option<Vec<TaskId>> {
    let ids: Vec<TaskId> = plan.tasks.iter().map(|t| t.id).collect();
    let index: HashMap<TaskId, usize> = ids.iter().enumerate().map(|(i, id)| (*id, i)).collect();

    let n = ids.len();
    let mut in_degree = vec![0usize; n];
    let mut adj: Vec<Vec<usize>> = vec![vec![]; n];

    for task in &plan.tasks {
        let task_idx = index[&task.id];
        for dep_id in &task.dependencies {
            // Dangling references cannot participate in a cycle.
            if let Some(&dep_idx) = index.get(dep_id) {
                adj[dep_idx].push(task_idx);
                in_degree[task_idx] += 1;
            }
        }
    }

    let mut queue: VecDeque<usize> = VecDeque::new();
    for (i, deg) in in_degree.iter().enumerate() {
        if *deg == 0 {
            queue.push_back(i);
        }
    }

    let mut sorted_count = 0usize;
    while let Some(node) = queue.pop_front() {
        sorted_count += 1;
        for &neighbor in &adj[node] {
            in_degree[neighbor] -= 1;
            if in_degree[neighbor] == 0 {
                queue.push_back(neighbor);
            }
        }
    }

    if sorted_count == n {
        return None;
    }
    Some(
        in_degree
            .iter()
            .enumerate()
            .filter(|(_, deg)| **deg > 0)
            .map(|(i, _)| ids[i])
            .collect(),
    )
}
