//! Graph mutation: adding, editing, and removing tasks.
//!
//! Insertion is the interesting path: adding a task at a position rewires
//! the dependency sets of everything downstream of the insertion anchor,
//! so a corrective task slots into the ordering without breaking consumers
//! of the original task. Removal deliberately does no such surgery; a
//! depended-upon task cannot be removed at all.

use serde::{Deserialize, Serialize};

use crate::analyzer::{dependents_of, validate_dependencies};
use crate::error::EngineError;
use crate::lifecycle::Ack;
use crate::model::{Plan, Task, TaskId, TaskStatus};

/// Parameters for [`add_task`].
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewTask {
    pub name: String,
    #[serde(default)]
    pub dependencies: Vec<TaskId>,
    #[serde(default)]
    pub reasoning: String,
    /// Insert immediately after this task and rewire its downstream
    /// dependents. Appends to the end when absent.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub after_id: Option<TaskId>,
}

/// Field updates for [`update_task`]. Absent fields are left unchanged.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TaskUpdate {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reasoning: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dependencies: Option<Vec<TaskId>>,
}

/// Add a task to the plan and return its id.
///
/// Dependencies must reference existing tasks and must not create a cycle
/// (checked with the new task's not-yet-assigned id as the candidate node).
///
/// With `after_id`, the task is inserted immediately after the referenced
/// position and every task after the insertion point whose dependencies
/// include `after_id` gains the new id as an additional dependency --
/// `after_id` stays where it was, the new id is appended. An `after_id`
/// that matches no task falls back to appending at the end.
pub fn add_task(plan: &mut Plan, new: NewTask) -> Result<TaskId, EngineError> {
    let id = plan.next_task_id();
    validate_dependencies(plan, id, &new.dependencies)?;

    let task = Task::new(id, &new.name, new.dependencies, &new.reasoning);

    let anchor = new.after_id.and_then(|after| plan.position(after));
    match (new.after_id, anchor) {
        (Some(after_id), Some(pos)) => {
            let insert_idx = pos + 1;
            plan.tasks.insert(insert_idx, task);
            // Dependency sets of tasks that already left `pending` are
            // frozen, so only pending downstream consumers are rewired.
            for downstream in plan.tasks.iter_mut().skip(insert_idx + 1) {
                if downstream.status == TaskStatus::Pending
                    && downstream.dependencies.contains(&after_id)
                    && !downstream.dependencies.contains(&id)
                {
                    downstream.dependencies.push(id);
                }
            }
        }
        _ => plan.tasks.push(task),
    }

    Ok(id)
}

/// Update a pending task's name, reasoning, or dependency set.
///
/// A replacement dependency set goes through the same existence and cycle
/// validation as an addition, with this task's own id as the candidate
/// node -- so an edit routing the graph back through itself is caught.
/// Validation runs before any field is touched.
pub fn update_task(plan: &mut Plan, id: TaskId, updates: TaskUpdate) -> Result<(), EngineError> {
    let Some(idx) = plan.position(id) else {
        return Err(EngineError::TaskNotFound { id });
    };
    if plan.tasks[idx].status != TaskStatus::Pending {
        return Err(EngineError::TaskNotEditable {
            id,
            status: plan.tasks[idx].status,
        });
    }

    if let Some(deps) = &updates.dependencies {
        validate_dependencies(plan, id, deps)?;
    }

    let task = &mut plan.tasks[idx];
    if let Some(name) = updates.name {
        task.name = name;
    }
    if let Some(reasoning) = updates.reasoning {
        task.reasoning = reasoning;
    }
    if let Some(deps) = updates.dependencies {
        task.dependencies = deps;
    }

    Ok(())
}

/// Remove a pending task that nothing depends on.
///
/// Pure deletion from the store: dependents block removal outright (the
/// error lists every referencing id) rather than being rewired.
pub fn remove_task(plan: &mut Plan, id: TaskId) -> Result<Ack, EngineError> {
    let Some(idx) = plan.position(id) else {
        return Err(EngineError::TaskNotFound { id });
    };
    if plan.tasks[idx].status != TaskStatus::Pending {
        return Err(EngineError::TaskNotRemovable {
            id,
            status: plan.tasks[idx].status,
        });
    }

    let dependents = dependents_of(plan, id);
    if !dependents.is_empty() {
        return Err(EngineError::TaskHasDependents { id, dependents });
    }

    plan.tasks.remove(idx);
    Ok(Ack { task_id: id })
}
