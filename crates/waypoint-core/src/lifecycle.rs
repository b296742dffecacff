//! Task lifecycle state machine.
//!
//! Enforces the per-task transition graph:
//!
//! ```text
//! pending     -> in_progress  (start_next: first executable in store order)
//! in_progress -> completed    (complete: only the task the engine started)
//! any         -> failed       (fail: no status precondition)
//! any         -> skipped      (skip: no status precondition)
//! ```
//!
//! Completion requires the formal start step; failure and skip do not.
//! That asymmetry is deliberate: a driver may abandon a task it never
//! started. Every function here validates before it mutates, so an error
//! return always leaves the plan exactly as it was.

use serde::Serialize;

use crate::analyzer::dependencies_satisfied;
use crate::error::EngineError;
use crate::model::{Plan, RunStatus, TaskId, TaskStatus};

/// Acknowledgement for operations that only need to name the task.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Ack {
    pub task_id: TaskId,
}

/// Acknowledgement for a completed task.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct CompletionAck {
    pub task_id: TaskId,
    /// True when every task in the plan is now completed or skipped.
    pub plan_completed: bool,
}

/// Acknowledgement for a failed task. `will_retry` echoes the caller's
/// retry intent; the engine itself never re-attempts anything.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct FailureAck {
    pub task_id: TaskId,
    pub will_retry: bool,
}

/// Summary of a plan reset.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ResetSummary {
    /// Number of tasks whose status was reset back to pending.
    pub reset_tasks: usize,
}

/// Start the first executable task in store order.
///
/// A task is executable when it is `pending` and every dependency id
/// resolves to a `completed` task. Selection assumes no task is currently
/// in progress; the engine rejects the call otherwise so the
/// single-in-progress invariant survives arbitrary call sequences.
pub fn start_next(plan: &mut Plan) -> Result<TaskId, EngineError> {
    if let Some(current) = plan.current_task_id {
        return Err(EngineError::TaskAlreadyStarted { id: current });
    }

    let idx = plan
        .tasks
        .iter()
        .position(|t| t.status == TaskStatus::Pending && dependencies_satisfied(plan, t));
    let Some(idx) = idx else {
        return Err(EngineError::NoExecutableTask);
    };

    let id = plan.tasks[idx].id;
    plan.tasks[idx].status = TaskStatus::InProgress;
    plan.current_task_id = Some(id);
    plan.status = RunStatus::Running;
    Ok(id)
}

/// Mark the in-progress task as completed and record its result.
///
/// Only valid for the task the engine itself started: anything else is an
/// `INVALID_STATUS` error. When the last unsettled task completes, the
/// plan's run status flips to `completed`.
pub fn complete(plan: &mut Plan, id: TaskId, result: &str) -> Result<CompletionAck, EngineError> {
    let Some(idx) = plan.position(id) else {
        return Err(EngineError::TaskNotFound { id });
    };
    if plan.tasks[idx].status != TaskStatus::InProgress {
        return Err(EngineError::InvalidTaskStatus {
            id,
            actual: plan.tasks[idx].status,
            expected: TaskStatus::InProgress,
        });
    }

    plan.tasks[idx].status = TaskStatus::Completed;
    plan.tasks[idx].result = Some(result.to_owned());
    if plan.current_task_id == Some(id) {
        plan.current_task_id = None;
    }

    let plan_completed = plan.tasks.iter().all(|t| t.is_settled());
    if plan_completed {
        plan.status = RunStatus::Completed;
    }

    Ok(CompletionAck {
        task_id: id,
        plan_completed,
    })
}

/// Mark a task as failed and record the error message.
///
/// No status precondition: a pending task may be failed pre-emptively.
pub fn fail(
    plan: &mut Plan,
    id: TaskId,
    error_message: &str,
    should_retry: bool,
) -> Result<FailureAck, EngineError> {
    let Some(idx) = plan.position(id) else {
        return Err(EngineError::TaskNotFound { id });
    };

    plan.tasks[idx].status = TaskStatus::Failed;
    plan.tasks[idx].result = Some(error_message.to_owned());
    if plan.current_task_id == Some(id) {
        plan.current_task_id = None;
    }

    Ok(FailureAck {
        task_id: id,
        will_retry: should_retry,
    })
}

/// Mark a task as skipped and record the reason. No status precondition.
pub fn skip(plan: &mut Plan, id: TaskId, reason: &str) -> Result<Ack, EngineError> {
    let Some(idx) = plan.position(id) else {
        return Err(EngineError::TaskNotFound { id });
    };

    plan.tasks[idx].status = TaskStatus::Skipped;
    plan.tasks[idx].result = Some(reason.to_owned());
    if plan.current_task_id == Some(id) {
        plan.current_task_id = None;
    }

    Ok(Ack { task_id: id })
}

/// Pause the plan. Always permitted.
pub fn pause(plan: &mut Plan) -> RunStatus {
    plan.status = RunStatus::Paused;
    plan.status
}

/// Resume a paused plan. Any other run status is rejected.
pub fn resume(plan: &mut Plan) -> Result<RunStatus, EngineError> {
    if plan.status != RunStatus::Paused {
        return Err(EngineError::InvalidPlanStatus {
            actual: plan.status,
            expected: RunStatus::Paused,
        });
    }
    plan.status = RunStatus::Running;
    Ok(plan.status)
}

/// Reset every task back to `pending`, clearing results, and return the
/// plan to `idle`. Structure, ids, goal, and creation time are preserved.
pub fn reset(plan: &mut Plan) -> ResetSummary {
    let mut reset_tasks = 0usize;
    for task in &mut plan.tasks {
        if task.status != TaskStatus::Pending {
            task.status = TaskStatus::Pending;
            task.result = None;
            reset_tasks += 1;
        }
    }
    plan.current_task_id = None;
    plan.status = RunStatus::Idle;
    ResetSummary { reset_tasks }
}
