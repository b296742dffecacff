//! Engine error taxonomy.
//!
//! Every failure an operation can report maps to a stable wire code that
//! drivers dispatch on. The engine never terminates the process on these;
//! it returns the error and leaves the plan untouched.

use thiserror::Error;

use crate::model::{RunStatus, TaskId, TaskStatus};

/// Errors returned by plan engine operations.
#[derive(Debug, Error)]
pub enum EngineError {
    #[error("task {id} not found")]
    TaskNotFound { id: TaskId },

    #[error("no task is currently active")]
    NoCurrentTask,

    #[error("no executable tasks available")]
    NoExecutableTask,

    #[error("task {id} is {actual}, expected {expected}")]
    InvalidTaskStatus {
        id: TaskId,
        actual: TaskStatus,
        expected: TaskStatus,
    },

    #[error("plan is {actual}, expected {expected}")]
    InvalidPlanStatus { actual: RunStatus, expected: RunStatus },

    #[error("task {id} is already in progress")]
    TaskAlreadyStarted { id: TaskId },

    #[error("task {id} cannot be edited in {status} status")]
    TaskNotEditable { id: TaskId, status: TaskStatus },

    #[error("task {id} cannot be removed in {status} status")]
    TaskNotRemovable { id: TaskId, status: TaskStatus },

    #[error("dependency task {id} not found")]
    InvalidDependency { id: TaskId },

    #[error("dependency {dependency} of task {id} would create a cycle")]
    CircularDependency { id: TaskId, dependency: TaskId },

    #[error("dependency cycle involving tasks: {}", format_ids(.members))]
    CycleDetected { members: Vec<TaskId> },

    #[error("task {id} has dependent tasks: {}", format_ids(.dependents))]
    TaskHasDependents {
        id: TaskId,
        dependents: Vec<TaskId>,
    },

    #[error("task {task:?} references unknown dependency {reference:?}")]
    UnresolvedReference { task: String, reference: String },

    #[error("task {task:?} dependency name {reference:?} matches several tasks")]
    AmbiguousReference {
        task: String,
        reference: String,
        matches: Vec<TaskId>,
    },

    #[error("snapshot persistence failed: {0}")]
    Snapshot(#[from] anyhow::Error),
}

fn format_ids(ids: &[TaskId]) -> String {
    let strings: Vec<String> = ids.iter().map(|id| id.to_string()).collect();
    strings.join(", ")
}

impl EngineError {
    /// Stable wire code for this error, as dispatched on by drivers.
    pub fn code(&self) -> &'static str {
        match self {
            Self::TaskNotFound { .. } => "TASK_NOT_FOUND",
            Self::NoCurrentTask => "NO_CURRENT_TASK",
            Self::NoExecutableTask => "NO_EXECUTABLE_TASK",
            Self::InvalidTaskStatus { .. }
            | Self::InvalidPlanStatus { .. }
            | Self::TaskAlreadyStarted { .. } => "INVALID_STATUS",
            Self::TaskNotEditable { .. } => "TASK_NOT_EDITABLE",
            Self::TaskNotRemovable { .. } => "TASK_NOT_REMOVABLE",
            Self::InvalidDependency { .. } => "INVALID_DEPENDENCY",
            Self::CircularDependency { .. } | Self::CycleDetected { .. } => "CIRCULAR_DEPENDENCY",
            Self::TaskHasDependents { .. } => "TASK_HAS_DEPENDENTS",
            Self::UnresolvedReference { .. } | Self::AmbiguousReference { .. } => {
                "UNRESOLVED_REFERENCE"
            }
            Self::Snapshot(_) => "TOOL_EXECUTION_ERROR",
        }
    }

    /// Structured details for the error envelope, where the variant carries
    /// more than its message.
    pub fn details(&self) -> serde_json::Value {
        match self {
            Self::TaskNotFound { id }
            | Self::InvalidDependency { id }
            | Self::TaskAlreadyStarted { id } => {
                serde_json::json!({ "task_id": id })
            }
            Self::InvalidTaskStatus { id, actual, expected } => serde_json::json!({
                "task_id": id,
                "actual": actual.to_string(),
                "expected": expected.to_string(),
            }),
            Self::InvalidPlanStatus { actual, expected } => serde_json::json!({
                "actual": actual.to_string(),
                "expected": expected.to_string(),
            }),
            Self::TaskNotEditable { id, status } | Self::TaskNotRemovable { id, status } => {
                serde_json::json!({ "task_id": id, "status": status.to_string() })
            }
            Self::CircularDependency { id, dependency } => {
                serde_json::json!({ "task_id": id, "dependency": dependency })
            }
            Self::CycleDetected { members } => serde_json::json!({ "members": members }),
            Self::TaskHasDependents { id, dependents } => {
                serde_json::json!({ "task_id": id, "dependents": dependents })
            }
            Self::UnresolvedReference { task, reference } => {
                serde_json::json!({ "task": task, "reference": reference })
            }
            Self::AmbiguousReference {
                task,
                reference,
                matches,
            } => serde_json::json!({ "task": task, "reference": reference, "matches": matches }),
            Self::NoCurrentTask | Self::NoExecutableTask | Self::Snapshot(_) => {
                serde_json::json!({})
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn codes_are_stable() {
        let cases: Vec<(EngineError, &str)> = vec![
            (EngineError::TaskNotFound { id: 3 }, "TASK_NOT_FOUND"),
            (EngineError::NoCurrentTask, "NO_CURRENT_TASK"),
            (EngineError::NoExecutableTask, "NO_EXECUTABLE_TASK"),
            (
                EngineError::InvalidTaskStatus {
                    id: 1,
                    actual: TaskStatus::Pending,
                    expected: TaskStatus::InProgress,
                },
                "INVALID_STATUS",
            ),
            (
                EngineError::InvalidPlanStatus {
                    actual: RunStatus::Running,
                    expected: RunStatus::Paused,
                },
                "INVALID_STATUS",
            ),
            (EngineError::TaskAlreadyStarted { id: 1 }, "INVALID_STATUS"),
            (
                EngineError::TaskNotEditable {
                    id: 1,
                    status: TaskStatus::Completed,
                },
                "TASK_NOT_EDITABLE",
            ),
            (
                EngineError::TaskNotRemovable {
                    id: 1,
                    status: TaskStatus::Failed,
                },
                "TASK_NOT_REMOVABLE",
            ),
            (EngineError::InvalidDependency { id: 9 }, "INVALID_DEPENDENCY"),
            (
                EngineError::CircularDependency { id: 1, dependency: 2 },
                "CIRCULAR_DEPENDENCY",
            ),
            (
                EngineError::TaskHasDependents {
                    id: 1,
                    dependents: vec![2, 3],
                },
                "TASK_HAS_DEPENDENTS",
            ),
            (
                EngineError::UnresolvedReference {
                    task: "b".into(),
                    reference: "a".into(),
                },
                "UNRESOLVED_REFERENCE",
            ),
        ];
        for (err, code) in &cases {
            assert_eq!(err.code(), *code, "wrong code for {err}");
        }
    }

    #[test]
    fn dependents_listed_in_message_and_details() {
        let err = EngineError::TaskHasDependents {
            id: 1,
            dependents: vec![4, 7],
        };
        assert_eq!(err.to_string(), "task 1 has dependent tasks: 4, 7");
        assert_eq!(err.details()["dependents"], serde_json::json!([4, 7]));
    }
}
