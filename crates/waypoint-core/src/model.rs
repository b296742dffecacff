use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Identifier of a task within a plan.
///
/// Ids are positive, unique within a plan, allocated as `max existing + 1`,
/// and never reused after removal.
pub type TaskId = u32;

// ---------------------------------------------------------------------------
// Enums
// ---------------------------------------------------------------------------

/// Lifecycle status of a task.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TaskStatus {
    Pending,
    InProgress,
    Completed,
    Failed,
    Skipped,
}

impl fmt::Display for TaskStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::Pending => "pending",
            Self::InProgress => "in_progress",
            Self::Completed => "completed",
            Self::Failed => "failed",
            Self::Skipped => "skipped",
        };
        f.write_str(s)
    }
}

impl FromStr for TaskStatus {
    type Err = TaskStatusParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "pending" => Ok(Self::Pending),
            "in_progress" => Ok(Self::InProgress),
            "completed" => Ok(Self::Completed),
            "failed" => Ok(Self::Failed),
            "skipped" => Ok(Self::Skipped),
            other => Err(TaskStatusParseError(other.to_owned())),
        }
    }
}

/// Error returned when parsing an invalid [`TaskStatus`] string.
#[derive(Debug, Clone)]
pub struct TaskStatusParseError(pub String);

impl fmt::Display for TaskStatusParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "invalid task status: {:?}", self.0)
    }
}

impl std::error::Error for TaskStatusParseError {}

// ---------------------------------------------------------------------------

/// Run state of the plan as a whole.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RunStatus {
    Idle,
    Running,
    Paused,
    Completed,
}

impl fmt::Display for RunStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::Idle => "idle",
            Self::Running => "running",
            Self::Paused => "paused",
            Self::Completed => "completed",
        };
        f.write_str(s)
    }
}

impl FromStr for RunStatus {
    type Err = RunStatusParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "idle" => Ok(Self::Idle),
            "running" => Ok(Self::Running),
            "paused" => Ok(Self::Paused),
            "completed" => Ok(Self::Completed),
            other => Err(RunStatusParseError(other.to_owned())),
        }
    }
}

/// Error returned when parsing an invalid [`RunStatus`] string.
#[derive(Debug, Clone)]
pub struct RunStatusParseError(pub String);

impl fmt::Display for RunStatusParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "invalid run status: {:?}", self.0)
    }
}

impl std::error::Error for RunStatusParseError {}

// ---------------------------------------------------------------------------
// Records
// ---------------------------------------------------------------------------

/// A task -- one unit of work within a plan.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Task {
    pub id: TaskId,
    pub name: String,
    pub status: TaskStatus,
    /// Ids of tasks that must reach `completed` before this task may start.
    /// Insertion order is preserved for display; duplicates carry no meaning.
    pub dependencies: Vec<TaskId>,
    /// Rationale for the task. Frozen once the task leaves `pending`.
    pub reasoning: String,
    /// Outcome text, set when the task is completed, failed, or skipped.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub result: Option<String>,
}

impl Task {
    /// Construct a new `pending` task with no result.
    pub fn new(id: TaskId, name: &str, dependencies: Vec<TaskId>, reasoning: &str) -> Self {
        Self {
            id,
            name: name.to_owned(),
            status: TaskStatus::Pending,
            dependencies,
            reasoning: reasoning.to_owned(),
            result: None,
        }
    }

    /// Whether the task has reached a terminal-or-skipped state that counts
    /// toward plan completion.
    pub fn is_settled(&self) -> bool {
        matches!(self.status, TaskStatus::Completed | TaskStatus::Skipped)
    }
}

/// The plan -- the full document for one agent session.
///
/// The plan exclusively owns its task records; `current_task_id` is a lookup
/// key into `tasks`, not a second owner.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Plan {
    pub goal: String,
    pub tasks: Vec<Task>,
    pub status: RunStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub current_task_id: Option<TaskId>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Plan {
    /// An empty plan with no goal and no tasks.
    pub fn empty() -> Self {
        let now = Utc::now();
        Self {
            goal: String::new(),
            tasks: Vec::new(),
            status: RunStatus::Idle,
            current_task_id: None,
            created_at: now,
            updated_at: now,
        }
    }

    /// Check the structural invariants of a plan document.
    ///
    /// Used when adopting a persisted snapshot: a plan that violates these
    /// was corrupted outside the engine and must not be loaded.
    ///
    /// - task ids are unique,
    /// - the dependency graph is acyclic,
    /// - at most one task is `in_progress`, and `current_task_id` points at
    ///   exactly that task (or is absent when no task is in progress).
    pub fn validate(&self) -> Result<(), String> {
        let mut seen = std::collections::HashSet::new();
        for task in &self.tasks {
            if !seen.insert(task.id) {
                return Err(format!("duplicate task id {}", task.id));
            }
        }

        if let Some(cycle) = crate::analyzer::find_cycle(self) {
            let ids: Vec<String> = cycle.iter().map(|id| id.to_string()).collect();
            return Err(format!(
                "dependency cycle involving tasks: {}",
                ids.join(", ")
            ));
        }

        let in_progress: Vec<TaskId> = self
            .tasks
            .iter()
            .filter(|t| t.status == TaskStatus::InProgress)
            .map(|t| t.id)
            .collect();
        match (in_progress.as_slice(), self.current_task_id) {
            ([], None) => {}
            ([only], Some(current)) if *only == current => {}
            ([], Some(current)) => {
                return Err(format!(
                    "current_task_id is {current} but no task is in progress"
                ));
            }
            ([only], other) => {
                return Err(format!(
                    "task {only} is in progress but current_task_id is {other:?}"
                ));
            }
            (many, _) => {
                let ids: Vec<String> = many.iter().map(|id| id.to_string()).collect();
                return Err(format!("multiple tasks in progress: {}", ids.join(", ")));
            }
        }

        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
