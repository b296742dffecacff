//! Read-only queries over the plan.
//!
//! None of these mutate or persist anything; they are the engine's
//! reporting surface, including the graph export consumed by the
//! rendering collaborator.

use serde::{Deserialize, Serialize};

use crate::analyzer::dependencies_satisfied;
use crate::error::EngineError;
use crate::model::{Plan, RunStatus, Task, TaskId, TaskStatus};

/// Listing of tasks with total and post-filter counts.
#[derive(Debug, Clone, Serialize)]
pub struct TaskList {
    pub tasks: Vec<Task>,
    pub total: usize,
    pub filtered: usize,
}

/// Per-status counts plus the plan-level run state.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PlanStatusReport {
    pub status: RunStatus,
    pub current_task_id: Option<TaskId>,
    pub total_tasks: usize,
    pub pending_tasks: usize,
    pub in_progress_tasks: usize,
    pub completed_tasks: usize,
    pub failed_tasks: usize,
    pub skipped_tasks: usize,
}

/// The dependency graph in node/edge form. An edge runs from the
/// dependency to the task that depends on it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DependencyGraph {
    pub nodes: Vec<GraphNode>,
    pub edges: Vec<GraphEdge>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GraphNode {
    pub id: TaskId,
    pub name: String,
    pub status: TaskStatus,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GraphEdge {
    pub from: TaskId,
    pub to: TaskId,
}

/// The task currently in progress.
pub fn current_task(plan: &Plan) -> Result<&Task, EngineError> {
    let Some(id) = plan.current_task_id else {
        return Err(EngineError::NoCurrentTask);
    };
    plan.task(id).ok_or(EngineError::TaskNotFound { id })
}

/// All tasks, optionally filtered by status, preserving store order.
pub fn task_list(plan: &Plan, filter: Option<TaskStatus>) -> TaskList {
    let tasks: Vec<Task> = match filter {
        Some(status) => plan
            .tasks_with_status(status)
            .into_iter()
            .cloned()
            .collect(),
        None => plan.tasks.clone(),
    };
    TaskList {
        total: plan.tasks.len(),
        filtered: tasks.len(),
        tasks,
    }
}

/// Status counts and run state.
pub fn plan_status(plan: &Plan) -> PlanStatusReport {
    let mut report = PlanStatusReport {
        status: plan.status,
        current_task_id: plan.current_task_id,
        total_tasks: plan.tasks.len(),
        pending_tasks: 0,
        in_progress_tasks: 0,
        completed_tasks: 0,
        failed_tasks: 0,
        skipped_tasks: 0,
    };
    for task in &plan.tasks {
        match task.status {
            TaskStatus::Pending => report.pending_tasks += 1,
            TaskStatus::InProgress => report.in_progress_tasks += 1,
            TaskStatus::Completed => report.completed_tasks += 1,
            TaskStatus::Failed => report.failed_tasks += 1,
            TaskStatus::Skipped => report.skipped_tasks += 1,
        }
    }
    report
}

/// Tasks that could be started right now: pending, with every dependency
/// completed. Store order is preserved.
pub fn executable_tasks(plan: &Plan) -> Vec<&Task> {
    plan.tasks
        .iter()
        .filter(|t| t.status == TaskStatus::Pending && dependencies_satisfied(plan, t))
        .collect()
}

/// Export the dependency graph for rendering.
pub fn dependency_graph(plan: &Plan) -> DependencyGraph {
    let mut nodes = Vec::with_capacity(plan.tasks.len());
    let mut edges = Vec::new();
    for task in &plan.tasks {
        nodes.push(GraphNode {
            id: task.id,
            name: task.name.clone(),
            status: task.status,
        });
        for dep_id in &task.dependencies {
            edges.push(GraphEdge {
                from: *dep_id,
                to: task.id,
            });
        }
    }
    DependencyGraph { nodes, edges }
}
