//! Natural-language execution context for an LLM driver.
//!
//! Summarizes the exported plan -- goal, progress, what just happened,
//! what is active, what is ready, and what remains blocked -- in a shape
//! meant to be pasted into an agent's context window.

use waypoint_core::queries;
use waypoint_core::{Plan, TaskStatus};

/// Build a context prompt from an exported plan document.
pub fn context_prompt(plan: &Plan) -> String {
    let report = queries::plan_status(plan);
    let mut out = String::new();

    out.push_str(&format!("Goal: {}\n", plan.goal));
    out.push_str(&format!(
        "Progress: {} of {} tasks completed ({} failed, {} skipped). Plan is {}.\n",
        report.completed_tasks,
        report.total_tasks,
        report.failed_tasks,
        report.skipped_tasks,
        report.status,
    ));

    if let Ok(current) = queries::current_task(plan) {
        out.push_str(&format!(
            "\nCurrent task: [{}] {}\n  Why: {}\n",
            current.id, current.name, current.reasoning
        ));
    }

    let completed = plan.tasks_with_status(TaskStatus::Completed);
    if !completed.is_empty() {
        out.push_str("\nCompleted so far:\n");
        for task in completed {
            match &task.result {
                Some(result) => {
                    out.push_str(&format!("  [{}] {} -- {}\n", task.id, task.name, result))
                }
                None => out.push_str(&format!("  [{}] {}\n", task.id, task.name)),
            }
        }
    }

    let ready = queries::executable_tasks(plan);
    if !ready.is_empty() {
        out.push_str("\nReady to start:\n");
        for task in &ready {
            out.push_str(&format!("  [{}] {} -- {}\n", task.id, task.name, task.reasoning));
        }
    }

    let ready_ids: Vec<_> = ready.iter().map(|t| t.id).collect();
    let blocked: Vec<_> = plan
        .tasks_with_status(TaskStatus::Pending)
        .into_iter()
        .filter(|t| !ready_ids.contains(&t.id))
        .collect();
    if !blocked.is_empty() {
        out.push_str("\nBlocked (waiting on dependencies):\n");
        for task in blocked {
            let deps: Vec<String> = task.dependencies.iter().map(|d| d.to_string()).collect();
            out.push_str(&format!(
                "  [{}] {} -- needs {}\n",
                task.id,
                task.name,
                deps.join(", ")
            ));
        }
    }

    let failed = plan.tasks_with_status(TaskStatus::Failed);
    if !failed.is_empty() {
        out.push_str("\nFailed:\n");
        for task in failed {
            match &task.result {
                Some(msg) => out.push_str(&format!("  [{}] {} -- {}\n", task.id, task.name, msg)),
                None => out.push_str(&format!("  [{}] {}\n", task.id, task.name)),
            }
        }
    }

    out
}
