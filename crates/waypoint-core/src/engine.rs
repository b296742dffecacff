//! The plan engine facade.
//!
//! Owns the in-memory plan and the injected snapshot hook. Every mutating
//! operation validates against the current store state, applies the
//! change, then persists exactly once; if the hook fails, the pre-operation
//! plan is restored so callers never observe a half-committed state. The
//! engine assumes one in-flight caller at a time -- serialization is the
//! surrounding driver's job.

use anyhow::Context;
use chrono::Utc;

use crate::error::EngineError;
use crate::init::{self, InitSummary, TaskSeed};
use crate::lifecycle::{self, Ack, CompletionAck, FailureAck, ResetSummary};
use crate::model::{Plan, RunStatus, Task, TaskId, TaskStatus};
use crate::mutate::{self, NewTask, TaskUpdate};
use crate::queries::{self, DependencyGraph, PlanStatusReport, TaskList};
use crate::snapshot::SnapshotStore;

pub struct PlanEngine {
    plan: Plan,
    store: Box<dyn SnapshotStore>,
}

impl PlanEngine {
    /// Open an engine on the given snapshot store: adopt the persisted
    /// plan if one exists (rejecting structurally corrupt snapshots), or
    /// start from an empty plan.
    pub fn open(store: Box<dyn SnapshotStore>) -> anyhow::Result<Self> {
        let plan = match store.load().context("failed to load plan snapshot")? {
            Some(plan) => {
                plan.validate()
                    .map_err(|reason| anyhow::anyhow!("persisted plan is invalid: {reason}"))?;
                plan
            }
            None => Plan::empty(),
        };
        Ok(Self { plan, store })
    }

    /// Persist after a successful mutation, restoring the pre-operation
    /// plan if the hook fails.
    fn commit<T>(&mut self, before: Plan, value: T) -> Result<T, EngineError> {
        self.plan.updated_at = Utc::now();
        match self.store.save(&self.plan) {
            Ok(()) => Ok(value),
            Err(e) => {
                self.plan = before;
                Err(EngineError::Snapshot(e))
            }
        }
    }

    // -------------------------------------------------------------------
    // Plan-level operations
    // -------------------------------------------------------------------

    /// Replace the entire plan with a new goal and seed tasks.
    pub fn initialize_plan(
        &mut self,
        goal: &str,
        seeds: &[TaskSeed],
    ) -> Result<InitSummary, EngineError> {
        let before = self.plan.clone();
        self.plan = init::build_plan(goal, seeds)?;
        tracing::info!(goal, task_count = seeds.len(), "plan initialized");
        self.commit(
            before,
            InitSummary {
                goal: goal.to_owned(),
                task_count: seeds.len(),
            },
        )
    }

    /// Pause the plan.
    pub fn pause_plan(&mut self) -> Result<RunStatus, EngineError> {
        let before = self.plan.clone();
        let status = lifecycle::pause(&mut self.plan);
        tracing::info!("plan paused");
        self.commit(before, status)
    }

    /// Resume a paused plan.
    pub fn resume_plan(&mut self) -> Result<RunStatus, EngineError> {
        let before = self.plan.clone();
        let status = lifecycle::resume(&mut self.plan)?;
        tracing::info!("plan resumed");
        self.commit(before, status)
    }

    /// Reset all task statuses to pending, preserving the plan's structure.
    pub fn reset_plan(&mut self) -> Result<ResetSummary, EngineError> {
        let before = self.plan.clone();
        let summary = lifecycle::reset(&mut self.plan);
        tracing::info!(reset_tasks = summary.reset_tasks, "plan reset");
        self.commit(before, summary)
    }

    // -------------------------------------------------------------------
    // Lifecycle operations
    // -------------------------------------------------------------------

    /// Start the first executable task in store order.
    pub fn start_next_task(&mut self) -> Result<Task, EngineError> {
        let before = self.plan.clone();
        let id = lifecycle::start_next(&mut self.plan)?;
        let task = self.cloned_task(id)?;
        tracing::info!(task_id = id, task_name = %task.name, "task started");
        self.commit(before, task)
    }

    /// Complete the in-progress task with a result.
    pub fn complete_task(&mut self, id: TaskId, result: &str) -> Result<CompletionAck, EngineError> {
        let before = self.plan.clone();
        let ack = lifecycle::complete(&mut self.plan, id, result)?;
        tracing::info!(task_id = id, plan_completed = ack.plan_completed, "task completed");
        self.commit(before, ack)
    }

    /// Fail a task, echoing the caller's retry intent.
    pub fn fail_task(
        &mut self,
        id: TaskId,
        error_message: &str,
        should_retry: bool,
    ) -> Result<FailureAck, EngineError> {
        let before = self.plan.clone();
        let ack = lifecycle::fail(&mut self.plan, id, error_message, should_retry)?;
        tracing::warn!(task_id = id, will_retry = should_retry, "task failed");
        self.commit(before, ack)
    }

    /// Skip a task with a reason.
    pub fn skip_task(&mut self, id: TaskId, reason: &str) -> Result<Ack, EngineError> {
        let before = self.plan.clone();
        let ack = lifecycle::skip(&mut self.plan, id, reason)?;
        tracing::info!(task_id = id, "task skipped");
        self.commit(before, ack)
    }

    // -------------------------------------------------------------------
    // Graph mutation
    // -------------------------------------------------------------------

    /// Add a task, optionally inserting after an existing one (which
    /// rewires downstream dependents onto the new task).
    pub fn add_task(&mut self, new: NewTask) -> Result<Task, EngineError> {
        let before = self.plan.clone();
        let id = mutate::add_task(&mut self.plan, new)?;
        let task = self.cloned_task(id)?;
        tracing::info!(task_id = id, task_name = %task.name, "task added");
        self.commit(before, task)
    }

    /// Update a pending task's editable fields.
    pub fn update_task(&mut self, id: TaskId, updates: TaskUpdate) -> Result<Task, EngineError> {
        let before = self.plan.clone();
        mutate::update_task(&mut self.plan, id, updates)?;
        let task = self.cloned_task(id)?;
        tracing::info!(task_id = id, "task updated");
        self.commit(before, task)
    }

    /// Remove a pending task that nothing depends on.
    pub fn remove_task(&mut self, id: TaskId) -> Result<Ack, EngineError> {
        let before = self.plan.clone();
        let ack = mutate::remove_task(&mut self.plan, id)?;
        tracing::info!(task_id = id, "task removed");
        self.commit(before, ack)
    }

    // -------------------------------------------------------------------
    // Queries (no persistence)
    // -------------------------------------------------------------------

    /// The task currently in progress.
    pub fn current_task(&self) -> Result<Task, EngineError> {
        queries::current_task(&self.plan).cloned()
    }

    /// A single task by id.
    pub fn task(&self, id: TaskId) -> Result<Task, EngineError> {
        self.plan
            .task(id)
            .cloned()
            .ok_or(EngineError::TaskNotFound { id })
    }

    /// All tasks, optionally filtered by status.
    pub fn task_list(&self, filter: Option<TaskStatus>) -> TaskList {
        queries::task_list(&self.plan, filter)
    }

    /// Per-status counts plus run state.
    pub fn plan_status(&self) -> PlanStatusReport {
        queries::plan_status(&self.plan)
    }

    /// Tasks that could be started right now, in store order.
    pub fn executable_tasks(&self) -> Vec<Task> {
        queries::executable_tasks(&self.plan)
            .into_iter()
            .cloned()
            .collect()
    }

    /// Node/edge export for the rendering collaborator.
    pub fn dependency_graph(&self) -> DependencyGraph {
        queries::dependency_graph(&self.plan)
    }

    /// Deep copy of the full plan document.
    pub fn export_plan(&self) -> Plan {
        self.plan.clone()
    }

    fn cloned_task(&self, id: TaskId) -> Result<Task, EngineError> {
        self.plan
            .task(id)
            .cloned()
            .ok_or(EngineError::TaskNotFound { id })
    }
}
