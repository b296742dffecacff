//! Plan initialization with one-shot dependency reference resolution.
//!
//! Seed tasks may reference their dependencies by task name, by 1-based
//! position in the seed list, or by raw id (for re-seeding a plan whose
//! ids are already known). Ids are assigned sequentially from 1, so a
//! positional index and a raw id resolve identically; after this pass only
//! integer ids exist anywhere in the engine.

use chrono::Utc;
use serde::{Deserialize, Serialize};

use crate::analyzer::find_cycle;
use crate::error::EngineError;
use crate::model::{Plan, RunStatus, Task, TaskId};

/// One task in an initialization request.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TaskSeed {
    pub name: String,
    #[serde(default)]
    pub reasoning: String,
    #[serde(default)]
    pub dependencies: Vec<TaskRef>,
}

/// A dependency reference as supplied by a driver: either an integer
/// (1-based seed position, equivalently the id it will be assigned) or a
/// task name matched exactly against the seed list.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum TaskRef {
    Id(TaskId),
    Name(String),
}

/// Summary returned after a successful initialization.
#[derive(Debug, Clone, Serialize)]
pub struct InitSummary {
    pub goal: String,
    pub task_count: usize,
}

/// Build a fresh plan from a goal and seed tasks.
///
/// Resolution is a single pass over the seed list before any graph logic
/// runs: a name that matches zero or several seeds is rejected rather than
/// guessed at, and an out-of-range integer is rejected. The resolved graph
/// is then checked for cycles as a whole, since seeds may legitimately
/// reference tasks declared later in the list.
pub fn build_plan(goal: &str, seeds: &[TaskSeed]) -> Result<Plan, EngineError> {
    let mut tasks = Vec::with_capacity(seeds.len());

    for (i, seed) in seeds.iter().enumerate() {
        let id = (i + 1) as TaskId;
        let mut dependencies = Vec::with_capacity(seed.dependencies.len());
        for reference in &seed.dependencies {
            dependencies.push(resolve(seeds, seed, reference)?);
        }
        tasks.push(Task::new(id, &seed.name, dependencies, &seed.reasoning));
    }

    let now = Utc::now();
    let plan = Plan {
        goal: goal.to_owned(),
        tasks,
        status: RunStatus::Idle,
        current_task_id: None,
        created_at: now,
        updated_at: now,
    };

    if let Some(members) = find_cycle(&plan) {
        return Err(EngineError::CycleDetected { members });
    }

    Ok(plan)
}

fn resolve(seeds: &[TaskSeed], owner: &TaskSeed, reference: &TaskRef) -> Result<TaskId, EngineError> {
    match reference {
        TaskRef::Id(n) => {
            if *n >= 1 && (*n as usize) <= seeds.len() {
                Ok(*n)
            } else {
                Err(EngineError::UnresolvedReference {
                    task: owner.name.clone(),
                    reference: n.to_string(),
                })
            }
        }
        TaskRef::Name(name) => {
            let matches: Vec<TaskId> = seeds
                .iter()
                .enumerate()
                .filter(|(_, s)| s.name == *name)
                .map(|(i, _)| (i + 1) as TaskId)
                .collect();
            match matches.as_slice() {
                [only] => Ok(*only),
                [] => Err(EngineError::UnresolvedReference {
                    task: owner.name.clone(),
                    reference: name.clone(),
                }),
                _ => Err(EngineError::AmbiguousReference {
                    task: owner.name.clone(),
                    reference: name.clone(),
                    matches,
                }),
            }
        }
    }
}
