//! Plan engine for a single agent's long-horizon task execution.
//!
//! The engine tracks one plan -- a goal plus an ordered, dependency-linked
//! set of tasks -- and exposes the operations an external driver (an LLM
//! agent or a human operator) uses to ask "what can run now", advance one
//! task at a time, and record outcomes. Persistence and rendering are
//! collaborators behind narrow seams: the [`snapshot::SnapshotStore`] hook
//! and the exported [`queries::DependencyGraph`] / [`model::Plan`] data.

pub mod analyzer;
pub mod engine;
pub mod error;
pub mod init;
pub mod lifecycle;
pub mod model;
pub mod mutate;
pub mod queries;
pub mod response;
pub mod snapshot;
pub mod store;

pub use engine::PlanEngine;
pub use error::EngineError;
pub use init::{InitSummary, TaskRef, TaskSeed};
pub use lifecycle::{Ack, CompletionAck, FailureAck, ResetSummary};
pub use model::{Plan, RunStatus, Task, TaskId, TaskStatus};
pub use mutate::{NewTask, TaskUpdate};
pub use queries::{DependencyGraph, GraphEdge, GraphNode, PlanStatusReport, TaskList};
pub use snapshot::{MemoryStore, NullStore, SnapshotStore};
