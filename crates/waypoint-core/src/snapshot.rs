//! Snapshot hook: the engine's only window to durable storage.
//!
//! The engine never touches files itself; a [`SnapshotStore`] is injected
//! by the driver and invoked exactly once per successful mutating
//! operation. [`MemoryStore`] and [`NullStore`] cover tests and ephemeral
//! sessions; the JSON file implementation lives in the `waypoint-store`
//! crate.

use std::cell::RefCell;
use std::rc::Rc;

use anyhow::Result;

use crate::model::Plan;

/// Load-or-initialize and save-after-mutation hooks.
pub trait SnapshotStore {
    /// Load the persisted plan, or `None` when no snapshot exists yet.
    fn load(&self) -> Result<Option<Plan>>;

    /// Persist the plan. Called once per successful mutating operation.
    fn save(&self, plan: &Plan) -> Result<()>;
}

/// In-memory store with a shareable handle, for tests and embedding.
///
/// Clones share the same underlying snapshot, so a test can keep one
/// handle while the engine owns another and observe what was persisted.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    inner: Rc<RefCell<MemoryInner>>,
}

#[derive(Debug, Default)]
struct MemoryInner {
    plan: Option<Plan>,
    saves: usize,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Pre-load a snapshot, as if a previous session had saved it.
    pub fn with_plan(plan: Plan) -> Self {
        let store = Self::new();
        store.inner.borrow_mut().plan = Some(plan);
        store
    }

    /// The most recently saved snapshot, if any.
    pub fn snapshot(&self) -> Option<Plan> {
        self.inner.borrow().plan.clone()
    }

    /// How many times `save` has been called.
    pub fn save_count(&self) -> usize {
        self.inner.borrow().saves
    }
}

impl SnapshotStore for MemoryStore {
    fn load(&self) -> Result<Option<Plan>> {
        Ok(self.inner.borrow().plan.clone())
    }

    fn save(&self, plan: &Plan) -> Result<()> {
        let mut inner = self.inner.borrow_mut();
        inner.plan = Some(plan.clone());
        inner.saves += 1;
        Ok(())
    }
}

/// A store that persists nothing. For ephemeral sessions.
#[derive(Debug, Clone, Copy, Default)]
pub struct NullStore;

impl SnapshotStore for NullStore {
    fn load(&self) -> Result<Option<Plan>> {
        Ok(None)
    }

    fn save(&self, _plan: &Plan) -> Result<()> {
        Ok(())
    }
}
