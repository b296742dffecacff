//! JSON file snapshot store.
//!
//! Implements the engine's [`SnapshotStore`] hook against a single file on
//! disk: the full plan document as pretty-printed JSON, written atomically
//! via a temp file in the target directory followed by a rename. A missing
//! file means "no snapshot yet"; a file that exists but does not parse is
//! an error for the driver to surface, never silently discarded.

use std::io::Write;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use tempfile::NamedTempFile;

use waypoint_core::{Plan, SnapshotStore};

/// Snapshot store backed by a JSON file.
#[derive(Debug, Clone)]
pub struct JsonFileStore {
    path: PathBuf,
}

impl JsonFileStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl SnapshotStore for JsonFileStore {
    fn load(&self) -> Result<Option<Plan>> {
        if !self.path.exists() {
            return Ok(None);
        }
        let contents = std::fs::read_to_string(&self.path)
            .with_context(|| format!("failed to read plan snapshot at {}", self.path.display()))?;
        let plan: Plan = serde_json::from_str(&contents)
            .with_context(|| format!("failed to parse plan snapshot at {}", self.path.display()))?;
        Ok(Some(plan))
    }

    fn save(&self, plan: &Plan) -> Result<()> {
        let parent = match self.path.parent() {
            Some(p) if !p.as_os_str().is_empty() => p,
            _ => Path::new("."),
        };
        std::fs::create_dir_all(parent)
            .with_context(|| format!("failed to create snapshot directory {}", parent.display()))?;

        let contents =
            serde_json::to_string_pretty(plan).context("failed to serialize plan snapshot")?;

        // Write-then-rename so a crash mid-save never truncates the
        // previous snapshot.
        let mut tmp = NamedTempFile::new_in(parent)
            .with_context(|| format!("failed to create temp file in {}", parent.display()))?;
        tmp.write_all(contents.as_bytes())
            .context("failed to write plan snapshot")?;
        tmp.as_file().sync_all().context("failed to sync plan snapshot")?;
        tmp.persist(&self.path)
            .with_context(|| format!("failed to persist snapshot to {}", self.path.display()))?;

        tracing::debug!(path = %self.path.display(), tasks = plan.tasks.len(), "snapshot saved");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use waypoint_core::{RunStatus, Task};

    fn sample_plan() -> Plan {
        let mut plan = Plan::empty();
        plan.goal = "test goal".into();
        plan.status = RunStatus::Running;
        plan.tasks.push(Task::new(1, "a", vec![], "first"));
        plan.tasks.push(Task::new(2, "b", vec![1], "second"));
        plan.current_task_id = None;
        plan
    }

    #[test]
    fn missing_file_loads_as_none() {
        let dir = tempfile::tempdir().unwrap();
        let store = JsonFileStore::new(dir.path().join("plan.json"));
        assert!(store.load().unwrap().is_none());
    }

    #[test]
    fn save_load_roundtrip() {
        let dir = tempfile::tempdir().unwrap();
        let store = JsonFileStore::new(dir.path().join("plan.json"));

        let plan = sample_plan();
        store.save(&plan).unwrap();
        let loaded = store.load().unwrap().expect("snapshot should exist");
        assert_eq!(loaded, plan);
    }

    #[test]
    fn save_creates_missing_parent_directories() {
        let dir = tempfile::tempdir().unwrap();
        let store = JsonFileStore::new(dir.path().join("nested/deeper/plan.json"));
        store.save(&sample_plan()).unwrap();
        assert!(store.path().exists());
    }

    #[test]
    fn save_overwrites_atomically() {
        let dir = tempfile::tempdir().unwrap();
        let store = JsonFileStore::new(dir.path().join("plan.json"));

        let mut plan = sample_plan();
        store.save(&plan).unwrap();
        plan.goal = "updated goal".into();
        store.save(&plan).unwrap();

        let loaded = store.load().unwrap().unwrap();
        assert_eq!(loaded.goal, "updated goal");
        // No stray temp files left behind.
        let entries: Vec<_> = std::fs::read_dir(dir.path()).unwrap().collect();
        assert_eq!(entries.len(), 1);
    }

    #[test]
    fn corrupt_snapshot_is_an_error_not_a_fresh_plan() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("plan.json");
        std::fs::write(&path, "{not valid json").unwrap();

        let store = JsonFileStore::new(&path);
        let err = store.load().unwrap_err();
        assert!(
            err.to_string().contains("failed to parse plan snapshot"),
            "unexpected error: {err}"
        );
    }

    #[test]
    fn snapshot_json_uses_wire_statuses() {
        let dir = tempfile::tempdir().unwrap();
        let store = JsonFileStore::new(dir.path().join("plan.json"));
        store.save(&sample_plan()).unwrap();

        let raw = std::fs::read_to_string(store.path()).unwrap();
        let value: serde_json::Value = serde_json::from_str(&raw).unwrap();
        assert_eq!(value["status"], "running");
        assert_eq!(value["tasks"][0]["status"], "pending");
    }
}
