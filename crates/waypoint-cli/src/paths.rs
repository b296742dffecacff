//! Plan file path resolution.
//!
//! Chain: `--plan` flag > `WAYPOINT_PLAN_FILE` env var > XDG data dir
//! default. The default always uses XDG layout (`$XDG_DATA_HOME/waypoint`
//! or `~/.local/share/waypoint`) rather than the platform-specific data
//! dir, so paths look the same in docs and scripts everywhere.

use std::path::PathBuf;

/// Return the waypoint data directory.
pub fn data_dir() -> PathBuf {
    if let Ok(xdg) = std::env::var("XDG_DATA_HOME") {
        return PathBuf::from(xdg).join("waypoint");
    }
    dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(".local")
        .join("share")
        .join("waypoint")
}

/// Resolve the plan snapshot path.
pub fn resolve_plan_path(cli_path: Option<&str>) -> PathBuf {
    if let Some(path) = cli_path {
        return PathBuf::from(path);
    }
    if let Ok(path) = std::env::var("WAYPOINT_PLAN_FILE") {
        return PathBuf::from(path);
    }
    data_dir().join("plan.json")
}
