//! TOML seed files for `waypoint init`.
//!
//! A seed file declares the goal and the initial tasks. Dependency
//! references may be task names or 1-based positions; resolution to ids
//! happens inside the engine.

use anyhow::{Context, Result};
use serde::Deserialize;

use waypoint_core::TaskSeed;

/// Top-level structure of a plan seed file.
#[derive(Debug, Clone, Deserialize)]
pub struct SeedFile {
    /// Free-text objective for the whole plan.
    pub goal: String,
    /// Tasks in declaration order.
    #[serde(default)]
    pub tasks: Vec<TaskSeed>,
}

/// Parse a seed file from TOML text.
pub fn parse_seed(content: &str) -> Result<SeedFile> {
    let seed: SeedFile = toml::from_str(content).context("failed to parse plan seed file")?;
    Ok(seed)
}

#[cfg(test)]
mod tests {
    use super::*;
    use waypoint_core::TaskRef;

    #[test]
    fn parse_minimal_seed() {
        let toml_str = r#"
goal = "Buy groceries"

[[tasks]]
name = "make a list"
reasoning = "know what to buy"

[[tasks]]
name = "go to the store"
reasoning = "need the list first"
dependencies = ["make a list"]
"#;
        let seed = parse_seed(toml_str).expect("should parse");
        assert_eq!(seed.goal, "Buy groceries");
        assert_eq!(seed.tasks.len(), 2);
        assert_eq!(
            seed.tasks[1].dependencies,
            vec![TaskRef::Name("make a list".into())]
        );
    }

    #[test]
    fn parse_mixed_reference_forms() {
        let toml_str = r#"
goal = "Mixed refs"

[[tasks]]
name = "first"

[[tasks]]
name = "second"
dependencies = [1]

[[tasks]]
name = "third"
dependencies = ["second", 1]
"#;
        let seed = parse_seed(toml_str).expect("should parse");
        assert_eq!(seed.tasks[1].dependencies, vec![TaskRef::Id(1)]);
        assert_eq!(
            seed.tasks[2].dependencies,
            vec![TaskRef::Name("second".into()), TaskRef::Id(1)]
        );
    }

    #[test]
    fn tasks_default_to_empty() {
        let seed = parse_seed("goal = \"bare\"").expect("should parse");
        assert!(seed.tasks.is_empty());
    }

    #[test]
    fn rejects_malformed_toml() {
        let err = parse_seed("goal = {{{").unwrap_err();
        assert!(
            err.to_string().contains("failed to parse plan seed file"),
            "unexpected: {err}"
        );
    }

    #[test]
    fn missing_goal_is_an_error() {
        let err = parse_seed("[[tasks]]\nname = \"x\"").unwrap_err();
        assert!(err.to_string().contains("failed to parse"), "unexpected: {err}");
    }
}
