//! Read-only renderers for the plan's dependency graph.
//!
//! Everything here consumes the engine's exported data -- the node/edge
//! graph and the deep-copied plan document -- and produces plain text.
//! Nothing in this crate can mutate a plan.

mod ascii;
mod mermaid;
mod prompt;
mod tree;

pub use ascii::ascii_graph;
pub use mermaid::mermaid_graph;
pub use prompt::context_prompt;
pub use tree::tree_view;

use waypoint_core::TaskStatus;

/// One-character status marker shared by the text renderers.
pub(crate) fn status_icon(status: TaskStatus) -> char {
    match status {
        TaskStatus::Pending => '.',
        TaskStatus::InProgress => '*',
        TaskStatus::Completed => '+',
        TaskStatus::Failed => '!',
        TaskStatus::Skipped => '~',
    }
}
