//! Mermaid flowchart output, for embedding in markdown.

use waypoint_core::{DependencyGraph, TaskStatus};

/// Render the graph as a `flowchart TD` block with one CSS class per
/// status.
pub fn mermaid_graph(graph: &DependencyGraph) -> String {
    let mut out = String::from("flowchart TD\n");

    for node in &graph.nodes {
        let label = node.name.replace('"', "#quot;");
        out.push_str(&format!(
            "    T{}[\"{} {}\"]:::{}\n",
            node.id,
            node.id,
            label,
            class_name(node.status)
        ));
    }
    for edge in &graph.edges {
        out.push_str(&format!("    T{} --> T{}\n", edge.from, edge.to));
    }

    out.push_str("    classDef pending fill:#f4f4f4,stroke:#999\n");
    out.push_str("    classDef in_progress fill:#fff3bf,stroke:#e6a700\n");
    out.push_str("    classDef completed fill:#d3f9d8,stroke:#2b8a3e\n");
    out.push_str("    classDef failed fill:#ffe3e3,stroke:#c92a2a\n");
    out.push_str("    classDef skipped fill:#e7e7e7,stroke:#666\n");
    out
}

fn class_name(status: TaskStatus) -> &'static str {
    match status {
        TaskStatus::Pending => "pending",
        TaskStatus::InProgress => "in_progress",
        TaskStatus::Completed => "completed",
        TaskStatus::Failed => "failed",
        TaskStatus::Skipped => "skipped",
    }
}
