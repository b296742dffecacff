//! Indented tree view: dependents nested under their dependencies.
//!
//! A DAG is not a tree, so a task with several dependencies appears under
//! each of them; repeat visits are marked rather than expanded again.

use std::collections::{HashMap, HashSet};

use waypoint_core::{DependencyGraph, GraphNode, TaskId};

use crate::status_icon;

/// Render the graph as an indented tree rooted at dependency-free tasks.
pub fn tree_view(graph: &DependencyGraph) -> String {
    if graph.nodes.is_empty() {
        return "(no tasks)\n".to_owned();
    }

    let by_id: HashMap<TaskId, &GraphNode> = graph.nodes.iter().map(|n| (n.id, n)).collect();
    let mut children: HashMap<TaskId, Vec<TaskId>> = HashMap::new();
    let mut has_parent: HashSet<TaskId> = HashSet::new();
    for edge in &graph.edges {
        children.entry(edge.from).or_default().push(edge.to);
        // An edge from a dangling id gives the target no usable parent.
        if by_id.contains_key(&edge.from) {
            has_parent.insert(edge.to);
        }
    }

    let mut out = String::new();
    let mut expanded: HashSet<TaskId> = HashSet::new();
    for node in &graph.nodes {
        if !has_parent.contains(&node.id) {
            render_node(node.id, 0, &by_id, &children, &mut expanded, &mut out);
        }
    }
    out
}

fn render_node(
    id: TaskId,
    depth: usize,
    by_id: &HashMap<TaskId, &GraphNode>,
    children: &HashMap<TaskId, Vec<TaskId>>,
    expanded: &mut HashSet<TaskId>,
    out: &mut String,
) {
    let Some(node) = by_id.get(&id) else {
        return;
    };
    let indent = "  ".repeat(depth);
    let icon = status_icon(node.status);

    if !expanded.insert(id) {
        out.push_str(&format!("{indent}[{icon}] {} {} (see above)\n", id, node.name));
        return;
    }
    out.push_str(&format!("{indent}[{icon}] {} {}\n", id, node.name));

    if let Some(kids) = children.get(&id) {
        for kid in kids {
            render_node(*kid, depth + 1, by_id, children, expanded, out);
        }
    }
}
