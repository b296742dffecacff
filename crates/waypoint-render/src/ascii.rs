//! Layered ASCII listing of the dependency graph.
//!
//! Tasks are grouped into levels by their longest dependency chain, so a
//! reader sees execution waves: everything in level 0 could run first,
//! level 1 waits on level 0, and so on.

use std::collections::HashMap;

use waypoint_core::{DependencyGraph, TaskId};

use crate::status_icon;

/// Render the graph as a level-by-level listing.
pub fn ascii_graph(graph: &DependencyGraph) -> String {
    if graph.nodes.is_empty() {
        return "(no tasks)\n".to_owned();
    }

    let depths = depths(graph);
    let max_depth = depths.values().copied().max().unwrap_or(0);

    // Dependencies of each node, for the annotation column.
    let mut deps: HashMap<TaskId, Vec<TaskId>> = HashMap::new();
    for edge in &graph.edges {
        deps.entry(edge.to).or_default().push(edge.from);
    }

    let mut out = String::new();
    for level in 0..=max_depth {
        out.push_str(&format!("Level {level}:\n"));
        for node in &graph.nodes {
            if depths.get(&node.id) != Some(&level) {
                continue;
            }
            let icon = status_icon(node.status);
            match deps.get(&node.id) {
                Some(dep_ids) => {
                    let list: Vec<String> = dep_ids.iter().map(|id| id.to_string()).collect();
                    out.push_str(&format!(
                        "  [{icon}] {} {}  (needs: {})\n",
                        node.id,
                        node.name,
                        list.join(", ")
                    ));
                }
                None => out.push_str(&format!("  [{icon}] {} {}\n", node.id, node.name)),
            }
        }
    }
    out
}

/// Longest-chain depth per node. Dangling or cyclic references are
/// treated as depth 0 anchors so rendering always terminates.
fn depths(graph: &DependencyGraph) -> HashMap<TaskId, usize> {
    let mut deps: HashMap<TaskId, Vec<TaskId>> = HashMap::new();
    for edge in &graph.edges {
        deps.entry(edge.to).or_default().push(edge.from);
    }
    let known: std::collections::HashSet<TaskId> = graph.nodes.iter().map(|n| n.id).collect();

    let mut memo: HashMap<TaskId, usize> = HashMap::new();
    for node in &graph.nodes {
        depth_of(node.id, &deps, &known, &mut memo, &mut Vec::new());
    }
    memo
}

fn depth_of(
    id: TaskId,
    deps: &HashMap<TaskId, Vec<TaskId>>,
    known: &std::collections::HashSet<TaskId>,
    memo: &mut HashMap<TaskId, usize>,
    trail: &mut Vec<TaskId>,
) -> usize {
    if let Some(d) = memo.get(&id) {
        return *d;
    }
    if trail.contains(&id) {
        return 0;
    }
    trail.push(id);
    let depth = deps
        .get(&id)
        .map(|ds| {
            ds.iter()
                .filter(|d| known.contains(d))
                .map(|d| depth_of(*d, deps, known, memo, trail) + 1)
                .max()
                .unwrap_or(0)
        })
        .unwrap_or(0);
    trail.pop();
    memo.insert(id, depth);
    depth
}

#[cfg(test)]
mod tests {
    use super::*;
    use waypoint_core::{GraphEdge, GraphNode, TaskStatus};

    fn diamond() -> DependencyGraph {
        DependencyGraph {
            nodes: vec![
                GraphNode { id: 1, name: "a".into(), status: TaskStatus::Completed },
                GraphNode { id: 2, name: "b".into(), status: TaskStatus::InProgress },
                GraphNode { id: 3, name: "c".into(), status: TaskStatus::Pending },
                GraphNode { id: 4, name: "d".into(), status: TaskStatus::Pending },
            ],
            edges: vec![
                GraphEdge { from: 1, to: 2 },
                GraphEdge { from: 1, to: 3 },
                GraphEdge { from: 2, to: 4 },
                GraphEdge { from: 3, to: 4 },
            ],
        }
    }

    #[test]
    fn levels_follow_longest_chains() {
        let out = ascii_graph(&diamond());
        let level1_pos = out.find("Level 1:").unwrap();
        let level2_pos = out.find("Level 2:").unwrap();
        assert!(out.find("1 a").unwrap() < level1_pos);
        assert!(out.find("2 b").unwrap() > level1_pos);
        assert!(out.find("4 d").unwrap() > level2_pos);
    }

    #[test]
    fn annotates_dependencies_and_status() {
        let out = ascii_graph(&diamond());
        assert!(out.contains("[+] 1 a"), "completed icon: {out}");
        assert!(out.contains("[*] 2 b  (needs: 1)"), "in-progress icon: {out}");
        assert!(out.contains("(needs: 2, 3)"), "d needs both branches: {out}");
    }

    #[test]
    fn empty_graph_renders_placeholder() {
        let empty = DependencyGraph { nodes: vec![], edges: vec![] };
        assert_eq!(ascii_graph(&empty), "(no tasks)\n");
    }
}
