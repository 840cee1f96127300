// src/dag/cycle.rs

//! Cycle detection.
//!
//! Iterative depth-first search with two markers per node: `visited` (ever
//! explored) and `on_path` (currently on the DFS path). Reaching a node that
//! is still on the path means we followed a back edge, i.e. a cycle. Every
//! edge is followed at most once, so this is O(V + E), and the explicit
//! stack keeps very deep graphs from overflowing the thread stack.

use std::collections::HashSet;

use tracing::warn;

use crate::dag::DagGraph;
use crate::engine::NodeName;
use crate::errors::{Result, RundError};

/// Return the node at which a back edge was found, or `None` if the graph is
/// acyclic. Disconnected components are each explored from their own root.
pub fn find_cycle(graph: &DagGraph) -> Option<NodeName> {
    let mut visited: HashSet<&str> = HashSet::new();
    let mut on_path: HashSet<&str> = HashSet::new();
    // (node, index of the next successor to explore)
    let mut stack: Vec<(&str, usize)> = Vec::new();

    for root in graph.adjacency().keys() {
        let root = root.as_str();
        if !visited.insert(root) {
            continue;
        }
        on_path.insert(root);
        stack.push((root, 0));

        while let Some(frame) = stack.last_mut() {
            let (node, next) = *frame;
            let successors = graph.successors_of(node);

            if next < successors.len() {
                frame.1 += 1;
                let succ = successors[next].as_str();
                if on_path.contains(succ) {
                    return Some(succ.to_string());
                }
                if visited.insert(succ) {
                    on_path.insert(succ);
                    stack.push((succ, 0));
                }
            } else {
                on_path.remove(node);
                stack.pop();
            }
        }
    }

    None
}

/// Fail with [`RundError::CircularDependency`] if the graph has a cycle.
pub fn ensure_acyclic(graph: &DagGraph) -> Result<()> {
    match find_cycle(graph) {
        None => Ok(()),
        Some(node) => {
            warn!(node = %node, "circular dependency detected");
            Err(RundError::CircularDependency { node })
        }
    }
}
