// src/dag/topo.rs

//! Least-lexicographic topological sort.

use std::cmp::Reverse;
use std::collections::{BTreeMap, BinaryHeap};

use crate::dag::DagGraph;
use crate::engine::NodeName;

/// Produce one canonical topological order of every registered node.
///
/// Among nodes that are ready at the same time, the smallest name always
/// comes first, so the result depends only on the graph and never on
/// insertion order or timing.
///
/// The graph must already be validated and acyclic. Nodes on or behind a
/// cycle never reach in-degree zero and are silently left out, so a cyclic
/// input yields a partial order. Use
/// [`Rund::deterministic_order`](crate::Rund::deterministic_order) for a
/// checked variant.
pub fn topo_sort(graph: &DagGraph) -> Vec<NodeName> {
    let mut in_degree: BTreeMap<&str, usize> = graph.node_names().map(|n| (n, 0)).collect();
    for (_, to) in graph.edges() {
        *in_degree.entry(to).or_default() += 1;
    }

    let mut ready: BinaryHeap<Reverse<&str>> = in_degree
        .iter()
        .filter(|&(_, &count)| count == 0)
        .map(|(&name, _)| Reverse(name))
        .collect();

    let mut order = Vec::with_capacity(graph.len());
    while let Some(Reverse(name)) = ready.pop() {
        order.push(name.to_string());
        for succ in graph.successors_of(name) {
            if let Some(count) = in_degree.get_mut(succ.as_str()) {
                *count -= 1;
                if *count == 0 {
                    ready.push(Reverse(succ.as_str()));
                }
            }
        }
    }

    order
}
