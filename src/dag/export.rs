// src/dag/export.rs

//! Graphviz rendering of a graph, for `--dot` output.

use petgraph::dot::{Config, Dot};
use petgraph::graphmap::DiGraphMap;

use crate::dag::DagGraph;

/// Render the graph in Graphviz DOT format.
///
/// Nodes referenced only by edges are included so that an unvalidated graph
/// can still be inspected. Duplicate edges collapse into one, since
/// `DiGraphMap` keeps at most one edge per ordered pair.
pub fn to_dot(graph: &DagGraph) -> String {
    // Edge direction: from -> to, i.e. prerequisite -> dependent.
    let mut g: DiGraphMap<&str, ()> = DiGraphMap::new();

    for name in graph.node_names() {
        g.add_node(name);
    }
    for (from, to) in graph.edges() {
        g.add_edge(from, to, ());
    }

    format!("{:?}", Dot::with_config(&g, &[Config::EdgeNoLabel]))
}
