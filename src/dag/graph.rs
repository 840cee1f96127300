// src/dag/graph.rs

use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;

use tracing::debug;

use crate::engine::NodeName;
use crate::operator::Operator;

/// In-memory graph store: node -> operator bindings plus the adjacency list
/// of precedence edges.
///
/// Nothing is validated on insertion. Edges may name nodes that are never
/// registered; that is caught by [`validate_bindings`](super::validate_bindings)
/// when the graph is executed. Both maps are ordered so that iteration (and
/// therefore validation errors and dispatch seeding) is reproducible.
#[derive(Clone, Default)]
pub struct DagGraph {
    ops: BTreeMap<NodeName, Arc<dyn Operator>>,
    edges: BTreeMap<NodeName, Vec<NodeName>>,
}

impl DagGraph {
    pub fn new() -> Self {
        Self::default()
    }

    /// Bind `op` to `name`, replacing any previous binding.
    pub fn add_node(&mut self, name: impl Into<NodeName>, op: impl Operator + 'static) {
        self.add_shared_node(name, Arc::new(op));
    }

    /// Same as [`add_node`](Self::add_node) for an operator that is already shared.
    pub fn add_shared_node(&mut self, name: impl Into<NodeName>, op: Arc<dyn Operator>) {
        let name = name.into();
        if self.ops.insert(name.clone(), op).is_some() {
            debug!(node = %name, "replaced existing operator binding");
        }
    }

    /// Record that `from` must complete before `to` may start.
    ///
    /// Duplicate edges are kept: `to` then waits for one completion signal
    /// per edge.
    pub fn add_edge(&mut self, from: impl Into<NodeName>, to: impl Into<NodeName>) {
        self.edges.entry(from.into()).or_default().push(to.into());
    }

    /// Number of registered nodes.
    pub fn len(&self) -> usize {
        self.ops.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ops.is_empty()
    }

    pub fn contains_node(&self, name: &str) -> bool {
        self.ops.contains_key(name)
    }

    /// Registered node names, in ascending order.
    pub fn node_names(&self) -> impl Iterator<Item = &str> {
        self.ops.keys().map(|s| s.as_str())
    }

    /// Operator bound to `name`, if any.
    pub fn operator(&self, name: &str) -> Option<&Arc<dyn Operator>> {
        self.ops.get(name)
    }

    /// Direct successors of `name`, duplicates included.
    pub fn successors_of(&self, name: &str) -> &[NodeName] {
        self.edges.get(name).map(|s| s.as_slice()).unwrap_or(&[])
    }

    /// Every edge as a `(from, to)` pair.
    pub fn edges(&self) -> impl Iterator<Item = (&str, &str)> {
        self.edges
            .iter()
            .flat_map(|(from, tos)| tos.iter().map(move |to| (from.as_str(), to.as_str())))
    }

    /// Adjacency list keyed by source node.
    pub fn adjacency(&self) -> &BTreeMap<NodeName, Vec<NodeName>> {
        &self.edges
    }

    /// Fresh in-degree table covering every registered node.
    ///
    /// Edge targets that are not registered are counted too; callers are
    /// expected to have run [`validate_bindings`](super::validate_bindings).
    pub fn in_degrees(&self) -> BTreeMap<NodeName, usize> {
        let mut degrees: BTreeMap<NodeName, usize> =
            self.ops.keys().map(|name| (name.clone(), 0)).collect();
        for (_, to) in self.edges() {
            *degrees.entry(to.to_string()).or_default() += 1;
        }
        degrees
    }
}

impl fmt::Debug for DagGraph {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DagGraph")
            .field("nodes", &self.ops.keys().collect::<Vec<_>>())
            .field("edges", &self.edges)
            .finish()
    }
}
