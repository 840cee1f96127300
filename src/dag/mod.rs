// src/dag/mod.rs

//! Graph storage and static analysis.
//!
//! - [`graph`] holds node -> operator bindings and the precedence edges.
//! - [`validate`] checks operator bindings before execution.
//! - [`cycle`] rejects graphs containing a cycle.
//! - [`topo`] computes the canonical, lexicographically tie-broken order.
//! - [`export`] renders a graph as Graphviz DOT.

pub mod cycle;
pub mod export;
pub mod graph;
pub mod topo;
pub mod validate;

pub use cycle::{ensure_acyclic, find_cycle};
pub use export::to_dot;
pub use graph::DagGraph;
pub use topo::topo_sort;
pub use validate::{validate_bindings, validate_graph};
