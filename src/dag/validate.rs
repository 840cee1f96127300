// src/dag/validate.rs

use tracing::warn;

use crate::dag::DagGraph;
use crate::dag::cycle::ensure_acyclic;
use crate::errors::{Result, RundError};

/// Check that both endpoints of every edge have a registered operator.
pub fn validate_bindings(graph: &DagGraph) -> Result<()> {
    for (from, to) in graph.edges() {
        for node in [from, to] {
            if !graph.contains_node(node) {
                warn!(node = %node, from = %from, to = %to, "edge references unregistered node");
                return Err(RundError::MissingOperator {
                    node: node.to_string(),
                });
            }
        }
    }
    Ok(())
}

/// Full pre-execution check: operator bindings first, then acyclicity.
pub fn validate_graph(graph: &DagGraph) -> Result<()> {
    validate_bindings(graph)?;
    ensure_acyclic(graph)?;
    Ok(())
}
