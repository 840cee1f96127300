// src/engine/scheduler.rs

use std::sync::Arc;

use tracing::{info, warn};

use crate::dag::{self, DagGraph};
use crate::errors::{Result, RundError};
use crate::operator::Operator;
use crate::types::RunStatus;

use super::runtime::Controller;
use super::{NodeName, RunReport};

/// DAG task scheduler.
///
/// Nodes are bound to [`Operator`]s with [`add_node`](Self::add_node) and
/// ordered with [`add_edge`](Self::add_edge). [`run`](Self::run) validates the
/// graph, rejects cycles, then runs every node whose predecessors have all
/// completed, in parallel, stopping new dispatch on the first failure.
///
/// A `Rund` keeps no state between executions: every call to `run` is an
/// independent attempt with fresh bookkeeping and returns its own
/// [`RunReport`]. Running the same instance again re-runs every node.
#[derive(Debug, Clone, Default)]
pub struct Rund {
    graph: DagGraph,
}

impl Rund {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_graph(graph: DagGraph) -> Self {
        Self { graph }
    }

    /// Bind `op` to `name`. Registering the same name again replaces the
    /// previous operator.
    pub fn add_node(&mut self, name: impl Into<NodeName>, op: impl Operator + 'static) {
        self.graph.add_node(name, op);
    }

    pub fn add_shared_node(&mut self, name: impl Into<NodeName>, op: Arc<dyn Operator>) {
        self.graph.add_shared_node(name, op);
    }

    /// `from` will complete before `to` starts. Names are not checked until
    /// the graph is run.
    pub fn add_edge(&mut self, from: impl Into<NodeName>, to: impl Into<NodeName>) {
        self.graph.add_edge(from, to);
    }

    pub fn graph(&self) -> &DagGraph {
        &self.graph
    }

    /// Validate and execute the graph.
    ///
    /// - An empty graph is reported as `Skipped` without validation.
    /// - Missing operators and cycles are reported as `Failed` before any
    ///   node runs.
    /// - Otherwise nodes run concurrently in dependency order. The first node
    ///   failure stops new dispatch; nodes already running are waited for.
    pub async fn run(&self) -> RunReport {
        if self.graph.is_empty() {
            info!(status = %RunStatus::Skipped, "graph has no nodes; nothing to run");
            return RunReport::skipped();
        }

        info!(status = %RunStatus::Running, nodes = self.graph.len(), "starting run");

        if let Err(err) = dag::validate_graph(&self.graph) {
            warn!(status = %RunStatus::Failed, error = %err, "graph rejected before dispatch");
            return RunReport::rejected(err);
        }

        Controller::new(&self.graph).run().await
    }

    /// Blocking variant of [`run`](Self::run) for synchronous callers.
    ///
    /// Builds a multi-threaded Tokio runtime for the duration of the call, so
    /// it must not be called from inside an existing runtime.
    pub fn run_blocking(&self) -> RunReport {
        match tokio::runtime::Builder::new_multi_thread().enable_all().build() {
            Ok(rt) => rt.block_on(self.run()),
            Err(err) => RunReport::rejected(RundError::IoError(err)),
        }
    }

    /// The canonical, lexicographically tie-broken topological order.
    ///
    /// Unlike [`dag::topo_sort`], this validates bindings and acyclicity
    /// first, so the order is always complete.
    pub fn deterministic_order(&self) -> Result<Vec<NodeName>> {
        dag::validate_graph(&self.graph)?;
        Ok(dag::topo_sort(&self.graph))
    }

    /// Graphviz DOT rendering of the graph.
    pub fn to_dot(&self) -> String {
        dag::to_dot(&self.graph)
    }
}
