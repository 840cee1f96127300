// src/engine/core.rs

//! Pure dispatch state machine.
//!
//! [`DispatchCore`] is created fresh for every execution attempt. It is fed
//! one [`NodeCompletion`] at a time and answers with the nodes that became
//! ready to dispatch. It owns the in-degree table, the outstanding-task
//! counter and the recorded error, and has no channels, no Tokio types, and
//! no IO, so it can be stepped by hand in tests.

use std::collections::BTreeMap;

use tracing::{debug, info, warn};

use crate::dag::DagGraph;
use crate::engine::{NodeCompletion, NodeName, RunReport};
use crate::errors::RundError;
use crate::types::RunStatus;

#[derive(Debug)]
pub struct DispatchCore<'g> {
    graph: &'g DagGraph,
    /// Unmet precedence constraints per node.
    in_degree: BTreeMap<NodeName, usize>,
    /// Dispatched nodes whose completion has not been consumed yet.
    outstanding: usize,
    /// First failure observed; once set, nothing new is dispatched.
    error: Option<RundError>,
    completed: Vec<NodeName>,
}

impl<'g> DispatchCore<'g> {
    /// Build the per-run bookkeeping for a validated, acyclic graph.
    pub fn new(graph: &'g DagGraph) -> Self {
        Self {
            graph,
            in_degree: graph.in_degrees(),
            outstanding: 0,
            error: None,
            completed: Vec::with_capacity(graph.len()),
        }
    }

    /// Nodes that are ready before anything has run (in-degree zero).
    ///
    /// They are counted as outstanding; the caller must dispatch all of them.
    pub fn seed(&mut self) -> Vec<NodeName> {
        let ready: Vec<NodeName> = self
            .graph
            .node_names()
            .filter(|name| self.in_degree.get(*name).copied().unwrap_or(0) == 0)
            .map(str::to_string)
            .collect();

        self.outstanding += ready.len();
        debug!(?ready, outstanding = self.outstanding, "seeded root nodes");
        ready
    }

    /// Consume one completion and return the nodes that became ready.
    ///
    /// - The first failure is recorded and stops all further dispatch.
    /// - Later failures are logged and dropped.
    /// - While no failure is recorded, each direct successor of the completed
    ///   node loses one unit of in-degree (one per edge, so duplicate edges
    ///   count twice); successors reaching zero are returned and counted as
    ///   outstanding.
    pub fn on_completion(&mut self, completion: NodeCompletion) -> Vec<NodeName> {
        let NodeCompletion { name, outcome } = completion;

        debug_assert!(self.outstanding > 0, "completion without a dispatched node");
        self.outstanding = self.outstanding.saturating_sub(1);
        self.completed.push(name.clone());

        match outcome {
            Ok(()) => {
                debug!(node = %name, outstanding = self.outstanding, "node completed");
            }
            Err(source) if self.error.is_none() => {
                warn!(
                    node = %name,
                    error = %format!("{source:#}"),
                    outstanding = self.outstanding,
                    "node failed; no further nodes will be dispatched"
                );
                self.error = Some(RundError::NodeFailed {
                    node: name.clone(),
                    source,
                });
            }
            Err(source) => {
                warn!(
                    node = %name,
                    error = %format!("{source:#}"),
                    "node failed after an earlier failure; discarding error"
                );
            }
        }

        if self.error.is_some() {
            return Vec::new();
        }

        let graph = self.graph;
        let mut ready = Vec::new();
        for succ in graph.successors_of(&name) {
            if let Some(count) = self.in_degree.get_mut(succ) {
                *count = count.saturating_sub(1);
                if *count == 0 {
                    ready.push(succ.clone());
                }
            }
        }

        self.outstanding += ready.len();
        if !ready.is_empty() {
            debug!(node = %name, ?ready, "dependents became ready");
        }
        ready
    }

    /// Record a failure that did not come from a node, e.g. a lost channel.
    ///
    /// Keeps the first-error-wins rule.
    pub fn record_failure(&mut self, error: RundError) {
        if self.error.is_none() {
            self.error = Some(error);
        }
    }

    /// True once every dispatched node has reported back.
    pub fn is_drained(&self) -> bool {
        self.outstanding == 0
    }

    pub fn outstanding(&self) -> usize {
        self.outstanding
    }

    pub fn has_failed(&self) -> bool {
        self.error.is_some()
    }

    /// Close the attempt and produce its report.
    pub fn finish(self) -> RunReport {
        let status = if self.error.is_some() {
            RunStatus::Failed
        } else {
            RunStatus::Success
        };

        info!(
            %status,
            completed = self.completed.len(),
            total = self.graph.len(),
            "run finished"
        );

        RunReport {
            status,
            error: self.error,
            completed: self.completed,
        }
    }
}
