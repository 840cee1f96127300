// src/engine/runtime.rs

use std::fmt;
use std::sync::Arc;

use anyhow::anyhow;
use tokio::sync::mpsc;
use tracing::{debug, error, info};

use crate::dag::DagGraph;
use crate::errors::RundError;
use crate::operator::Operator;

use super::core::DispatchCore;
use super::{NodeCompletion, NodeName, RunReport};

/// Controller loop for one execution attempt.
///
/// This is the async IO shell around [`DispatchCore`], which holds all the
/// dispatch semantics. The controller spawns one Tokio task per ready node,
/// then waits on the completion channel and feeds each message back into the
/// core until nothing is outstanding.
pub struct Controller<'g> {
    graph: &'g DagGraph,
    core: DispatchCore<'g>,
    completion_tx: mpsc::Sender<NodeCompletion>,
    completion_rx: mpsc::Receiver<NodeCompletion>,
}

impl fmt::Debug for Controller<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Controller")
            .field("core", &self.core)
            .finish_non_exhaustive()
    }
}

impl<'g> Controller<'g> {
    /// Prepare a controller for a validated, acyclic graph.
    ///
    /// The completion channel holds one slot per node. Every node is
    /// dispatched at most once, so a send never has to wait.
    pub fn new(graph: &'g DagGraph) -> Self {
        let (completion_tx, completion_rx) = mpsc::channel(graph.len().max(1));
        Self {
            graph,
            core: DispatchCore::new(graph),
            completion_tx,
            completion_rx,
        }
    }

    /// Main loop.
    ///
    /// - Dispatches every root node.
    /// - Consumes one completion at a time and dispatches whatever the core
    ///   reports as newly ready.
    /// - Returns only once every dispatched node has reported back, even
    ///   after a failure.
    pub async fn run(mut self) -> RunReport {
        info!(nodes = self.graph.len(), "controller started");

        let roots = self.core.seed();
        self.dispatch(roots);

        while !self.core.is_drained() {
            let completion = match self.completion_rx.recv().await {
                Some(c) => c,
                None => {
                    // Unreachable while we hold `completion_tx`.
                    error!(
                        outstanding = self.core.outstanding(),
                        "completion channel closed with nodes still outstanding"
                    );
                    self.core.record_failure(RundError::Other(anyhow!(
                        "completion channel closed unexpectedly"
                    )));
                    break;
                }
            };

            let ready = self.core.on_completion(completion);
            self.dispatch(ready);
        }

        self.core.finish()
    }

    fn dispatch(&self, names: Vec<NodeName>) {
        for name in names {
            let op = self.graph.operator(&name).cloned();
            spawn_node(name, op, self.completion_tx.clone());
        }
    }
}

/// Run one node in its own Tokio task and report back over `completion_tx`.
///
/// The operator runs in a nested task so that a panic turns into a failed
/// outcome instead of a completion that never arrives.
fn spawn_node(
    name: NodeName,
    op: Option<Arc<dyn Operator>>,
    completion_tx: mpsc::Sender<NodeCompletion>,
) {
    tokio::spawn(async move {
        debug!(node = %name, "node dispatched");

        let outcome = match op {
            Some(op) => match tokio::spawn(async move { op.run().await }).await {
                Ok(outcome) => outcome,
                Err(join_err) => Err(anyhow!("node task did not complete: {join_err}")),
            },
            None => Err(anyhow!("no operator bound to node '{name}'")),
        };

        if completion_tx
            .send(NodeCompletion {
                name: name.clone(),
                outcome,
            })
            .await
            .is_err()
        {
            error!(node = %name, "controller gone; completion dropped");
        }
    });
}
