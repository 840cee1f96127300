#![allow(dead_code)]

use std::collections::HashSet;
use std::time::Duration;

use rund::Rund;

use crate::operators::{EventLog, RecordingOperator};

/// Builder for a [`Rund`] whose nodes are all [`RecordingOperator`]s sharing
/// one [`EventLog`].
pub struct GraphBuilder {
    log: EventLog,
    nodes: Vec<String>,
    edges: Vec<(String, String)>,
    failing: HashSet<String>,
    delays: Vec<(String, Duration)>,
}

impl GraphBuilder {
    pub fn new() -> Self {
        Self {
            log: EventLog::new(),
            nodes: Vec::new(),
            edges: Vec::new(),
            failing: HashSet::new(),
            delays: Vec::new(),
        }
    }

    pub fn node(mut self, name: &str) -> Self {
        self.nodes.push(name.to_string());
        self
    }

    pub fn nodes(mut self, names: &[&str]) -> Self {
        self.nodes.extend(names.iter().map(|n| n.to_string()));
        self
    }

    pub fn edge(mut self, from: &str, to: &str) -> Self {
        self.edges.push((from.to_string(), to.to_string()));
        self
    }

    pub fn failing(mut self, name: &str) -> Self {
        self.failing.insert(name.to_string());
        self
    }

    pub fn delay(mut self, name: &str, delay: Duration) -> Self {
        self.delays.push((name.to_string(), delay));
        self
    }

    /// The built scheduler plus the log every node records into.
    pub fn build(self) -> (Rund, EventLog) {
        let mut rund = Rund::new();

        for name in &self.nodes {
            let mut op = RecordingOperator::new(name, &self.log);
            if let Some((_, d)) = self.delays.iter().find(|(n, _)| n == name) {
                op = op.with_delay(*d);
            }
            if self.failing.contains(name) {
                op = op.failing();
            }
            rund.add_node(name.as_str(), op);
        }

        for (from, to) in &self.edges {
            rund.add_edge(from.as_str(), to.as_str());
        }

        (rund, self.log)
    }
}

impl Default for GraphBuilder {
    fn default() -> Self {
        Self::new()
    }
}
