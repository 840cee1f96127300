// src/config/model.rs

use std::collections::BTreeMap;

use serde::Deserialize;

use crate::errors::Result;
use crate::operator::{CmdOperator, NoopOperator};
use crate::engine::Rund;

/// Graph file as read from TOML, before validation.
///
/// ```toml
/// [default]
/// env = { log_level = "info" }
///
/// [node.fetch]
///
/// [node.build]
/// cmd = ["cargo", "build"]
/// env = { rustflags = "-Dwarnings" }
/// after = ["fetch"]
/// ```
///
/// All sections are optional.
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(deny_unknown_fields)]
pub struct RawGraphFile {
    /// Defaults from `[default]`.
    #[serde(default)]
    pub default: DefaultSection,

    /// All nodes from `[node.<name>]`, keyed by node name.
    #[serde(default)]
    pub node: BTreeMap<String, NodeConfig>,
}

/// `[default]` section.
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(deny_unknown_fields)]
pub struct DefaultSection {
    /// Environment variables added to every command node. A node's own `env`
    /// wins on conflicts.
    #[serde(default)]
    pub env: BTreeMap<String, String>,
}

/// `[node.<name>]` section.
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(deny_unknown_fields)]
pub struct NodeConfig {
    /// Executable followed by its arguments. Without `cmd` the node is a
    /// no-op; an explicitly empty list is rejected.
    #[serde(default)]
    pub cmd: Option<Vec<String>>,

    /// Extra environment variables. Names are upper-cased, so two names that
    /// differ only in case are rejected.
    #[serde(default)]
    pub env: BTreeMap<String, String>,

    /// Nodes that must complete before this one starts. Each entry becomes an
    /// edge `dep -> this node`. Names are not checked until the graph runs.
    #[serde(default)]
    pub after: Vec<String>,
}

/// Validated graph file. Construct via `GraphFile::try_from(raw)`.
#[derive(Debug, Clone)]
pub struct GraphFile {
    pub default: DefaultSection,
    pub node: BTreeMap<String, NodeConfig>,
}

impl GraphFile {
    pub(crate) fn new_unchecked(default: DefaultSection, node: BTreeMap<String, NodeConfig>) -> Self {
        Self { default, node }
    }

    /// Effective environment for a node: `[default].env` overlaid with the
    /// node's own `env`, names upper-cased.
    pub fn effective_env(&self, node: &NodeConfig) -> BTreeMap<String, String> {
        self.default
            .env
            .iter()
            .chain(node.env.iter())
            .map(|(k, v)| (k.to_uppercase(), v.clone()))
            .collect()
    }

    /// Build a scheduler with one operator per node and one edge per `after`
    /// entry.
    pub fn to_rund(&self) -> Result<Rund> {
        let mut rund = Rund::new();

        for (name, node) in &self.node {
            match &node.cmd {
                Some(cmd) => {
                    let op = CmdOperator::new(cmd.iter().cloned(), Some(self.effective_env(node)))?;
                    rund.add_node(name.as_str(), op);
                }
                None => rund.add_node(name.as_str(), NoopOperator::new()),
            }

            for dep in &node.after {
                rund.add_edge(dep.as_str(), name.as_str());
            }
        }

        Ok(rund)
    }
}
