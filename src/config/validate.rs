// src/config/validate.rs

use std::collections::{BTreeMap, HashSet};

use crate::config::model::{GraphFile, RawGraphFile};
use crate::errors::{Result, RundError};

impl TryFrom<RawGraphFile> for GraphFile {
    type Error = RundError;

    fn try_from(raw: RawGraphFile) -> std::result::Result<Self, Self::Error> {
        validate_raw_graph(&raw)?;
        Ok(GraphFile::new_unchecked(raw.default, raw.node))
    }
}

/// Structural checks only. Unknown `after` references and cycles are left to
/// the scheduler, which reports them when the graph is run.
fn validate_raw_graph(raw: &RawGraphFile) -> Result<()> {
    validate_node_names(raw)?;
    validate_commands(raw)?;
    validate_env_names(raw)?;
    Ok(())
}

fn validate_node_names(raw: &RawGraphFile) -> Result<()> {
    for (name, node) in raw.node.iter() {
        if name.trim().is_empty() {
            return Err(RundError::ConfigError(
                "node names must not be empty".to_string(),
            ));
        }
        if node.after.iter().any(|dep| dep.trim().is_empty()) {
            return Err(RundError::ConfigError(format!(
                "node '{}' has an empty name in `after`",
                name
            )));
        }
    }
    Ok(())
}

fn validate_commands(raw: &RawGraphFile) -> Result<()> {
    for node in raw.node.values() {
        if node.cmd.as_ref().is_some_and(|cmd| cmd.is_empty()) {
            return Err(RundError::MissingCommand);
        }
    }
    Ok(())
}

/// Env names are upper-cased when a node is built, so two names in one table
/// that differ only in case would silently shadow each other.
fn validate_env_names(raw: &RawGraphFile) -> Result<()> {
    check_env_table("[default]", &raw.default.env)?;
    for (name, node) in raw.node.iter() {
        check_env_table(&format!("node '{name}'"), &node.env)?;
    }
    Ok(())
}

fn check_env_table(owner: &str, env: &BTreeMap<String, String>) -> Result<()> {
    let mut seen = HashSet::new();
    for key in env.keys() {
        if !seen.insert(key.to_uppercase()) {
            return Err(RundError::ConfigError(format!(
                "{owner} env sets '{}' more than once with different case",
                key.to_uppercase()
            )));
        }
    }
    Ok(())
}
