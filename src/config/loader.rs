// src/config/loader.rs

use std::fs;
use std::path::{Path, PathBuf};

use tracing::debug;

use crate::config::model::{GraphFile, RawGraphFile};
use crate::engine::Rund;
use crate::errors::Result;

/// Read and deserialize a graph file without semantic validation.
pub fn load_from_path(path: impl AsRef<Path>) -> Result<RawGraphFile> {
    let path = path.as_ref();
    let contents = fs::read_to_string(path)?;

    let raw: RawGraphFile = toml::from_str(&contents)?;

    Ok(raw)
}

/// Read, deserialize and validate a graph file.
pub fn load_and_validate(path: impl AsRef<Path>) -> Result<GraphFile> {
    let raw = load_from_path(&path)?;
    let graph = GraphFile::try_from(raw)?;
    debug!(path = %path.as_ref().display(), nodes = graph.node.len(), "graph file loaded");
    Ok(graph)
}

/// Load a graph file straight into a ready-to-run [`Rund`].
pub fn load_graph(path: impl AsRef<Path>) -> Result<Rund> {
    load_and_validate(path)?.to_rund()
}

/// Graph file used when `--graph` is not given.
pub fn default_graph_path() -> PathBuf {
    PathBuf::from("Rund.toml")
}
