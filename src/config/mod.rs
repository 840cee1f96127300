// src/config/mod.rs

//! Graph files.
//!
//! - [`model`] is the TOML data model.
//! - [`loader`] reads a file from disk.
//! - [`validate`] performs structural checks on the raw model.

pub mod loader;
pub mod model;
pub mod validate;

pub use loader::{default_graph_path, load_and_validate, load_from_path, load_graph};
pub use model::{DefaultSection, GraphFile, NodeConfig, RawGraphFile};
