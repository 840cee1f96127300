// src/errors.rs

//! Crate-wide error type and result alias.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum RundError {
    #[error("missing operator for node '{node}'")]
    MissingOperator { node: String },

    #[error("circular dependency detected at node '{node}'")]
    CircularDependency { node: String },

    #[error("missing command: a command operator needs at least an executable")]
    MissingCommand,

    #[error("node '{node}' failed: {source:#}")]
    NodeFailed {
        node: String,
        #[source]
        source: anyhow::Error,
    },

    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("TOML parsing error: {0}")]
    TomlError(#[from] toml::de::Error),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl RundError {
    /// Name of the node this error is about, if any.
    pub fn node(&self) -> Option<&str> {
        match self {
            RundError::MissingOperator { node }
            | RundError::CircularDependency { node }
            | RundError::NodeFailed { node, .. } => Some(node),
            _ => None,
        }
    }
}

pub use anyhow::Error;
pub type Result<T> = std::result::Result<T, RundError>;
