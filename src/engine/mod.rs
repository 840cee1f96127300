// src/engine/mod.rs

//! Execution engine.
//!
//! - [`core`] is a synchronous dispatch state machine: in-degree table,
//!   outstanding-task counter, first recorded error. It performs no IO.
//! - [`runtime`] is the async shell around it: it spawns one Tokio task per
//!   ready node and feeds their completion messages back into the core.
//! - [`scheduler`] holds [`Rund`], the public graph-building and execution
//!   entry point.
//!
//! Node tasks never touch scheduling state. They only send a
//! [`NodeCompletion`] over the completion channel, and the single controller
//! loop is the only code that mutates the dispatch bookkeeping.

use crate::errors::RundError;
use crate::operator::OperatorResult;
use crate::types::RunStatus;

/// Canonical node name type used throughout the engine.
pub type NodeName = String;

/// Message sent by a node task when its operator has finished.
#[derive(Debug)]
pub struct NodeCompletion {
    pub name: NodeName,
    pub outcome: OperatorResult,
}

/// Immutable result of one execution attempt.
#[derive(Debug)]
pub struct RunReport {
    /// Always one of `Skipped`, `Failed` or `Success`.
    pub status: RunStatus,
    /// First error observed, if any. Later node failures are dropped.
    pub error: Option<RundError>,
    /// Nodes that ran, in the order their completions were consumed.
    pub completed: Vec<NodeName>,
}

impl RunReport {
    pub(crate) fn skipped() -> Self {
        Self {
            status: RunStatus::Skipped,
            error: None,
            completed: Vec::new(),
        }
    }

    /// Report for an attempt rejected before any node was dispatched.
    pub(crate) fn rejected(error: RundError) -> Self {
        Self {
            status: RunStatus::Failed,
            error: Some(error),
            completed: Vec::new(),
        }
    }

    pub fn is_success(&self) -> bool {
        self.status == RunStatus::Success
    }

    /// Convert into a plain `Result`, keeping the final status on success.
    pub fn into_result(self) -> crate::errors::Result<RunStatus> {
        match self.error {
            Some(err) => Err(err),
            None => Ok(self.status),
        }
    }
}

pub mod core;
pub mod runtime;
pub mod scheduler;

pub use self::core::DispatchCore;
pub use self::runtime::Controller;
pub use self::scheduler::Rund;
