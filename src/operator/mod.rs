// src/operator/mod.rs

//! Work capabilities bound to graph nodes.
//!
//! The scheduler only ever asks an operator to run to completion and report
//! success or failure; everything else is up to the implementation.
//!
//! - [`noop`] always succeeds.
//! - [`command`] spawns an external process via `tokio::process::Command`.
//! - [`func`] wraps an arbitrary blocking callback.

use std::future::Future;
use std::pin::Pin;

pub mod command;
pub mod func;
pub mod noop;

pub use command::CmdOperator;
pub use func::FnOperator;
pub use noop::NoopOperator;

/// Outcome of a single operator run. Failures are opaque to the scheduler.
pub type OperatorResult = anyhow::Result<()>;

/// Boxed future returned by [`Operator::run`].
pub type OperatorFuture<'a> = Pin<Box<dyn Future<Output = OperatorResult> + Send + 'a>>;

/// A unit of work that can be bound to a node.
///
/// Implementations must be shareable across tasks: the scheduler keeps them
/// behind an `Arc` and calls `run` from a freshly spawned Tokio task.
pub trait Operator: Send + Sync {
    /// Run to completion.
    fn run(&self) -> OperatorFuture<'_>;
}
