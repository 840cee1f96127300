// src/operator/func.rs

use std::fmt;
use std::sync::Arc;

use anyhow::Context;

use super::{Operator, OperatorFuture, OperatorResult};

type Callback = dyn Fn() -> OperatorResult + Send + Sync + 'static;

/// Operator wrapping an arbitrary zero-argument callback.
///
/// The callback may block; it is executed on Tokio's blocking thread pool so
/// it never stalls the controller or sibling nodes.
#[derive(Clone)]
pub struct FnOperator {
    f: Arc<Callback>,
}

impl FnOperator {
    pub fn new<F>(f: F) -> Self
    where
        F: Fn() -> OperatorResult + Send + Sync + 'static,
    {
        Self { f: Arc::new(f) }
    }
}

impl fmt::Debug for FnOperator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FnOperator").finish_non_exhaustive()
    }
}

impl Operator for FnOperator {
    fn run(&self) -> OperatorFuture<'_> {
        let f = Arc::clone(&self.f);
        Box::pin(async move {
            tokio::task::spawn_blocking(move || f())
                .await
                .context("callback operator did not run to completion")?
        })
    }
}
