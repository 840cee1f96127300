// src/operator/noop.rs

use super::{Operator, OperatorFuture};

/// Operator that does nothing and always succeeds.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopOperator;

impl NoopOperator {
    pub fn new() -> Self {
        NoopOperator
    }
}

impl Operator for NoopOperator {
    fn run(&self) -> OperatorFuture<'_> {
        Box::pin(async { Ok(()) })
    }
}
