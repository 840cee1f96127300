use std::fmt;

/// Graph-level status of a single execution attempt.
///
/// - `Pending`: the attempt has not started.
/// - `Running`: validation passed (or is in progress) and nodes may be running.
/// - `Skipped`: the graph had no nodes, so nothing was validated or run.
/// - `Failed`: validation failed or at least one node failed.
/// - `Success`: every node ran and succeeded.
///
/// A [`RunReport`](crate::engine::RunReport) always carries one of the three
/// terminal states.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunStatus {
    Pending,
    Running,
    Skipped,
    Failed,
    Success,
}

impl RunStatus {
    pub fn is_terminal(self) -> bool {
        matches!(self, RunStatus::Skipped | RunStatus::Failed | RunStatus::Success)
    }
}

impl fmt::Display for RunStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            RunStatus::Pending => "pending",
            RunStatus::Running => "running",
            RunStatus::Skipped => "skipped",
            RunStatus::Failed => "failed",
            RunStatus::Success => "success",
        };
        f.write_str(s)
    }
}
