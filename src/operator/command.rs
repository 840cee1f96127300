// src/operator/command.rs

//! External process operator.

use std::collections::BTreeMap;
use std::process::Stdio;

use anyhow::{Context, bail};
use tokio::io::{AsyncBufReadExt, AsyncRead, BufReader};
use tokio::process::Command;
use tracing::{debug, info, warn};

use crate::errors::{Result, RundError};

use super::{Operator, OperatorFuture, OperatorResult};

/// Runs an external command.
///
/// The child inherits the current process environment; `env` entries are
/// layered on top with their names upper-cased. If two entries differ only in
/// case, the one whose original name sorts last wins. Stdout and stderr are
/// drained line by line into `tracing` at debug level.
#[derive(Debug, Clone)]
pub struct CmdOperator {
    cmd: Vec<String>,
    env: BTreeMap<String, String>,
}

impl CmdOperator {
    /// Build a command operator from `cmd` (executable followed by arguments)
    /// and optional extra environment variables.
    ///
    /// Fails with [`RundError::MissingCommand`] when `cmd` is empty.
    pub fn new<I, S>(cmd: I, env: Option<BTreeMap<String, String>>) -> Result<Self>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let cmd: Vec<String> = cmd.into_iter().map(Into::into).collect();
        if cmd.is_empty() {
            return Err(RundError::MissingCommand);
        }

        let env = env
            .unwrap_or_default()
            .into_iter()
            .map(|(k, v)| (k.to_uppercase(), v))
            .collect();

        Ok(Self { cmd, env })
    }

    /// Executable followed by its arguments.
    pub fn command(&self) -> &[String] {
        &self.cmd
    }

    /// Extra environment variables, with normalised (upper-case) names.
    pub fn env(&self) -> &BTreeMap<String, String> {
        &self.env
    }

    async fn run_inner(&self) -> OperatorResult {
        let program = &self.cmd[0];
        info!(cmd = ?self.cmd, "starting command");

        let mut cmd = Command::new(program);
        cmd.args(&self.cmd[1..])
            .envs(&self.env)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true);

        let mut child = cmd
            .spawn()
            .with_context(|| format!("spawning process '{program}'"))?;

        if let Some(stdout) = child.stdout.take() {
            forward_lines(program.clone(), "stdout", stdout);
        }
        if let Some(stderr) = child.stderr.take() {
            forward_lines(program.clone(), "stderr", stderr);
        }

        let status = child
            .wait()
            .await
            .with_context(|| format!("waiting for process '{program}'"))?;

        info!(
            cmd = %program,
            exit_code = status.code().unwrap_or(-1),
            success = status.success(),
            "command exited"
        );

        if !status.success() {
            match status.code() {
                Some(code) => bail!("command '{program}' exited with status code {code}"),
                None => bail!("command '{program}' was terminated by a signal"),
            }
        }
        Ok(())
    }
}

impl Operator for CmdOperator {
    fn run(&self) -> OperatorFuture<'_> {
        Box::pin(self.run_inner())
    }
}

/// Consume a child pipe until EOF so its buffer never fills; log each line at
/// debug. Output is treated as bytes, so non-UTF-8 lines are logged lossily
/// instead of ending the drain early.
fn forward_lines<R>(program: String, stream: &'static str, pipe: R)
where
    R: AsyncRead + Unpin + Send + 'static,
{
    tokio::spawn(async move {
        let mut reader = BufReader::new(pipe);
        let mut buf = Vec::new();
        loop {
            buf.clear();
            match reader.read_until(b'\n', &mut buf).await {
                Ok(0) => break,
                Ok(_) => {
                    let line = String::from_utf8_lossy(&buf);
                    let line = line.trim_end_matches(['\n', '\r']);
                    debug!(cmd = %program, stream, "{}", line);
                }
                Err(err) => {
                    warn!(
                        cmd = %program,
                        stream,
                        error = %err,
                        "reading child output failed; discarding the rest"
                    );
                    if let Err(err) = tokio::io::copy(&mut reader, &mut tokio::io::sink()).await {
                        warn!(cmd = %program, stream, error = %err, "child output pipe closed early");
                    }
                    break;
                }
            }
        }
    });
}
