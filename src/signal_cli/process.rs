//! Process runner backed by `tokio::process`.

use super::invocation::Invocation;
use super::linking::LinkSession;
use super::output::extract_link_uri;
use super::traits::{AdapterError, AdapterResult, CommandOutput, CommandRunner};
use async_trait::async_trait;
use futures::channel::oneshot;
use std::collections::VecDeque;
use std::path::PathBuf;
use std::process::Stdio;
use std::time::Duration;
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::process::{Child, ChildStderr, Command};
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

/// stderr lines kept for link failure messages
const STDERR_TAIL_LINES: usize = 20;

/// Runs signal-cli as a child process
///
/// Stateless; a single runner can serve any number of sequential calls.
#[derive(Debug, Clone, Copy, Default)]
pub struct ProcessRunner;

impl ProcessRunner {
    pub fn new() -> Self {
        Self
    }

    fn command(invocation: &Invocation) -> std::io::Result<Command> {
        let mut cmd = Command::new(program_path(invocation)?);
        cmd.args(invocation.tokens()).stdin(Stdio::null());
        if let Some(dir) = invocation.working_dir() {
            cmd.current_dir(dir);
        }
        cmd.kill_on_drop(true);
        Ok(cmd)
    }

    fn spawn_error(invocation: &Invocation, source: std::io::Error) -> AdapterError {
        AdapterError::Spawn {
            binary: invocation.program().to_path_buf(),
            source,
        }
    }
}

#[async_trait]
impl CommandRunner for ProcessRunner {
    async fn run(&self, invocation: &Invocation) -> AdapterResult<CommandOutput> {
        debug!(command = %invocation, "running signal-cli");

        let output = Self::command(invocation)
            .map_err(|e| Self::spawn_error(invocation, e))?
            .output()
            .await
            .map_err(|e| Self::spawn_error(invocation, e))?;

        let result = CommandOutput {
            success: output.status.success(),
            code: output.status.code(),
            stdout: String::from_utf8_lossy(&output.stdout).into_owned(),
            stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
        };

        if !result.success {
            warn!(
                command = %invocation,
                code = ?result.code,
                stderr = %result.stderr.trim(),
                "signal-cli exited unsuccessfully"
            );
        }

        Ok(result)
    }

    async fn spawn_link(
        &self,
        invocation: &Invocation,
        uri_wait: Duration,
    ) -> AdapterResult<LinkSession> {
        debug!(command = %invocation, "starting signal-cli link");

        let mut child = Self::command(invocation)
            .map_err(|e| Self::spawn_error(invocation, e))?
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .spawn()
            .map_err(|e| Self::spawn_error(invocation, e))?;

        let stdout = child
            .stdout
            .take()
            .ok_or_else(|| AdapterError::Io("link stdout was not captured".to_string()))?;
        let mut lines = BufReader::new(stdout).lines();

        // stderr is read from the start so a chatty child never fills the pipe
        let stderr_tail = child.stderr.take().map(|pipe| tokio::spawn(drain_stderr(pipe)));

        let uri = match tokio::time::timeout(uri_wait, async {
            while let Some(line) = lines.next_line().await? {
                if let Some(uri) = extract_link_uri(&line) {
                    return Ok(Some(uri.to_string()));
                }
                debug!(line = %line, "link output");
            }
            Ok::<_, std::io::Error>(None)
        })
        .await
        {
            Ok(Ok(Some(uri))) => uri,
            Ok(Ok(None)) => {
                let detail = exit_detail(&mut child, stderr_tail).await;
                return Err(AdapterError::Link(format!(
                    "signal-cli exited without printing a provisioning URI{}",
                    detail
                )));
            }
            Ok(Err(e)) => return Err(AdapterError::Io(e.to_string())),
            Err(_) => {
                let _ = child.kill().await;
                return Err(AdapterError::Link(format!(
                    "no provisioning URI within {:?}",
                    uri_wait
                )));
            }
        };

        info!(uri = %uri, "provisioning URI ready");

        let (tx, rx) = oneshot::channel();
        tokio::spawn(async move {
            while let Ok(Some(line)) = lines.next_line().await {
                debug!(line = %line, "link output");
            }

            let result = match child.wait().await {
                Ok(status) => {
                    if !status.success() {
                        warn!(code = ?status.code(), "signal-cli link exited unsuccessfully");
                    }
                    Ok(status.success())
                }
                Err(e) => Err(AdapterError::Io(e.to_string())),
            };
            let _ = tx.send(result);
        });

        Ok(LinkSession::new(uri, rx))
    }
}

/// Program path as seen from the child's working directory
///
/// A relative path with a directory part would otherwise be resolved a second
/// time against the binary's own directory.
fn program_path(invocation: &Invocation) -> std::io::Result<PathBuf> {
    let program = invocation.program();
    if invocation.working_dir().is_some() && program.is_relative() {
        Ok(std::env::current_dir()?.join(program))
    } else {
        Ok(program.to_path_buf())
    }
}

/// Log every stderr line and return the last few
async fn drain_stderr(pipe: ChildStderr) -> String {
    let mut tail = VecDeque::with_capacity(STDERR_TAIL_LINES);
    let mut lines = BufReader::new(pipe).lines();
    while let Ok(Some(line)) = lines.next_line().await {
        debug!(line = %line, "link stderr");
        if tail.len() == STDERR_TAIL_LINES {
            tail.pop_front();
        }
        tail.push_back(line);
    }
    Vec::from(tail).join("\n")
}

async fn exit_detail(child: &mut Child, stderr_tail: Option<JoinHandle<String>>) -> String {
    let code = child.wait().await.ok().and_then(|s| s.code());
    let stderr = match stderr_tail {
        Some(task) => task.await.unwrap_or_default(),
        None => String::new(),
    };
    match (code, stderr.trim()) {
        (Some(code), "") => format!(" (exit code {})", code),
        (Some(code), err) => format!(" (exit code {}): {}", code, err),
        (None, "") => String::new(),
        (None, err) => format!(": {}", err),
    }
}
