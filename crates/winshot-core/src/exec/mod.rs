//! Bounded execution of external OS tools.
//!
//! Every external facility this crate talks to (System Events enumeration,
//! window-id lookup, screencapture) is a separate process. A hung helper
//! must not hang the whole request, so commands run under a deadline:
//! the child is polled every 25ms and killed once the deadline passes.

use std::process::{Command, Output, Stdio};
use std::time::{Duration, Instant};

use tracing::{debug, warn};

use crate::errors::WinshotError;

const POLL_INTERVAL: Duration = Duration::from_millis(25);

#[derive(Debug, thiserror::Error)]
pub enum ExecError {
    #[error("Failed to spawn '{tool}': {message}")]
    Spawn { tool: String, message: String },

    #[error("Failed while waiting for '{tool}': {message}")]
    Wait { tool: String, message: String },

    #[error("'{tool}' did not finish within {timeout_ms}ms")]
    Timeout { tool: String, timeout_ms: u64 },
}

impl WinshotError for ExecError {
    fn error_code(&self) -> &'static str {
        match self {
            ExecError::Spawn { .. } => "EXEC_SPAWN_FAILED",
            ExecError::Wait { .. } => "EXEC_WAIT_FAILED",
            ExecError::Timeout { .. } => "EXEC_TIMEOUT",
        }
    }
}

/// Drain one child pipe to completion on its own thread.
///
/// The poll loop below never reads the pipes itself; without these
/// readers a child writing more than the OS pipe buffer would block on
/// write, never exit, and be misreported as a timeout.
fn spawn_drain<R>(pipe: Option<R>) -> std::thread::JoinHandle<Vec<u8>>
where
    R: std::io::Read + Send + 'static,
{
    std::thread::spawn(move || {
        let mut buffer = Vec::new();
        if let Some(mut pipe) = pipe {
            let _ = pipe.read_to_end(&mut buffer);
        }
        buffer
    })
}

/// Run a command to completion, killing it if it outlives `timeout`.
///
/// Stdout and stderr are captured. On timeout the child is killed and
/// reaped before the error is returned, so no zombie is left behind.
pub fn run_with_timeout(mut command: Command, timeout: Duration) -> Result<Output, ExecError> {
    let tool = command.get_program().to_string_lossy().to_string();

    debug!(event = "core.exec.started", tool = %tool, timeout_ms = timeout.as_millis() as u64);

    let mut child = command
        .stdin(Stdio::null())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .spawn()
        .map_err(|e| ExecError::Spawn {
            tool: tool.clone(),
            message: e.to_string(),
        })?;

    let stdout_reader = spawn_drain(child.stdout.take());
    let stderr_reader = spawn_drain(child.stderr.take());

    let start = Instant::now();

    loop {
        match child.try_wait() {
            Ok(Some(status)) => {
                let stdout = stdout_reader.join().unwrap_or_default();
                let stderr = stderr_reader.join().unwrap_or_default();
                debug!(
                    event = "core.exec.completed",
                    tool = %tool,
                    status = ?status.code(),
                    elapsed_ms = start.elapsed().as_millis() as u64
                );
                return Ok(Output {
                    status,
                    stdout,
                    stderr,
                });
            }
            Ok(None) => {
                if start.elapsed() >= timeout {
                    warn!(
                        event = "core.exec.timeout",
                        tool = %tool,
                        timeout_ms = timeout.as_millis() as u64
                    );
                    // Kill and reap; a failed kill means the child already exited.
                    let _ = child.kill();
                    let _ = child.wait();
                    // Killing closes the pipes, so the readers finish promptly.
                    let _ = stdout_reader.join();
                    let _ = stderr_reader.join();
                    return Err(ExecError::Timeout {
                        tool,
                        timeout_ms: timeout.as_millis() as u64,
                    });
                }
                std::thread::sleep(POLL_INTERVAL);
            }
            Err(e) => {
                let _ = child.kill();
                let _ = child.wait();
                let _ = stdout_reader.join();
                let _ = stderr_reader.join();
                return Err(ExecError::Wait {
                    tool,
                    message: e.to_string(),
                });
            }
        }
    }
}
