//! Process-backed [`ScriptRunner`].
//!
//! Spawns the configured interpreter with the script and its arguments,
//! captures both output streams and enforces a per-attempt timeout.

use std::future::Future;
use std::path::PathBuf;
use std::process::Stdio;
use std::time::Duration;

use async_trait::async_trait;
use log::{debug, info, warn};
use tokio::process::Command;
use tokio::time::timeout;

use crate::errors::{AdapterError, AdapterResult};
use crate::models::{ScriptInvocation, ScriptOutput};
use crate::ScriptRunner;

pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(120);

#[derive(Debug, Clone)]
pub struct ProcessRunner {
    interpreter: PathBuf,
    timeout: Duration,
    max_attempts: u32,
}

impl ProcessRunner {
    pub fn new(interpreter: impl Into<PathBuf>) -> Self {
        Self {
            interpreter: interpreter.into(),
            timeout: DEFAULT_TIMEOUT,
            max_attempts: 2,
        }
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Total attempts for transient failures (spawn errors and timeouts).
    /// Values below one are treated as one.
    pub fn with_max_attempts(mut self, max_attempts: u32) -> Self {
        self.max_attempts = max_attempts.max(1);
        self
    }

    fn program(&self, invocation: &ScriptInvocation) -> String {
        format!(
            "{} {}",
            self.interpreter.display(),
            invocation.script.display()
        )
    }

    async fn run_once(&self, invocation: &ScriptInvocation) -> AdapterResult<ScriptOutput> {
        let program = self.program(invocation);

        let mut cmd = Command::new(&self.interpreter);
        cmd.arg(&invocation.script)
            .args(&invocation.args)
            .envs(invocation.env.iter().map(|(k, v)| (k.as_str(), v.as_str())))
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true);

        let child = cmd.spawn().map_err(|source| AdapterError::Spawn {
            program: program.clone(),
            source,
        })?;

        // Dropping the wait future on timeout drops the child, which kills it.
        let output = match timeout(self.timeout, child.wait_with_output()).await {
            Ok(Ok(output)) => output,
            Ok(Err(source)) => return Err(AdapterError::Wait { program, source }),
            Err(_) => {
                return Err(AdapterError::Timeout {
                    program,
                    after: self.timeout,
                })
            }
        };

        let stderr = String::from_utf8_lossy(&output.stderr).trim().to_string();

        if !output.status.success() {
            let message = if stderr.is_empty() {
                String::from_utf8_lossy(&output.stdout).trim().to_string()
            } else {
                stderr
            };
            return Err(AdapterError::NonZeroExit {
                code: output.status.code(),
                message,
            });
        }

        if !stderr.is_empty() {
            debug!("{program} wrote to stderr: {stderr}");
        }

        Ok(ScriptOutput {
            stdout: output.stdout,
        })
    }
}

/// Drive `attempt` until it succeeds, fails for a non-transient reason, or
/// `max_attempts` runs have been made.
async fn retry_transient<T, F, Fut>(program: &str, max_attempts: u32, mut attempt: F) -> AdapterResult<T>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = AdapterResult<T>>,
{
    let mut n = 1;
    loop {
        info!("running {program} (attempt {n}/{max_attempts})");
        match attempt().await {
            Err(err) if err.is_transient() && n < max_attempts => {
                warn!("{err}; retrying");
                n += 1;
            }
            result => return result,
        }
    }
}

#[async_trait]
impl ScriptRunner for ProcessRunner {
    async fn run(&self, invocation: &ScriptInvocation) -> AdapterResult<ScriptOutput> {
        let program = self.program(invocation);
        retry_transient(&program, self.max_attempts, || self.run_once(invocation)).await
    }
}
