//! Subprocess runner for the external parser.

use std::io;
use std::process::{ExitStatus, Stdio};

use tokio::io::AsyncWriteExt;
use tokio::process::Command;

use crate::config::HarnessConfig;
use crate::error::{Error, Result};

use super::{ExecutionRequest, ExecutionResult, Programme, ProgrammeRunner};

/// Runs programmes by spawning the configured parser command.
///
/// Every call spawns a fresh process, writes the whole programme to its
/// stdin, closes stdin and collects stdout and stderr until the process
/// exits. One timeout covers the whole exchange; when it elapses the child
/// is killed and the call fails with [`Error::Timeout`].
#[derive(Debug, Clone)]
pub struct ProcessRunner {
    config: HarnessConfig,
}

impl ProcessRunner {
    /// Creates a runner, rejecting invalid configurations.
    pub fn new(config: HarnessConfig) -> Result<Self> {
        let warnings = config.validate().into_result()?;
        for warning in &warnings {
            tracing::warn!(warning = %warning, "harness configuration warning");
        }
        Ok(Self { config })
    }

    pub fn config(&self) -> &HarnessConfig {
        &self.config
    }

    /// Builds a request for the configured command.
    pub fn request(&self, programme: impl Into<Programme>) -> ExecutionRequest {
        ExecutionRequest::new(programme, self.config.command.iter().cloned())
    }

    /// Runs a programme with the configured command, blocking until done.
    pub fn run(&self, programme: impl Into<Programme>) -> Result<ExecutionResult> {
        self.execute(&self.request(programme))
    }

    /// Async variant of [`run`](Self::run).
    pub async fn run_async(&self, programme: impl Into<Programme>) -> Result<ExecutionResult> {
        self.execute_async(&self.request(programme)).await
    }

    /// Executes a request, blocking the calling thread.
    ///
    /// Must not be called from inside a tokio runtime; use
    /// [`execute_async`](Self::execute_async) there.
    pub fn execute(&self, request: &ExecutionRequest) -> Result<ExecutionResult> {
        let runtime = tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()?;
        runtime.block_on(self.execute_async(request))
    }

    /// Executes a request.
    pub async fn execute_async(&self, request: &ExecutionRequest) -> Result<ExecutionResult> {
        // Encoding problems are reported before anything is spawned.
        let payload = request.programme.encode(self.config.encoding)?;

        let (program, args) = request
            .command
            .split_first()
            .ok_or_else(|| Error::Config("command cannot be empty".to_string()))?;
        let command_line = request.command_line();
        let timeout = self.config.timeout();

        tracing::debug!(
            command = %command_line,
            working_dir = ?self.config.working_dir,
            input_bytes = payload.len(),
            "spawning parser"
        );

        let mut child = Command::new(program)
            .args(args)
            .current_dir(&self.config.working_dir)
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true)
            .spawn()
            .map_err(|source| Error::Spawn {
                command: command_line.clone(),
                source,
            })?;

        let mut stdin = child
            .stdin
            .take()
            .ok_or_else(|| io::Error::other("stdin was not piped"))?;

        let feed = async move {
            let written = stdin.write_all(&payload).await;
            drop(stdin);
            match written {
                // The parser may stop reading as soon as it has seen an error.
                Err(e) if e.kind() == io::ErrorKind::BrokenPipe => Ok(()),
                other => other,
            }
        };

        let exchange = async move {
            let (fed, output) = tokio::join!(feed, child.wait_with_output());
            fed.and(output)
        };

        let output = match tokio::time::timeout(timeout, exchange).await {
            Ok(output) => output?,
            Err(_) => {
                // Dropping the exchange future drops the child, which kills it.
                tracing::warn!(
                    command = %command_line,
                    timeout_ms = timeout.as_millis() as u64,
                    "parser timed out"
                );
                return Err(Error::Timeout {
                    command: command_line,
                    timeout,
                });
            }
        };

        let result = ExecutionResult::new(exit_code(output.status), output.stdout, output.stderr);

        tracing::debug!(
            command = %command_line,
            exit_code = result.exit_code(),
            stdout_bytes = result.stdout().len(),
            stderr_bytes = result.stderr().len(),
            "parser finished"
        );

        Ok(result)
    }
}

impl ProgrammeRunner for ProcessRunner {
    fn run_programme(&self, programme: Programme) -> Result<ExecutionResult> {
        self.run(programme)
    }

    fn name(&self) -> &str {
        self.config
            .command
            .first()
            .map(String::as_str)
            .unwrap_or("process")
    }
}

/// Maps an exit status to a code, using the negated signal number for
/// processes killed by a signal.
fn exit_code(status: ExitStatus) -> i32 {
    if let Some(code) = status.code() {
        return code;
    }

    #[cfg(unix)]
    {
        use std::os::unix::process::ExitStatusExt;
        if let Some(signal) = status.signal() {
            return -signal;
        }
    }

    -1
}
