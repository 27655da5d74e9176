//! Running programmes through the external parser.
//!
//! A programme goes in as text or raw bytes, and an [`ExecutionResult`]
//! comes out once the process has been reaped.

mod process;

pub use process::ProcessRunner;

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::encoding::TextEncoding;
use crate::error::Result;

/// Input fed to the parser on stdin.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Programme {
    /// Programme text, encoded with the harness encoding before it is sent.
    Text(String),
    /// Bytes sent unchanged.
    Raw(Vec<u8>),
}

impl Programme {
    /// Returns the exact bytes written to the parser's stdin.
    pub fn encode(&self, encoding: TextEncoding) -> Result<Vec<u8>> {
        match self {
            Programme::Text(text) => encoding.encode(text),
            Programme::Raw(bytes) => Ok(bytes.clone()),
        }
    }

    /// Prepends text to the programme.
    ///
    /// A raw programme gets the prefix encoded with `encoding`, so a prefix
    /// the encoding cannot represent fails here rather than slipping through.
    pub fn with_prefix(self, prefix: &str, encoding: TextEncoding) -> Result<Programme> {
        match self {
            Programme::Text(text) => Ok(Programme::Text(format!("{}{}", prefix, text))),
            Programme::Raw(bytes) => {
                let mut out = encoding.encode(prefix)?;
                out.extend(bytes);
                Ok(Programme::Raw(out))
            }
        }
    }
}

impl fmt::Display for Programme {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Programme::Text(text) => write!(f, "{:?}", text),
            Programme::Raw(bytes) => write!(f, "<{} raw bytes>", bytes.len()),
        }
    }
}

impl From<&str> for Programme {
    fn from(text: &str) -> Self {
        Programme::Text(text.to_string())
    }
}

impl From<String> for Programme {
    fn from(text: String) -> Self {
        Programme::Text(text)
    }
}

impl From<&String> for Programme {
    fn from(text: &String) -> Self {
        Programme::Text(text.clone())
    }
}

impl From<Vec<u8>> for Programme {
    fn from(bytes: Vec<u8>) -> Self {
        Programme::Raw(bytes)
    }
}

impl From<&[u8]> for Programme {
    fn from(bytes: &[u8]) -> Self {
        Programme::Raw(bytes.to_vec())
    }
}

impl<const N: usize> From<&[u8; N]> for Programme {
    fn from(bytes: &[u8; N]) -> Self {
        Programme::Raw(bytes.to_vec())
    }
}

/// A single invocation: what to feed and what to run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExecutionRequest {
    /// Programme written to stdin.
    pub programme: Programme,
    /// Executable followed by its arguments.
    pub command: Vec<String>,
}

impl ExecutionRequest {
    /// Creates a request for the given programme and command.
    pub fn new<I, S>(programme: impl Into<Programme>, command: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            programme: programme.into(),
            command: command.into_iter().map(Into::into).collect(),
        }
    }

    /// Returns the command joined for display.
    pub fn command_line(&self) -> String {
        self.command.join(" ")
    }
}

/// Outcome of one finished parser run.
///
/// Only built after the process has terminated, so the exit code is always
/// known. A process killed by a signal reports the negated signal number.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExecutionResult {
    exit_code: i32,
    stdout: Vec<u8>,
    stderr: Vec<u8>,
}

impl ExecutionResult {
    pub fn new(exit_code: i32, stdout: impl Into<Vec<u8>>, stderr: impl Into<Vec<u8>>) -> Self {
        Self {
            exit_code,
            stdout: stdout.into(),
            stderr: stderr.into(),
        }
    }

    pub fn exit_code(&self) -> i32 {
        self.exit_code
    }

    pub fn stdout(&self) -> &[u8] {
        &self.stdout
    }

    pub fn stderr(&self) -> &[u8] {
        &self.stderr
    }

    /// Returns true if the parser exited with status 0.
    pub fn success(&self) -> bool {
        self.exit_code == 0
    }
}

/// Anything that can run a programme and hand back its result.
pub trait ProgrammeRunner {
    /// Runs the programme to completion.
    fn run_programme(&self, programme: Programme) -> Result<ExecutionResult>;

    /// Returns the name of this runner, for logs and reports.
    fn name(&self) -> &str;
}
