//! Error types for the logic parser harness.

use std::time::Duration;
use thiserror::Error;

use crate::encoding::TextEncoding;

/// Top-level error type for harness operations.
#[derive(Error, Debug)]
pub enum Error {
    /// Harness configuration or fixture file is invalid.
    #[error("configuration error: {0}")]
    Config(String),

    /// A text programme cannot be represented in the harness encoding.
    #[error("cannot encode programme as {encoding}: {reason}")]
    Encoding {
        encoding: TextEncoding,
        reason: String,
    },

    /// Captured output cannot be decoded with the harness encoding.
    #[error("cannot decode output as {encoding}: {reason}")]
    Decoding {
        encoding: TextEncoding,
        reason: String,
    },

    /// The external program could not be started.
    #[error("failed to spawn `{command}`: {source}")]
    Spawn {
        command: String,
        #[source]
        source: std::io::Error,
    },

    /// The external program did not terminate within the bounded wait.
    #[error("`{command}` did not finish within {timeout:?}")]
    Timeout { command: String, timeout: Duration },

    /// IO error while talking to the process or reading files.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// The process result did not match the declared expectation.
    #[error("{0}")]
    Assertion(String),
}

impl Error {
    /// Returns true for errors caused by the harness input rather than by
    /// the external program.
    pub fn is_configuration(&self) -> bool {
        matches!(self, Error::Config(_) | Error::Encoding { .. })
    }

    /// Returns true if this is an expectation mismatch.
    pub fn is_assertion(&self) -> bool {
        matches!(self, Error::Assertion(_))
    }
}

/// Result type alias for harness operations.
pub type Result<T> = std::result::Result<T, Error>;
