//! Harness configuration.
//!
//! Everything the harness needs to know about the external parser lives in
//! [`HarnessConfig`]: which command to run, where to run it from, which text
//! encoding to use and how long to wait for it.

use std::ffi::OsString;
use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::encoding::TextEncoding;
use crate::error::{Error, Result};

/// Environment variable naming a TOML config file to load.
pub const CONFIG_ENV: &str = "LOGIC_HARNESS_CONFIG";

/// Environment variable overriding the parser command (whitespace separated).
pub const COMMAND_ENV: &str = "LOGIC_HARNESS_COMMAND";

/// Validation result containing all found issues.
#[derive(Debug, Clone, Default)]
pub struct ValidationResult {
    /// List of validation errors (fatal).
    pub errors: Vec<String>,
    /// List of validation warnings (non-fatal).
    pub warnings: Vec<String>,
}

impl ValidationResult {
    /// Returns true if validation passed (no errors).
    pub fn is_valid(&self) -> bool {
        self.errors.is_empty()
    }

    pub fn add_error(&mut self, msg: impl Into<String>) {
        self.errors.push(msg.into());
    }

    pub fn add_warning(&mut self, msg: impl Into<String>) {
        self.warnings.push(msg.into());
    }

    /// Converts to a Result, failing if there are errors.
    pub fn into_result(self) -> Result<Vec<String>> {
        if self.is_valid() {
            Ok(self.warnings)
        } else {
            Err(Error::Config(self.errors.join("; ")))
        }
    }
}

/// Configuration for running the external parser.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HarnessConfig {
    /// Executable followed by its arguments.
    #[serde(default = "default_command")]
    pub command: Vec<String>,

    /// Encoding for programme text and captured output.
    #[serde(default)]
    pub encoding: TextEncoding,

    /// Directory the parser is run from.
    #[serde(default = "default_working_dir")]
    pub working_dir: PathBuf,

    /// Upper bound on a single run, in milliseconds.
    #[serde(default = "default_timeout_ms")]
    pub timeout_ms: u64,
}

fn default_command() -> Vec<String> {
    vec!["java".to_string(), "parser".to_string()]
}

/// The crate root, i.e. the parent of the harness sources. Runs never depend
/// on the directory tests are launched from.
fn default_working_dir() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
}

fn default_timeout_ms() -> u64 {
    5_000
}

impl Default for HarnessConfig {
    fn default() -> Self {
        Self {
            command: default_command(),
            encoding: TextEncoding::default(),
            working_dir: default_working_dir(),
            timeout_ms: default_timeout_ms(),
        }
    }
}

impl HarnessConfig {
    /// Sets the parser command.
    pub fn with_command<I, S>(mut self, command: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.command = command.into_iter().map(Into::into).collect();
        self
    }

    /// Sets the working directory.
    pub fn with_working_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.working_dir = dir.into();
        self
    }

    /// Sets the bounded wait, rounded up to whole milliseconds.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout_ms = timeout.as_nanos().div_ceil(1_000_000) as u64;
        self
    }

    /// Returns the bounded wait as a Duration.
    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }

    /// Returns the command joined for display in logs and errors.
    pub fn command_line(&self) -> String {
        self.command.join(" ")
    }

    /// Loads a configuration from a TOML file.
    ///
    /// A relative `working_dir` is resolved against the directory holding
    /// the file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(Error::Io)?;

        let mut config: Self = toml::from_str(&content).map_err(|e| {
            Error::Config(format!("failed to parse {}: {}", path.display(), e))
        })?;

        if config.working_dir.is_relative() {
            if let Some(parent) = path.parent() {
                config.working_dir = parent.join(&config.working_dir);
            }
        }

        Ok(config)
    }

    /// Builds a configuration from [`CONFIG_ENV`] and [`COMMAND_ENV`],
    /// falling back to defaults.
    pub fn from_env() -> Result<Self> {
        Self::from_vars(
            std::env::var_os(CONFIG_ENV),
            std::env::var_os(COMMAND_ENV),
        )
    }

    fn from_vars(config_path: Option<OsString>, command: Option<OsString>) -> Result<Self> {
        let mut config = match config_path {
            Some(path) => Self::load(PathBuf::from(path))?,
            None => Self::default(),
        };

        if let Some(command) = command {
            let command = command.into_string().map_err(|_| {
                Error::Config(format!("{} is not valid unicode", COMMAND_ENV))
            })?;
            let tokens: Vec<String> = command.split_whitespace().map(str::to_string).collect();
            if tokens.is_empty() {
                return Err(Error::Config(format!("{} is set but empty", COMMAND_ENV)));
            }
            config.command = tokens;
        }

        Ok(config)
    }

    /// Validates the configuration and returns any issues found.
    pub fn validate(&self) -> ValidationResult {
        let mut result = ValidationResult::default();

        match self.command.first() {
            None => result.add_error("command cannot be empty"),
            Some(program) if program.trim().is_empty() => {
                result.add_error("command must start with an executable name")
            }
            Some(_) => {}
        }

        if self.timeout_ms == 0 {
            result.add_error("timeout must be greater than zero");
        } else if self.timeout() > Duration::from_secs(60) {
            result.add_warning("timeout over 60 seconds may hide a hung parser");
        }

        if !self.working_dir.is_dir() {
            result.add_warning(format!(
                "working_dir '{}' does not exist",
                self.working_dir.display()
            ));
        }

        result
    }
}
