//! Suite fixture loading and parsing.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::asserter::ExpectedLines;
use crate::encoding::TextEncoding;
use crate::error::{Error, Result};
use crate::runner::Programme;

/// What a case expects from the parser.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Expectation {
    /// Exit status 0, output not inspected.
    Succeeds,
    /// Non-zero exit status.
    Fails,
    /// Exit status 0 and exactly these stdout lines.
    SucceedsWith(ExpectedLines),
    /// Exit status 0 and a stdout line containing this text.
    SucceedsContaining(String),
    /// Non-zero exit status and this text on stderr or stdout.
    FailsContaining(String),
}

/// One programme and its expectation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Case {
    /// Programme fed to the parser.
    pub programme: Programme,

    /// Expected outcome, written `expect: fails` or `expect: { succeeds_with: "1" }`.
    #[serde(with = "serde_yaml::with::singleton_map")]
    pub expect: Expectation,

    /// Optional label used in reports instead of the programme.
    #[serde(default)]
    pub name: Option<String>,
}

impl Case {
    /// Creates an unnamed case.
    pub fn new(programme: impl Into<Programme>, expect: Expectation) -> Self {
        Self {
            programme: programme.into(),
            expect,
            name: None,
        }
    }

    /// Returns the name shown in reports.
    pub fn label(&self) -> String {
        self.name
            .clone()
            .unwrap_or_else(|| self.programme.to_string())
    }
}

/// A named table of cases run against the same parser.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Suite {
    /// Suite name.
    pub name: String,

    /// Description of what this suite covers.
    #[serde(default)]
    pub description: String,

    /// Text prepended to every programme, e.g. `"write "` for truth tables.
    #[serde(default)]
    pub prefix: Option<String>,

    /// Cases, run in order.
    pub cases: Vec<Case>,
}

impl Suite {
    /// Loads a suite from a YAML file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(Error::Io)?;

        Self::parse(&content).map_err(|e| match e {
            Error::Config(msg) => Error::Config(format!("{}: {}", path.display(), msg)),
            other => other,
        })
    }

    /// Parses a suite from YAML text.
    pub fn parse(yaml: &str) -> Result<Self> {
        let suite: Suite = serde_yaml::from_str(yaml)
            .map_err(|e| Error::Config(format!("failed to parse suite: {}", e)))?;

        if suite.cases.is_empty() {
            return Err(Error::Config(format!("suite '{}' has no cases", suite.name)));
        }

        Ok(suite)
    }

    /// Returns the programme actually sent for a case, prefix included.
    pub fn programme_for(&self, case: &Case, encoding: TextEncoding) -> Result<Programme> {
        match &self.prefix {
            Some(prefix) => case.programme.clone().with_prefix(prefix, encoding),
            None => Ok(case.programme.clone()),
        }
    }
}
