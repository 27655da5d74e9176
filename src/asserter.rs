//! Assertions over parser results.
//!
//! Every check comes in two forms: `check_*` returns an
//! [`Error::Assertion`] carrying the captured output, and `assert_*` panics
//! with the same message for use directly inside `#[test]` functions.

use serde::{Deserialize, Serialize};

use crate::encoding::{split_lines, TextEncoding};
use crate::error::{Error, Result};
use crate::runner::ExecutionResult;

/// Ordered stdout lines a successful run must print.
///
/// A single string is a one-line expectation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "LinesRepr", into = "Vec<String>")]
pub struct ExpectedLines(Vec<String>);

#[derive(Deserialize)]
#[serde(untagged)]
enum LinesRepr {
    One(String),
    Many(Vec<String>),
}

impl From<LinesRepr> for ExpectedLines {
    fn from(repr: LinesRepr) -> Self {
        match repr {
            LinesRepr::One(line) => ExpectedLines(vec![line]),
            LinesRepr::Many(lines) => ExpectedLines(lines),
        }
    }
}

impl From<ExpectedLines> for Vec<String> {
    fn from(lines: ExpectedLines) -> Self {
        lines.0
    }
}

impl ExpectedLines {
    pub fn as_slice(&self) -> &[String] {
        &self.0
    }
}

impl From<&str> for ExpectedLines {
    fn from(line: &str) -> Self {
        ExpectedLines(vec![line.to_string()])
    }
}

impl From<String> for ExpectedLines {
    fn from(line: String) -> Self {
        ExpectedLines(vec![line])
    }
}

impl From<Vec<String>> for ExpectedLines {
    fn from(lines: Vec<String>) -> Self {
        ExpectedLines(lines)
    }
}

impl From<Vec<&str>> for ExpectedLines {
    fn from(lines: Vec<&str>) -> Self {
        lines.as_slice().into()
    }
}

impl From<&[&str]> for ExpectedLines {
    fn from(lines: &[&str]) -> Self {
        ExpectedLines(lines.iter().map(|l| l.to_string()).collect())
    }
}

impl<const N: usize> From<[&str; N]> for ExpectedLines {
    fn from(lines: [&str; N]) -> Self {
        lines.as_slice().into()
    }
}

impl<const N: usize> From<&[&str; N]> for ExpectedLines {
    fn from(lines: &[&str; N]) -> Self {
        lines.as_slice().into()
    }
}

/// Trims whitespace, including the ASCII separators `\x1c`..=`\x1f`, from
/// both ends of a stdout line.
fn strip_line(line: &str) -> &str {
    line.trim_matches(|c: char| c.is_whitespace() || ('\x1c'..='\x1f').contains(&c))
}

/// Checks parser results against expectations.
#[derive(Debug, Clone, Copy, Default)]
pub struct ResultAsserter {
    encoding: TextEncoding,
}

impl ResultAsserter {
    /// Creates an asserter decoding output with the given encoding.
    pub fn new(encoding: TextEncoding) -> Self {
        Self { encoding }
    }

    pub fn encoding(&self) -> TextEncoding {
        self.encoding
    }

    fn decode(&self, bytes: &[u8]) -> Result<String> {
        self.encoding.decode(bytes)
    }

    fn decode_lines(&self, bytes: &[u8]) -> Result<Vec<String>> {
        let text = self.decode(bytes)?;
        Ok(split_lines(&text).into_iter().map(str::to_string).collect())
    }

    /// Decodes a stream and indents every line for a failure message.
    fn indented(&self, bytes: &[u8]) -> Result<String> {
        let lines: Vec<String> = self
            .decode_lines(bytes)?
            .into_iter()
            .map(|line| format!("\t\t{}", line))
            .collect();
        Ok(lines.join("\n"))
    }

    /// The parser must exit with status 0.
    ///
    /// On failure the message carries the exit code and the parser's stderr.
    pub fn check_succeeded(&self, result: &ExecutionResult) -> Result<()> {
        if result.exit_code() == 0 {
            return Ok(());
        }

        Err(Error::Assertion(format!(
            "Programme returned status code {}.\n\n\tSTDERR returned by the parser:\n{}\n",
            result.exit_code(),
            self.indented(result.stderr())?
        )))
    }

    /// The parser must exit with a non-zero status.
    ///
    /// On failure the message carries the parser's stdout, which is what a
    /// run that unexpectedly succeeded has to show.
    pub fn check_failed(&self, result: &ExecutionResult) -> Result<()> {
        if result.exit_code() != 0 {
            return Ok(());
        }

        Err(Error::Assertion(format!(
            "Programme returned status code {}.\n\n\tSTDOUT returned by the parser:\n{}\n",
            result.exit_code(),
            self.indented(result.stdout())?
        )))
    }

    /// The parser must succeed and print exactly `expected`, line by line,
    /// ignoring whitespace around each line.
    pub fn check_succeeded_with(
        &self,
        result: &ExecutionResult,
        expected: impl Into<ExpectedLines>,
    ) -> Result<()> {
        self.check_succeeded(result)?;

        let expected = expected.into();
        let actual: Vec<String> = self
            .decode_lines(result.stdout())?
            .iter()
            .map(|line| strip_line(line).to_string())
            .collect();

        if expected.as_slice() != actual.as_slice() {
            return Err(Error::Assertion(format!(
                "Expected: {:?}, Actual result: {:?}",
                expected.as_slice(),
                actual
            )));
        }

        Ok(())
    }

    /// The parser must succeed and print at least one line containing
    /// `expected`.
    pub fn check_succeeded_containing(
        &self,
        result: &ExecutionResult,
        expected: &str,
    ) -> Result<()> {
        self.check_succeeded(result)?;

        let lines = self.decode_lines(result.stdout())?;
        if !lines.iter().any(|line| line.contains(expected)) {
            return Err(Error::Assertion(format!(
                "Expected a line containing: {:?}, Actual result: {:?}",
                expected, lines
            )));
        }

        Ok(())
    }

    /// The parser must fail and mention `expected` on stderr or stdout.
    pub fn check_failed_containing(&self, result: &ExecutionResult, expected: &str) -> Result<()> {
        self.check_failed(result)?;

        let stderr = self.decode(result.stderr())?;
        if stderr.contains(expected) {
            return Ok(());
        }

        let stdout = self.decode(result.stdout())?;
        if stdout.contains(expected) {
            return Ok(());
        }

        // The reported stream is picked by re-testing stderr alone, so stderr
        // is what gets shown whenever neither stream matched.
        let output = if !stderr.contains(expected) {
            &stderr
        } else {
            &stdout
        };

        Err(Error::Assertion(format!(
            "Expected: {}, Actual output: {:?}",
            expected,
            split_lines(output)
        )))
    }

    /// Panicking form of [`check_succeeded`](Self::check_succeeded).
    #[track_caller]
    pub fn assert_succeeded(&self, result: &ExecutionResult) {
        if let Err(e) = self.check_succeeded(result) {
            panic!("{}", e);
        }
    }

    /// Panicking form of [`check_failed`](Self::check_failed).
    #[track_caller]
    pub fn assert_failed(&self, result: &ExecutionResult) {
        if let Err(e) = self.check_failed(result) {
            panic!("{}", e);
        }
    }

    /// Panicking form of [`check_succeeded_with`](Self::check_succeeded_with).
    #[track_caller]
    pub fn assert_succeeded_with(
        &self,
        result: &ExecutionResult,
        expected: impl Into<ExpectedLines>,
    ) {
        if let Err(e) = self.check_succeeded_with(result, expected) {
            panic!("{}", e);
        }
    }

    /// Panicking form of
    /// [`check_succeeded_containing`](Self::check_succeeded_containing).
    #[track_caller]
    pub fn assert_succeeded_containing(&self, result: &ExecutionResult, expected: &str) {
        if let Err(e) = self.check_succeeded_containing(result, expected) {
            panic!("{}", e);
        }
    }

    /// Panicking form of [`check_failed_containing`](Self::check_failed_containing).
    #[track_caller]
    pub fn assert_failed_containing(&self, result: &ExecutionResult, expected: &str) {
        if let Err(e) = self.check_failed_containing(result, expected) {
            panic!("{}", e);
        }
    }
}
