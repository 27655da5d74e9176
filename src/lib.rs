//! Ternary Logic Harness - black-box tests for a propositional-logic parser
//!
//! This library runs an external parser/interpreter as a subprocess, feeds it
//! a programme on stdin and checks its exit status and output. The parser
//! itself is not part of this crate.

pub mod asserter;
pub mod config;
pub mod encoding;
pub mod error;
pub mod harness;
pub mod logging;
pub mod runner;
pub mod suite;

pub use asserter::{ExpectedLines, ResultAsserter};
pub use config::{HarnessConfig, ValidationResult, COMMAND_ENV, CONFIG_ENV};
pub use encoding::{split_lines, TextEncoding};
pub use error::{Error, Result};
pub use harness::Harness;
pub use runner::{ExecutionRequest, ExecutionResult, ProcessRunner, Programme, ProgrammeRunner};
pub use suite::{Case, CaseOutcome, Expectation, Suite, SuiteReport};
