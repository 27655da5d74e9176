//! Runner and asserter bundled for use inside test functions.

use crate::asserter::ResultAsserter;
use crate::config::HarnessConfig;
use crate::error::Result;
use crate::runner::{ExecutionResult, ProcessRunner, Programme};
use crate::suite::{Suite, SuiteReport};

/// A process runner and a result asserter built from one configuration.
///
/// Test functions construct one of these instead of inheriting helpers:
///
/// ```no_run
/// use logic_harness::Harness;
///
/// let harness = Harness::from_env().unwrap();
/// let result = harness.run("write 1 & ?").unwrap();
/// harness.asserter().assert_succeeded_with(&result, "?");
/// ```
#[derive(Debug, Clone)]
pub struct Harness {
    runner: ProcessRunner,
    asserter: ResultAsserter,
}

impl Harness {
    /// Creates a harness for the given configuration.
    pub fn new(config: HarnessConfig) -> Result<Self> {
        let asserter = ResultAsserter::new(config.encoding);
        let runner = ProcessRunner::new(config)?;
        Ok(Self { runner, asserter })
    }

    /// Creates a harness configured from the environment.
    pub fn from_env() -> Result<Self> {
        Self::new(HarnessConfig::from_env()?)
    }

    pub fn runner(&self) -> &ProcessRunner {
        &self.runner
    }

    pub fn asserter(&self) -> &ResultAsserter {
        &self.asserter
    }

    /// Runs a programme with the configured parser command.
    pub fn run(&self, programme: impl Into<Programme>) -> Result<ExecutionResult> {
        self.runner.run(programme)
    }

    /// Runs a whole suite through this harness.
    pub fn run_suite(&self, suite: &Suite) -> Result<SuiteReport> {
        suite.run(&self.runner, &self.asserter)
    }
}
