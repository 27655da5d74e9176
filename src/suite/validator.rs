//! Checks a parser result against a case expectation.

use crate::asserter::ResultAsserter;
use crate::error::Result;
use crate::runner::ExecutionResult;

use super::fixture::Expectation;

impl Expectation {
    /// Applies the matching asserter check.
    pub fn check(&self, asserter: &ResultAsserter, result: &ExecutionResult) -> Result<()> {
        match self {
            Expectation::Succeeds => asserter.check_succeeded(result),
            Expectation::Fails => asserter.check_failed(result),
            Expectation::SucceedsWith(lines) => asserter.check_succeeded_with(result, lines.clone()),
            Expectation::SucceedsContaining(text) => {
                asserter.check_succeeded_containing(result, text)
            }
            Expectation::FailsContaining(text) => asserter.check_failed_containing(result, text),
        }
    }
}
