//! Running suites and collecting their outcomes.

use crate::asserter::ResultAsserter;
use crate::error::{Error, Result};
use crate::runner::ProgrammeRunner;

use super::fixture::Suite;

/// Outcome of a single case.
#[derive(Debug, Clone)]
pub struct CaseOutcome {
    /// Case label (name or programme).
    pub label: String,
    /// Failure message, `None` if the case passed.
    pub failure: Option<String>,
}

impl CaseOutcome {
    pub fn passed(&self) -> bool {
        self.failure.is_none()
    }
}

/// Result of running a suite.
#[derive(Debug, Clone)]
pub struct SuiteReport {
    /// The suite that was run.
    pub suite: String,
    /// Runner that executed it.
    pub runner: String,
    /// One outcome per case, in suite order.
    pub outcomes: Vec<CaseOutcome>,
}

impl SuiteReport {
    /// Returns true if every case passed.
    pub fn passed(&self) -> bool {
        self.outcomes.iter().all(CaseOutcome::passed)
    }

    /// Returns the failing cases.
    pub fn failures(&self) -> Vec<&CaseOutcome> {
        self.outcomes.iter().filter(|o| !o.passed()).collect()
    }

    /// Panics listing every failing case.
    #[track_caller]
    pub fn assert_passed(&self) {
        let failures = self.failures();
        if failures.is_empty() {
            return;
        }

        let mut msg = format!(
            "suite '{}' failed {} of {} cases:",
            self.suite,
            failures.len(),
            self.outcomes.len()
        );
        for failure in failures {
            msg.push_str(&format!(
                "\n\n  {}:\n{}",
                failure.label,
                failure.failure.as_deref().unwrap_or_default()
            ));
        }
        panic!("{}", msg);
    }
}

impl Suite {
    /// Runs every case in order.
    ///
    /// Expectation mismatches are recorded in the report. Anything else
    /// (timeouts, spawn or encoding failures, undecodable output) aborts the
    /// run.
    pub fn run<R>(&self, runner: &R, asserter: &ResultAsserter) -> Result<SuiteReport>
    where
        R: ProgrammeRunner + ?Sized,
    {
        tracing::info!(
            suite = %self.name,
            runner = runner.name(),
            cases = self.cases.len(),
            "running suite"
        );

        let mut outcomes = Vec::with_capacity(self.cases.len());

        for case in &self.cases {
            let label = case.label();
            let programme = self.programme_for(case, asserter.encoding())?;
            let result = runner.run_programme(programme)?;

            let failure = match case.expect.check(asserter, &result) {
                Ok(()) => None,
                Err(Error::Assertion(msg)) => Some(msg),
                Err(e) => return Err(e),
            };

            tracing::debug!(
                suite = %self.name,
                case = %label,
                exit_code = result.exit_code(),
                passed = failure.is_none(),
                "case finished"
            );

            outcomes.push(CaseOutcome { label, failure });
        }

        Ok(SuiteReport {
            suite: self.name.clone(),
            runner: runner.name().to_string(),
            outcomes,
        })
    }
}
