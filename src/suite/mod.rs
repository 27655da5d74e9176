//! Table-driven suites.
//!
//! A suite is a YAML file listing programmes and what the parser must do
//! with each of them.

pub mod fixture;
pub mod report;
pub mod validator;

pub use fixture::{Case, Expectation, Suite};
pub use report::{CaseOutcome, SuiteReport};
