//! Errors that are produced by the test generator, and the failures that
//! template test bodies report.
use itertools::Itertools;
use thiserror::Error;

use crate::template::TestKind;

/// Errors that can occur when generating test cases from a template.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GeneratorError {
    /// No items were given, so the kind of test to generate cannot be
    /// decided.
    #[error("cannot generate tests from an empty collection of items")]
    EmptyInput,

    /// An item does not have the kind that was decided from the first item.
    #[error("item at index {index} is not a {expected}, as decided by the first item")]
    UnrecognisedKind { index: usize, expected: TestKind },

    /// The template cannot be parameterised with items of this kind.
    #[error("template `{template}` cannot be parameterised by {kind} items")]
    TemplateMismatch { template: String, kind: TestKind },

    /// Two items were given the same test name.
    #[error("the test name `{name}` was generated for more than one item")]
    NameCollision { name: String },
}

/// The result of running a single test body.
pub type TestResult = Result<(), TestFailure>;

/// A failure reported by a template test body.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{message}")]
pub struct TestFailure {
    pub message: String,
}

impl TestFailure {
    pub fn new(message: impl Into<String>) -> Self {
        Self { message: message.into() }
    }

    /// Fail with the given message when `condition` does not hold.
    pub fn check(condition: bool, message: impl Into<String>) -> TestResult {
        if condition { Ok(()) } else { Err(Self::new(message)) }
    }
}

impl From<String> for TestFailure {
    fn from(message: String) -> Self {
        Self { message }
    }
}

impl From<&str> for TestFailure {
    fn from(message: &str) -> Self {
        Self::new(message)
    }
}

/// Every failure that occurred whilst running the tests of a generated case.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error(
    "`{case}` failed {} of {total} tests:\n{}",
    .failures.len(),
    render_failures(.failures)
)]
pub struct CaseFailure {
    /// The generated name of the case.
    pub case: String,
    /// The total number of tests that were run.
    pub total: usize,
    /// The failing tests paired with their failure.
    pub failures: Vec<(String, TestFailure)>,
}

fn render_failures(failures: &[(String, TestFailure)]) -> String {
    failures.iter().map(|(test, failure)| format!("  {test}: {failure}")).join("\n")
}
