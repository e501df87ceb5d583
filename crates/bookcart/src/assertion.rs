//! Immediate (non-polling) assertions on values already read from the page.

use std::fmt::Debug;

use crate::result::{AssertionKind, BookcartError, BookcartResult};

/// Result of an assertion
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AssertionResult {
    /// Whether the assertion passed
    pub passed: bool,
    /// What was compared, for failure detail
    pub detail: String,
}

impl AssertionResult {
    /// Create a passing assertion result
    #[must_use]
    pub const fn pass() -> Self {
        Self {
            passed: true,
            detail: String::new(),
        }
    }

    /// Create a failing assertion result
    #[must_use]
    pub fn fail(detail: impl Into<String>) -> Self {
        Self {
            passed: false,
            detail: detail.into(),
        }
    }

    /// Turn a failure into a scenario-fatal error carrying `message`
    pub fn into_result(
        self,
        kind: AssertionKind,
        message: impl Into<String>,
    ) -> BookcartResult<()> {
        if self.passed {
            Ok(())
        } else {
            Err(BookcartError::assertion(kind, message, self.detail))
        }
    }
}

/// Assertion helpers
#[derive(Debug)]
pub struct Assertion;

impl Assertion {
    /// Assert two values are equal
    #[must_use]
    pub fn equals<T: PartialEq + Debug + ?Sized>(expected: &T, actual: &T) -> AssertionResult {
        if expected == actual {
            AssertionResult::pass()
        } else {
            AssertionResult::fail(format!("expected {expected:?}, got {actual:?}"))
        }
    }
}
