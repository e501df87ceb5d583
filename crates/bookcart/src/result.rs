//! Result and error types for the BookCart suite.

use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

/// Result type for suite operations
pub type BookcartResult<T> = Result<T, BookcartError>;

/// Which side of an interaction an assertion guards
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AssertionKind {
    /// A required element was not ready before interacting with it
    Precondition,
    /// Page state did not match after an interaction
    Postcondition,
    /// An awaited element never showed up
    Timeout,
}

impl fmt::Display for AssertionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Precondition => "Precondition",
            Self::Postcondition => "Postcondition",
            Self::Timeout => "Timeout",
        };
        f.write_str(name)
    }
}

/// Errors that can occur while driving the suite
#[derive(Debug, Error)]
pub enum BookcartError {
    /// Browser executable not found
    #[error("Browser not found. Install Chromium or set CHROMIUM_PATH")]
    BrowserNotFound,

    /// Browser launch error
    #[error("Failed to launch browser: {message}")]
    BrowserLaunchError {
        /// Error message
        message: String,
    },

    /// Page error
    #[error("Page error: {message}")]
    PageError {
        /// Error message
        message: String,
    },

    /// Navigation error
    #[error("Navigation to {url} failed: {message}")]
    NavigationError {
        /// URL that failed
        url: String,
        /// Error message
        message: String,
    },

    /// Script evaluation in the page failed
    #[error("Script evaluation failed: {message}")]
    ScriptError {
        /// Error message
        message: String,
    },

    /// An action targeted a locator with no matching element
    #[error("No element matches {locator}")]
    ElementNotFound {
        /// Locator description
        locator: String,
    },

    /// A UI assertion did not hold
    #[error("{kind} failed: {message} ({detail})")]
    AssertionFailed {
        /// Precondition, postcondition or timeout
        kind: AssertionKind,
        /// Human-readable message of the failing assertion
        message: String,
        /// Expected and last observed values
        detail: String,
    },

    /// A table header could not be found
    #[error("Column \"{header}\" not found in table")]
    ColumnNotFound {
        /// Header text that was searched for
        header: String,
    },

    /// Fixture data missing or malformed
    #[error("Fixture error: {message}")]
    FixtureError {
        /// Error message
        message: String,
    },

    /// Configuration error
    #[error("Configuration error: {message}")]
    ConfigError {
        /// Error message
        message: String,
    },

    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// YAML error
    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml_ng::Error),
}

impl BookcartError {
    /// Create an assertion failure
    #[must_use]
    pub fn assertion(
        kind: AssertionKind,
        message: impl Into<String>,
        detail: impl Into<String>,
    ) -> Self {
        Self::AssertionFailed {
            kind,
            message: message.into(),
            detail: detail.into(),
        }
    }

    /// Create a page error
    #[must_use]
    pub fn page(message: impl Into<String>) -> Self {
        Self::PageError {
            message: message.into(),
        }
    }

    /// Create a script error
    #[must_use]
    pub fn script(message: impl Into<String>) -> Self {
        Self::ScriptError {
            message: message.into(),
        }
    }

    /// Create a fixture error
    #[must_use]
    pub fn fixture(message: impl Into<String>) -> Self {
        Self::FixtureError {
            message: message.into(),
        }
    }

    /// Create a configuration error
    #[must_use]
    pub fn config(message: impl Into<String>) -> Self {
        Self::ConfigError {
            message: message.into(),
        }
    }

    /// Assertion kind, if this is an assertion failure
    #[must_use]
    pub const fn assertion_kind(&self) -> Option<AssertionKind> {
        match self {
            Self::AssertionFailed { kind, .. } => Some(*kind),
            _ => None,
        }
    }

    /// Whether the failure came from a UI assertion rather than the engine
    #[must_use]
    pub const fn is_assertion(&self) -> bool {
        matches!(
            self,
            Self::AssertionFailed { .. } | Self::ColumnNotFound { .. }
        )
    }
}
