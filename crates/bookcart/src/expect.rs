//! Bounded-wait expectations.
//!
//! An [`Expectation`] polls the engine until its condition holds or the
//! timeout elapses. Engine errors abort the wait immediately; only the
//! condition itself is retried.
//!
//! ```no_run
//! # use bookcart::{expect::Expectation, Locator, MockEngine};
//! # async fn demo(engine: &MockEngine) -> bookcart::BookcartResult<()> {
//! let badge = Locator::new("#mat-badge-content-0");
//! Expectation::new(engine, &badge)
//!     .with_message("Total number of items in Cart not matched")
//!     .to_have_text("3")
//!     .await
//! # }
//! ```

use std::time::{Duration, Instant};

use crate::config::{DEFAULT_POLL_INTERVAL_MS, DEFAULT_TIMEOUT_MS};
use crate::engine::Engine;
use crate::locator::Locator;
use crate::result::{AssertionKind, BookcartError, BookcartResult};

#[derive(Debug, Clone)]
enum Condition {
    Visible,
    Exists,
    Text(String),
    ExactText(String),
    TextContent(String),
    ContainsText(String),
    Value(String),
    Count(usize),
    Class(String),
}

impl Condition {
    fn describe(&self) -> String {
        match self {
            Self::Visible => "be visible".to_string(),
            Self::Exists => "exist".to_string(),
            Self::Text(t) => format!("have text {t:?}"),
            Self::ExactText(t) => format!("have exact text {t:?}"),
            Self::TextContent(t) => format!("have text content {t:?}"),
            Self::ContainsText(t) => format!("contain text {t:?}"),
            Self::Value(v) => format!("have value {v:?}"),
            Self::Count(n) => format!("match {n} element(s)"),
            Self::Class(c) => format!("have class {c:?}"),
        }
    }
}

/// Condition on a locator, checked with a bounded wait
#[must_use = "expectations do nothing until awaited through a to_* method"]
pub struct Expectation<'a> {
    engine: &'a dyn Engine,
    locator: &'a Locator,
    timeout: Duration,
    poll_interval: Duration,
    negated: bool,
    message: Option<String>,
    kind: AssertionKind,
}

impl std::fmt::Debug for Expectation<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Expectation")
            .field("locator", &self.locator.to_string())
            .field("timeout", &self.timeout)
            .field("negated", &self.negated)
            .field("kind", &self.kind)
            .finish_non_exhaustive()
    }
}

impl<'a> Expectation<'a> {
    /// Expectation with the default 5s timeout
    pub fn new(engine: &'a dyn Engine, locator: &'a Locator) -> Self {
        Self {
            engine,
            locator,
            timeout: Duration::from_millis(DEFAULT_TIMEOUT_MS),
            poll_interval: Duration::from_millis(DEFAULT_POLL_INTERVAL_MS),
            negated: false,
            message: None,
            kind: AssertionKind::Postcondition,
        }
    }

    /// Set the timeout
    pub const fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Set the polling interval
    pub const fn with_poll_interval(mut self, interval: Duration) -> Self {
        self.poll_interval = interval;
        self
    }

    /// Message reported when the expectation fails
    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.message = Some(message.into());
        self
    }

    /// Guard an interaction rather than check its result
    pub const fn precondition(mut self) -> Self {
        self.kind = AssertionKind::Precondition;
        self
    }

    /// Classify the failure explicitly
    pub const fn with_kind(mut self, kind: AssertionKind) -> Self {
        self.kind = kind;
        self
    }

    /// Invert the condition
    #[allow(clippy::should_implement_trait)]
    pub const fn not(mut self) -> Self {
        self.negated = !self.negated;
        self
    }

    /// First match is visible
    pub async fn to_be_visible(self) -> BookcartResult<()> {
        self.check(Condition::Visible).await
    }

    /// At least one match exists
    pub async fn to_exist(self) -> BookcartResult<()> {
        self.check(Condition::Exists).await
    }

    /// Trimmed inner text of the first match equals `expected` (trimmed)
    pub async fn to_have_text(self, expected: impl Into<String>) -> BookcartResult<()> {
        self.check(Condition::Text(expected.into())).await
    }

    /// Inner text of the first match equals `expected` byte for byte
    pub async fn to_have_exact_text(self, expected: impl Into<String>) -> BookcartResult<()> {
        self.check(Condition::ExactText(expected.into())).await
    }

    /// Raw `textContent` of the first match equals `expected` byte for byte
    pub async fn to_have_text_content(self, expected: impl Into<String>) -> BookcartResult<()> {
        self.check(Condition::TextContent(expected.into())).await
    }

    /// Inner text of the first match contains `expected`
    pub async fn to_contain_text(self, expected: impl Into<String>) -> BookcartResult<()> {
        self.check(Condition::ContainsText(expected.into())).await
    }

    /// Input value of the first match equals `expected`
    pub async fn to_have_value(self, expected: impl Into<String>) -> BookcartResult<()> {
        self.check(Condition::Value(expected.into())).await
    }

    /// Number of matches equals `expected`
    pub async fn to_have_count(self, expected: usize) -> BookcartResult<()> {
        self.check(Condition::Count(expected)).await
    }

    /// Class list of the first match contains `class`
    pub async fn to_have_class(self, class: impl Into<String>) -> BookcartResult<()> {
        self.check(Condition::Class(class.into())).await
    }

    async fn observe(&self, condition: &Condition) -> BookcartResult<(bool, String)> {
        let engine = self.engine;
        let locator = self.locator;
        Ok(match condition {
            Condition::Visible => {
                let visible = engine.is_visible(locator).await?;
                (visible, if visible { "visible" } else { "not visible" }.to_string())
            }
            Condition::Exists => {
                let count = engine.count(locator).await?;
                (count > 0, format!("{count} match(es)"))
            }
            Condition::Text(expected) => match engine.inner_text(locator).await? {
                Some(text) => (text.trim() == expected.trim(), format!("{text:?}")),
                None => (false, "no element".to_string()),
            },
            Condition::ExactText(expected) => match engine.inner_text(locator).await? {
                Some(text) => (text == *expected, format!("{text:?}")),
                None => (false, "no element".to_string()),
            },
            Condition::TextContent(expected) => match engine.text_content(locator).await? {
                Some(text) => (text == *expected, format!("{text:?}")),
                None => (false, "no element".to_string()),
            },
            Condition::ContainsText(expected) => match engine.inner_text(locator).await? {
                Some(text) => (text.contains(expected.as_str()), format!("{text:?}")),
                None => (false, "no element".to_string()),
            },
            Condition::Value(expected) => match engine.input_value(locator).await? {
                Some(value) => (value == *expected, format!("{value:?}")),
                None => (false, "no value".to_string()),
            },
            Condition::Count(expected) => {
                let count = engine.count(locator).await?;
                (count == *expected, format!("{count} match(es)"))
            }
            Condition::Class(class) => match engine.attribute(locator, "class").await? {
                Some(classes) => (
                    classes.split_whitespace().any(|c| c == class),
                    format!("class={classes:?}"),
                ),
                None => (false, "no element".to_string()),
            },
        })
    }

    async fn check(self, condition: Condition) -> BookcartResult<()> {
        let started = Instant::now();
        loop {
            let (holds, observed) = self.observe(&condition).await?;
            if holds != self.negated {
                return Ok(());
            }
            if started.elapsed() >= self.timeout {
                let detail = format!(
                    "expected {} {}to {}; last observed {} after {}ms",
                    self.locator,
                    if self.negated { "not " } else { "" },
                    condition.describe(),
                    observed,
                    self.timeout.as_millis()
                );
                let message = self.message.clone().unwrap_or_else(|| {
                    format!(
                        "{} was expected {}to {}",
                        self.locator,
                        if self.negated { "not " } else { "" },
                        condition.describe()
                    )
                });
                tracing::debug!(kind = %self.kind, %detail, "expectation failed");
                return Err(BookcartError::assertion(self.kind, message, detail));
            }
            tokio::time::sleep(self.poll_interval).await;
        }
    }
}
