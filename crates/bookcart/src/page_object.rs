//! Page Object Model support.
//!
//! A page object binds one screen's locators to behavior-level operations.
//! Page objects are built per browser session, hold no mutable state, and
//! reach the browser through a shared [`PageContext`].

use std::fmt;
use std::sync::Arc;
use std::time::{Duration, Instant};

use crate::config::Timeouts;
use crate::engine::{Engine, Key, TypeMode};
use crate::expect::Expectation;
use crate::locator::Locator;
use crate::result::{AssertionKind, BookcartError, BookcartResult};

/// A screen of the application under test
pub trait PageObject {
    /// Name for logs and failure messages
    fn page_name(&self) -> &'static str;

    /// Path the screen is served under, relative to the base URL
    fn url_pattern(&self) -> &'static str;

    /// Named locators of the screen
    fn locators(&self) -> Vec<(&'static str, &Locator)>;

    /// Look up a locator by name
    fn locator(&self, name: &str) -> Option<&Locator> {
        self.locators()
            .into_iter()
            .find(|(n, _)| *n == name)
            .map(|(_, locator)| locator)
    }
}

/// Engine handle and timeouts shared by the page objects of one session
#[derive(Clone)]
pub struct PageContext {
    engine: Arc<dyn Engine>,
    timeouts: Timeouts,
}

impl fmt::Debug for PageContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PageContext")
            .field("timeouts", &self.timeouts)
            .finish_non_exhaustive()
    }
}

impl PageContext {
    /// Create a context over an engine
    #[must_use]
    pub fn new(engine: Arc<dyn Engine>, timeouts: Timeouts) -> Self {
        Self { engine, timeouts }
    }

    /// The underlying engine
    #[must_use]
    pub fn engine(&self) -> &dyn Engine {
        self.engine.as_ref()
    }

    /// Configured timeouts
    #[must_use]
    pub const fn timeouts(&self) -> &Timeouts {
        &self.timeouts
    }

    /// Expectation with the default timeout
    pub fn expect<'a>(&'a self, locator: &'a Locator) -> Expectation<'a> {
        Expectation::new(self.engine(), locator)
            .with_timeout(self.timeouts.default_timeout())
            .with_poll_interval(self.timeouts.poll_interval())
    }

    /// Expectation with the slow timeout
    pub fn expect_slow<'a>(&'a self, locator: &'a Locator) -> Expectation<'a> {
        self.expect(locator)
            .with_timeout(self.timeouts.slow_timeout())
    }

    /// Wait until the locator matches at least one element
    pub async fn wait_for(&self, locator: &Locator) -> BookcartResult<()> {
        self.expect(locator)
            .with_kind(AssertionKind::Timeout)
            .with_message(format!("Timed out waiting for {locator}"))
            .to_exist()
            .await
    }

    /// Wait until one of `candidates` is visible; returns its index
    pub async fn wait_for_any(&self, candidates: &[&Locator]) -> BookcartResult<usize> {
        let timeout = self.timeouts.default_timeout();
        let started = Instant::now();
        loop {
            for (index, locator) in candidates.iter().enumerate() {
                if self.engine.is_visible(locator).await? {
                    return Ok(index);
                }
            }
            if started.elapsed() >= timeout {
                let names: Vec<String> = candidates.iter().map(ToString::to_string).collect();
                return Err(BookcartError::assertion(
                    AssertionKind::Timeout,
                    "None of the expected elements became visible",
                    format!("waited {}ms for any of [{}]", timeout.as_millis(), names.join(", ")),
                ));
            }
            tokio::time::sleep(self.timeouts.poll_interval()).await;
        }
    }

    /// Click once the element exists
    pub async fn click(&self, locator: &Locator) -> BookcartResult<()> {
        self.wait_for(locator).await?;
        self.engine.click(locator).await
    }

    /// Double-click once the element exists
    pub async fn double_click(&self, locator: &Locator) -> BookcartResult<()> {
        self.wait_for(locator).await?;
        self.engine.double_click(locator).await
    }

    /// Type after the current value
    pub async fn type_text(&self, locator: &Locator, text: &str) -> BookcartResult<()> {
        self.wait_for(locator).await?;
        self.engine.type_text(locator, text, TypeMode::Append).await
    }

    /// Replace the current value
    pub async fn replace_text(&self, locator: &Locator, text: &str) -> BookcartResult<()> {
        self.wait_for(locator).await?;
        self.engine.type_text(locator, text, TypeMode::Replace).await
    }

    /// Press a key on the focused element
    pub async fn press_key(&self, key: Key) -> BookcartResult<()> {
        self.engine.press_key(key).await
    }

    /// Trimmed inner text, waiting for the element first
    pub async fn text_of(&self, locator: &Locator) -> BookcartResult<String> {
        self.wait_for(locator).await?;
        Ok(self
            .engine
            .inner_text(locator)
            .await?
            .unwrap_or_default()
            .trim()
            .to_string())
    }

    /// Number of matches, right now
    pub async fn count(&self, locator: &Locator) -> BookcartResult<usize> {
        self.engine.count(locator).await
    }

    /// Visibility, right now
    pub async fn is_visible(&self, locator: &Locator) -> BookcartResult<bool> {
        self.engine.is_visible(locator).await
    }

    /// Sleep one polling interval
    pub async fn pause(&self) {
        tokio::time::sleep(self.timeouts.poll_interval()).await;
    }

    /// Polling interval
    #[must_use]
    pub const fn poll_interval(&self) -> Duration {
        self.timeouts.poll_interval()
    }
}
