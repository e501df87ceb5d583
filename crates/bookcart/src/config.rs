//! Suite configuration.
//!
//! Layered the same way every run: defaults, then an optional YAML file, then
//! `BOOKCART_*` environment variables. The CLI applies its flags last.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::result::{BookcartError, BookcartResult};

/// Deployed storefront
pub const DEFAULT_BASE_URL: &str = "https://bookcart.azurewebsites.net";

/// Default bounded wait per assertion (5 seconds)
pub const DEFAULT_TIMEOUT_MS: u64 = 5000;

/// Wait for slow-rendering checks such as cart totals (10 seconds)
pub const DEFAULT_SLOW_TIMEOUT_MS: u64 = 10_000;

/// Polling interval for bounded waits
pub const DEFAULT_POLL_INTERVAL_MS: u64 = 100;

/// Assertion timeouts
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Timeouts {
    /// Default wait per assertion
    pub default_ms: u64,
    /// Wait for slow-rendering checks
    pub slow_ms: u64,
    /// Polling interval
    pub poll_interval_ms: u64,
}

impl Default for Timeouts {
    fn default() -> Self {
        Self {
            default_ms: DEFAULT_TIMEOUT_MS,
            slow_ms: DEFAULT_SLOW_TIMEOUT_MS,
            poll_interval_ms: DEFAULT_POLL_INTERVAL_MS,
        }
    }
}

impl Timeouts {
    /// Set the default wait
    #[must_use]
    pub const fn with_default_ms(mut self, ms: u64) -> Self {
        self.default_ms = ms;
        self
    }

    /// Set the slow wait
    #[must_use]
    pub const fn with_slow_ms(mut self, ms: u64) -> Self {
        self.slow_ms = ms;
        self
    }

    /// Set the polling interval
    #[must_use]
    pub const fn with_poll_interval_ms(mut self, ms: u64) -> Self {
        self.poll_interval_ms = ms;
        self
    }

    /// Default wait as a duration
    #[must_use]
    pub const fn default_timeout(&self) -> Duration {
        Duration::from_millis(self.default_ms)
    }

    /// Slow wait as a duration
    #[must_use]
    pub const fn slow_timeout(&self) -> Duration {
        Duration::from_millis(self.slow_ms)
    }

    /// Polling interval as a duration
    #[must_use]
    pub const fn poll_interval(&self) -> Duration {
        Duration::from_millis(self.poll_interval_ms)
    }
}

/// Browser launch settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct BrowserConfig {
    /// Run in headless mode
    pub headless: bool,
    /// Window and viewport width
    pub viewport_width: u32,
    /// Window and viewport height
    pub viewport_height: u32,
    /// Path to chromium binary (None = auto-detect)
    pub chromium_path: Option<PathBuf>,
    /// Sandbox mode (disable for containers)
    pub sandbox: bool,
}

impl Default for BrowserConfig {
    fn default() -> Self {
        Self {
            headless: true,
            viewport_width: 1920,
            viewport_height: 1080,
            chromium_path: None,
            sandbox: true,
        }
    }
}

impl BrowserConfig {
    /// Set viewport dimensions
    #[must_use]
    pub const fn with_viewport(mut self, width: u32, height: u32) -> Self {
        self.viewport_width = width;
        self.viewport_height = height;
        self
    }

    /// Set headless mode
    #[must_use]
    pub const fn with_headless(mut self, headless: bool) -> Self {
        self.headless = headless;
        self
    }

    /// Set chromium path
    #[must_use]
    pub fn with_chromium_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.chromium_path = Some(path.into());
        self
    }

    /// Disable sandbox (for containers/CI)
    #[must_use]
    pub const fn with_no_sandbox(mut self) -> Self {
        self.sandbox = false;
        self
    }

    /// Configured executable; `None` leaves discovery to the launcher.
    ///
    /// # Errors
    ///
    /// [`BookcartError::BrowserNotFound`] when the configured path is not a file.
    pub fn executable(&self) -> BookcartResult<Option<&Path>> {
        match self.chromium_path.as_deref() {
            Some(path) if !path.is_file() => {
                tracing::debug!(path = %path.display(), "configured chromium is missing");
                Err(BookcartError::BrowserNotFound)
            }
            other => Ok(other),
        }
    }
}

/// Top-level suite configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SuiteConfig {
    /// Storefront root URL
    pub base_url: String,
    /// Path of the login page under `base_url`
    pub login_path: String,
    /// Assertion timeouts
    pub timeouts: Timeouts,
    /// Browser settings
    pub browser: BrowserConfig,
    /// Directory with fixture JSON files (None = built-in fixtures)
    pub fixtures_dir: Option<PathBuf>,
}

impl Default for SuiteConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            login_path: "/login".to_string(),
            timeouts: Timeouts::default(),
            browser: BrowserConfig::default(),
            fixtures_dir: None,
        }
    }
}

impl SuiteConfig {
    /// Create the default configuration
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the storefront root URL
    #[must_use]
    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into();
        self
    }

    /// Set the timeouts
    #[must_use]
    pub const fn with_timeouts(mut self, timeouts: Timeouts) -> Self {
        self.timeouts = timeouts;
        self
    }

    /// Set the browser settings
    #[must_use]
    pub fn with_browser(mut self, browser: BrowserConfig) -> Self {
        self.browser = browser;
        self
    }

    /// Set the fixtures directory
    #[must_use]
    pub fn with_fixtures_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.fixtures_dir = Some(dir.into());
        self
    }

    /// Full URL of the login page
    #[must_use]
    pub fn login_url(&self) -> String {
        format!(
            "{}/{}",
            self.base_url.trim_end_matches('/'),
            self.login_path.trim_start_matches('/')
        )
    }

    /// Parse YAML; missing keys keep their defaults
    pub fn from_yaml_str(yaml: &str) -> BookcartResult<Self> {
        let config: Self = serde_yaml_ng::from_str(yaml)?;
        config.validate()
    }

    /// Load a YAML file
    pub fn from_yaml_file(path: &Path) -> BookcartResult<Self> {
        let text = std::fs::read_to_string(path).map_err(|e| {
            BookcartError::config(format!("cannot read {}: {e}", path.display()))
        })?;
        Self::from_yaml_str(&text)
    }

    /// Defaults overridden by the process environment
    pub fn from_env() -> BookcartResult<Self> {
        Self::default().apply_env()
    }

    /// Override fields from the process environment
    pub fn apply_env(self) -> BookcartResult<Self> {
        self.apply_env_with(|key| std::env::var(key).ok())
    }

    /// Override fields from `lookup`:
    /// `BOOKCART_BASE_URL`, `BOOKCART_TIMEOUT_MS`, `BOOKCART_HEADLESS`,
    /// `CHROMIUM_PATH`, `BOOKCART_FIXTURES`.
    ///
    /// A timeout above the slow wait raises the slow wait with it.
    pub fn apply_env_with(
        mut self,
        lookup: impl Fn(&str) -> Option<String>,
    ) -> BookcartResult<Self> {
        if let Some(url) = lookup("BOOKCART_BASE_URL") {
            self.base_url = url;
        }
        if let Some(ms) = lookup("BOOKCART_TIMEOUT_MS") {
            let default_ms: u64 = ms.trim().parse().map_err(|_| {
                BookcartError::config(format!("BOOKCART_TIMEOUT_MS is not a number: {ms:?}"))
            })?;
            self.timeouts.default_ms = default_ms;
            self.timeouts.slow_ms = self.timeouts.slow_ms.max(default_ms);
        }
        if let Some(headless) = lookup("BOOKCART_HEADLESS") {
            self.browser.headless = parse_flag(&headless).ok_or_else(|| {
                BookcartError::config(format!("BOOKCART_HEADLESS is not a boolean: {headless:?}"))
            })?;
        }
        if let Some(path) = lookup("CHROMIUM_PATH") {
            self.browser.chromium_path = Some(PathBuf::from(path));
        }
        if let Some(dir) = lookup("BOOKCART_FIXTURES") {
            self.fixtures_dir = Some(PathBuf::from(dir));
        }
        self.validate()
    }

    /// Reject configurations that cannot run
    pub fn validate(self) -> BookcartResult<Self> {
        if !(self.base_url.starts_with("http://") || self.base_url.starts_with("https://")) {
            return Err(BookcartError::config(format!(
                "base_url must be an http(s) URL, got {:?}",
                self.base_url
            )));
        }
        if self.timeouts.poll_interval_ms == 0 {
            return Err(BookcartError::config("poll_interval_ms must be positive"));
        }
        if self.timeouts.poll_interval_ms > self.timeouts.default_ms {
            return Err(BookcartError::config(
                "poll_interval_ms must not exceed default_ms",
            ));
        }
        Ok(self)
    }
}

fn parse_flag(value: &str) -> Option<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}
