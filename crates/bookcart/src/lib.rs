//! BookCart: Page-Object End-to-End Suite
//!
//! Drives the BookCart storefront (<https://bookcart.azurewebsites.net>)
//! through its login, home, cart, checkout and registration screens and
//! checks the outcome of every interaction.
//!
//! # Architecture
//!
//! ```text
//! ┌────────────┐    ┌─────────────┐    ┌──────────────┐    ┌───────────┐
//! │ Scenario   │───►│ Page Object │───►│ Expectation  │───►│ Engine    │
//! │ (suite)    │    │ (Login,Home │    │ (bounded     │    │ CDP/Mock  │
//! │            │    │  Register)  │    │  wait)       │    │           │
//! └────────────┘    └─────────────┘    └──────────────┘    └───────────┘
//! ```
//!
//! Locators are lazy query chains, re-resolved on every use. All waiting is
//! done by [`expect::Expectation`]; the engine itself never blocks on the page.

#![warn(missing_docs)]
// Lints are configured in workspace Cargo.toml [workspace.lints.clippy]

mod assertion;
mod locator;
mod result;

/// Suite configuration: defaults, YAML file and environment layers
#[allow(clippy::missing_errors_doc)]
pub mod config;

/// Browser engines: Chromium over CDP and an in-memory mock
#[allow(clippy::missing_errors_doc)]
pub mod engine;

/// Bounded-wait expectations on locators
#[allow(clippy::missing_errors_doc)]
pub mod expect;

/// Fixture records for the parameterized scenarios
#[allow(clippy::missing_errors_doc)]
pub mod fixture;

/// Page Object Model support
#[allow(clippy::missing_errors_doc)]
pub mod page_object;

/// Login, Home and Register page objects
#[allow(clippy::missing_errors_doc, clippy::doc_markdown)]
pub mod pages;

/// Sequential suite runner and reports
#[allow(clippy::missing_errors_doc)]
pub mod runner;

/// Suite scenarios
#[allow(clippy::missing_errors_doc, clippy::too_many_lines)]
pub mod scenarios;

/// Per-tab session of page objects
#[allow(clippy::missing_errors_doc)]
pub mod session;

#[cfg(test)]
mod test_support;

pub use assertion::{Assertion, AssertionResult};
pub use config::{BrowserConfig, SuiteConfig, Timeouts};
#[cfg(feature = "browser")]
pub use engine::{CdpBrowser, CdpEngine};
pub use engine::{Engine, Key, MockDom, MockElement, MockEngine, TypeMode};
pub use expect::Expectation;
pub use fixture::{Credentials, FixtureSet, FormField, ShippingField};
pub use locator::{Locator, Step};
pub use page_object::{PageContext, PageObject};
pub use pages::{HomePage, LoginPage, RegisterPage};
pub use result::{AssertionKind, BookcartError, BookcartResult};
pub use runner::{RunObserver, ScenarioOutcome, SessionProvider, SuiteReport, SuiteRunner};
pub use scenarios::Scenario;
pub use session::Session;
