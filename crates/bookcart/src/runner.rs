//! Sequential suite runner.
//!
//! Each scenario gets a fresh [`Session`]. A failing scenario is recorded and
//! the run moves on, unless fail-fast is set.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::time::Instant;
use tracing::{info, info_span, warn, Instrument};

use crate::fixture::FixtureSet;
use crate::result::{AssertionKind, BookcartError, BookcartResult};
use crate::scenarios::Scenario;
use crate::session::Session;

/// Source of fresh browser sessions
#[async_trait]
pub trait SessionProvider: Send + Sync {
    /// Open a new tab with its page objects
    async fn open_session(&self) -> BookcartResult<Session>;

    /// Release a session once its scenario is done
    async fn close_session(&self, _session: Session) -> BookcartResult<()> {
        Ok(())
    }
}

/// Result of one scenario
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScenarioOutcome {
    /// Scenario name
    pub name: String,
    /// Whether it passed
    pub passed: bool,
    /// Error message if failed
    pub failure: Option<String>,
    /// Assertion class of the failure, if it was an assertion
    pub kind: Option<AssertionKind>,
    /// Wall time in milliseconds
    pub duration_ms: u64,
}

impl ScenarioOutcome {
    /// Create a passing outcome
    #[must_use]
    pub fn pass(name: impl Into<String>, duration_ms: u64) -> Self {
        Self {
            name: name.into(),
            passed: true,
            failure: None,
            kind: None,
            duration_ms,
        }
    }

    /// Create a failing outcome from the error that ended the scenario
    #[must_use]
    pub fn fail(name: impl Into<String>, error: &BookcartError, duration_ms: u64) -> Self {
        Self {
            name: name.into(),
            passed: false,
            failure: Some(error.to_string()),
            kind: error.assertion_kind(),
            duration_ms,
        }
    }
}

/// Outcomes of a run
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SuiteReport {
    /// When the run started
    pub started_at: DateTime<Utc>,
    /// Total wall time in milliseconds
    pub duration_ms: u64,
    /// Per-scenario outcomes, in run order
    pub outcomes: Vec<ScenarioOutcome>,
}

impl SuiteReport {
    /// Empty report starting now
    #[must_use]
    pub fn new() -> Self {
        Self {
            started_at: Utc::now(),
            duration_ms: 0,
            outcomes: Vec::new(),
        }
    }

    /// Get number of passed scenarios
    #[must_use]
    pub fn passed(&self) -> usize {
        self.outcomes.iter().filter(|o| o.passed).count()
    }

    /// Get number of failed scenarios
    #[must_use]
    pub fn failed(&self) -> usize {
        self.outcomes.iter().filter(|o| !o.passed).count()
    }

    /// Get total number of scenarios run
    #[must_use]
    pub fn total(&self) -> usize {
        self.outcomes.len()
    }

    /// Check if every scenario passed
    #[must_use]
    pub fn all_passed(&self) -> bool {
        self.outcomes.iter().all(|o| o.passed)
    }

    /// Get failed scenarios
    #[must_use]
    pub fn failures(&self) -> Vec<&ScenarioOutcome> {
        self.outcomes.iter().filter(|o| !o.passed).collect()
    }
}

impl Default for SuiteReport {
    fn default() -> Self {
        Self::new()
    }
}

/// Progress callbacks
pub trait RunObserver {
    /// Called once with the number of selected scenarios
    fn suite_started(&mut self, _total: usize) {}

    /// Called before a scenario opens its session
    fn scenario_started(&mut self, _name: &str) {}

    /// Called after a scenario's session is closed
    fn scenario_finished(&mut self, _outcome: &ScenarioOutcome) {}

    /// Called once after the last scenario
    fn suite_finished(&mut self, _report: &SuiteReport) {}
}

impl RunObserver for () {}

/// Runs scenarios one after another
#[derive(Debug, Clone)]
pub struct SuiteRunner {
    fixtures: FixtureSet,
    filter: Option<Regex>,
    fail_fast: bool,
}

impl SuiteRunner {
    /// Runner over every scenario the fixtures define
    #[must_use]
    pub const fn new(fixtures: FixtureSet) -> Self {
        Self {
            fixtures,
            filter: None,
            fail_fast: false,
        }
    }

    /// Only run scenarios whose name matches `pattern`
    pub fn with_filter(mut self, pattern: &str) -> BookcartResult<Self> {
        let regex = Regex::new(pattern).map_err(|e| {
            BookcartError::config(format!("invalid scenario filter {pattern:?}: {e}"))
        })?;
        self.filter = Some(regex);
        Ok(self)
    }

    /// Stop after the first failure
    #[must_use]
    pub const fn with_fail_fast(mut self, fail_fast: bool) -> Self {
        self.fail_fast = fail_fast;
        self
    }

    /// Fixtures in use
    #[must_use]
    pub const fn fixtures(&self) -> &FixtureSet {
        &self.fixtures
    }

    /// Scenarios selected by the filter, in run order
    #[must_use]
    pub fn scenarios(&self) -> Vec<Scenario> {
        Scenario::all(&self.fixtures)
            .into_iter()
            .filter(|s| self.filter.as_ref().map_or(true, |f| f.is_match(&s.name())))
            .collect()
    }

    /// Run the selected scenarios
    pub async fn run<P, O>(&self, provider: &P, observer: &mut O) -> SuiteReport
    where
        P: SessionProvider + ?Sized,
        O: RunObserver + ?Sized,
    {
        let started = Instant::now();
        let mut report = SuiteReport::new();
        let scenarios = self.scenarios();
        info!(total = scenarios.len(), fail_fast = self.fail_fast, "starting suite");
        observer.suite_started(scenarios.len());

        for scenario in scenarios {
            let name = scenario.name();
            observer.scenario_started(&name);
            let span = info_span!("scenario", name = %name);
            let outcome = self.run_one(provider, &scenario, &name).instrument(span).await;
            observer.scenario_finished(&outcome);
            let stop = !outcome.passed && self.fail_fast;
            report.outcomes.push(outcome);
            if stop {
                warn!("fail-fast set, skipping remaining scenarios");
                break;
            }
        }

        report.duration_ms = elapsed_ms(started);
        info!(
            passed = report.passed(),
            failed = report.failed(),
            duration_ms = report.duration_ms,
            "suite finished"
        );
        observer.suite_finished(&report);
        report
    }

    async fn run_one<P>(&self, provider: &P, scenario: &Scenario, name: &str) -> ScenarioOutcome
    where
        P: SessionProvider + ?Sized,
    {
        let started = Instant::now();
        info!("scenario started");
        let result = match provider.open_session().await {
            Ok(session) => {
                let outcome = scenario.run(&session, &self.fixtures).await;
                let closed = provider.close_session(session).await;
                if let Err(e) = &closed {
                    warn!(error = %e, "closing session failed");
                }
                outcome.and(closed)
            }
            Err(e) => Err(e),
        };
        let duration_ms = elapsed_ms(started);
        match result {
            Ok(()) => {
                info!(duration_ms, "scenario passed");
                ScenarioOutcome::pass(name, duration_ms)
            }
            Err(e) => {
                warn!(error = %e, duration_ms, "scenario failed");
                ScenarioOutcome::fail(name, &e, duration_ms)
            }
        }
    }
}

fn elapsed_ms(started: Instant) -> u64 {
    u64::try_from(started.elapsed().as_millis()).unwrap_or(u64::MAX)
}
