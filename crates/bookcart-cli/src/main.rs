//! BookCart suite runner
//!
//! ## Usage
//!
//! ```bash
//! bookcart-suite                              # Run every scenario headless
//! bookcart-suite --filter "Login"             # Scenarios matching a regex
//! bookcart-suite --list                       # Show what would run
//! bookcart-suite --format json --report r.json
//! ```

use bookcart::{FixtureSet, SuiteConfig, SuiteRunner};
use bookcart_cli::{
    init_logging, render_json, resolve_suite_config, write_report, Cli, CliConfig, CliError,
    CliResult, OutputFormat, ProgressReporter,
};
use clap::Parser;
use std::process::ExitCode;
use tracing::info;

fn main() -> ExitCode {
    match run() {
        Ok(true) => ExitCode::SUCCESS,
        Ok(false) => ExitCode::FAILURE,
        Err(e) => {
            eprintln!("Error: {e}");
            ExitCode::FAILURE
        }
    }
}

/// Returns whether every selected scenario passed
fn run() -> CliResult<bool> {
    let cli = Cli::parse();
    let config = CliConfig::from_cli(&cli);
    let use_color = config.color.should_color();
    init_logging(config.verbosity, config.log_format, use_color);

    let suite = resolve_suite_config(&cli, |key| std::env::var(key).ok())?;
    let fixtures = FixtureSet::from_dir_or_builtin(suite.fixtures_dir.as_deref())?;

    let mut runner = SuiteRunner::new(fixtures).with_fail_fast(cli.fail_fast);
    if let Some(pattern) = &cli.filter {
        runner = runner.with_filter(pattern)?;
    }

    if cli.list {
        list_scenarios(&runner, config.format)?;
        return Ok(true);
    }

    info!(base_url = %suite.base_url, headless = suite.browser.headless, "starting suite");
    let mut reporter = ProgressReporter::new(use_color, config.verbosity.is_quiet());
    let report = run_suite(&runner, suite, &mut reporter)?;

    if config.format == OutputFormat::Json {
        println!("{}", render_json(&report)?);
    }
    if let Some(path) = &config.report_path {
        write_report(&report, path)?;
        reporter.info(&format!("report written to {}", path.display()));
    }

    Ok(report.all_passed())
}

fn list_scenarios(runner: &SuiteRunner, format: OutputFormat) -> CliResult<()> {
    let names: Vec<String> = runner.scenarios().iter().map(bookcart::Scenario::name).collect();
    match format {
        OutputFormat::Text => {
            for name in names {
                println!("{name}");
            }
        }
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&names)?),
    }
    Ok(())
}

#[cfg(feature = "browser")]
fn run_suite(
    runner: &SuiteRunner,
    suite: SuiteConfig,
    reporter: &mut ProgressReporter,
) -> CliResult<bookcart::SuiteReport> {
    let runtime = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()
        .map_err(|e| CliError::suite_execution(format!("tokio runtime: {e}")))?;

    runtime.block_on(async {
        let browser = bookcart::CdpBrowser::launch(suite).await?;
        let report = runner.run(&browser, reporter).await;
        if let Err(e) = browser.close().await {
            tracing::warn!(error = %e, "browser did not close cleanly");
        }
        Ok::<_, CliError>(report)
    })
}

#[cfg(not(feature = "browser"))]
fn run_suite(
    _runner: &SuiteRunner,
    _suite: SuiteConfig,
    _reporter: &mut ProgressReporter,
) -> CliResult<bookcart::SuiteReport> {
    Err(CliError::config(
        "built without the browser feature. Rebuild with --features browser",
    ))
}
