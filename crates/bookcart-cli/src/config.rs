//! CLI configuration

use bookcart::SuiteConfig;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::commands::Cli;
use crate::error::{CliError, CliResult};
use crate::logging::LogFormat;
use crate::output::OutputFormat;

/// CLI verbosity level
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Verbosity {
    /// Quiet - failures only
    Quiet,
    /// Normal - default output
    #[default]
    Normal,
    /// Verbose - extra output
    Verbose,
    /// Debug - maximum output
    Debug,
}

impl Verbosity {
    /// Map `-q` and the `-v` count to a level
    #[must_use]
    pub const fn from_flags(quiet: bool, verbose: u8) -> Self {
        if quiet {
            return Self::Quiet;
        }
        match verbose {
            0 => Self::Normal,
            1 => Self::Verbose,
            _ => Self::Debug,
        }
    }

    /// Check if quiet mode
    #[must_use]
    pub const fn is_quiet(self) -> bool {
        matches!(self, Self::Quiet)
    }

    /// Check if verbose or higher
    #[must_use]
    pub const fn is_verbose(self) -> bool {
        matches!(self, Self::Verbose | Self::Debug)
    }

    /// Log filter used when `RUST_LOG` is unset
    #[must_use]
    pub const fn default_filter(self) -> &'static str {
        match self {
            Self::Quiet => "warn",
            Self::Normal => "info",
            Self::Verbose => "bookcart=debug,info",
            Self::Debug => "trace",
        }
    }
}

/// Color output choice
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum ColorChoice {
    /// Always use colors
    Always,
    /// Use colors when output is a terminal
    #[default]
    Auto,
    /// Never use colors
    Never,
}

impl ColorChoice {
    /// Should use colors based on output detection
    #[must_use]
    pub fn should_color(self) -> bool {
        match self {
            Self::Always => true,
            Self::Never => false,
            Self::Auto => std::io::IsTerminal::is_terminal(&std::io::stderr()),
        }
    }
}

/// Presentation settings of one invocation
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CliConfig {
    /// Verbosity level
    pub verbosity: Verbosity,
    /// Color output choice
    pub color: ColorChoice,
    /// Report format on stdout
    pub format: OutputFormat,
    /// Log encoding on stderr
    pub log_format: LogFormat,
    /// Where to write the JSON report, if anywhere
    pub report_path: Option<PathBuf>,
}

impl CliConfig {
    /// Create new default configuration
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Build from parsed arguments
    #[must_use]
    pub fn from_cli(cli: &Cli) -> Self {
        Self {
            verbosity: Verbosity::from_flags(cli.quiet, cli.verbose),
            color: cli.color.into(),
            format: cli.format.into(),
            log_format: cli.log_format.into(),
            report_path: cli.report.clone(),
        }
    }

    /// Set verbosity
    #[must_use]
    pub const fn with_verbosity(mut self, verbosity: Verbosity) -> Self {
        self.verbosity = verbosity;
        self
    }

    /// Set color choice
    #[must_use]
    pub const fn with_color(mut self, color: ColorChoice) -> Self {
        self.color = color;
        self
    }

    /// Set the report format
    #[must_use]
    pub const fn with_format(mut self, format: OutputFormat) -> Self {
        self.format = format;
        self
    }
}

/// Resolve the suite configuration: defaults, then `--config` YAML, then
/// environment (read through `lookup`), then flags.
pub fn resolve_suite_config(
    cli: &Cli,
    lookup: impl Fn(&str) -> Option<String>,
) -> CliResult<SuiteConfig> {
    let base = match &cli.config {
        Some(path) => SuiteConfig::from_yaml_file(path)?,
        None => SuiteConfig::default(),
    };
    let mut config = base.apply_env_with(lookup)?;

    if let Some(url) = &cli.base_url {
        config.base_url.clone_from(url);
    }
    if let Some(dir) = &cli.fixtures {
        config.fixtures_dir = Some(dir.clone());
    }
    if let Some(ms) = cli.timeout_ms {
        if ms == 0 {
            return Err(CliError::invalid_argument("--timeout-ms must be positive"));
        }
        config.timeouts.default_ms = ms;
        config.timeouts.slow_ms = config.timeouts.slow_ms.max(ms);
    }
    if cli.headed {
        config.browser.headless = false;
    }
    if let Some(path) = &cli.chromium_path {
        config.browser.chromium_path = Some(path.clone());
    }

    Ok(config.validate()?)
}
