//! CLI argument definitions using clap

use clap::{Parser, ValueEnum};
use std::path::PathBuf;

/// BookCart end-to-end suite runner
#[derive(Parser, Debug)]
#[command(name = "bookcart-suite")]
#[command(author, version, about = "Run the BookCart end-to-end suite against a live storefront")]
#[command(propagate_version = true)]
pub struct Cli {
    /// Verbosity level (-v, -vv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Quiet mode (suppress non-error output)
    #[arg(short, long)]
    pub quiet: bool,

    /// Color output (auto, always, never)
    #[arg(long, value_enum, default_value = "auto")]
    pub color: ColorArg,

    /// Log encoding
    #[arg(long, value_enum, default_value = "text")]
    pub log_format: LogFormatArg,

    /// Report format on stdout
    #[arg(long, value_enum, default_value = "text")]
    pub format: FormatArg,

    /// YAML configuration file
    #[arg(short, long, env = "BOOKCART_CONFIG")]
    pub config: Option<PathBuf>,

    /// Storefront root URL
    #[arg(long)]
    pub base_url: Option<String>,

    /// Directory with loginData.json, registerFormData.json and shippingData.json
    #[arg(long)]
    pub fixtures: Option<PathBuf>,

    /// Only run scenarios whose name matches this regex
    #[arg(short, long)]
    pub filter: Option<String>,

    /// Show the browser window
    #[arg(long)]
    pub headed: bool,

    /// Chromium executable
    #[arg(long)]
    pub chromium_path: Option<PathBuf>,

    /// Default assertion timeout in milliseconds
    #[arg(long)]
    pub timeout_ms: Option<u64>,

    /// Stop after the first failing scenario
    #[arg(long)]
    pub fail_fast: bool,

    /// List the selected scenarios without running them
    #[arg(long)]
    pub list: bool,

    /// Also write the JSON report to this file
    #[arg(long)]
    pub report: Option<PathBuf>,
}

/// Color argument for CLI
#[derive(ValueEnum, Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum ColorArg {
    /// Automatic color detection
    #[default]
    Auto,
    /// Always use colors
    Always,
    /// Never use colors
    Never,
}

impl From<ColorArg> for crate::config::ColorChoice {
    fn from(arg: ColorArg) -> Self {
        match arg {
            ColorArg::Auto => Self::Auto,
            ColorArg::Always => Self::Always,
            ColorArg::Never => Self::Never,
        }
    }
}

/// Log encoding argument
#[derive(ValueEnum, Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum LogFormatArg {
    /// Human-readable lines
    #[default]
    Text,
    /// One JSON object per event
    Json,
}

impl From<LogFormatArg> for crate::logging::LogFormat {
    fn from(arg: LogFormatArg) -> Self {
        match arg {
            LogFormatArg::Text => Self::Text,
            LogFormatArg::Json => Self::Json,
        }
    }
}

/// Report format argument
#[derive(ValueEnum, Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum FormatArg {
    /// Progress and summary lines
    #[default]
    Text,
    /// The suite report as JSON
    Json,
}

impl From<FormatArg> for crate::output::OutputFormat {
    fn from(arg: FormatArg) -> Self {
        match arg {
            FormatArg::Text => Self::Text,
            FormatArg::Json => Self::Json,
        }
    }
}
