//! BookCart CLI library
//!
//! Argument parsing, configuration layering, logging setup and progress
//! output for the `bookcart-suite` binary.

#![warn(missing_docs)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::missing_errors_doc)]

mod commands;
mod config;
mod error;
mod logging;
mod output;

pub use commands::{Cli, ColorArg, FormatArg, LogFormatArg};
pub use config::{resolve_suite_config, CliConfig, ColorChoice, Verbosity};
pub use error::{CliError, CliResult};
pub use logging::{env_filter, init_logging, LogFormat};
pub use output::{render_json, write_report, OutputFormat, ProgressReporter};
