//! Triage CLI library.
//!
//! Argument parsing, configuration and credential loading, and report
//! formatting for the `triage` binary.

pub mod cli;
pub mod config;
pub mod error;
pub mod output;

pub use cli::{Cli, CliFormat, DEFAULT_REPO};
pub use config::{Config, Credentials, OutputFormat};
pub use error::{CliError, Result};
pub use output::Formatter;
