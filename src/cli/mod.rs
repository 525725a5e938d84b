//! CLI module
//!
//! Provides command-line interface for:
//! - init: Write a default configuration file
//! - serve: Open the task store and run the HTTP API

mod args;
mod commands;
mod errors;

pub use args::{Cli, Command};
pub use commands::{init, open_service, run, run_command, serve, Config};
pub use errors::{CliError, CliErrorCode, CliResult};
