//! CLI argument definitions using clap
//!
//! Commands:
//! - taskboard init --config <path>
//! - taskboard serve --config <path> [--port N] [--data-file PATH] [--ephemeral]

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// taskboard - a small task-management HTTP API
#[derive(Parser, Debug)]
#[command(name = "taskboard")]
#[command(version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Write a default configuration file
    Init {
        /// Path to configuration file
        #[arg(long, default_value = "./taskboard.json")]
        config: PathBuf,
    },

    /// Start the HTTP server
    Serve {
        /// Path to configuration file
        #[arg(long, default_value = "./taskboard.json")]
        config: PathBuf,

        /// Override the configured port
        #[arg(long)]
        port: Option<u16>,

        /// Override the configured snapshot file
        #[arg(long)]
        data_file: Option<PathBuf>,

        /// Keep tasks in memory only
        #[arg(long)]
        ephemeral: bool,
    },
}

impl Cli {
    /// Parse command line arguments
    pub fn parse_args() -> Self {
        Cli::parse()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_serve_overrides() {
        let cli = Cli::try_parse_from([
            "taskboard",
            "serve",
            "--port",
            "8080",
            "--data-file",
            "/tmp/tasks.json",
        ])
        .unwrap();

        match cli.command {
            Command::Serve {
                config,
                port,
                data_file,
                ephemeral,
            } => {
                assert_eq!(config, PathBuf::from("./taskboard.json"));
                assert_eq!(port, Some(8080));
                assert_eq!(data_file, Some(PathBuf::from("/tmp/tasks.json")));
                assert!(!ephemeral);
            }
            other => panic!("unexpected command: {:?}", other),
        }
    }

    #[test]
    fn test_init_default_path() {
        let cli = Cli::try_parse_from(["taskboard", "init"]).unwrap();
        assert!(matches!(cli.command, Command::Init { .. }));
    }
}
