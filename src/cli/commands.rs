//! CLI command implementations

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::http_server::{CorsPolicy, HttpServer, ServeOptions, TaskState};
use crate::observability::{init_logging, parse_filter, DEFAULT_LOG_FILTER};
use crate::store::{Database, JsonFilePersistence, MatchMode, MemoryPersistence};
use crate::tasks::TaskService;

use super::args::Command;
use super::errors::{CliError, CliResult};

/// Configuration file structure
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Config {
    /// Interface to bind (default "0.0.0.0")
    #[serde(default = "default_host")]
    pub host: String,

    /// Listen port (default 3333)
    #[serde(default = "default_port")]
    pub port: u16,

    /// Allowed browser origins; empty allows any
    #[serde(default)]
    pub cors_origins: Vec<String>,

    /// Snapshot file for the record store (default "./db.json")
    #[serde(default = "default_data_file")]
    pub data_file: PathBuf,

    /// tracing filter directives
    #[serde(default = "default_log_filter")]
    pub log_filter: String,

    /// How `GET /tasks?search=` combines title and description ("any" or "all")
    #[serde(default = "default_search_mode")]
    pub search_mode: MatchMode,
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    3333
}

fn default_data_file() -> PathBuf {
    PathBuf::from("./db.json")
}

fn default_log_filter() -> String {
    DEFAULT_LOG_FILTER.to_string()
}

fn default_search_mode() -> MatchMode {
    MatchMode::Any
}

impl Default for Config {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            cors_origins: Vec::new(),
            data_file: default_data_file(),
            log_filter: default_log_filter(),
            search_mode: default_search_mode(),
        }
    }
}

impl Config {
    /// Load configuration from file; a missing file yields defaults
    pub fn load(path: &Path) -> CliResult<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }

        let content = fs::read_to_string(path)
            .map_err(|e| CliError::config_error(format!("Failed to read config: {}", e)))?;

        let config: Config = serde_json::from_str(&content)
            .map_err(|e| CliError::config_error(format!("Invalid config JSON: {}", e)))?;

        config.validate()?;

        Ok(config)
    }

    fn validate(&self) -> CliResult<()> {
        if self.port == 0 {
            return Err(CliError::config_error("port must be > 0"));
        }

        if self.data_file.as_os_str().is_empty() {
            return Err(CliError::config_error("data_file must not be empty"));
        }

        parse_filter(&self.log_filter).map_err(|e| CliError::config_error(e.to_string()))?;
        self.cors_policy()?;

        Ok(())
    }

    fn cors_policy(&self) -> CliResult<CorsPolicy> {
        CorsPolicy::from_origins(&self.cors_origins)
            .map_err(|e| CliError::config_error(e.to_string()))
    }

    /// Listener settings for the HTTP server
    pub fn serve_options(&self) -> CliResult<ServeOptions> {
        Ok(ServeOptions::new(
            format!("{}:{}", self.host, self.port),
            self.cors_policy()?,
        ))
    }
}

/// Main CLI entry point
///
/// Parses arguments and dispatches to the appropriate command.
pub async fn run() -> CliResult<()> {
    let cli = super::args::Cli::parse_args();
    run_command(cli.command).await
}

/// Run the appropriate command based on CLI args
pub async fn run_command(cmd: Command) -> CliResult<()> {
    match cmd {
        Command::Init { config } => init(&config),
        Command::Serve {
            config,
            port,
            data_file,
            ephemeral,
        } => {
            let mut config = Config::load(&config)?;
            if let Some(port) = port {
                config.port = port;
            }
            if let Some(data_file) = data_file {
                config.data_file = data_file;
            }
            config.validate()?;
            serve(config, ephemeral).await
        }
    }
}

/// Write a default config file at `config_path`
pub fn init(config_path: &Path) -> CliResult<()> {
    if config_path.exists() {
        return Err(CliError::already_initialized(config_path.display()));
    }

    if let Some(parent) = config_path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)?;
        }
    }

    let content = serde_json::to_string_pretty(&Config::default())
        .map_err(|e| CliError::config_error(format!("Failed to encode config: {}", e)))?;
    fs::write(config_path, content)?;

    println!("Wrote {}", config_path.display());
    Ok(())
}

/// Open the store described by `config`.
///
/// A snapshot that is not valid JSON, or whose tasks do not decode, is a
/// boot failure.
pub fn open_service(config: &Config, ephemeral: bool) -> CliResult<TaskService> {
    let db = if ephemeral {
        Database::open(MemoryPersistence::new())?
    } else {
        Database::open(JsonFilePersistence::new(&config.data_file))?
    };

    let service = TaskService::new(db).map_err(|e| CliError::boot_failed(e.to_string()))?;
    Ok(service.with_search_mode(config.search_mode))
}

/// Boot the store and serve HTTP until shutdown
pub async fn serve(config: Config, ephemeral: bool) -> CliResult<()> {
    init_logging(&config.log_filter).map_err(|e| CliError::boot_failed(e.to_string()))?;

    let service = open_service(&config, ephemeral).inspect_err(|e| {
        tracing::error!(error = %e, data_file = %config.data_file.display(), "failed to open task store");
    })?;

    tracing::info!(
        data_file = %config.data_file.display(),
        ephemeral,
        tasks = service.count(),
        "task store loaded"
    );

    let options = config.serve_options()?;
    let state = Arc::new(TaskState::new(service));
    HttpServer::new(options, state)
        .start()
        .await
        .map_err(|e| CliError::boot_failed(format!("HTTP server failed: {}", e)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cli::errors::CliErrorCode;
    use tempfile::TempDir;

    #[test]
    fn test_missing_config_uses_defaults() {
        let dir = TempDir::new().unwrap();
        let config = Config::load(&dir.path().join("absent.json")).unwrap();
        assert_eq!(config, Config::default());
        assert_eq!(config.port, 3333);
        assert_eq!(config.search_mode, MatchMode::Any);
    }

    #[test]
    fn test_partial_config() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("taskboard.json");
        fs::write(
            &path,
            r#"{"port": 8080, "data_file": "/var/lib/tasks.json", "search_mode": "all"}"#,
        )
        .unwrap();

        let config = Config::load(&path).unwrap();
        assert_eq!(config.port, 8080);
        assert_eq!(config.host, "0.0.0.0");
        assert_eq!(config.serve_options().unwrap().addr, "0.0.0.0:8080");
        assert_eq!(config.data_file, PathBuf::from("/var/lib/tasks.json"));
        assert_eq!(config.search_mode, MatchMode::All);
    }

    #[test]
    fn test_invalid_config_rejected() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("taskboard.json");

        fs::write(&path, r#"{"port": 0}"#).unwrap();
        let err = Config::load(&path).unwrap_err();
        assert_eq!(err.code(), CliErrorCode::ConfigError);

        fs::write(&path, r#"{"cors_origins": ["http://bad\norigin"]}"#).unwrap();
        let err = Config::load(&path).unwrap_err();
        assert_eq!(err.code(), CliErrorCode::ConfigError);

        fs::write(&path, "not json").unwrap();
        let err = Config::load(&path).unwrap_err();
        assert_eq!(err.code(), CliErrorCode::ConfigError);
    }

    #[test]
    fn test_init_writes_loadable_config_once() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("conf/taskboard.json");

        init(&path).unwrap();
        assert_eq!(Config::load(&path).unwrap(), Config::default());

        let err = init(&path).unwrap_err();
        assert_eq!(err.code(), CliErrorCode::AlreadyInitialized);
    }

    #[test]
    fn test_open_service_rejects_corrupt_snapshot() {
        let dir = TempDir::new().unwrap();
        let data_file = dir.path().join("db.json");
        fs::write(&data_file, "{broken").unwrap();

        let config = Config {
            data_file,
            ..Config::default()
        };
        let err = open_service(&config, false).unwrap_err();
        assert_eq!(err.code(), CliErrorCode::BootFailed);

        assert!(open_service(&config, true).is_ok());
    }

    #[test]
    fn test_open_service_rejects_undecodable_task() {
        let dir = TempDir::new().unwrap();
        let data_file = dir.path().join("db.json");
        fs::write(&data_file, r#"{"tasks":[{"id":"x","title":"t"}]}"#).unwrap();

        let config = Config {
            data_file,
            ..Config::default()
        };
        let err = open_service(&config, false).unwrap_err();
        assert_eq!(err.code(), CliErrorCode::BootFailed);
        assert!(err.message().contains("description"));
    }
}
