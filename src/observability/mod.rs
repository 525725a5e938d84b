//! Observability subsystem
//!
//! Logging goes through `tracing`; the binary installs a `tracing-subscriber`
//! registry with an env filter and a fmt layer. Per-request spans come from
//! tower-http's `TraceLayer` in the HTTP server.

mod logger;

pub use logger::{init_logging, parse_filter, DEFAULT_LOG_FILTER};

use thiserror::Error;

/// Result type for observability operations
pub type ObservabilityResult<T> = Result<T, ObservabilityError>;

/// Observability errors
#[derive(Debug, Error)]
pub enum ObservabilityError {
    #[error("Invalid log filter '{directives}': {reason}")]
    InvalidFilter { directives: String, reason: String },

    #[error("Logger already initialized: {0}")]
    AlreadyInitialized(String),
}
