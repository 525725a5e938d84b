//! Structured logging setup
//!
//! `RUST_LOG`, when set, takes precedence over the configured filter.

use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{fmt, EnvFilter};

use super::{ObservabilityError, ObservabilityResult};

/// Default filter when neither config nor `RUST_LOG` says otherwise
pub const DEFAULT_LOG_FILTER: &str = "taskboard=info,tower_http=info";

/// Parse a filter directive string
pub fn parse_filter(directives: &str) -> ObservabilityResult<EnvFilter> {
    EnvFilter::try_new(directives).map_err(|e| ObservabilityError::InvalidFilter {
        directives: directives.to_string(),
        reason: e.to_string(),
    })
}

/// Install the global subscriber.
///
/// Fails if a subscriber is already installed.
pub fn init_logging(directives: &str) -> ObservabilityResult<()> {
    let filter = match EnvFilter::try_from_default_env() {
        Ok(filter) => filter,
        Err(_) => parse_filter(directives)?,
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_target(true))
        .try_init()
        .map_err(|e| ObservabilityError::AlreadyInitialized(e.to_string()))
}
