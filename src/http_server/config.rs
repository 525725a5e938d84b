//! Listener settings resolved from the CLI configuration

use axum::http::HeaderValue;
use thiserror::Error;
use tower_http::cors::{AllowOrigin, Any, CorsLayer};

/// A configured CORS origin that is not a valid header value
#[derive(Debug, Error)]
#[error("Invalid CORS origin '{0}'")]
pub struct InvalidOrigin(pub String);

/// Which browser origins may call the API
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CorsPolicy {
    /// Any origin, method and header
    AnyOrigin,
    /// Only the listed origins
    Origins(Vec<HeaderValue>),
}

impl CorsPolicy {
    /// An empty list allows any origin. Every listed origin must parse.
    pub fn from_origins(origins: &[String]) -> Result<Self, InvalidOrigin> {
        if origins.is_empty() {
            return Ok(CorsPolicy::AnyOrigin);
        }

        origins
            .iter()
            .map(|origin| {
                HeaderValue::from_str(origin).map_err(|_| InvalidOrigin(origin.clone()))
            })
            .collect::<Result<Vec<_>, _>>()
            .map(CorsPolicy::Origins)
    }

    pub(crate) fn layer(&self) -> CorsLayer {
        let allow_origin = match self {
            CorsPolicy::AnyOrigin => AllowOrigin::any(),
            CorsPolicy::Origins(origins) => AllowOrigin::list(origins.iter().cloned()),
        };

        CorsLayer::new()
            .allow_origin(allow_origin)
            .allow_methods(Any)
            .allow_headers(Any)
    }
}

/// Where to listen and whom to let in
#[derive(Debug, Clone)]
pub struct ServeOptions {
    /// `host:port` passed to the TCP listener
    pub addr: String,
    pub cors: CorsPolicy,
}

impl ServeOptions {
    pub fn new(addr: impl Into<String>, cors: CorsPolicy) -> Self {
        Self {
            addr: addr.into(),
            cors,
        }
    }
}
