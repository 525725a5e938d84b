//! # HTTP Server
//!
//! Wraps the task router with CORS and request tracing, and serves until
//! Ctrl+C or SIGTERM.

use std::sync::Arc;

use axum::Router;
use tokio::net::TcpListener;
use tokio::signal;
use tower::ServiceBuilder;
use tower_http::trace::TraceLayer;

use super::config::{CorsPolicy, ServeOptions};
use super::task_routes::{task_routes, TaskState};

/// HTTP server for the task API
pub struct HttpServer {
    addr: String,
    router: Router,
}

impl HttpServer {
    /// Create a server around an already-opened task state
    pub fn new(options: ServeOptions, state: Arc<TaskState>) -> Self {
        let router = build_router(&options.cors, state);
        Self {
            addr: options.addr,
            router,
        }
    }

    /// Address the listener will bind
    pub fn socket_addr(&self) -> &str {
        &self.addr
    }

    /// Get the router (for testing)
    pub fn router(self) -> Router {
        self.router
    }

    /// Bind and serve until a shutdown signal arrives
    pub async fn start(self) -> Result<(), std::io::Error> {
        let listener = TcpListener::bind(&self.addr).await?;

        tracing::info!(addr = %self.addr, "task API listening");

        axum::serve(listener, self.router)
            .with_graceful_shutdown(shutdown_signal())
            .await?;

        tracing::info!("server shutdown complete");
        Ok(())
    }
}

/// Task routes plus the tracing and CORS layers
pub fn build_router(cors: &CorsPolicy, state: Arc<TaskState>) -> Router {
    task_routes(state).layer(
        ServiceBuilder::new()
            .layer(TraceLayer::new_for_http())
            .layer(cors.layer()),
    )
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            tracing::error!(error = %e, "failed to install Ctrl+C handler");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut stream) => {
                stream.recv().await;
            }
            Err(e) => {
                tracing::error!(error = %e, "failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => tracing::info!("received Ctrl+C, shutting down"),
        () = terminate => tracing::info!("received SIGTERM, shutting down"),
    }
}
