//! taskboard - a small task-management HTTP API
//!
//! A generic JSON record store with write-through snapshots, a task service
//! on top of it, and an axum router exposing `/tasks`.

pub mod cli;
pub mod http_server;
pub mod observability;
pub mod store;
pub mod tasks;
