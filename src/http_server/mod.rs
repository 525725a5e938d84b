//! # Task HTTP Server
//!
//! JSON-over-HTTP surface for the task store.
//!
//! # Endpoints
//!
//! - `GET /tasks?search=` - List tasks, optionally filtered
//! - `POST /tasks` - Create a task
//! - `PUT /tasks/{id}` - Edit title/description
//! - `DELETE /tasks/{id}` - Delete a task
//! - `PATCH /tasks/{id}/complete` - Toggle completion
//! - `GET /health` - Liveness plus the stored task count

pub mod config;
pub mod server;
pub mod task_routes;

pub use config::{CorsPolicy, InvalidOrigin, ServeOptions};
pub use server::{build_router, HttpServer};
pub use task_routes::{task_routes, HealthResponse, TaskState};
