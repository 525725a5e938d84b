//! Task HTTP Routes
//!
//! `/tasks` CRUD endpoints backed by `TaskService`.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use axum::{
    body::Bytes,
    extract::{Path, Query, State},
    http::StatusCode,
    routing::{get, patch, put},
    Json, Router,
};
use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::tasks::{NewTask, Task, TaskError, TaskPatch, TaskService};

// ==================
// Shared State
// ==================

/// Task state shared across handlers.
///
/// One lock around the service: requests touching the store run one at a time.
#[derive(Debug)]
pub struct TaskState {
    service: Mutex<TaskService>,
}

impl TaskState {
    pub fn new(service: TaskService) -> Self {
        Self {
            service: Mutex::new(service),
        }
    }

    /// Lock the service, recovering from a poisoned lock
    pub fn service(&self) -> MutexGuard<'_, TaskService> {
        self.service.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

// ==================
// Response Types
// ==================

/// `GET /health` body
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub version: &'static str,
    /// Tasks currently held by the store
    pub tasks: usize,
}

// ==================
// Task Routes
// ==================

/// Create task routes
pub fn task_routes(state: Arc<TaskState>) -> Router {
    Router::new()
        .route("/tasks", get(list_tasks_handler).post(create_task_handler))
        .route(
            "/tasks/{id}",
            put(update_task_handler).delete(delete_task_handler),
        )
        .route("/tasks/{id}/complete", patch(complete_task_handler))
        .route("/health", get(health_handler))
        .with_state(state)
}

/// First `search` value of the query string, if any.
///
/// Query pairs are decoded as a plain list, so repeated keys and unknown
/// parameters never reject the request.
fn search_param(pairs: Vec<(String, String)>) -> Option<String> {
    pairs
        .into_iter()
        .find_map(|(key, value)| (key == "search").then_some(value))
}

/// Lenient JSON body: missing, empty or malformed bodies become `T::default()`
/// so they fall through to field validation.
fn parse_body<T: DeserializeOwned + Default>(body: &Bytes) -> T {
    if body.is_empty() {
        return T::default();
    }

    serde_json::from_slice(body).unwrap_or_else(|e| {
        tracing::debug!(error = %e, "ignoring unparsable request body");
        T::default()
    })
}

// ==================
// Handlers
// ==================

async fn list_tasks_handler(
    State(state): State<Arc<TaskState>>,
    Query(pairs): Query<Vec<(String, String)>>,
) -> Result<Json<Vec<Task>>, TaskError> {
    let search = search_param(pairs);
    let tasks = state.service().list(search.as_deref())?;
    Ok(Json(tasks))
}

async fn create_task_handler(
    State(state): State<Arc<TaskState>>,
    body: Bytes,
) -> Result<StatusCode, TaskError> {
    let request: NewTask = parse_body(&body);
    state.service().create(request)?;
    Ok(StatusCode::CREATED)
}

async fn update_task_handler(
    State(state): State<Arc<TaskState>>,
    Path(id): Path<String>,
    body: Bytes,
) -> Result<StatusCode, TaskError> {
    let patch: TaskPatch = parse_body(&body);
    state.service().update(&id, patch)?;
    Ok(StatusCode::NO_CONTENT)
}

async fn delete_task_handler(
    State(state): State<Arc<TaskState>>,
    Path(id): Path<String>,
) -> Result<StatusCode, TaskError> {
    state.service().delete(&id)?;
    Ok(StatusCode::NO_CONTENT)
}

async fn complete_task_handler(
    State(state): State<Arc<TaskState>>,
    Path(id): Path<String>,
) -> Result<StatusCode, TaskError> {
    state.service().toggle_complete(&id)?;
    Ok(StatusCode::NO_CONTENT)
}

async fn health_handler(State(state): State<Arc<TaskState>>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok",
        version: env!("CARGO_PKG_VERSION"),
        tasks: state.service().count(),
    })
}
