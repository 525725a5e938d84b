//! # Task Errors

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;
use thiserror::Error;

use crate::store::StoreError;

/// Result type for task operations
pub type TaskResult<T> = Result<T, TaskError>;

/// Task errors
#[derive(Debug, Error)]
pub enum TaskError {
    #[error("Task description is required")]
    DescriptionRequired,

    #[error("Task title is required")]
    TitleRequired,

    #[error("Task not found")]
    NotFound,

    /// A stored record does not decode as a task
    #[error("Invalid task record: {0}")]
    InvalidRecord(String),

    #[error("Storage error: {0}")]
    Store(#[from] StoreError),
}

impl TaskError {
    /// Get HTTP status code for this error
    pub fn status_code(&self) -> StatusCode {
        match self {
            TaskError::DescriptionRequired | TaskError::TitleRequired => StatusCode::BAD_REQUEST,
            TaskError::NotFound => StatusCode::NOT_FOUND,
            TaskError::InvalidRecord(_) | TaskError::Store(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }
}

/// Error response body
#[derive(Debug, Serialize)]
pub struct MessageResponse {
    pub message: String,
}

impl IntoResponse for TaskError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        if status.is_server_error() {
            tracing::error!(error = %self, "task request failed");
        }
        let body = Json(MessageResponse {
            message: self.to_string(),
        });
        (status, body).into_response()
    }
}
