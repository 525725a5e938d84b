//! Task record and request payloads

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::clock::Clock;
use super::errors::{TaskError, TaskResult};
use crate::store::Record;

/// A stored task
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Task {
    pub id: String,
    pub title: String,
    pub description: String,
    /// `None` while the task is open
    pub completed_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    /// Set at creation; edits and completion toggles leave it alone
    pub updated_at: DateTime<Utc>,
}

impl Task {
    /// Build a fresh, incomplete task
    pub fn new(
        id: impl Into<String>,
        title: impl Into<String>,
        description: impl Into<String>,
        clock: &dyn Clock,
    ) -> Self {
        let now = clock.now();
        Self {
            id: id.into(),
            title: title.into(),
            description: description.into(),
            completed_at: None,
            created_at: now,
            updated_at: now,
        }
    }

    pub fn is_completed(&self) -> bool {
        self.completed_at.is_some()
    }

    /// Apply the fields present in `patch`; everything else is kept
    pub fn merge(self, patch: TaskPatch) -> Self {
        let TaskPatch { title, description } = patch.normalized();
        Self {
            title: title.unwrap_or(self.title),
            description: description.unwrap_or(self.description),
            ..self
        }
    }

    /// Flip completion: open tasks get stamped with now, completed ones reopen
    pub fn toggle_complete(self, clock: &dyn Clock) -> Self {
        let completed_at = match self.completed_at {
            Some(_) => None,
            None => Some(clock.now()),
        };
        Self {
            completed_at,
            ..self
        }
    }

    pub fn to_record(&self) -> TaskResult<Record> {
        match serde_json::to_value(self) {
            Ok(Value::Object(map)) => Ok(map),
            Ok(other) => Err(TaskError::InvalidRecord(format!(
                "expected object, got {}",
                other
            ))),
            Err(e) => Err(TaskError::InvalidRecord(e.to_string())),
        }
    }

    pub fn from_record(record: Record) -> TaskResult<Self> {
        serde_json::from_value(Value::Object(record))
            .map_err(|e| TaskError::InvalidRecord(e.to_string()))
    }
}

/// `POST /tasks` payload
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct NewTask {
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
}

impl NewTask {
    pub fn new(title: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            title: Some(title.into()),
            description: Some(description.into()),
        }
    }

    /// Checks description before title and returns `(title, description)`
    pub fn validate(self) -> TaskResult<(String, String)> {
        let description = non_empty(self.description).ok_or(TaskError::DescriptionRequired)?;
        let title = non_empty(self.title).ok_or(TaskError::TitleRequired)?;
        Ok((title, description))
    }
}

/// `PUT /tasks/{id}` payload
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct TaskPatch {
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
}

impl TaskPatch {
    pub fn title(title: impl Into<String>) -> Self {
        Self {
            title: Some(title.into()),
            ..Self::default()
        }
    }

    pub fn description(description: impl Into<String>) -> Self {
        Self {
            description: Some(description.into()),
            ..Self::default()
        }
    }

    // Empty strings do not override
    fn normalized(self) -> Self {
        Self {
            title: non_empty(self.title),
            description: non_empty(self.description),
        }
    }
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|s| !s.is_empty())
}
