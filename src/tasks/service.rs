//! Task operations on top of the record store

use std::sync::Arc;

use super::clock::{Clock, IdGenerator, SystemClock, UuidGenerator};
use super::errors::{TaskError, TaskResult};
use super::task::{NewTask, Task, TaskPatch};
use crate::store::{Database, Filter, MatchMode};

/// Table holding every task
pub const TASKS_TABLE: &str = "tasks";

/// Task use cases.
///
/// Owns the database plus the clock and id source, so tests can pin both.
#[derive(Debug)]
pub struct TaskService {
    db: Database,
    clock: Arc<dyn Clock>,
    ids: Arc<dyn IdGenerator>,
    search_mode: MatchMode,
}

impl TaskService {
    /// Service using the system clock and UUID v4 ids
    pub fn new(db: Database) -> TaskResult<Self> {
        Self::with_sources(db, Arc::new(SystemClock), Arc::new(UuidGenerator))
    }

    /// Build the service, refusing a store whose `tasks` table holds any
    /// record that does not decode as a `Task`.
    pub fn with_sources(
        db: Database,
        clock: Arc<dyn Clock>,
        ids: Arc<dyn IdGenerator>,
    ) -> TaskResult<Self> {
        let service = Self {
            db,
            clock,
            ids,
            search_mode: MatchMode::Any,
        };
        service.check_records()?;
        Ok(service)
    }

    fn check_records(&self) -> TaskResult<()> {
        for record in self.db.select(TASKS_TABLE, None) {
            let id = record
                .get("id")
                .map(ToString::to_string)
                .unwrap_or_else(|| "<missing>".to_string());
            if let Err(TaskError::InvalidRecord(reason)) = Task::from_record(record) {
                return Err(TaskError::InvalidRecord(format!(
                    "stored task {}: {}",
                    id, reason
                )));
            }
        }
        Ok(())
    }

    /// How `list` combines the title and description conditions
    pub fn with_search_mode(mut self, mode: MatchMode) -> Self {
        self.search_mode = mode;
        self
    }

    /// All tasks, or those whose title or description contains `search`
    /// (both, under `MatchMode::All`).
    ///
    /// Searches default to `MatchMode::Any`, unlike `Filter::new()` which
    /// defaults to `MatchMode::All`. An empty search string lists everything.
    pub fn list(&self, search: Option<&str>) -> TaskResult<Vec<Task>> {
        let filter = search
            .filter(|s| !s.is_empty())
            .map(|s| search_filter(s, self.search_mode));

        self.db
            .select(TASKS_TABLE, filter.as_ref())
            .into_iter()
            .map(Task::from_record)
            .collect()
    }

    pub fn get(&self, id: &str) -> TaskResult<Task> {
        let record = self.db.find(TASKS_TABLE, id).ok_or(TaskError::NotFound)?;
        Task::from_record(record)
    }

    pub fn create(&mut self, request: NewTask) -> TaskResult<Task> {
        let (title, description) = request.validate()?;
        let task = Task::new(self.ids.next_id(), title, description, self.clock.as_ref());

        self.db.insert(TASKS_TABLE, task.to_record()?)?;
        tracing::info!(id = %task.id, "task created");

        Ok(task)
    }

    pub fn update(&mut self, id: &str, patch: TaskPatch) -> TaskResult<Task> {
        let task = self.get(id)?.merge(patch);

        self.db.update(TASKS_TABLE, id, task.to_record()?)?;
        tracing::info!(id, "task updated");

        Ok(task)
    }

    pub fn delete(&mut self, id: &str) -> TaskResult<()> {
        self.get(id)?;

        self.db.delete(TASKS_TABLE, id)?;
        tracing::info!(id, "task deleted");

        Ok(())
    }

    pub fn toggle_complete(&mut self, id: &str) -> TaskResult<Task> {
        let task = self.get(id)?.toggle_complete(self.clock.as_ref());

        self.db.update(TASKS_TABLE, id, task.to_record()?)?;
        tracing::info!(id, completed = task.is_completed(), "task completion toggled");

        Ok(task)
    }

    /// Number of stored tasks
    pub fn count(&self) -> usize {
        self.db.len(TASKS_TABLE)
    }
}

// Search policy: one condition per searchable field.
fn search_filter(search: &str, mode: MatchMode) -> Filter {
    Filter::with_mode(mode)
        .contains("title", search)
        .contains("description", search)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::MemoryPersistence;
    use crate::tasks::clock::{FixedClock, SequentialIds};
    use chrono::{TimeZone, Utc};

    fn service() -> TaskService {
        let db = Database::open(MemoryPersistence::new()).unwrap();
        let clock = FixedClock(Utc.with_ymd_and_hms(2024, 5, 1, 12, 0, 0).unwrap());
        TaskService::with_sources(db, Arc::new(clock), Arc::new(SequentialIds::new())).unwrap()
    }

    fn seeded() -> TaskService {
        let mut service = service();
        service.create(NewTask::new("Buy milk", "at store")).unwrap();
        service.create(NewTask::new("Walk dog", "in park")).unwrap();
        service
    }

    #[test]
    fn test_create_assigns_id_and_open_state() {
        let mut service = service();
        let task = service.create(NewTask::new("Buy milk", "at store")).unwrap();

        assert_eq!(task.id, "task-1");
        assert!(task.completed_at.is_none());
        assert_eq!(service.list(None).unwrap(), vec![task]);
    }

    #[test]
    fn test_create_invalid_does_not_insert() {
        let mut service = seeded();
        assert!(service.create(NewTask::new("", "x")).is_err());
        assert!(service.create(NewTask::default()).is_err());
        assert_eq!(service.list(None).unwrap().len(), 2);
    }

    #[test]
    fn test_search() {
        let service = seeded();

        let found = service.list(Some("milk")).unwrap();
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].title, "Buy milk");

        let found = service.list(Some("park")).unwrap();
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].title, "Walk dog");

        assert!(service.list(Some("zebra")).unwrap().is_empty());
        assert!(service.list(Some("MILK")).unwrap().is_empty());
        assert_eq!(service.list(Some("")).unwrap().len(), 2);
    }

    #[test]
    fn test_search_all_mode_needs_both_fields() {
        let mut service = seeded().with_search_mode(MatchMode::All);
        service
            .create(NewTask::new("Read book", "book club"))
            .unwrap();

        assert!(service.list(Some("milk")).unwrap().is_empty());

        let found = service.list(Some("book")).unwrap();
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].title, "Read book");
    }

    #[test]
    fn test_update_unknown_id() {
        let mut service = seeded();
        let before = service.list(None).unwrap();

        let err = service.update("nope", TaskPatch::title("x")).unwrap_err();
        assert!(matches!(err, TaskError::NotFound));
        assert_eq!(service.list(None).unwrap(), before);
    }

    #[test]
    fn test_update_preserves_other_fields() {
        let mut service = seeded();
        service.update("task-1", TaskPatch::title("Buy oat milk")).unwrap();

        let task = service.get("task-1").unwrap();
        assert_eq!(task.title, "Buy oat milk");
        assert_eq!(task.description, "at store");
    }

    #[test]
    fn test_delete_twice() {
        let mut service = seeded();
        service.delete("task-1").unwrap();

        assert!(matches!(service.get("task-1"), Err(TaskError::NotFound)));
        assert!(matches!(service.delete("task-1"), Err(TaskError::NotFound)));
        assert_eq!(service.list(None).unwrap().len(), 1);
    }

    #[test]
    fn test_toggle_complete_twice() {
        let mut service = seeded();

        let done = service.toggle_complete("task-2").unwrap();
        assert!(done.completed_at.is_some());

        let reopened = service.toggle_complete("task-2").unwrap();
        assert!(reopened.completed_at.is_none());
        assert_eq!(service.get("task-2").unwrap(), reopened);
    }

    #[test]
    fn test_undecodable_stored_task_rejected() {
        let mut db = Database::open(MemoryPersistence::new()).unwrap();
        let record = match serde_json::json!({"id": "x", "title": "t"}) {
            serde_json::Value::Object(map) => map,
            _ => unreachable!(),
        };
        db.insert(TASKS_TABLE, record).unwrap();

        let err = TaskService::new(db).unwrap_err();
        assert!(matches!(err, TaskError::InvalidRecord(_)));
        assert!(err.to_string().contains("description"));
    }

    #[test]
    fn test_id_prefix_does_not_resolve() {
        let mut service = seeded();
        assert!(matches!(
            service.toggle_complete("task-"),
            Err(TaskError::NotFound)
        ));
    }
}
