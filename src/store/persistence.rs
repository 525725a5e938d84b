//! # Snapshot Persistence
//!
//! Durable storage for the full table map. Every save overwrites the previous
//! snapshot; there is no journal.

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, PoisonError};

use super::errors::{StoreError, StoreResult};
use super::Tables;

/// Trait for snapshot storage backends
pub trait Persistence: Send + Sync + std::fmt::Debug {
    /// Load the last snapshot. `None` means nothing was ever saved.
    fn load(&self) -> StoreResult<Option<Tables>>;

    /// Replace the snapshot with `tables`
    fn save(&self, tables: &Tables) -> StoreResult<()>;
}

/// JSON file-based snapshot
#[derive(Debug, Clone)]
pub struct JsonFilePersistence {
    path: PathBuf,
}

impl JsonFilePersistence {
    pub fn new(path: impl AsRef<Path>) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
        }
    }

    fn io_error(&self, source: std::io::Error) -> StoreError {
        StoreError::Io {
            path: self.path.display().to_string(),
            source,
        }
    }
}

impl Persistence for JsonFilePersistence {
    fn load(&self) -> StoreResult<Option<Tables>> {
        if !self.path.exists() {
            return Ok(None);
        }

        let content = fs::read_to_string(&self.path).map_err(|e| self.io_error(e))?;

        if content.trim().is_empty() {
            return Ok(None);
        }

        serde_json::from_str(&content)
            .map(Some)
            .map_err(|e| StoreError::CorruptSnapshot {
                path: self.path.display().to_string(),
                reason: e.to_string(),
            })
    }

    fn save(&self, tables: &Tables) -> StoreResult<()> {
        let content = serde_json::to_string_pretty(tables)?;

        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent).map_err(|e| self.io_error(e))?;
            }
        }

        fs::write(&self.path, content).map_err(|e| self.io_error(e))
    }
}

/// In-memory snapshot for tests and ephemeral runs.
///
/// Clones share the same snapshot, so a second `Database` opened on a clone
/// sees what the first one saved.
#[derive(Debug, Clone, Default)]
pub struct MemoryPersistence {
    snapshot: Arc<Mutex<Option<Tables>>>,
}

impl MemoryPersistence {
    pub fn new() -> Self {
        Self::default()
    }

    /// Copy of the last saved snapshot
    pub fn snapshot(&self) -> Option<Tables> {
        self.snapshot
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }
}

impl Persistence for MemoryPersistence {
    fn load(&self) -> StoreResult<Option<Tables>> {
        Ok(self.snapshot())
    }

    fn save(&self, tables: &Tables) -> StoreResult<()> {
        *self.snapshot.lock().unwrap_or_else(PoisonError::into_inner) = Some(tables.clone());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use tempfile::TempDir;

    fn sample_tables() -> Tables {
        let mut tables = Tables::new();
        let record = match json!({"id": "a", "title": "Buy milk"}) {
            serde_json::Value::Object(map) => map,
            _ => unreachable!(),
        };
        tables.insert("tasks".to_string(), vec![record]);
        tables
    }

    #[test]
    fn test_missing_file_loads_nothing() {
        let dir = TempDir::new().unwrap();
        let persistence = JsonFilePersistence::new(dir.path().join("db.json"));
        assert!(persistence.load().unwrap().is_none());
    }

    #[test]
    fn test_empty_file_loads_nothing() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("db.json");
        fs::write(&path, "").unwrap();
        assert!(JsonFilePersistence::new(&path).load().unwrap().is_none());
    }

    #[test]
    fn test_file_save_then_load() {
        let dir = TempDir::new().unwrap();
        let persistence = JsonFilePersistence::new(dir.path().join("nested/db.json"));
        persistence.save(&sample_tables()).unwrap();
        assert_eq!(persistence.load().unwrap(), Some(sample_tables()));
    }

    #[test]
    fn test_malformed_file_is_corrupt() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("db.json");
        fs::write(&path, "{\"tasks\": [").unwrap();

        let err = JsonFilePersistence::new(&path).load().unwrap_err();
        assert!(matches!(err, StoreError::CorruptSnapshot { .. }));
        assert!(err.is_fatal());
    }

    #[test]
    fn test_memory_clones_share_snapshot() {
        let first = MemoryPersistence::new();
        let second = first.clone();
        assert!(second.load().unwrap().is_none());

        first.save(&sample_tables()).unwrap();
        assert_eq!(second.load().unwrap(), Some(sample_tables()));
    }
}
