//! # Database
//!
//! In-memory table map with write-through snapshots.

use serde_json::Value;

use super::errors::StoreResult;
use super::filter::{self, Filter};
use super::persistence::Persistence;
use super::{Record, Tables};

/// Field every record is keyed by for update/delete/find
pub const ID_FIELD: &str = "id";

/// Generic record store.
///
/// Tables are created on first insert. Every mutating call saves the full
/// state through the configured `Persistence`, even when it changed nothing.
#[derive(Debug)]
pub struct Database {
    tables: Tables,
    persistence: Box<dyn Persistence>,
}

impl Database {
    /// Open the store, restoring the last snapshot if one exists
    pub fn open(persistence: impl Persistence + 'static) -> StoreResult<Self> {
        let tables = persistence.load()?.unwrap_or_default();

        tracing::debug!(tables = tables.len(), "record store opened");

        Ok(Self {
            tables,
            persistence: Box::new(persistence),
        })
    }

    /// Records of `table` in insertion order, optionally narrowed by `filter`
    pub fn select(&self, table: &str, filter: Option<&Filter>) -> Vec<Record> {
        let Some(rows) = self.tables.get(table) else {
            return Vec::new();
        };

        match filter {
            Some(filter) => rows
                .iter()
                .filter(|row| filter::matches(row, filter))
                .cloned()
                .collect(),
            None => rows.clone(),
        }
    }

    /// Exact lookup by id
    pub fn find(&self, table: &str, id: &str) -> Option<Record> {
        let rows = self.tables.get(table)?;
        rows.iter().find(|row| has_id(row, id)).cloned()
    }

    /// Append `record` to `table`
    pub fn insert(&mut self, table: &str, record: Record) -> StoreResult<()> {
        self.tables
            .entry(table.to_string())
            .or_default()
            .push(record);

        tracing::debug!(table, "record inserted");
        self.persist()
    }

    /// Replace the record with `id` in place
    pub fn update(&mut self, table: &str, id: &str, record: Record) -> StoreResult<()> {
        if let Some(slot) = self
            .tables
            .get_mut(table)
            .and_then(|rows| rows.iter_mut().find(|row| has_id(row, id)))
        {
            *slot = record;
            tracing::debug!(table, id, "record updated");
        }

        self.persist()
    }

    /// Remove the record with `id`
    pub fn delete(&mut self, table: &str, id: &str) -> StoreResult<()> {
        if let Some(rows) = self.tables.get_mut(table) {
            if let Some(idx) = rows.iter().position(|row| has_id(row, id)) {
                rows.remove(idx);
                tracing::debug!(table, id, "record deleted");
            }
        }

        self.persist()
    }

    /// Number of records in `table`
    pub fn len(&self, table: &str) -> usize {
        self.tables.get(table).map_or(0, Vec::len)
    }

    /// Read-only view of every table
    pub fn tables(&self) -> &Tables {
        &self.tables
    }

    fn persist(&self) -> StoreResult<()> {
        self.persistence.save(&self.tables).inspect_err(|e| {
            tracing::error!(error = %e, "failed to persist record store");
        })
    }
}

fn has_id(record: &Record, id: &str) -> bool {
    matches!(record.get(ID_FIELD), Some(Value::String(value)) if value == id)
}
