//! # Record Store
//!
//! Table-agnostic storage of JSON records with partial-match selects.
//!
//! State lives in memory; every insert, update and delete writes the whole
//! table map back through a `Persistence` backend.

mod database;
mod errors;
mod filter;
mod persistence;

use std::collections::BTreeMap;

pub use database::{Database, ID_FIELD};
pub use errors::{StoreError, StoreResult};
pub use filter::{matches, Filter, MatchMode};
pub use persistence::{JsonFilePersistence, MemoryPersistence, Persistence};

/// A single stored record
pub type Record = serde_json::Map<String, serde_json::Value>;

/// Table name → records, in insertion order
pub type Tables = BTreeMap<String, Vec<Record>>;
