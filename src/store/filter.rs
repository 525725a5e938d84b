//! # Partial-Match Filter
//!
//! Field → substring filters for `Database::select`.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::Record;

/// How the conditions of a filter combine
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MatchMode {
    /// Every condition must hold
    #[default]
    All,
    /// At least one condition must hold
    Any,
}

/// A set of substring conditions, one per field
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Filter {
    mode: MatchMode,
    conditions: Vec<(String, String)>,
}

impl Filter {
    /// Create an empty AND filter (matches every record)
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an empty filter that accepts a record when any condition holds
    pub fn any() -> Self {
        Self::with_mode(MatchMode::Any)
    }

    /// Create an empty filter combining its conditions per `mode`
    pub fn with_mode(mode: MatchMode) -> Self {
        Self {
            mode,
            conditions: Vec::new(),
        }
    }

    /// Require `field` to contain `fragment`
    pub fn contains(mut self, field: impl Into<String>, fragment: impl Into<String>) -> Self {
        self.conditions.push((field.into(), fragment.into()));
        self
    }

    /// Iterate the (field, fragment) conditions in insertion order
    pub fn conditions(&self) -> impl Iterator<Item = (&str, &str)> {
        self.conditions
            .iter()
            .map(|(field, fragment)| (field.as_str(), fragment.as_str()))
    }

    /// True when no condition has been added; such a filter matches every record
    pub fn is_empty(&self) -> bool {
        self.conditions.is_empty()
    }
}

/// Match policy for `select`.
///
/// A condition holds when the record's field is a string containing the
/// fragment, compared case-sensitively. Missing or non-string fields never
/// match. Conditions combine per the filter's `MatchMode`; a filter with no
/// conditions matches everything.
pub fn matches(record: &Record, filter: &Filter) -> bool {
    if filter.is_empty() {
        return true;
    }

    let holds = |(field, fragment): (&str, &str)| match record.get(field) {
        Some(Value::String(value)) => value.contains(fragment),
        _ => false,
    };

    match filter.mode {
        MatchMode::All => filter.conditions().all(holds),
        MatchMode::Any => filter.conditions().any(holds),
    }
}
