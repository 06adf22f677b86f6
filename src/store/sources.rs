//! Boundary traits for recorded data and flight attributes, plus in-memory
//! implementations used by callers that already hold the flight in memory.

use super::types::Series;
use std::collections::HashMap;
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum SourceError {
    #[error("Source '{0}' does not exist")]
    Missing(String),
    #[error("Source '{0}' is marked invalid")]
    Invalid(String),
    #[error("Failed to write series '{name}': {reason}")]
    Write { name: String, reason: String },
}

/// Recorded and previously-derived continuous parameters for one flight.
pub trait SourceStore {
    /// True for every known key, valid or not.
    fn contains(&self, name: &str) -> bool;

    /// The series for `name` when it exists and is valid.
    fn fetch(&self, name: &str) -> Result<Series, SourceError>;

    /// Persists a derived series. Afterwards `contains(name)` is true.
    fn write_series(&mut self, name: &str, series: Series) -> Result<(), SourceError>;
}

/// Whole-flight attributes (aircraft info, start datetime, ...).
pub trait AttributeSource {
    fn attribute(&self, name: &str) -> Option<serde_json::Value>;
}

#[derive(Debug, Clone)]
struct StoredSeries {
    series: Series,
    invalid: bool,
}

#[derive(Debug, Clone, Default)]
pub struct MemorySourceStore {
    entries: HashMap<String, StoredSeries>,
    written: Vec<String>,
}

impl MemorySourceStore {
    pub fn new() -> Self { Self::default() }

    pub fn insert(&mut self, name: impl Into<String>, series: Series) {
        self.entries.insert(name.into(), StoredSeries { series, invalid: false });
    }

    /// Registers a source that exists but must not be used.
    pub fn insert_invalid(&mut self, name: impl Into<String>, series: Series) {
        self.entries.insert(name.into(), StoredSeries { series, invalid: true });
    }

    /// The stored series regardless of validity.
    pub fn get(&self, name: &str) -> Option<&Series> {
        self.entries.get(name).map(|e| &e.series)
    }

    /// Names written through `write_series`, in write order.
    pub fn written(&self) -> &[String] {
        &self.written
    }

    pub fn len(&self) -> usize { self.entries.len() }

    pub fn is_empty(&self) -> bool { self.entries.is_empty() }
}

impl SourceStore for MemorySourceStore {
    fn contains(&self, name: &str) -> bool {
        self.entries.contains_key(name)
    }

    fn fetch(&self, name: &str) -> Result<Series, SourceError> {
        match self.entries.get(name) {
            Some(e) if e.invalid => Err(SourceError::Invalid(name.to_string())),
            Some(e) => Ok(e.series.clone()),
            None => Err(SourceError::Missing(name.to_string())),
        }
    }

    fn write_series(&mut self, name: &str, series: Series) -> Result<(), SourceError> {
        self.entries.insert(name.to_string(), StoredSeries { series, invalid: false });
        self.written.push(name.to_string());
        Ok(())
    }
}

#[derive(Debug, Clone, Default)]
pub struct MemoryAttributes {
    values: HashMap<String, serde_json::Value>,
}

impl MemoryAttributes {
    pub fn new() -> Self { Self::default() }

    pub fn with(mut self, name: impl Into<String>, value: serde_json::Value) -> Self {
        self.values.insert(name.into(), value);
        self
    }

    pub fn insert(&mut self, name: impl Into<String>, value: serde_json::Value) {
        self.values.insert(name.into(), value);
    }
}

impl AttributeSource for MemoryAttributes {
    fn attribute(&self, name: &str) -> Option<serde_json::Value> {
        // Null counts as absent, same as an unset attribute.
        self.values.get(name).filter(|v| !v.is_null()).cloned()
    }
}
