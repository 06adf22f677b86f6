//! Per-flight run state: the param cache, the output accumulators and the
//! error taxonomy for a derivation run.

use crate::analysis::telemetry::RunTelemetry;
use crate::store::{Approach, Attribute, Event, Interval, NodeCategory, ParamValue, PointValue, Series, SourceError};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum ComputationError {
    #[error("Unknown node '{name}': not in the node registry")]
    UnknownNode { name: String },
    #[error("No dependencies available - nodes cannot operate without ANY dependencies available! Node: {name}")]
    NoDependenciesAvailable { name: String },
    #[error("{node}: '{item}' {field} {value:.2} is not between 0 and {upper}")]
    OutOfRange { node: String, item: String, field: &'static str, value: f64, upper: f64 },
    #[error("Array length mismatch for parameter '{name}'. Expected '{expected}', resulting array length '{actual}'")]
    LengthMismatch { name: String, expected: usize, actual: usize },
    #[error("Node '{name}' is declared {declared} but produced {produced} output")]
    UnknownCategory { name: String, declared: NodeCategory, produced: NodeCategory },
    #[error("Node '{name}' failed to derive: {message}")]
    Derivation { name: String, message: String },
    #[error(transparent)]
    Store(#[from] SourceError),
}

impl ComputationError {
    /// Convenience for node implementations reporting their own failures.
    pub fn derivation(name: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Derivation { name: name.into(), message: message.into() }
    }
}

/// The flight being processed.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Flight {
    /// Seconds of recorded data. Bounds every index check.
    pub duration: f64,
    pub start_datetime: Option<DateTime<Utc>>,
}

impl Flight {
    pub fn new(duration: f64) -> Self {
        Self { duration, start_datetime: None }
    }

    pub fn starting_at(mut self, start: DateTime<Utc>) -> Self {
        self.start_datetime = Some(start);
        self
    }
}

/// Latest processed result per parameter name.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ParamCache {
    values: BTreeMap<String, ParamValue>,
}

impl ParamCache {
    pub fn new() -> Self { Self::default() }

    #[inline(always)]
    pub fn get(&self, name: &str) -> Option<&ParamValue> {
        self.values.get(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.values.contains_key(name)
    }

    pub fn insert(&mut self, name: impl Into<String>, value: ParamValue) {
        self.values.insert(name.into(), value);
    }

    pub fn len(&self) -> usize { self.values.len() }

    pub fn is_empty(&self) -> bool { self.values.is_empty() }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.values.keys().map(String::as_str)
    }

    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string(self)
    }

    /// Restores a cache written by `to_json`, e.g. from a base run reused
    /// by a profile run.
    pub fn from_json(json: &str) -> serde_json::Result<Self> {
        serde_json::from_str(json)
    }
}

impl FromIterator<(String, ParamValue)> for ParamCache {
    fn from_iter<I: IntoIterator<Item = (String, ParamValue)>>(iter: I) -> Self {
        Self { values: iter.into_iter().collect() }
    }
}

/// Append-only accumulators for one flight.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FlightOutputs {
    pub events: Vec<Event>,
    pub point_values: Vec<PointValue>,
    pub intervals: Vec<Interval>,
    pub approaches: Vec<Approach>,
    pub attributes: Vec<Attribute>,
}

impl FlightOutputs {
    pub fn new() -> Self { Self::default() }

    pub fn attribute(&self, name: &str) -> Option<&serde_json::Value> {
        self.attributes.iter().find(|a| a.name == name).map(|a| &a.value)
    }
}

/// Everything a run mutates. Owned by exactly one run and passed by
/// exclusive reference to the executor and the post-processors.
#[derive(Debug, Clone)]
pub struct FlightContext {
    pub flight: Flight,
    pub params: ParamCache,
    pub outputs: FlightOutputs,
    /// Derived series kept in memory when they are not persisted.
    pub local_series: HashMap<String, Series>,
    pub telemetry: RunTelemetry,
}

impl FlightContext {
    pub fn new(flight: Flight, seed: ParamCache) -> Self {
        Self {
            flight,
            params: seed,
            outputs: FlightOutputs::new(),
            local_series: HashMap::new(),
            telemetry: RunTelemetry::default(),
        }
    }

    pub fn duration(&self) -> f64 {
        self.flight.duration
    }
}
