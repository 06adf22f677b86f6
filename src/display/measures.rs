//! Flattens events, point values and intervals into one time-ordered table.

use crate::compute::ledger::{Flight, FlightOutputs};
use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use std::fmt::Write;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum MeasureKind {
    #[serde(rename = "Key Time Instance")]
    KeyTimeInstance,
    #[serde(rename = "Key Point Value")]
    KeyPointValue,
    #[serde(rename = "Phase")]
    Phase,
}

impl MeasureKind {
    pub fn label(&self) -> &'static str {
        match self {
            MeasureKind::KeyTimeInstance => "Key Time Instance",
            MeasureKind::KeyPointValue => "Key Point Value",
            MeasureKind::Phase => "Phase",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MeasureRow {
    pub kind: MeasureKind,
    pub name: String,
    /// Seconds from the start of data. For phases, the start edge.
    pub index: f64,
    /// Phase length in seconds (stop edge minus start edge).
    pub duration: Option<f64>,
    pub value: Option<f64>,
    pub unit: Option<String>,
    pub datetime: Option<DateTime<Utc>>,
}

/// One row per event, point value and interval, sorted by index.
pub fn flight_measures(flight: &Flight, outputs: &FlightOutputs) -> Vec<MeasureRow> {
    let stamp = |index: f64| {
        flight
            .start_datetime
            .map(|start| start + Duration::milliseconds((index * 1000.0).round() as i64))
    };

    let mut rows = Vec::with_capacity(outputs.events.len() + outputs.point_values.len() + outputs.intervals.len());

    for e in &outputs.events {
        rows.push(MeasureRow {
            kind: MeasureKind::KeyTimeInstance,
            name: e.name.clone(),
            index: e.index,
            duration: None,
            value: None,
            unit: None,
            datetime: stamp(e.index),
        });
    }

    for pv in &outputs.point_values {
        rows.push(MeasureRow {
            kind: MeasureKind::KeyPointValue,
            name: pv.name.clone(),
            index: pv.index,
            duration: None,
            value: Some(pv.value),
            unit: pv.unit.clone(),
            datetime: stamp(pv.index),
        });
    }

    for phase in &outputs.intervals {
        rows.push(MeasureRow {
            kind: MeasureKind::Phase,
            name: phase.name.clone(),
            index: phase.start_edge,
            duration: Some(phase.duration()),
            value: None,
            unit: None,
            datetime: stamp(phase.start_edge),
        });
    }

    rows.sort_by(|a, b| a.index.total_cmp(&b.index));
    rows
}

/// Plain-text rendering of `rows`, one line each.
pub fn format_measures(rows: &[MeasureRow]) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "{: <18} {: >10} {: >10} {: >12}  name", "type", "index", "duration", "value");
    for row in rows {
        let duration = row.duration.map(|d| format!("{:.2}", d)).unwrap_or_default();
        let value = match (&row.value, &row.unit) {
            (Some(v), Some(u)) => format!("{:.3} {}", v, u),
            (Some(v), None) => format!("{:.3}", v),
            _ => String::new(),
        };
        let _ = writeln!(
            out,
            "{: <18} {: >10.2} {: >10} {: >12}  {}",
            row.kind.label(),
            row.index,
            duration,
            value,
            row.name
        );
    }
    out
}
