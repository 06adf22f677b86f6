//! Per-flight record built from a finished run's outputs.

use crate::compute::ledger::FlightOutputs;
use crate::store::ApproachKind;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Event names whose first occurrence is reported by default.
pub const MILESTONE_EVENTS: [&str; 4] = ["Liftoff", "Top of Climb", "Top of Descent", "Touchdown"];

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FlightSummary {
    pub landing_count: usize,
    pub go_around_count: usize,
    pub touch_and_go_count: usize,
    /// Earliest index of each milestone event; `None` when it never occurred.
    pub first_events: BTreeMap<String, Option<f64>>,
    pub duration: Option<f64>,
}

impl FlightSummary {
    /// Summarises `outputs` with the default milestone events.
    pub fn from_outputs(outputs: &FlightOutputs) -> Self {
        Self::with_milestones(outputs, &MILESTONE_EVENTS)
    }

    pub fn with_milestones(outputs: &FlightOutputs, milestones: &[&str]) -> Self {
        let mut summary = Self::default();

        for approach in &outputs.approaches {
            match approach.kind {
                ApproachKind::Landing => summary.landing_count += 1,
                ApproachKind::GoAround => summary.go_around_count += 1,
                ApproachKind::TouchAndGo => summary.touch_and_go_count += 1,
            }
        }

        for &name in milestones {
            summary.first_events.insert(name.to_string(), first_event_index(outputs, name));
        }

        summary.duration = outputs.attribute("FDR Duration").and_then(serde_json::Value::as_f64);
        summary
    }

    pub fn first(&self, name: &str) -> Option<f64> {
        self.first_events.get(name).copied().flatten()
    }
}

/// Smallest index among events called `name`.
pub fn first_event_index(outputs: &FlightOutputs, name: &str) -> Option<f64> {
    outputs
        .events
        .iter()
        .filter(|e| e.name == name)
        .map(|e| e.index)
        .fold(None, |min, i| Some(min.map_or(i, |m: f64| m.min(i))))
}
