use crate::store::NodeCategory;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Why a process-order entry was not executed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum SkipReason {
    /// Recorded (or already persisted) in the source store.
    RawSource,
    /// Supplied by the flight's attribute accessor.
    Attribute,
    /// Present in the param cache, e.g. seeded from a prior run.
    Cached,
    /// Derived earlier in this run and held in the local series cache.
    LocalSeries,
}

/// Counters collected while walking the process order.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RunTelemetry {
    /// Nodes whose compute operation ran and whose result was recorded.
    pub computed: usize,
    pub by_category: BTreeMap<NodeCategory, usize>,
    pub skipped: BTreeMap<SkipReason, usize>,
}

impl RunTelemetry {
    pub fn record_computed(&mut self, category: NodeCategory) {
        self.computed += 1;
        *self.by_category.entry(category).or_insert(0) += 1;
    }

    pub fn record_skip(&mut self, reason: SkipReason) {
        *self.skipped.entry(reason).or_insert(0) += 1;
    }

    pub fn total_skipped(&self) -> usize {
        self.skipped.values().sum()
    }

    /// Entries visited: computed plus skipped.
    pub fn total_visited(&self) -> usize {
        self.computed + self.total_skipped()
    }

    pub fn computed_in(&self, category: NodeCategory) -> usize {
        self.by_category.get(&category).copied().unwrap_or(0)
    }
}
