//! Engine configuration.
//!
//! Defaults match the behaviour of a base (non-profile) run that writes
//! derived series back to the flight's source store.

use serde::{Deserialize, Serialize};

/// Largest number of surplus samples silently cut from a derived series.
pub const DEFAULT_EXCESS_TOLERANCE: usize = 4;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Write derived series to the source store. When false they stay in the
    /// run's local series cache.
    pub persist_series: bool,
    /// Surplus samples (beyond duration × frequency) truncated without error.
    pub excess_sample_tolerance: usize,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            persist_series: true,
            excess_sample_tolerance: DEFAULT_EXCESS_TOLERANCE,
        }
    }
}

impl EngineConfig {
    /// Defaults overridden by `FLIGHT_DERIVE_PERSIST_SERIES` and
    /// `FLIGHT_DERIVE_EXCESS_TOLERANCE`. Unparsable values fall back to the
    /// default.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let defaults = Self::default();
        Self {
            persist_series: lookup("FLIGHT_DERIVE_PERSIST_SERIES")
                .and_then(|v| parse_flag(&v))
                .unwrap_or(defaults.persist_series),
            excess_sample_tolerance: lookup("FLIGHT_DERIVE_EXCESS_TOLERANCE")
                .and_then(|v| v.trim().parse().ok())
                .unwrap_or(defaults.excess_sample_tolerance),
        }
    }

    /// Keeps derived series in memory only.
    pub fn in_memory() -> Self {
        Self { persist_series: false, ..Self::default() }
    }
}

fn parse_flag(v: &str) -> Option<bool> {
    match v.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}
