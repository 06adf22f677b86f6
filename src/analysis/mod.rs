//! Post-run bookkeeping: execution counters and the per-flight summary.
pub mod summary;
pub mod telemetry;

pub use summary::FlightSummary;
pub use telemetry::{RunTelemetry, SkipReason};
