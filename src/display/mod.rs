//! Human-facing views of a run's outputs.
pub mod measures;

pub use measures::{flight_measures, format_measures, MeasureKind, MeasureRow};
