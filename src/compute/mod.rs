//! Runs registered nodes over one flight.
pub mod align;
pub mod engine;
pub mod ledger;
pub mod resolver;

pub use align::{align_index, Align};
pub use engine::{ComputationEngine, RunOutput};
pub use ledger::{ComputationError, Flight, FlightContext, FlightOutputs, ParamCache};
pub use resolver::Dependencies;
