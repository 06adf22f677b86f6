//! Category post-processors.
//!
//! Every node result passes through here before anything downstream can
//! see it: indices are moved onto the 1 Hz grid, checked against the flight
//! duration, and appended to the run's accumulators.

pub use self::validator::Validator;
pub use self::rules::series::expected_length;

mod validator;
mod rules {
    pub mod approaches;
    pub mod attributes;
    pub mod events;
    pub mod intervals;
    pub(crate) mod range;
    pub mod series;
}
