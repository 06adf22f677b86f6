//! Flight parameter derivation.
//!
//! A caller registers named nodes, supplies a dependency-ordered process
//! order plus the flight's recorded data, and receives the events, point
//! values, phases, approaches and attributes derived for that flight.

pub mod analysis;
pub mod compute;
pub mod config;
pub mod display;
pub mod store;
pub mod validation;

pub use compute::{ComputationEngine, ComputationError, Dependencies, Flight, FlightOutputs, ParamCache, RunOutput};
pub use config::EngineConfig;
pub use store::{
    AttributeSource, DerivedNode, FnNode, MemoryAttributes, MemorySourceStore, NodeCategory, NodeOutput,
    NodeRegistry, ParamValue, SourceStore,
};
