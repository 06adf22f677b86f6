//! Node descriptors, result types and the boundary to recorded data.
pub mod registry;
pub mod sources;
pub mod types;

pub use registry::{DerivedNode, FnNode, NodeRegistry};
pub use sources::{AttributeSource, MemoryAttributes, MemorySourceStore, SourceError, SourceStore};
pub use types::*;
