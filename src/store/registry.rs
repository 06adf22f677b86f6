use super::types::{NodeCategory, NodeOutput};
use crate::compute::ledger::ComputationError;
use crate::compute::resolver::Dependencies;
use std::collections::HashMap;
use std::fmt;

/// A named computation the executor can run.
///
/// `dependencies` is ordered: the resolved values handed to `derive` line up
/// with it slot for slot, with `None` wherever a name could not be resolved.
pub trait DerivedNode {
    fn category(&self) -> NodeCategory;
    fn dependencies(&self) -> &[String];
    fn derive(&self, deps: &Dependencies<'_>) -> Result<NodeOutput, ComputationError>;
}

type DeriveFn = dyn Fn(&Dependencies<'_>) -> Result<NodeOutput, ComputationError>;

/// A node backed by a closure.
pub struct FnNode {
    category: NodeCategory,
    dependencies: Vec<String>,
    derive: Box<DeriveFn>,
}

impl FnNode {
    pub fn new<F>(category: NodeCategory, dependencies: &[&str], derive: F) -> Self
    where
        F: Fn(&Dependencies<'_>) -> Result<NodeOutput, ComputationError> + 'static,
    {
        Self {
            category,
            dependencies: dependencies.iter().map(|d| d.to_string()).collect(),
            derive: Box::new(derive),
        }
    }
}

impl fmt::Debug for FnNode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FnNode")
            .field("category", &self.category)
            .field("dependencies", &self.dependencies)
            .finish_non_exhaustive()
    }
}

impl DerivedNode for FnNode {
    fn category(&self) -> NodeCategory { self.category }
    fn dependencies(&self) -> &[String] { &self.dependencies }
    fn derive(&self, deps: &Dependencies<'_>) -> Result<NodeOutput, ComputationError> {
        (self.derive)(deps)
    }
}

/// Name → node lookup consulted for every process-order entry that is not
/// already resolvable.
#[derive(Default)]
pub struct NodeRegistry {
    nodes: HashMap<String, Box<dyn DerivedNode>>,
}

impl NodeRegistry {
    pub fn new() -> Self { Self::default() }
    pub fn count(&self) -> usize { self.nodes.len() }

    /// Registers `node` under `name`, returning any node it replaced.
    pub fn register(
        &mut self,
        name: impl Into<String>,
        node: impl DerivedNode + 'static,
    ) -> Option<Box<dyn DerivedNode>> {
        self.nodes.insert(name.into(), Box::new(node))
    }

    pub fn get(&self, name: &str) -> Option<&dyn DerivedNode> {
        self.nodes.get(name).map(|n| n.as_ref())
    }

    pub fn contains(&self, name: &str) -> bool {
        self.nodes.contains_key(name)
    }
}

impl fmt::Debug for NodeRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut names: Vec<_> = self.nodes.keys().collect();
        names.sort();
        f.debug_struct("NodeRegistry").field("nodes", &names).finish()
    }
}
