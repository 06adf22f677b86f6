//! The dispatch table routing each node output to its category's
//! post-processor.
use super::rules::{approaches, attributes, events, intervals, series};
use crate::compute::ledger::{ComputationError, FlightContext};
use crate::config::EngineConfig;
use crate::store::{NodeCategory, NodeOutput, SourceStore};

/// Validates, aligns and records node outputs for one run.
///
/// Holds the store that persisted series are written to; all other state
/// lives in the `FlightContext` passed to `process`.
pub struct Validator<'a, S: SourceStore + ?Sized> {
    config: &'a EngineConfig,
    store: &'a mut S,
}

impl<'a, S: SourceStore + ?Sized> Validator<'a, S> {
    pub fn new(config: &'a EngineConfig, store: &'a mut S) -> Self {
        Self { config, store }
    }

    /// Post-processes `output` for the node `name` and writes the result
    /// into the param cache and the matching accumulator.
    ///
    /// # Returns
    /// - `Ok(())` once the result is cached.
    /// - `Err(UnknownCategory)` when the output shape does not match the
    ///   node's declared category; otherwise the post-processor's error.
    pub fn process(
        &mut self,
        name: &str,
        declared: NodeCategory,
        output: NodeOutput,
        ctx: &mut FlightContext,
    ) -> Result<(), ComputationError> {
        let produced = output.category();
        if produced != declared {
            return Err(ComputationError::UnknownCategory { name: name.to_string(), declared, produced });
        }

        let value = match output {
            NodeOutput::Events(raw) => events::process_events(name, &raw, ctx)?,
            NodeOutput::PointValues(raw) => events::process_point_values(name, &raw, ctx)?,
            NodeOutput::Attribute(raw) => attributes::process_attribute(name, raw, ctx),
            NodeOutput::Intervals(raw) => intervals::process_intervals(name, &raw, ctx)?,
            NodeOutput::Series(raw) => series::process_series(name, raw, ctx, &mut *self.store, self.config)?,
            NodeOutput::Approaches(raw) => approaches::process_approaches(name, &raw, ctx)?,
        };

        ctx.params.insert(name, value);
        ctx.telemetry.record_computed(declared);
        Ok(())
    }
}
