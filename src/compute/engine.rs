//! A synchronous, single-threaded node executor.
use crate::analysis::telemetry::{RunTelemetry, SkipReason};
use crate::compute::ledger::{ComputationError, Flight, FlightContext, FlightOutputs, ParamCache};
use crate::compute::resolver;
use crate::config::EngineConfig;
use crate::store::{AttributeSource, NodeRegistry, SourceStore};
use crate::validation::Validator;
use tracing::{debug, info};

/// What a finished run hands back to the caller.
#[derive(Debug, Clone)]
pub struct RunOutput {
    pub outputs: FlightOutputs,
    /// Final cache, reusable as the seed of a later run.
    pub params: ParamCache,
    pub telemetry: RunTelemetry,
}

pub struct ComputationEngine<'a> {
    registry: &'a NodeRegistry,
    config: &'a EngineConfig,
}

impl<'a> ComputationEngine<'a> {
    pub fn new(registry: &'a NodeRegistry, config: &'a EngineConfig) -> Self {
        Self { registry, config }
    }

    /// Derives every entry of `process_order` for one flight.
    ///
    /// The order must already respect all dependency edges. `seed` holds
    /// results from a prior run; those names are never recomputed. Series
    /// written to `sources` before a failure stay written.
    pub fn run<S, A>(
        &self,
        flight: Flight,
        process_order: &[String],
        sources: &mut S,
        attributes: &A,
        seed: ParamCache,
    ) -> Result<RunOutput, ComputationError>
    where
        S: SourceStore + ?Sized,
        A: AttributeSource + ?Sized,
    {
        let mut ctx = FlightContext::new(flight, seed);
        self.derive_all(process_order, &mut ctx, sources, attributes)?;

        let FlightContext { outputs, params, telemetry, .. } = ctx;
        info!(
            "Derived {} of {} parameters ({} skipped)",
            telemetry.computed,
            process_order.len(),
            telemetry.total_skipped()
        );
        Ok(RunOutput { outputs, params, telemetry })
    }

    /// Walks the process order against an existing context.
    pub fn derive_all<S, A>(
        &self,
        process_order: &[String],
        ctx: &mut FlightContext,
        sources: &mut S,
        attributes: &A,
    ) -> Result<(), ComputationError>
    where
        S: SourceStore + ?Sized,
        A: AttributeSource + ?Sized,
    {
        for name in process_order {
            if let Some(reason) = self.skip_reason(name, ctx, sources, attributes) {
                debug!("  derive: skipping '{}' ({:?})", name, reason);
                ctx.telemetry.record_skip(reason);
                continue;
            }
            self.derive_one(name, ctx, sources, attributes)?;
        }
        Ok(())
    }

    /// Entries already resolvable without running their node.
    fn skip_reason<S, A>(&self, name: &str, ctx: &FlightContext, sources: &S, attributes: &A) -> Option<SkipReason>
    where
        S: SourceStore + ?Sized,
        A: AttributeSource + ?Sized,
    {
        if sources.contains(name) {
            Some(SkipReason::RawSource)
        } else if attributes.attribute(name).is_some() {
            Some(SkipReason::Attribute)
        } else if ctx.params.contains(name) {
            Some(SkipReason::Cached)
        } else if ctx.local_series.contains_key(name) {
            Some(SkipReason::LocalSeries)
        } else {
            None
        }
    }

    fn derive_one<S, A>(
        &self,
        name: &str,
        ctx: &mut FlightContext,
        sources: &mut S,
        attributes: &A,
    ) -> Result<(), ComputationError>
    where
        S: SourceStore + ?Sized,
        A: AttributeSource + ?Sized,
    {
        let node = self
            .registry
            .get(name)
            .ok_or_else(|| ComputationError::UnknownNode { name: name.to_string() })?;

        info!("Processing parameter {}", name);
        let output = {
            let deps = resolver::resolve(
                name,
                node.dependencies(),
                &ctx.params,
                attributes,
                &*sources,
                &ctx.local_series,
            )?;
            node.derive(&deps)?
        };

        Validator::new(self.config, sources).process(name, node.category(), output, ctx)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::compute::resolver::Dependencies;
    use crate::store::{
        Attribute, Event, FnNode, Interval, MaskedArray, MemoryAttributes, MemorySourceStore,
        NodeCategory, NodeOutput, ParamValue, PointValue, Rate, Rated, RawInterval, Series,
    };
    use serde_json::json;
    use std::cell::Cell;
    use std::rc::Rc;

    fn order(names: &[&str]) -> Vec<String> {
        names.iter().map(|s| s.to_string()).collect()
    }

    fn ones(n: usize, rate: Rate) -> Series {
        Series::new(MaskedArray::from_vec(vec![1.0; n]), rate)
    }

    /// A series generator at 1 Hz plus a point value taken halfway along it.
    fn two_node_registry() -> NodeRegistry {
        let mut reg = NodeRegistry::new();
        reg.register(
            "A",
            FnNode::new(NodeCategory::ContinuousSeries, &[], |_| Ok(NodeOutput::Series(ones(100, Rate::ONE_HZ)))),
        );
        reg.register(
            "B",
            FnNode::new(NodeCategory::PointValue, &["A"], |deps: &Dependencies<'_>| {
                let arr = deps.array(0).ok_or_else(|| ComputationError::derivation("B", "A missing"))?;
                let value = arr.get(50).unwrap_or(0.0);
                Ok(NodeOutput::PointValues(Rated::one_hz(vec![PointValue::new("B", 50.0, value)])))
            }),
        );
        reg
    }

    #[test]
    fn test_end_to_end_series_then_point_value() {
        let registry = two_node_registry();
        let config = EngineConfig::default();
        let mut store = MemorySourceStore::new();

        let out = ComputationEngine::new(&registry, &config)
            .run(Flight::new(100.0), &order(&["A", "B"]), &mut store, &MemoryAttributes::new(), ParamCache::new())
            .expect("run succeeds");

        assert!(matches!(out.params.get("A"), Some(ParamValue::Series(s)) if s.len() == 100));
        assert!(store.contains("A"));
        assert_eq!(out.outputs.point_values, vec![PointValue::new("B", 50.0, 1.0)]);
        assert_eq!(out.telemetry.computed, 2);
    }

    #[test]
    fn test_in_memory_series_feed_later_nodes() {
        let registry = two_node_registry();
        let config = EngineConfig::in_memory();
        let mut store = MemorySourceStore::new();

        let out = ComputationEngine::new(&registry, &config)
            .run(Flight::new(100.0), &order(&["A", "B"]), &mut store, &MemoryAttributes::new(), ParamCache::new())
            .unwrap();

        assert!(store.is_empty());
        assert_eq!(out.outputs.point_values.len(), 1);
    }

    #[test]
    fn test_seeded_cache_is_never_recomputed() {
        let calls = Rc::new(Cell::new(0));
        let counter = calls.clone();
        let mut registry = NodeRegistry::new();
        registry.register(
            "A",
            FnNode::new(NodeCategory::Event, &[], move |_| {
                counter.set(counter.get() + 1);
                Ok(NodeOutput::Events(Rated::one_hz(vec![Event::new("A", 1.0)])))
            }),
        );
        let config = EngineConfig::default();
        let engine = ComputationEngine::new(&registry, &config);

        let mut seed = ParamCache::new();
        seed.insert("A", ParamValue::Events(vec![Event::new("A", 7.0)]));
        let out = engine
            .run(Flight::new(10.0), &order(&["A"]), &mut MemorySourceStore::new(), &MemoryAttributes::new(), seed)
            .unwrap();
        assert_eq!(calls.get(), 0);
        assert_eq!(out.params.get("A"), Some(&ParamValue::Events(vec![Event::new("A", 7.0)])));
        assert_eq!(out.telemetry.skipped.get(&SkipReason::Cached), Some(&1));

        engine
            .run(Flight::new(10.0), &order(&["A"]), &mut MemorySourceStore::new(), &MemoryAttributes::new(), ParamCache::new())
            .unwrap();
        assert_eq!(calls.get(), 1);
    }

    #[test]
    fn test_raw_sources_and_attributes_are_skipped() {
        // Neither name is registered: reaching the registry would fail.
        let registry = NodeRegistry::new();
        let config = EngineConfig::default();
        let mut store = MemorySourceStore::new();
        store.insert_invalid("Airspeed", ones(10, Rate::ONE_HZ));
        let attrs = MemoryAttributes::new().with("Tail Number", json!("G-ABCD"));

        let out = ComputationEngine::new(&registry, &config)
            .run(Flight::new(10.0), &order(&["Airspeed", "Tail Number"]), &mut store, &attrs, ParamCache::new())
            .unwrap();
        assert_eq!(out.telemetry.computed, 0);
        assert_eq!(out.telemetry.total_skipped(), 2);
    }

    #[test]
    fn test_unknown_node_is_fatal() {
        let registry = NodeRegistry::new();
        let config = EngineConfig::default();
        let err = ComputationEngine::new(&registry, &config)
            .run(Flight::new(10.0), &order(&["Ghost"]), &mut MemorySourceStore::new(), &MemoryAttributes::new(), ParamCache::new())
            .unwrap_err();
        assert_eq!(err, ComputationError::UnknownNode { name: "Ghost".into() });
    }

    #[test]
    fn test_all_null_dependencies_stop_before_compute() {
        let calls = Rc::new(Cell::new(0));
        let counter = calls.clone();
        let mut registry = NodeRegistry::new();
        registry.register(
            "Bank Angle Max",
            FnNode::new(NodeCategory::PointValue, &["Roll", "Pitch"], move |_| {
                counter.set(counter.get() + 1);
                Ok(NodeOutput::PointValues(Rated::one_hz(vec![])))
            }),
        );
        let config = EngineConfig::default();
        let mut store = MemorySourceStore::new();
        store.insert_invalid("Pitch", ones(10, Rate::ONE_HZ));

        // "Pitch" is a raw source, so it is skipped; the node still cannot run.
        let err = ComputationEngine::new(&registry, &config)
            .run(Flight::new(10.0), &order(&["Pitch", "Bank Angle Max"]), &mut store, &MemoryAttributes::new(), ParamCache::new())
            .unwrap_err();
        assert_eq!(err, ComputationError::NoDependenciesAvailable { name: "Bank Angle Max".into() });
        assert_eq!(calls.get(), 0);
    }

    #[test]
    fn test_event_past_duration_is_fatal() {
        let mut registry = NodeRegistry::new();
        registry.register(
            "Liftoff",
            FnNode::new(NodeCategory::Event, &[], |_| Ok(NodeOutput::Events(Rated::one_hz(vec![Event::new("Liftoff", 101.0)])))),
        );
        let config = EngineConfig::default();
        let err = ComputationEngine::new(&registry, &config)
            .run(Flight::new(100.0), &order(&["Liftoff"]), &mut MemorySourceStore::new(), &MemoryAttributes::new(), ParamCache::new())
            .unwrap_err();
        assert!(matches!(err, ComputationError::OutOfRange { value, .. } if value == 101.0));
    }

    #[test]
    fn test_failed_run_keeps_earlier_persisted_series() {
        let mut registry = two_node_registry();
        registry.register(
            "C",
            FnNode::new(NodeCategory::ContinuousSeries, &["A"], |_| Ok(NodeOutput::Series(ones(90, Rate::ONE_HZ)))),
        );
        let config = EngineConfig::default();
        let mut store = MemorySourceStore::new();

        let err = ComputationEngine::new(&registry, &config)
            .run(Flight::new(100.0), &order(&["A", "C"]), &mut store, &MemoryAttributes::new(), ParamCache::new())
            .unwrap_err();
        assert_eq!(err, ComputationError::LengthMismatch { name: "C".into(), expected: 100, actual: 90 });
        assert_eq!(store.written(), &["A".to_string()]);
    }

    #[test]
    fn test_node_failure_propagates() {
        let mut registry = NodeRegistry::new();
        registry.register(
            "Broken",
            FnNode::new(NodeCategory::Event, &[], |_| Err(ComputationError::derivation("Broken", "bad input"))),
        );
        let config = EngineConfig::default();
        let err = ComputationEngine::new(&registry, &config)
            .run(Flight::new(10.0), &order(&["Broken"]), &mut MemorySourceStore::new(), &MemoryAttributes::new(), ParamCache::new())
            .unwrap_err();
        assert_eq!(err.to_string(), "Node 'Broken' failed to derive: bad input");
    }

    fn full_flight_registry() -> NodeRegistry {
        let mut reg = NodeRegistry::new();
        reg.register(
            "Altitude AAL",
            FnNode::new(NodeCategory::ContinuousSeries, &["Altitude STD"], |deps: &Dependencies<'_>| {
                let src = deps.array(0).ok_or_else(|| ComputationError::derivation("Altitude AAL", "no altitude"))?;
                let data = src.data().iter().map(|v| v - 100.0).collect();
                Ok(NodeOutput::Series(Series::new(MaskedArray::with_mask(data, src.mask().to_vec()), Rate::new(2.0, 0.0))))
            }),
        );
        reg.register(
            "Airborne",
            FnNode::new(NodeCategory::Interval, &["Altitude AAL"], |_| {
                Ok(NodeOutput::Intervals(Rated::new(
                    Rate::new(2.0, 0.0),
                    vec![RawInterval { name: "Airborne".into(), start: Some(20.0), start_edge: Some(20.0), ..Default::default() }],
                )))
            }),
        );
        reg.register(
            "Liftoff",
            FnNode::new(NodeCategory::Event, &["Airborne"], |deps: &Dependencies<'_>| {
                let airborne = deps.intervals(0).unwrap_or(&[]);
                let events = airborne.iter().map(|a: &Interval| Event::new("Liftoff", a.start_edge)).collect();
                Ok(NodeOutput::Events(Rated::one_hz(events)))
            }),
        );
        reg.register(
            "FDR Takeoff Airport",
            FnNode::new(NodeCategory::Attribute, &["Liftoff", "Tail Number"], |deps: &Dependencies<'_>| {
                Ok(NodeOutput::Attribute(
                    deps.events(0)
                        .filter(|e| !e.is_empty())
                        .map(|_| Attribute::new("FDR Takeoff Airport", json!({"code": {"icao": "KDEN"}}))),
                ))
            }),
        );
        reg.register(
            "FDR Landing Airport",
            FnNode::new(NodeCategory::Attribute, &["Touchdown", "Tail Number"], |_| Ok(NodeOutput::Attribute(None))),
        );
        reg
    }

    fn full_flight_sources() -> MemorySourceStore {
        let mut store = MemorySourceStore::new();
        store.insert("Altitude STD", ones(120, Rate::new(2.0, 0.0)));
        store
    }

    #[test]
    fn test_full_flight_chain() {
        let registry = full_flight_registry();
        let config = EngineConfig::default();
        let mut store = full_flight_sources();
        let attrs = MemoryAttributes::new().with("Tail Number", json!("N123"));
        let process_order = order(&[
            "Altitude STD",
            "Tail Number",
            "Altitude AAL",
            "Airborne",
            "Liftoff",
            "FDR Takeoff Airport",
            "FDR Landing Airport",
        ]);

        let out = ComputationEngine::new(&registry, &config)
            .run(Flight::new(60.0), &process_order, &mut store, &attrs, ParamCache::new())
            .expect("run succeeds");

        let airborne = &out.outputs.intervals[0];
        assert_eq!((airborne.start, airborne.stop, airborne.start_edge, airborne.stop_edge), (10.0, 60.0, 10.0, 60.0));
        assert_eq!(out.outputs.events, vec![Event::new("Liftoff", 10.0)]);
        assert_eq!(out.outputs.attributes.len(), 1);
        assert_eq!(out.params.get("FDR Landing Airport"), Some(&ParamValue::Attribute(None)));
        assert_eq!(store.get("Altitude AAL").and_then(|s| s.array.as_ref()).and_then(|a| a.get(0)), Some(-99.0));
        assert_eq!(out.telemetry.computed_in(NodeCategory::Attribute), 2);
        assert_eq!(out.telemetry.skipped.get(&SkipReason::RawSource), Some(&1));
    }

    #[test]
    fn test_identical_inputs_give_identical_runs() {
        let registry = full_flight_registry();
        let config = EngineConfig::default();
        let attrs = MemoryAttributes::new().with("Tail Number", json!("N123"));
        let process_order = order(&["Altitude AAL", "Airborne", "Liftoff", "FDR Takeoff Airport"]);
        let engine = ComputationEngine::new(&registry, &config);

        let first = engine
            .run(Flight::new(60.0), &process_order, &mut full_flight_sources(), &attrs, ParamCache::new())
            .unwrap();
        let second = engine
            .run(Flight::new(60.0), &process_order, &mut full_flight_sources(), &attrs, ParamCache::new())
            .unwrap();

        assert_eq!(first.params, second.params);
        assert_eq!(first.outputs, second.outputs);
        assert_eq!(first.params.to_json().unwrap(), second.params.to_json().unwrap());
    }
}
