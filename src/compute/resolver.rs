//! Turns a node's declared dependency names into ordered values.

use crate::compute::ledger::{ComputationError, ParamCache};
use crate::store::{
    Approach, Attribute, AttributeSource, Event, Interval, MaskedArray, ParamValue, PointValue, Series,
    SourceStore,
};
use smallvec::SmallVec;
use std::borrow::Cow;
use std::collections::HashMap;
use tracing::{debug, warn};

/// Resolved inputs for one node, slot for slot with its dependency names.
///
/// Cache hits are borrowed; attributes and recorded series fetched from the
/// accessors are owned.
#[derive(Debug, Clone)]
pub struct Dependencies<'a> {
    names: Cow<'a, [String]>,
    values: SmallVec<[Option<Cow<'a, ParamValue>>; 4]>,
}

impl<'a> Dependencies<'a> {
    /// Builds a dependency list directly, mainly for exercising node
    /// implementations in isolation.
    pub fn from_values(names: &[&str], values: Vec<Option<ParamValue>>) -> Dependencies<'static> {
        let names: Vec<String> = names.iter().map(|n| n.to_string()).collect();
        Dependencies {
            names: Cow::Owned(names),
            values: values.into_iter().map(|v| v.map(Cow::Owned)).collect(),
        }
    }

    pub fn len(&self) -> usize { self.values.len() }

    pub fn is_empty(&self) -> bool { self.values.is_empty() }

    pub fn names(&self) -> &[String] { &self.names }

    #[inline]
    pub fn get(&self, i: usize) -> Option<&ParamValue> {
        self.values.get(i)?.as_deref()
    }

    pub fn by_name(&self, name: &str) -> Option<&ParamValue> {
        let i = self.names.iter().position(|n| n == name)?;
        self.get(i)
    }

    pub fn is_available(&self, i: usize) -> bool {
        self.get(i).is_some()
    }

    /// True when no slot resolved. Vacuously false for a node without
    /// dependencies.
    pub fn all_missing(&self) -> bool {
        !self.values.is_empty() && self.values.iter().all(Option::is_none)
    }

    pub fn series(&self, i: usize) -> Option<&Series> {
        match self.get(i)? {
            ParamValue::Series(s) => Some(s),
            _ => None,
        }
    }

    pub fn array(&self, i: usize) -> Option<&MaskedArray> {
        self.series(i)?.array.as_ref()
    }

    pub fn events(&self, i: usize) -> Option<&[Event]> {
        match self.get(i)? {
            ParamValue::Events(v) => Some(v),
            _ => None,
        }
    }

    pub fn point_values(&self, i: usize) -> Option<&[PointValue]> {
        match self.get(i)? {
            ParamValue::PointValues(v) => Some(v),
            _ => None,
        }
    }

    pub fn intervals(&self, i: usize) -> Option<&[Interval]> {
        match self.get(i)? {
            ParamValue::Intervals(v) => Some(v),
            _ => None,
        }
    }

    pub fn approaches(&self, i: usize) -> Option<&[Approach]> {
        match self.get(i)? {
            ParamValue::Approaches(v) => Some(v),
            _ => None,
        }
    }

    pub fn attribute(&self, i: usize) -> Option<&serde_json::Value> {
        match self.get(i)? {
            ParamValue::Attribute(Some(a)) => Some(&a.value),
            _ => None,
        }
    }
}

/// Looks up every name in `names`, in order:
/// param cache, flight attribute, recorded source, local series cache.
///
/// A recorded source that exists but cannot be read resolves to `None`.
/// Fails when the node declares dependencies and none of them resolve.
pub fn resolve<'a, S, A>(
    node_name: &str,
    names: &'a [String],
    params: &'a ParamCache,
    attributes: &A,
    sources: &S,
    local_series: &'a HashMap<String, Series>,
) -> Result<Dependencies<'a>, ComputationError>
where
    S: SourceStore + ?Sized,
    A: AttributeSource + ?Sized,
{
    let mut values = SmallVec::with_capacity(names.len());

    for name in names {
        let value = if let Some(cached) = params.get(name) {
            Some(Cow::Borrowed(cached))
        } else if let Some(attr) = attributes.attribute(name) {
            Some(Cow::Owned(ParamValue::Attribute(Some(Attribute::new(name.as_str(), attr)))))
        } else if sources.contains(name) {
            match sources.fetch(name) {
                Ok(series) => Some(Cow::Owned(ParamValue::Series(series))),
                Err(e) => {
                    warn!("Dependency '{}' of '{}' unavailable: {}", name, node_name, e);
                    None
                }
            }
        } else if let Some(series) = local_series.get(name) {
            Some(Cow::Owned(ParamValue::Series(series.clone())))
        } else {
            debug!("Dependency '{}' of '{}' not available", name, node_name);
            None
        };
        values.push(value);
    }

    let deps = Dependencies { names: Cow::Borrowed(names), values };
    if deps.all_missing() {
        return Err(ComputationError::NoDependenciesAvailable { name: node_name.to_string() });
    }
    Ok(deps)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::{MemoryAttributes, MemorySourceStore, Rate};
    use serde_json::json;

    fn names(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| s.to_string()).collect()
    }

    fn series(v: f64, n: usize) -> Series {
        Series::new(MaskedArray::from_vec(vec![v; n]), Rate::ONE_HZ)
    }

    #[test]
    fn test_resolution_order_and_nulls() {
        let mut params = ParamCache::new();
        params.insert("Liftoff", ParamValue::Events(vec![Event::new("Liftoff", 5.0)]));
        let attrs = MemoryAttributes::new().with("Tail Number", json!("N123"));
        let mut sources = MemorySourceStore::new();
        sources.insert("Airspeed", series(120.0, 3));
        sources.insert_invalid("Pitch", series(0.0, 3));
        let mut local = HashMap::new();
        local.insert("Heading Continuous".to_string(), series(90.0, 3));

        let wanted = names(&["Liftoff", "Tail Number", "Airspeed", "Pitch", "Heading Continuous", "Nope"]);
        let deps = resolve("Test", &wanted, &params, &attrs, &sources, &local).expect("resolves");

        assert_eq!(deps.len(), 6);
        assert_eq!(deps.events(0).map(|e| e.len()), Some(1));
        assert_eq!(deps.attribute(1), Some(&json!("N123")));
        assert_eq!(deps.array(2).and_then(|a| a.get(0)), Some(120.0));
        assert!(!deps.is_available(3));
        assert_eq!(deps.array(4).and_then(|a| a.get(2)), Some(90.0));
        assert!(!deps.is_available(5));
    }

    #[test]
    fn test_cache_takes_precedence_over_sources() {
        let mut params = ParamCache::new();
        params.insert("Altitude AAL", ParamValue::Series(series(1.0, 2)));
        let mut sources = MemorySourceStore::new();
        sources.insert("Altitude AAL", series(2.0, 2));

        let wanted = names(&["Altitude AAL"]);
        let local = HashMap::new();
        let deps = resolve("Test", &wanted, &params, &MemoryAttributes::new(), &sources, &local).unwrap();
        assert_eq!(deps.array(0).and_then(|a| a.get(0)), Some(1.0));
        assert!(matches!(deps.values[0], Some(Cow::Borrowed(_))));
    }

    #[test]
    fn test_all_missing_fails() {
        let mut sources = MemorySourceStore::new();
        sources.insert_invalid("Pitch", series(0.0, 3));
        let wanted = names(&["Pitch", "Roll"]);

        let err = resolve("Bank Angle", &wanted, &ParamCache::new(), &MemoryAttributes::new(), &sources, &HashMap::new())
            .unwrap_err();
        assert_eq!(err, ComputationError::NoDependenciesAvailable { name: "Bank Angle".into() });
    }

    #[test]
    fn test_no_declared_dependencies_is_allowed() {
        let params = ParamCache::new();
        let local = HashMap::new();
        let deps = resolve("Gen", &[], &params, &MemoryAttributes::new(), &MemorySourceStore::new(), &local)
            .expect("generator nodes resolve");
        assert!(deps.is_empty());
        assert!(!deps.all_missing());
    }

    #[test]
    fn test_by_name_lookup() {
        let deps = Dependencies::from_values(&["A", "B"], vec![None, Some(ParamValue::Attribute(None))]);
        assert!(deps.by_name("A").is_none());
        assert!(matches!(deps.by_name("B"), Some(ParamValue::Attribute(None))));
        assert!(deps.by_name("C").is_none());
    }
}
