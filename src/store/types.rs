//! Category-shaped results, masked sample arrays and sampling rates.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::Arc;

/// The closed set of output categories a node can declare.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum NodeCategory {
    Attribute,
    Event,
    PointValue,
    Interval,
    ContinuousSeries,
    ApproachEvent,
}

impl fmt::Display for NodeCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            NodeCategory::Attribute => "Attribute",
            NodeCategory::Event => "Event",
            NodeCategory::PointValue => "PointValue",
            NodeCategory::Interval => "Interval",
            NodeCategory::ContinuousSeries => "ContinuousSeries",
            NodeCategory::ApproachEvent => "ApproachEvent",
        };
        f.write_str(label)
    }
}

/// A sample grid: `frequency` in Hz, `offset` in seconds.
///
/// Sample `i` on this grid sits at `i / frequency + offset` seconds.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Rate {
    pub frequency: f64,
    pub offset: f64,
}

impl Rate {
    /// The canonical time base every bound check runs on.
    pub const ONE_HZ: Rate = Rate { frequency: 1.0, offset: 0.0 };

    pub fn new(frequency: f64, offset: f64) -> Self {
        Self { frequency, offset }
    }
}

impl Default for Rate {
    fn default() -> Self {
        Rate::ONE_HZ
    }
}

/// Sample values with a parallel validity mask (`true` = invalid sample).
///
/// Both buffers sit behind `Arc` so cache reads and dependency hand-off
/// never copy the samples.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(from = "RawMaskedArray")]
pub struct MaskedArray {
    data: Arc<Vec<f64>>,
    mask: Arc<Vec<bool>>,
}

/// Wire shape of `MaskedArray`; the mask length is repaired on the way in.
#[derive(Deserialize)]
struct RawMaskedArray {
    data: Vec<f64>,
    mask: Vec<bool>,
}

impl From<RawMaskedArray> for MaskedArray {
    fn from(raw: RawMaskedArray) -> Self {
        MaskedArray::with_mask(raw.data, raw.mask)
    }
}

impl MaskedArray {
    /// Builds an array with every sample valid.
    pub fn from_vec(data: Vec<f64>) -> Self {
        let mask = vec![false; data.len()];
        Self { data: Arc::new(data), mask: Arc::new(mask) }
    }

    /// Builds an array from samples and mask. A mask of the wrong length is
    /// padded with `true` or cut so both buffers stay the same length.
    pub fn with_mask(data: Vec<f64>, mut mask: Vec<bool>) -> Self {
        mask.resize(data.len(), true);
        Self { data: Arc::new(data), mask: Arc::new(mask) }
    }

    /// Zeros of length `len`, all masked.
    pub fn masked_zeros(len: usize) -> Self {
        Self { data: Arc::new(vec![0.0; len]), mask: Arc::new(vec![true; len]) }
    }

    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    pub fn data(&self) -> &[f64] {
        &self.data
    }

    pub fn mask(&self) -> &[bool] {
        &self.mask
    }

    /// The sample at `i`, or `None` when it is masked or out of bounds.
    #[inline]
    pub fn get(&self, i: usize) -> Option<f64> {
        match self.mask.get(i) {
            Some(false) => self.data.get(i).copied(),
            _ => None,
        }
    }

    pub fn valid_count(&self) -> usize {
        self.mask.iter().filter(|m| !**m).count()
    }

    pub fn is_fully_masked(&self) -> bool {
        self.mask.iter().all(|m| *m)
    }

    /// Keeps the first `len` samples.
    pub fn truncate(&self, len: usize) -> Self {
        if len >= self.len() {
            return self.clone();
        }
        Self {
            data: Arc::new(self.data[..len].to_vec()),
            mask: Arc::new(self.mask[..len].to_vec()),
        }
    }
}

/// A continuous parameter. The array is optional on raw node output; the
/// series post-processor always fills it in.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Series {
    pub array: Option<MaskedArray>,
    pub rate: Rate,
    pub units: Option<String>,
}

impl Series {
    pub fn new(array: MaskedArray, rate: Rate) -> Self {
        Self { array: Some(array), rate, units: None }
    }

    /// A series whose node could not produce samples.
    pub fn empty(rate: Rate) -> Self {
        Self { array: None, rate, units: None }
    }

    pub fn with_units(mut self, units: impl Into<String>) -> Self {
        self.units = Some(units.into());
        self
    }

    pub fn len(&self) -> usize {
        self.array.as_ref().map_or(0, MaskedArray::len)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// A durationless occurrence, e.g. Liftoff.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Event {
    pub name: String,
    pub index: f64,
}

impl Event {
    pub fn new(name: impl Into<String>, index: f64) -> Self {
        Self { name: name.into(), index }
    }
}

/// A scalar measurement anchored to one time index.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PointValue {
    pub name: String,
    pub index: f64,
    pub value: f64,
    pub unit: Option<String>,
}

impl PointValue {
    pub fn new(name: impl Into<String>, index: f64, value: f64) -> Self {
        Self { name: name.into(), index, value, unit: None }
    }

    pub fn with_unit(mut self, unit: impl Into<String>) -> Self {
        self.unit = Some(unit.into());
        self
    }
}

/// Whole-flight metadata. Values are JSON so both scalars and structured
/// records (airports, runways) fit.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Attribute {
    pub name: String,
    pub value: serde_json::Value,
}

impl Attribute {
    pub fn new(name: impl Into<String>, value: serde_json::Value) -> Self {
        Self { name: name.into(), value }
    }
}

/// An interval as a node produces it. An unset bound means "from the start"
/// or "to the end" of the data.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RawInterval {
    pub name: String,
    pub start: Option<f64>,
    pub stop: Option<f64>,
    pub start_edge: Option<f64>,
    pub stop_edge: Option<f64>,
}

impl RawInterval {
    /// A span with no bounds at all.
    pub fn unbounded(name: impl Into<String>) -> Self {
        Self { name: name.into(), ..Default::default() }
    }

    /// A span whose edges equal its indices.
    pub fn between(name: impl Into<String>, start: f64, stop: f64) -> Self {
        Self {
            name: name.into(),
            start: Some(start),
            stop: Some(stop),
            start_edge: Some(start),
            stop_edge: Some(stop),
        }
    }
}

/// A validated 1 Hz interval with every bound filled in.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Interval {
    pub name: String,
    pub start: f64,
    pub stop: f64,
    pub start_edge: f64,
    pub stop_edge: f64,
}

impl Interval {
    pub fn duration(&self) -> f64 {
        self.stop_edge - self.start_edge
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Span {
    pub start: f64,
    pub stop: f64,
}

impl Span {
    pub fn new(start: f64, stop: f64) -> Self {
        Self { start, stop }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ApproachKind {
    Landing,
    GoAround,
    TouchAndGo,
}

/// One approach-to-landing attempt.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Approach {
    pub kind: ApproachKind,
    pub span: Span,
    pub gs_est: Option<Span>,
    pub loc_est: Option<Span>,
    pub turnoff: Option<f64>,
}

impl Approach {
    pub fn new(kind: ApproachKind, span: Span) -> Self {
        Self { kind, span, gs_est: None, loc_est: None, turnoff: None }
    }
}

/// A list of timed items together with the rate their indices refer to.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Rated<T> {
    pub rate: Rate,
    pub items: Vec<T>,
}

impl<T> Rated<T> {
    pub fn new(rate: Rate, items: Vec<T>) -> Self {
        Self { rate, items }
    }

    /// Items already on the 1 Hz grid.
    pub fn one_hz(items: Vec<T>) -> Self {
        Self { rate: Rate::ONE_HZ, items }
    }
}

/// What a node's compute operation returns, before alignment or checks.
#[derive(Debug, Clone, PartialEq)]
pub enum NodeOutput {
    /// `None` when the attribute could not be derived.
    Attribute(Option<Attribute>),
    Events(Rated<Event>),
    PointValues(Rated<PointValue>),
    Intervals(Rated<RawInterval>),
    Series(Series),
    Approaches(Rated<Approach>),
}

impl NodeOutput {
    /// The category this output shape belongs to.
    pub fn category(&self) -> NodeCategory {
        match self {
            NodeOutput::Attribute(_) => NodeCategory::Attribute,
            NodeOutput::Events(_) => NodeCategory::Event,
            NodeOutput::PointValues(_) => NodeCategory::PointValue,
            NodeOutput::Intervals(_) => NodeCategory::Interval,
            NodeOutput::Series(_) => NodeCategory::ContinuousSeries,
            NodeOutput::Approaches(_) => NodeCategory::ApproachEvent,
        }
    }
}

/// A processed result as stored in the param cache and handed to
/// downstream nodes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum ParamValue {
    Attribute(Option<Attribute>),
    Events(Vec<Event>),
    PointValues(Vec<PointValue>),
    Intervals(Vec<Interval>),
    Series(Series),
    Approaches(Vec<Approach>),
}

impl ParamValue {
    pub fn category(&self) -> NodeCategory {
        match self {
            ParamValue::Attribute(_) => NodeCategory::Attribute,
            ParamValue::Events(_) => NodeCategory::Event,
            ParamValue::PointValues(_) => NodeCategory::PointValue,
            ParamValue::Intervals(_) => NodeCategory::Interval,
            ParamValue::Series(_) => NodeCategory::ContinuousSeries,
            ParamValue::Approaches(_) => NodeCategory::ApproachEvent,
        }
    }
}
