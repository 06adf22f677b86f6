//! Post-processing for Event and PointValue nodes.

use super::range::check_range;
use crate::compute::ledger::{ComputationError, FlightContext};
use crate::store::{Event, ParamValue, PointValue, Rated};

/// Aligns events to 1 Hz and requires every index to lie in `[0, duration]`.
pub(crate) fn process_events(
    name: &str,
    raw: &Rated<Event>,
    ctx: &mut FlightContext,
) -> Result<ParamValue, ComputationError> {
    let duration = ctx.duration();
    let aligned = raw.one_hz_aligned();
    for event in &aligned {
        check_range(name, &event.name, "index", event.index, duration)?;
    }
    ctx.outputs.events.extend(aligned.iter().cloned());
    Ok(ParamValue::Events(aligned))
}

/// Same contract as `process_events`, for point values.
pub(crate) fn process_point_values(
    name: &str,
    raw: &Rated<PointValue>,
    ctx: &mut FlightContext,
) -> Result<ParamValue, ComputationError> {
    let duration = ctx.duration();
    let aligned = raw.one_hz_aligned();
    for pv in &aligned {
        check_range(name, &pv.name, "index", pv.index, duration)?;
    }
    ctx.outputs.point_values.extend(aligned.iter().cloned());
    Ok(ParamValue::PointValues(aligned))
}
