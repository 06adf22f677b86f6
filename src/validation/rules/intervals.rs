//! Post-processing for interval (phase) nodes.

use super::range::check_range;
use crate::compute::ledger::{ComputationError, FlightContext};
use crate::store::{Interval, ParamValue, Rated, RawInterval};

/// Aligns intervals to 1 Hz, fills unset bounds and checks them.
///
/// An unset start (or start edge) means the beginning of the data and
/// becomes 0; an unset stop (or stop edge) becomes the flight duration.
/// Stops may reach `duration + 1` since they are exclusive.
pub(crate) fn process_intervals(
    name: &str,
    raw: &Rated<RawInterval>,
    ctx: &mut FlightContext,
) -> Result<ParamValue, ComputationError> {
    let duration = ctx.duration();
    let mut filled = Vec::with_capacity(raw.items.len());

    for one_hz in raw.one_hz_aligned() {
        let interval = Interval {
            start: one_hz.start.unwrap_or(0.0),
            stop: one_hz.stop.unwrap_or(duration),
            start_edge: one_hz.start_edge.unwrap_or(0.0),
            stop_edge: one_hz.stop_edge.unwrap_or(duration),
            name: one_hz.name,
        };

        check_range(name, &interval.name, "start", interval.start, duration)?;
        check_range(name, &interval.name, "stop", interval.stop, duration + 1.0)?;
        check_range(name, &interval.name, "start_edge", interval.start_edge, duration)?;
        check_range(name, &interval.name, "stop_edge", interval.stop_edge, duration + 1.0)?;

        ctx.outputs.intervals.push(interval.clone());
        filled.push(interval);
    }

    Ok(ParamValue::Intervals(filled))
}
