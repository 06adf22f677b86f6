//! Post-processing for approach nodes.

use super::range::check_range;
use crate::compute::ledger::{ComputationError, FlightContext};
use crate::store::{Approach, ParamValue, Rated, Span};

fn check_span(node: &str, item: &str, which: &'static [&'static str; 2], span: &Span, duration: f64) -> Result<(), ComputationError> {
    check_range(node, item, which[0], span.start, duration)?;
    check_range(node, item, which[1], span.stop, duration)
}

/// Aligns approaches to 1 Hz. The primary span and every sub-span or
/// turnoff that is set must lie in `[0, duration]`.
pub(crate) fn process_approaches(
    name: &str,
    raw: &Rated<Approach>,
    ctx: &mut FlightContext,
) -> Result<ParamValue, ComputationError> {
    let duration = ctx.duration();
    let aligned = raw.one_hz_aligned();

    for approach in &aligned {
        let item = format!("{:?} approach", approach.kind);
        check_span(name, &item, &["start", "stop"], &approach.span, duration)?;
        if let Some(turnoff) = approach.turnoff {
            check_range(name, &item, "turnoff", turnoff, duration)?;
        }
        if let Some(gs) = &approach.gs_est {
            check_span(name, &item, &["gs_est start", "gs_est stop"], gs, duration)?;
        }
        if let Some(loc) = &approach.loc_est {
            check_span(name, &item, &["loc_est start", "loc_est stop"], loc, duration)?;
        }
    }

    ctx.outputs.approaches.extend(aligned.iter().cloned());
    Ok(ParamValue::Approaches(aligned))
}
