//! Post-processing for flight attribute nodes.

use crate::compute::ledger::FlightContext;
use crate::store::{Attribute, ParamValue};
use tracing::warn;

/// Appends the attribute when the node produced one. An absent value is
/// logged and skipped; it never fails the run.
pub(crate) fn process_attribute(name: &str, raw: Option<Attribute>, ctx: &mut FlightContext) -> ParamValue {
    match &raw {
        Some(attr) => ctx.outputs.attributes.push(attr.clone()),
        None => warn!("Flight Attribute Node '{}' returned empty handed.", name),
    }
    ParamValue::Attribute(raw)
}
