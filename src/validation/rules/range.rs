//! Shared bound check for every time-indexed category.

use crate::compute::ledger::ComputationError;

/// Fails unless `0 <= value <= upper`. NaN always fails.
#[inline]
pub(crate) fn check_range(
    node: &str,
    item: &str,
    field: &'static str,
    value: f64,
    upper: f64,
) -> Result<(), ComputationError> {
    if (0.0..=upper).contains(&value) {
        Ok(())
    } else {
        Err(ComputationError::OutOfRange {
            node: node.to_string(),
            item: item.to_string(),
            field,
            value,
            upper,
        })
    }
}
