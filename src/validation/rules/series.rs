//! Post-processing for continuous (derived parameter) nodes.

use crate::compute::ledger::{ComputationError, FlightContext};
use crate::config::EngineConfig;
use crate::store::{MaskedArray, ParamValue, Series, SourceStore};
use tracing::{debug, warn};

/// Samples a full-flight series at `frequency` Hz must hold.
///
/// Rounds up: 2822 s at 0.25 Hz is 706 samples.
pub fn expected_length(duration: f64, frequency: f64) -> usize {
    let exact = duration * frequency;
    if !exact.is_finite() || exact <= 0.0 {
        return 0;
    }
    // Absorbs float noise such as 30 * 0.1 = 3.0000000000000004.
    (exact - 1e-9).ceil() as usize
}

/// Checks a derived series' length against the flight and stores it.
///
/// A missing array becomes fully masked zeros of the expected length.
/// Up to `excess_sample_tolerance` surplus samples are cut; anything
/// shorter than expected, or longer beyond the tolerance, is fatal.
pub(crate) fn process_series<S: SourceStore + ?Sized>(
    name: &str,
    mut series: Series,
    ctx: &mut FlightContext,
    store: &mut S,
    config: &EngineConfig,
) -> Result<ParamValue, ComputationError> {
    let expected = expected_length(ctx.duration(), series.rate.frequency);

    let array = match series.array.take() {
        Some(array) => array,
        None => {
            warn!("No array set; creating a fully masked array for {}", name);
            MaskedArray::masked_zeros(expected)
        }
    };

    let actual = array.len();
    let array = if actual == expected {
        array
    } else if actual > expected && actual - expected <= config.excess_sample_tolerance {
        warn!(
            "Cutting excess data for parameter '{}'. Expected length was '{}' while resulting array length was '{}'.",
            name, expected, actual
        );
        array.truncate(expected)
    } else {
        return Err(ComputationError::LengthMismatch { name: name.to_string(), expected, actual });
    };
    series.array = Some(array);

    if config.persist_series {
        debug!("Writing series '{}' to source store", name);
        store.write_series(name, series.clone())?;
    } else {
        ctx.local_series.insert(name.to_string(), series.clone());
    }
    Ok(ParamValue::Series(series))
}
