//! Moves indices and samples between sample grids.
//!
//! Every bound check in the post-processors runs on `Rate::ONE_HZ`, so a
//! node's native-rate output is converted here first.

use crate::store::{Approach, Event, MaskedArray, PointValue, Rate, Rated, RawInterval, Series, Span};

const GRID_EPSILON: f64 = 1e-9;

/// Converts a sample index on `from` into the matching index on `to`,
/// going through absolute time.
#[inline(always)]
pub fn align_index(index: f64, from: Rate, to: Rate) -> f64 {
    let seconds = index / from.frequency + from.offset;
    (seconds - to.offset) * to.frequency
}

/// Items whose indices can be moved to another grid.
pub trait Align: Sized {
    fn aligned(&self, from: Rate, to: Rate) -> Self;
}

impl Align for Event {
    fn aligned(&self, from: Rate, to: Rate) -> Self {
        Event { name: self.name.clone(), index: align_index(self.index, from, to) }
    }
}

impl Align for PointValue {
    fn aligned(&self, from: Rate, to: Rate) -> Self {
        PointValue { index: align_index(self.index, from, to), ..self.clone() }
    }
}

impl Align for RawInterval {
    /// Unset bounds stay unset.
    fn aligned(&self, from: Rate, to: Rate) -> Self {
        let shift = |v: Option<f64>| v.map(|i| align_index(i, from, to));
        RawInterval {
            name: self.name.clone(),
            start: shift(self.start),
            stop: shift(self.stop),
            start_edge: shift(self.start_edge),
            stop_edge: shift(self.stop_edge),
        }
    }
}

impl Align for Span {
    fn aligned(&self, from: Rate, to: Rate) -> Self {
        Span { start: align_index(self.start, from, to), stop: align_index(self.stop, from, to) }
    }
}

impl Align for Approach {
    fn aligned(&self, from: Rate, to: Rate) -> Self {
        Approach {
            kind: self.kind,
            span: self.span.aligned(from, to),
            gs_est: self.gs_est.map(|s| s.aligned(from, to)),
            loc_est: self.loc_est.map(|s| s.aligned(from, to)),
            turnoff: self.turnoff.map(|t| align_index(t, from, to)),
        }
    }
}

impl<T: Align> Rated<T> {
    pub fn aligned(&self, to: Rate) -> Rated<T> {
        let items = self.items.iter().map(|i| i.aligned(self.rate, to)).collect();
        Rated { rate: to, items }
    }

    /// Shorthand for aligning onto the canonical 1 Hz grid.
    pub fn one_hz_aligned(&self) -> Vec<T> {
        self.aligned(Rate::ONE_HZ).items
    }
}

/// Linearly resamples `array` from `from` onto `len` samples of `to`.
///
/// A target sample is masked when it falls outside the source data or when
/// either neighbouring source sample is masked. A target sample that lands
/// exactly on a source sample takes that sample as-is.
pub fn resample(array: &MaskedArray, from: Rate, to: Rate, len: usize) -> MaskedArray {
    let mut data = vec![0.0; len];
    let mut mask = vec![true; len];
    if array.is_empty() {
        return MaskedArray::with_mask(data, mask);
    }
    let last = (array.len() - 1) as f64;

    for j in 0..len {
        let pos = align_index(j as f64, to, from);
        if pos < -GRID_EPSILON || pos > last + GRID_EPSILON {
            continue;
        }
        let pos = pos.clamp(0.0, last);
        let lo = pos.floor();
        let frac = pos - lo;
        let lo = lo as usize;

        if frac < GRID_EPSILON || lo + 1 >= array.len() {
            if let Some(v) = array.get(lo) {
                data[j] = v;
                mask[j] = false;
            }
        } else if 1.0 - frac < GRID_EPSILON {
            if let Some(v) = array.get(lo + 1) {
                data[j] = v;
                mask[j] = false;
            }
        } else if let (Some(a), Some(b)) = (array.get(lo), array.get(lo + 1)) {
            data[j] = a + (b - a) * frac;
            mask[j] = false;
        }
    }

    MaskedArray::with_mask(data, mask)
}

impl Series {
    /// This series resampled onto `to`, covering the same span of time.
    pub fn aligned(&self, to: Rate) -> Series {
        if self.rate == to {
            return self.clone();
        }
        let array = self.array.as_ref().map(|arr| {
            let len = (arr.len() as f64 * to.frequency / self.rate.frequency).round() as usize;
            resample(arr, self.rate, to, len)
        });
        Series { array, rate: to, units: self.units.clone() }
    }
}
