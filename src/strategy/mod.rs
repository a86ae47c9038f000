// Copyright 2024 Google LLC
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// https://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or https://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! The family of element-wise multiplication strategies under comparison.
//!
//! Every strategy computes `output[i] = left[i] * right[i]` for all `i`, but
//! walks the memory differently: scalar loops over slices, raw pointers,
//! fixed-width vectors, unrolled vector loops and a pointer/vector overlay.
//! All of them are correct for any length; the vectorized ones finish with a
//! scalar tail when the length isn't a multiple of their lane width.

mod library;
mod overlay;
mod pointer;
mod scalar;
mod vector;

pub use library::library;
#[cfg(target_pointer_width = "64")]
pub use overlay::increment;
pub use overlay::simd_ptr_inc_simd;
pub use pointer::{unsafe_array_ptr, unsafe_element_ptr};
pub use scalar::{naive_optimised, naive_simple, naive_view};
pub use vector::{simd_cast, simd_ptr_inc, simd_ptr_inc_unroll, simd_ptr_inc_unroll_index, simd_simple};

use crate::workload::Workload;
use std::fmt::{self, Display};
use std::mem::size_of;

/// The vector type used by the vectorized strategies.
pub type Lane = wide::f32x8;

/// Number of [`f32`] values in a [`Lane`].
pub const LANES: usize = size_of::<Lane>() / size_of::<f32>();

/// Number of vector operations per iteration of the unrolled strategies.
pub const UNROLL: usize = 4;

/// One candidate implementation of the element-wise multiplication.
#[derive(Clone, Copy, Debug)]
pub struct Strategy {
    id: &'static str,
    apply: fn(&mut Workload),
    lane_width: Option<usize>,
    baseline: bool,
}

impl Strategy {
    /// Creates a strategy with the given identifier and implementation.
    pub const fn new(id: &'static str, apply: fn(&mut Workload)) -> Self {
        Self {
            id,
            apply,
            lane_width: None,
            baseline: false,
        }
    }

    /// Declares the number of elements the strategy processes per step. Lengths
    /// that are a multiple of it run without a scalar tail.
    pub const fn with_lane_width(mut self, lane_width: usize) -> Self {
        self.lane_width = Some(lane_width);
        self
    }

    /// Marks the strategy as the baseline of relative cost reports.
    pub const fn baseline(mut self) -> Self {
        self.baseline = true;
        self
    }

    /// Identifier of the strategy.
    pub fn id(&self) -> &'static str {
        self.id
    }

    /// Declared lane width, if any.
    pub fn lane_width(&self) -> Option<usize> {
        self.lane_width
    }

    /// Whether this is the baseline strategy.
    pub fn is_baseline(&self) -> bool {
        self.baseline
    }

    /// Runs the strategy on the given workload, overwriting its output.
    #[inline]
    pub fn apply(&self, workload: &mut Workload) {
        (self.apply)(workload)
    }
}

impl Display for Strategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.id)
    }
}

/// All strategies, in registration order.
pub const REGISTRY: &[Strategy] = &[
    Strategy::new("naive_simple", naive_simple).baseline(),
    Strategy::new("naive_optimised", naive_optimised),
    Strategy::new("naive_view", naive_view),
    Strategy::new("unsafe_array_ptr", unsafe_array_ptr),
    Strategy::new("unsafe_element_ptr", unsafe_element_ptr),
    Strategy::new("simd_simple", simd_simple).with_lane_width(LANES),
    Strategy::new("simd_cast", simd_cast).with_lane_width(LANES),
    Strategy::new("simd_ptr_inc", simd_ptr_inc).with_lane_width(LANES),
    Strategy::new("simd_ptr_inc_unroll", simd_ptr_inc_unroll).with_lane_width(UNROLL * LANES),
    Strategy::new("simd_ptr_inc_unroll_index", simd_ptr_inc_unroll_index)
        .with_lane_width(UNROLL * LANES),
    Strategy::new("simd_ptr_inc_simd", simd_ptr_inc_simd).with_lane_width(LANES),
    Strategy::new("library", library),
];

/// Returns all strategies, in registration order.
pub fn registry() -> Vec<Strategy> {
    REGISTRY.to_vec()
}

/// Identifiers of all strategies, in registration order.
pub fn ids() -> Vec<&'static str> {
    REGISTRY.iter().map(Strategy::id).collect()
}

/// Finds a registered strategy by identifier.
pub fn find(id: &str) -> Option<Strategy> {
    REGISTRY.iter().find(|strategy| strategy.id == id).copied()
}

/// Loads one vector from the first [`LANES`] values of a slice.
#[inline(always)]
fn load(values: &[f32]) -> Lane {
    let values = &values[..LANES];
    Lane::from(std::array::from_fn::<f32, LANES, _>(|k| values[k]))
}

/// Stores one vector into the first [`LANES`] values of a slice.
#[inline(always)]
fn store(vector: Lane, values: &mut [f32]) {
    values[..LANES].copy_from_slice(&vector.to_array());
}

/// Scalar loop over slices, used as the remainder of slice-based vectorized
/// strategies.
#[inline(always)]
fn scalar_tail(left: &[f32], right: &[f32], output: &mut [f32]) {
    for ((out, &a), &b) in output.iter_mut().zip(left).zip(right) {
        *out = a * b;
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn lane_width() {
        assert_eq!(LANES, 8);
        assert_eq!(size_of::<Lane>(), 32);
    }

    #[test]
    fn registry_ids_are_unique() {
        let ids = ids();
        let unique = ids.iter().collect::<HashSet<_>>();
        assert_eq!(unique.len(), ids.len());
        assert_eq!(ids.len(), 12);
    }

    #[test]
    fn registry_has_one_baseline() {
        let baselines = REGISTRY
            .iter()
            .filter(|strategy| strategy.is_baseline())
            .collect::<Vec<_>>();
        assert_eq!(baselines.len(), 1);
        assert_eq!(baselines[0].id(), "naive_simple");
        assert_eq!(REGISTRY[0].id(), "naive_simple");
    }

    #[test]
    fn find_by_id() {
        let strategy = find("simd_ptr_inc_unroll").unwrap();
        assert_eq!(strategy.id(), "simd_ptr_inc_unroll");
        assert_eq!(strategy.lane_width(), Some(32));
        assert!(!strategy.is_baseline());
        assert_eq!(find("naive_view").unwrap().lane_width(), None);
        assert!(find("missing").is_none());
    }

    #[test]
    fn strategy_display() {
        assert_eq!(find("library").unwrap().to_string(), "library");
    }

    #[test]
    fn load_store() {
        let values = (0..10).map(|x| x as f32).collect::<Vec<_>>();
        let vector = load(&values[1..]);
        assert_eq!(vector.to_array(), [1.0, 2.0, 3.0, 4.0, 5.0, 6.0, 7.0, 8.0]);

        let mut output = [0.0; 9];
        store(vector * vector, &mut output[1..]);
        assert_eq!(
            output,
            [0.0, 1.0, 4.0, 9.0, 16.0, 25.0, 36.0, 49.0, 64.0]
        );
    }

    #[test]
    fn scalar_tail_stops_at_shortest() {
        let mut output = [0.0; 3];
        scalar_tail(&[1.0, 2.0, 3.0], &[4.0, 5.0, 6.0], &mut output);
        assert_eq!(output, [4.0, 10.0, 18.0]);
    }
}
