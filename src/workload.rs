// Copyright 2024 Google LLC
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// https://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or https://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! Deterministic generation of the multiplication inputs.

use crate::macros::log_debug;
use crate::strategy::{Lane, LANES};
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha12Rng;
use std::ops::Range;

/// Default number of elements in each buffer.
pub const DEFAULT_LEN: usize = 8 * 100_000;

/// Default seed of the input generator.
pub const DEFAULT_SEED: u64 = 0;

/// Integer values drawn for the inputs. Products of such values are exactly
/// representable as [`f32`], so all strategies must agree bit-for-bit.
const VALUES: Range<u32> = 0..10;

/// A buffer of [`f32`] stored as whole [`Lane`]s, so that its first element is
/// aligned for vector loads and stores.
///
/// Only the first `len` values are visible through the slice accessors, the
/// padding of the last lane is never observed.
pub struct LaneBuffer {
    lanes: Vec<Lane>,
    len: usize,
}

impl LaneBuffer {
    /// Allocates a buffer of `len` zeros.
    pub fn zeroed(len: usize) -> Self {
        Self {
            lanes: vec![Lane::default(); len.div_ceil(LANES)],
            len,
        }
    }

    /// Number of visible values.
    pub fn len(&self) -> usize {
        self.len
    }

    /// Whether the buffer has no visible values.
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Returns the visible values.
    pub fn as_slice(&self) -> &[f32] {
        // SAFETY:
        // - A `Lane` is a plain bundle of `LANES` consecutive `f32` values, so the lane
        //   storage is a valid, initialized sequence of `lanes.len() * LANES` floats.
        // - `len <= lanes.len() * LANES` by construction.
        // - The output borrows `self`, so the storage outlives it and isn't mutated.
        unsafe { std::slice::from_raw_parts(self.lanes.as_ptr().cast::<f32>(), self.len) }
    }

    /// Returns the visible values, mutably.
    pub fn as_mut_slice(&mut self) -> &mut [f32] {
        // SAFETY: Same as for `as_slice()`, and the output borrows `self` mutably so
        // it is the only access to the storage during its lifetime.
        unsafe { std::slice::from_raw_parts_mut(self.lanes.as_mut_ptr().cast::<f32>(), self.len) }
    }

    /// Sets every visible value to zero, without reallocating.
    pub fn fill_zero(&mut self) {
        self.as_mut_slice().fill(0.0);
    }
}

/// The three buffers that every strategy operates on: two inputs and one
/// output, all of the same length.
pub struct Workload {
    left: LaneBuffer,
    right: LaneBuffer,
    pub(crate) output: LaneBuffer,
    pub(crate) active_pins: usize,
}

impl Workload {
    /// Generates a workload of `len` elements from the given seed.
    ///
    /// Both inputs are drawn from a [`ChaCha12Rng`] seeded with `seed`: the left
    /// input from word-stream 0 and the right input from word-stream 1. Each
    /// element is an integer in `[0, 10)`, drawn in index order. The output is
    /// zero-initialized.
    pub fn generate(len: usize, seed: u64) -> Self {
        let mut left = LaneBuffer::zeroed(len);
        let mut right = LaneBuffer::zeroed(len);

        let mut rng = ChaCha12Rng::seed_from_u64(seed);
        fill_values(left.as_mut_slice(), &mut rng);

        let mut rng = ChaCha12Rng::seed_from_u64(seed);
        rng.set_stream(1);
        fill_values(right.as_mut_slice(), &mut rng);

        log_debug!("Generated a workload of {len} elements with seed {seed}");
        Self {
            left,
            right,
            output: LaneBuffer::zeroed(len),
            active_pins: 0,
        }
    }

    /// Creates a workload from explicit input values. The output is
    /// zero-initialized.
    ///
    /// # Panics
    ///
    /// Panics if the inputs don't have the same length.
    pub fn from_inputs(left: &[f32], right: &[f32]) -> Self {
        assert_eq!(
            left.len(),
            right.len(),
            "The inputs of a workload must have the same length"
        );
        let len = left.len();
        let mut left_buffer = LaneBuffer::zeroed(len);
        let mut right_buffer = LaneBuffer::zeroed(len);
        left_buffer.as_mut_slice().copy_from_slice(left);
        right_buffer.as_mut_slice().copy_from_slice(right);
        Self {
            left: left_buffer,
            right: right_buffer,
            output: LaneBuffer::zeroed(len),
            active_pins: 0,
        }
    }

    /// Number of elements in each buffer.
    pub fn len(&self) -> usize {
        self.output.len()
    }

    /// Whether the buffers are empty.
    pub fn is_empty(&self) -> bool {
        self.output.is_empty()
    }

    /// The left input.
    pub fn left(&self) -> &[f32] {
        self.left.as_slice()
    }

    /// The right input.
    pub fn right(&self) -> &[f32] {
        self.right.as_slice()
    }

    /// The output.
    pub fn output(&self) -> &[f32] {
        self.output.as_slice()
    }

    /// The output, mutably. The inputs can't be mutated after generation.
    pub fn output_mut(&mut self) -> &mut [f32] {
        self.output.as_mut_slice()
    }

    /// Borrows the left input, the right input and the output at once.
    pub fn split_mut(&mut self) -> (&[f32], &[f32], &mut [f32]) {
        (
            self.left.as_slice(),
            self.right.as_slice(),
            self.output.as_mut_slice(),
        )
    }

    /// Resets the output to zero in place.
    pub fn zero_output(&mut self) {
        self.output.fill_zero();
    }

    /// Number of [`Pinned`](crate::Pinned) guards currently alive on this
    /// workload. This is always zero when the workload is accessible.
    pub fn active_pins(&self) -> usize {
        self.active_pins
    }
}

fn fill_values(values: &mut [f32], rng: &mut ChaCha12Rng) {
    for value in values {
        *value = rng.random_range(VALUES) as f32;
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use std::mem::align_of;

    #[test]
    fn generate_is_deterministic() {
        let a = Workload::generate(1000, 42);
        let b = Workload::generate(1000, 42);
        assert_eq!(a.left(), b.left());
        assert_eq!(a.right(), b.right());
    }

    #[test]
    fn generate_depends_on_seed() {
        let a = Workload::generate(1000, 1);
        let b = Workload::generate(1000, 2);
        assert_ne!(a.left(), b.left());
        assert_ne!(a.right(), b.right());
    }

    #[test]
    fn generate_uses_independent_streams() {
        let workload = Workload::generate(1000, 0);
        assert_ne!(workload.left(), workload.right());
    }

    #[test]
    fn generate_prefix_is_stable() {
        // Each element only depends on the seed and its index.
        let short = Workload::generate(16, 7);
        let long = Workload::generate(1000, 7);
        assert_eq!(short.left(), &long.left()[..16]);
        assert_eq!(short.right(), &long.right()[..16]);
    }

    #[test]
    fn generate_small_integers() {
        let workload = Workload::generate(10_000, 0);
        for &x in workload.left().iter().chain(workload.right()) {
            assert!((0.0..10.0).contains(&x), "{x} out of range");
            assert_eq!(x, x.trunc());
        }
        // All ten values show up on such a long input.
        for v in 0..10 {
            assert!(workload.left().contains(&(v as f32)));
        }
    }

    #[test]
    fn generate_zero_output() {
        let workload = Workload::generate(100, 0);
        assert_eq!(workload.len(), 100);
        assert_eq!(workload.left().len(), 100);
        assert_eq!(workload.right().len(), 100);
        assert!(workload.output().iter().all(|&x| x == 0.0));
        assert_eq!(workload.active_pins(), 0);
    }

    #[test]
    fn generate_seed_zero_values() {
        let workload = Workload::generate(16, 0);
        assert_eq!(
            workload.left(),
            &[8.0, 7.0, 5.0, 7.0, 8.0, 0.0, 6.0, 5.0, 8.0, 2.0, 1.0, 7.0, 0.0, 2.0, 7.0, 7.0]
        );
        assert_eq!(
            workload.right(),
            &[2.0, 6.0, 8.0, 3.0, 7.0, 9.0, 2.0, 6.0, 5.0, 3.0, 9.0, 3.0, 3.0, 7.0, 6.0, 7.0]
        );
    }

    #[test]
    fn generate_empty() {
        let workload = Workload::generate(0, 0);
        assert!(workload.is_empty());
        assert!(workload.left().is_empty());
        assert!(workload.output().is_empty());
    }

    #[test]
    fn buffers_are_lane_aligned() {
        for len in [1, 7, 8, 9, 100] {
            let mut workload = Workload::generate(len, 0);
            let (left, right, output) = workload.split_mut();
            for address in [
                left.as_ptr() as usize,
                right.as_ptr() as usize,
                output.as_ptr() as usize,
            ] {
                assert_eq!(address % align_of::<Lane>(), 0);
            }
        }
    }

    #[test]
    fn zero_output_keeps_allocation() {
        let mut workload = Workload::generate(33, 0);
        workload.output_mut().fill(3.0);
        let before = workload.output().as_ptr();
        workload.zero_output();
        assert_eq!(workload.output().as_ptr(), before);
        assert!(workload.output().iter().all(|&x| x == 0.0));
    }

    #[test]
    fn from_inputs_copies_values() {
        let workload = Workload::from_inputs(&[1.0, 2.0, 3.0], &[4.0, 5.0, 6.0]);
        assert_eq!(workload.left(), &[1.0, 2.0, 3.0]);
        assert_eq!(workload.right(), &[4.0, 5.0, 6.0]);
        assert_eq!(workload.output(), &[0.0; 3]);
    }

    #[test]
    #[should_panic(expected = "The inputs of a workload must have the same length")]
    fn from_inputs_length_mismatch() {
        Workload::from_inputs(&[1.0, 2.0], &[1.0]);
    }
}
