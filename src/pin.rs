// Copyright 2024 Google LLC
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// https://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or https://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! Scoped acquisition of raw pointers into a [`Workload`].

use crate::macros::log_trace;
use crate::strategy::{Lane, LANES};
use crate::workload::Workload;

/// Raw pointers to the start of the three buffers of a [`Workload`], valid for
/// as long as this guard is alive.
///
/// The guard mutably borrows the workload, so its buffers can neither move nor
/// be reallocated, and nothing else can access them, while the pointers exist.
/// Dropping the guard releases the pin, including when a strategy panics while
/// holding it.
pub struct Pinned<'a> {
    left: *const f32,
    right: *const f32,
    output: *mut f32,
    len: usize,
    active_pins: &'a mut usize,
}

impl Workload {
    /// Pins the buffers of this workload, returning a guard that exposes raw
    /// pointers to them.
    pub fn pin(&mut self) -> Pinned<'_> {
        let len = self.len();
        let left = self.left().as_ptr();
        let right = self.right().as_ptr();
        let output = self.output.as_mut_slice().as_mut_ptr();
        self.active_pins += 1;
        log_trace!("Pinned a workload of {len} elements");
        Pinned {
            left,
            right,
            output,
            len,
            active_pins: &mut self.active_pins,
        }
    }
}

impl Pinned<'_> {
    /// Number of elements in each buffer.
    pub fn len(&self) -> usize {
        self.len
    }

    /// Whether the buffers are empty.
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Pointer to the first element of the left input, valid for reads of
    /// [`len()`](Self::len) elements.
    pub fn left(&self) -> *const f32 {
        self.left
    }

    /// Pointer to the first element of the right input, valid for reads of
    /// [`len()`](Self::len) elements.
    pub fn right(&self) -> *const f32 {
        self.right
    }

    /// Pointer to the first element of the output, valid for writes of
    /// [`len()`](Self::len) elements. It doesn't alias either input.
    pub fn output(&self) -> *mut f32 {
        self.output
    }

    /// The same pointers as [`left()`](Self::left), [`right()`](Self::right)
    /// and [`output()`](Self::output), cast to whole lanes. They are aligned for
    /// [`Lane`] and valid for `len() / LANES` lanes.
    pub fn lanes(&self) -> (*const Lane, *const Lane, *mut Lane) {
        (
            self.left.cast::<Lane>(),
            self.right.cast::<Lane>(),
            self.output.cast::<Lane>(),
        )
    }

    /// Number of whole lanes in each buffer.
    pub fn whole_lanes(&self) -> usize {
        self.len / LANES
    }

    /// Number of pins currently alive on the workload, including this one.
    pub fn active_pins(&self) -> usize {
        *self.active_pins
    }

    /// Computes the elements in `from..len()` one at a time. This is the scalar
    /// remainder of the vectorized strategies.
    pub fn finish_scalar(&mut self, from: usize) {
        for i in from..self.len {
            // SAFETY:
            // - `i < len`, so each pointer is valid at offset `i`, as ensured by the
            //   guard invariant.
            // - The output doesn't overlap the inputs.
            unsafe { *self.output.add(i) = *self.left.add(i) * *self.right.add(i) };
        }
    }
}

impl Drop for Pinned<'_> {
    fn drop(&mut self) {
        *self.active_pins -= 1;
        log_trace!("Released the pin on a workload of {} elements", self.len);
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use std::mem::align_of;
    use std::panic::{catch_unwind, AssertUnwindSafe};

    #[test]
    fn pin_exposes_buffers() {
        let mut workload = Workload::from_inputs(&[1.0, 2.0, 3.0], &[4.0, 5.0, 6.0]);
        let left = workload.left().as_ptr();
        let right = workload.right().as_ptr();
        let output = workload.output().as_ptr();

        let pinned = workload.pin();
        assert_eq!(pinned.len(), 3);
        assert!(!pinned.is_empty());
        assert_eq!(pinned.left(), left);
        assert_eq!(pinned.right(), right);
        assert_eq!(pinned.output() as *const f32, output);
        assert_eq!(pinned.whole_lanes(), 0);
        assert_eq!(pinned.active_pins(), 1);
    }

    #[test]
    fn pin_lanes_are_aligned() {
        let mut workload = Workload::generate(100, 0);
        let pinned = workload.pin();
        let (left, right, output) = pinned.lanes();
        assert_eq!(pinned.whole_lanes(), 12);
        for address in [left as usize, right as usize, output as usize] {
            assert_eq!(address % align_of::<Lane>(), 0);
        }
    }

    #[test]
    fn pin_released_on_drop() {
        let mut workload = Workload::generate(10, 0);
        {
            let pinned = workload.pin();
            assert_eq!(pinned.active_pins(), 1);
        }
        assert_eq!(workload.active_pins(), 0);
        drop(workload.pin());
        assert_eq!(workload.active_pins(), 0);
    }

    #[test]
    fn pin_released_on_panic() {
        let mut workload = Workload::generate(10, 0);
        let result = catch_unwind(AssertUnwindSafe(|| {
            let pinned = workload.pin();
            assert_eq!(pinned.active_pins(), 1);
            panic!("strategy panicked while pinned");
        }));
        assert!(result.is_err());
        assert_eq!(workload.active_pins(), 0);
    }

    #[test]
    fn finish_scalar_fills_tail() {
        let mut workload = Workload::from_inputs(&[1.0, 2.0, 3.0, 4.0], &[5.0, 6.0, 7.0, 8.0]);
        workload.pin().finish_scalar(1);
        assert_eq!(workload.output(), &[0.0, 12.0, 21.0, 32.0]);
        workload.pin().finish_scalar(4);
        assert_eq!(workload.output(), &[0.0, 12.0, 21.0, 32.0]);
    }
}
