// Copyright 2024 Google LLC
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// https://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or https://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! Strategies built on fixed-width [`Lane`] vectors.

use super::{load, scalar_tail, store, Lane, LANES, UNROLL};
use crate::workload::Workload;

/// Loads one vector from each input slice, multiplies them and stores the
/// product into the output slice, with the index stepped by the lane width.
pub fn simd_simple(workload: &mut Workload) {
    let (left, right, output) = workload.split_mut();
    let len = left.len();
    let body = len - len % LANES;

    let mut i = 0;
    while i < body {
        let product = load(&left[i..]) * load(&right[i..]);
        store(product, &mut output[i..]);
        i += LANES;
    }
    scalar_tail(&left[body..], &right[body..], &mut output[body..]);
}

/// Reinterprets the float slices as slices of vectors in place, and loops once
/// per vector.
#[allow(clippy::needless_range_loop)]
pub fn simd_cast(workload: &mut Workload) {
    let (left, right, output) = workload.split_mut();

    // SAFETY: A `Lane` is a plain bundle of `LANES` floats, for which every bit
    // pattern is valid.
    let (left_head, left_lanes, _) = unsafe { left.align_to::<Lane>() };
    // SAFETY: Same as above.
    let (right_head, right_lanes, _) = unsafe { right.align_to::<Lane>() };
    // SAFETY: Same as above.
    let (output_head, output_lanes, _) = unsafe { output.align_to_mut::<Lane>() };

    // Workload buffers always start on a lane boundary, but `align_to()` doesn't
    // guarantee to use it. Vectors are only usable if all three slices agree.
    let vectors = if left_head.is_empty() && right_head.is_empty() && output_head.is_empty() {
        left_lanes.len().min(right_lanes.len()).min(output_lanes.len())
    } else {
        0
    };
    for i in 0..vectors {
        output_lanes[i] = left_lanes[i] * right_lanes[i];
    }

    let done = vectors * LANES;
    scalar_tail(&left[done..], &right[done..], &mut output[done..]);
}

/// Pinned pointers to vectors, advanced by one vector per iteration.
pub fn simd_ptr_inc(workload: &mut Workload) {
    let mut pinned = workload.pin();
    let (mut left, mut right, mut output) = pinned.lanes();
    let body = pinned.whole_lanes() * LANES;

    let mut i = 0;
    while i < body {
        // SAFETY:
        // - Each pointer was advanced once per previous iteration, i.e. `i / LANES`
        //   lanes, which is less than `whole_lanes()`, so it points to a whole lane
        //   inside its buffer.
        // - The pinned lane pointers are aligned for `Lane`.
        // - The output doesn't overlap the inputs.
        unsafe {
            *output = *left * *right;
            left = left.add(1);
            right = right.add(1);
            output = output.add(1);
        }
        i += LANES;
    }
    pinned.finish_scalar(body);
}

/// Same as [`simd_ptr_inc()`], with [`UNROLL`] vector operations per iteration.
pub fn simd_ptr_inc_unroll(workload: &mut Workload) {
    let mut pinned = workload.pin();
    let (mut left, mut right, mut output) = pinned.lanes();
    let vectors = pinned.whole_lanes();
    let unrolled = vectors - vectors % UNROLL;

    let mut i = 0;
    while i < unrolled * LANES {
        // SAFETY:
        // - Each pointer was advanced `UNROLL` lanes per previous iteration, and
        //   `i / LANES + UNROLL <= unrolled <= whole_lanes()`, so the `UNROLL` lanes
        //   touched here are inside their buffer.
        // - The pinned lane pointers are aligned for `Lane`.
        // - The output doesn't overlap the inputs.
        unsafe {
            *output = *left * *right;
            left = left.add(1);
            right = right.add(1);
            output = output.add(1);

            *output = *left * *right;
            left = left.add(1);
            right = right.add(1);
            output = output.add(1);

            *output = *left * *right;
            left = left.add(1);
            right = right.add(1);
            output = output.add(1);

            *output = *left * *right;
            left = left.add(1);
            right = right.add(1);
            output = output.add(1);
        }
        i += UNROLL * LANES;
    }

    for _ in unrolled..vectors {
        // SAFETY: Same as above, for the remaining whole lanes.
        unsafe {
            *output = *left * *right;
            left = left.add(1);
            right = right.add(1);
            output = output.add(1);
        }
    }
    pinned.finish_scalar(vectors * LANES);
}

/// Same unrolling as [`simd_ptr_inc_unroll()`], addressing the vectors with
/// the scaled indices `i..i + UNROLL` instead of moving the pointers.
pub fn simd_ptr_inc_unroll_index(workload: &mut Workload) {
    let mut pinned = workload.pin();
    let (left, right, output) = pinned.lanes();
    let vectors = pinned.whole_lanes();

    let mut i = 0;
    while i + UNROLL <= vectors {
        // SAFETY:
        // - `i + 3 < vectors`, so all offsets are whole lanes inside each buffer.
        // - The pinned lane pointers are aligned for `Lane`.
        // - The output doesn't overlap the inputs.
        unsafe {
            *output.add(i) = *left.add(i) * *right.add(i);
            *output.add(i + 1) = *left.add(i + 1) * *right.add(i + 1);
            *output.add(i + 2) = *left.add(i + 2) * *right.add(i + 2);
            *output.add(i + 3) = *left.add(i + 3) * *right.add(i + 3);
        }
        i += UNROLL;
    }

    while i < vectors {
        // SAFETY: `i < vectors`, with the same invariants as above.
        unsafe { *output.add(i) = *left.add(i) * *right.add(i) };
        i += 1;
    }
    pinned.finish_scalar(vectors * LANES);
}
