// Copyright 2024 Google LLC
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// https://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or https://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

use crate::workload::Workload;

/// Index loop that goes through the workload to reach each buffer, on every
/// iteration.
pub fn naive_simple(workload: &mut Workload) {
    for i in 0..workload.len() {
        let product = workload.left()[i] * workload.right()[i];
        workload.output_mut()[i] = product;
    }
}

/// Index loop over buffers bound once to local slices.
#[allow(clippy::needless_range_loop)]
pub fn naive_optimised(workload: &mut Workload) {
    let (left, right, output) = workload.split_mut();
    for i in 0..left.len() {
        output[i] = left[i] * right[i];
    }
}

/// Loop over bounds-checked iterator views of the three slices.
pub fn naive_view(workload: &mut Workload) {
    let (left, right, output) = workload.split_mut();
    left.iter()
        .zip(right)
        .zip(output.iter_mut())
        .for_each(|((&a, &b), out)| *out = a * b);
}
