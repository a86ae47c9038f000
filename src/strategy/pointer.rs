// Copyright 2024 Google LLC
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// https://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or https://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

use crate::workload::Workload;

/// Indexed traversal of pinned raw pointers to the start of each buffer.
pub fn unsafe_array_ptr(workload: &mut Workload) {
    let pinned = workload.pin();
    let (left, right, output) = (pinned.left(), pinned.right(), pinned.output());
    for i in 0..pinned.len() {
        // SAFETY:
        // - `i < len`, and the pinned pointers are valid for `len` elements.
        // - The output doesn't overlap the inputs.
        unsafe { *output.add(i) = *left.add(i) * *right.add(i) };
    }
}

/// Pinned raw pointers advanced by one element per iteration.
pub fn unsafe_element_ptr(workload: &mut Workload) {
    let pinned = workload.pin();
    let (mut left, mut right, mut output) = (pinned.left(), pinned.right(), pinned.output());
    for _ in 0..pinned.len() {
        // SAFETY:
        // - The pointers started at the beginning of their buffers and were advanced
        //   once per previous iteration, so they are less than `len` elements in and
        //   valid to access. After the last iteration they point one past the end,
        //   which is a valid offset.
        // - The output doesn't overlap the inputs.
        unsafe {
            *output = *left * *right;
            left = left.add(1);
            right = right.add(1);
            output = output.add(1);
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;

    fn check(strategy: fn(&mut Workload)) {
        let mut workload = Workload::from_inputs(&[1.0, 2.0, 3.0, 0.0, 9.0], &[4.0, 5.0, 6.0, 7.0, 9.0]);
        strategy(&mut workload);
        assert_eq!(workload.output(), &[4.0, 10.0, 18.0, 0.0, 81.0]);
        assert_eq!(workload.active_pins(), 0);
    }

    #[test]
    fn unsafe_array_ptr_multiplies() {
        check(unsafe_array_ptr);
    }

    #[test]
    fn unsafe_element_ptr_multiplies() {
        check(unsafe_element_ptr);
    }
}
