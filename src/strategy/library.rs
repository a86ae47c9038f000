// Copyright 2024 Google LLC
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// https://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or https://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

use crate::workload::Workload;
use ndarray::{ArrayView1, ArrayViewMut1, Zip};

/// Delegates to [`ndarray`]'s lock-step iteration over array views.
///
/// [`Zip::for_each()`] is a plain closure loop, vectorized only if the compiler
/// auto-vectorizes it. This is a library comparison point, not an explicitly
/// vectorized routine.
pub fn library(workload: &mut Workload) {
    let (left, right, output) = workload.split_mut();
    Zip::from(ArrayViewMut1::from(output))
        .and(ArrayView1::from(left))
        .and(ArrayView1::from(right))
        .for_each(|out, &a, &b| *out = a * b);
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn library_multiplies() {
        let mut workload = Workload::from_inputs(&[1.0, 2.0, 3.0], &[4.0, 5.0, 6.0]);
        library(&mut workload);
        assert_eq!(workload.output(), &[4.0, 10.0, 18.0]);
    }

    #[test]
    fn library_empty() {
        let mut workload = Workload::generate(0, 0);
        library(&mut workload);
        assert!(workload.output().is_empty());
    }
}
