// Copyright 2024 Google LLC
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// https://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or https://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! The reference computation that defines a correct output.

/// Expected value of the output at index `i`.
///
/// # Panics
///
/// Panics if `i` is out of bounds of either input.
pub fn oracle(left: &[f32], right: &[f32], i: usize) -> f32 {
    left[i] * right[i]
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn oracle_multiplies() {
        let left = [0.0, 1.0, 9.0, 3.0];
        let right = [5.0, 7.0, 9.0, 0.5];
        let expected = [0.0, 7.0, 81.0, 1.5];
        for (i, &x) in expected.iter().enumerate() {
            assert_eq!(oracle(&left, &right, i), x);
        }
    }

    #[test]
    #[should_panic]
    fn oracle_out_of_bounds() {
        oracle(&[1.0], &[1.0], 1);
    }
}
