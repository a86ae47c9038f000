// Copyright 2024 Google LLC
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// https://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or https://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! Correctness gate that every strategy must pass before being timed.

use crate::macros::{log_debug, log_error};
use crate::oracle::oracle;
use crate::strategy::Strategy;
use crate::workload::Workload;
use thiserror::Error;

/// A strategy wrote a wrong value into the output.
#[derive(Clone, Debug, Error, PartialEq)]
#[error(
    "strategy `{strategy_id}` failed validation at index {index}: expected {expected}, got {actual}"
)]
pub struct ValidationError {
    /// Identifier of the failing strategy.
    pub strategy_id: &'static str,
    /// First index at which the output was wrong.
    pub index: usize,
    /// Value computed by the oracle at that index.
    pub expected: f32,
    /// Value written by the strategy at that index.
    pub actual: f32,
}

/// Zero-fills the output, runs the strategy and checks every output element
/// against the oracle, in index order.
///
/// Values are compared bit-for-bit, so the first mismatch, including a `NaN` or
/// a negative zero, is returned as an error.
pub fn validate(strategy: &Strategy, workload: &mut Workload) -> Result<(), ValidationError> {
    workload.zero_output();
    strategy.apply(workload);

    let (left, right, output) = (workload.left(), workload.right(), workload.output());
    for (index, &actual) in output.iter().enumerate() {
        let expected = oracle(left, right, index);
        if actual.to_bits() != expected.to_bits() {
            log_error!(
                "Strategy {} wrote {actual} at index {index} instead of {expected}",
                strategy.id()
            );
            return Err(ValidationError {
                strategy_id: strategy.id(),
                index,
                expected,
                actual,
            });
        }
    }

    log_debug!(
        "Strategy {} validated on {} elements",
        strategy.id(),
        workload.len()
    );
    Ok(())
}

/// Validates each strategy in order, stopping at the first failure.
pub fn validate_all<'a>(
    strategies: impl IntoIterator<Item = &'a Strategy>,
    workload: &mut Workload,
) -> Result<(), ValidationError> {
    for strategy in strategies {
        validate(strategy, workload)?;
    }
    Ok(())
}
