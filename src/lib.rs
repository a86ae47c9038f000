// Copyright 2024 Google LLC
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// https://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or https://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

#![doc = include_str!("../README.md")]
#![forbid(missing_docs)]
#![deny(unsafe_op_in_unsafe_fn, clippy::undocumented_unsafe_blocks)]

mod harness;
mod macros;
mod oracle;
mod pin;
mod session;
pub mod strategy;
mod validate;
mod workload;

pub use harness::{run, run_with_warmup, BenchmarkResult, Report};
pub use oracle::oracle;
pub use pin::Pinned;
pub use session::{Session, SessionBuilder, DEFAULT_TRIALS, DEFAULT_WARMUP};
pub use strategy::{registry, Lane, Strategy, LANES, REGISTRY, UNROLL};
pub use validate::{validate, validate_all, ValidationError};
pub use workload::{LaneBuffer, Workload, DEFAULT_LEN, DEFAULT_SEED};
