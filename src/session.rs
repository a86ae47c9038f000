// Copyright 2024 Google LLC
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// https://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or https://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! Benchmark session: one workload, a registry of strategies, and the
//! validate-then-time driver over them.

use crate::harness::{run_with_warmup, BenchmarkResult, Report};
use crate::macros::{log_info, log_warn};
use crate::strategy::Strategy;
use crate::validate::{validate_all, ValidationError};
use crate::workload::{Workload, DEFAULT_LEN, DEFAULT_SEED};
use std::num::NonZeroUsize;

/// Default number of timed invocations per strategy.
pub const DEFAULT_TRIALS: NonZeroUsize = match NonZeroUsize::new(100) {
    Some(trials) => trials,
    None => unreachable!(),
};

/// Default number of untimed invocations before timing a strategy.
pub const DEFAULT_WARMUP: usize = 10;

/// A builder for a benchmark session.
///
/// ```
/// # use lanebench::SessionBuilder;
/// # use std::num::NonZeroUsize;
/// let session = SessionBuilder {
///     len: 1024,
///     seed: 42,
///     trials: NonZeroUsize::new(10).unwrap(),
///     warmup: 1,
/// }
/// .build();
/// assert_eq!(session.workload().len(), 1024);
/// ```
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SessionBuilder {
    /// Number of elements in the workload.
    pub len: usize,
    /// Seed of the workload generator.
    pub seed: u64,
    /// Number of timed invocations per strategy.
    pub trials: NonZeroUsize,
    /// Number of untimed invocations before timing each strategy.
    pub warmup: usize,
}

impl Default for SessionBuilder {
    fn default() -> Self {
        Self {
            len: DEFAULT_LEN,
            seed: DEFAULT_SEED,
            trials: DEFAULT_TRIALS,
            warmup: DEFAULT_WARMUP,
        }
    }
}

impl SessionBuilder {
    /// Generates the workload and creates a session with no strategy
    /// registered.
    pub fn build(self) -> Session {
        log_info!(
            "Starting a session on {} elements (seed {}), {} trials after {} warmup calls",
            self.len,
            self.seed,
            self.trials,
            self.warmup
        );
        Session {
            workload: Workload::generate(self.len, self.seed),
            strategies: Vec::new(),
            trials: self.trials,
            warmup: self.warmup,
            validated: false,
        }
    }
}

/// A benchmark session, owning the workload and the registered strategies.
///
/// Strategies must all pass [`validate_all()`](Self::validate_all) before any
/// of them is timed.
pub struct Session {
    workload: Workload,
    strategies: Vec<Strategy>,
    trials: NonZeroUsize,
    warmup: usize,
    validated: bool,
}

impl Session {
    /// Registers a strategy, after the ones already registered.
    pub fn register(&mut self, strategy: Strategy) -> &mut Self {
        self.strategies.push(strategy);
        self.validated = false;
        self
    }

    /// Registers several strategies, in order.
    pub fn register_all(&mut self, strategies: impl IntoIterator<Item = Strategy>) -> &mut Self {
        self.strategies.extend(strategies);
        self.validated = false;
        self
    }

    /// Registered strategies, in registration order.
    pub fn strategies(&self) -> &[Strategy] {
        &self.strategies
    }

    /// The workload of this session.
    pub fn workload(&self) -> &Workload {
        &self.workload
    }

    /// The workload of this session, mutably.
    pub fn workload_mut(&mut self) -> &mut Workload {
        &mut self.workload
    }

    /// Validates all registered strategies in order, stopping at the first
    /// failure.
    pub fn validate_all(&mut self) -> Result<(), ValidationError> {
        self.validated = false;
        validate_all(&self.strategies, &mut self.workload)?;
        log_info!("Validated {} strategies", self.strategies.len());
        self.validated = true;
        Ok(())
    }

    /// Times a registered strategy on the workload of this session.
    ///
    /// # Panics
    ///
    /// Panics if the registered strategies haven't all been validated, or if
    /// the strategy isn't registered.
    pub fn run(&mut self, strategy: &Strategy, trials: NonZeroUsize) -> BenchmarkResult {
        assert!(
            self.validated,
            "Strategies must be validated before being timed"
        );
        assert!(
            self.strategies.iter().any(|s| s.id() == strategy.id()),
            "Strategy {} isn't registered in this session",
            strategy.id()
        );
        run_with_warmup(strategy, &mut self.workload, self.warmup, trials)
    }

    /// Validates all registered strategies, then times each of them in
    /// registration order with the configured number of trials.
    pub fn run_all(&mut self) -> Result<Report, ValidationError> {
        self.validate_all()?;
        if !self.strategies.iter().any(Strategy::is_baseline) {
            log_warn!("No baseline strategy registered, the report won't have ratios");
        }

        let strategies = self.strategies.clone();
        let trials = self.trials;
        let results = strategies
            .iter()
            .map(|strategy| self.run(strategy, trials))
            .collect();
        Ok(Report::new(results))
    }
}
