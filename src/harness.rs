// Copyright 2024 Google LLC
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// https://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or https://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! Timing of repeated invocations of a validated strategy.

use crate::macros::{log_debug, log_trace};
use crate::strategy::Strategy;
use crate::workload::Workload;
use std::fmt::{self, Display};
use std::hint::black_box;
use std::num::NonZeroUsize;
use std::time::{Duration, Instant};

/// Timing of one strategy.
#[derive(Clone, Debug, PartialEq)]
pub struct BenchmarkResult {
    strategy_id: &'static str,
    baseline: bool,
    len: usize,
    trials: NonZeroUsize,
    elapsed: Duration,
}

impl BenchmarkResult {
    /// Identifier of the timed strategy.
    pub fn strategy_id(&self) -> &'static str {
        self.strategy_id
    }

    /// Whether the timed strategy is the baseline.
    pub fn is_baseline(&self) -> bool {
        self.baseline
    }

    /// Number of timed invocations.
    pub fn trials(&self) -> NonZeroUsize {
        self.trials
    }

    /// Total time spent in the timed invocations.
    pub fn elapsed(&self) -> Duration {
        self.elapsed
    }

    /// Mean time of one invocation.
    pub fn per_call(&self) -> Duration {
        match u32::try_from(self.trials.get()) {
            Ok(trials) => self.elapsed / trials,
            Err(_) => self.elapsed.div_f64(self.trials.get() as f64),
        }
    }

    /// Number of output elements computed per second, if any time elapsed.
    pub fn throughput(&self) -> Option<f64> {
        let seconds = self.elapsed.as_secs_f64();
        (seconds > 0.0).then(|| self.len as f64 * self.trials.get() as f64 / seconds)
    }
}

/// Invokes the strategy `trials` times on the workload, and measures the total
/// wall-clock time of these invocations.
pub fn run(strategy: &Strategy, workload: &mut Workload, trials: NonZeroUsize) -> BenchmarkResult {
    run_with_warmup(strategy, workload, 0, trials)
}

/// Same as [`run()`], with `warmup` untimed invocations first.
///
/// The output is reset to zero before the first invocation. Only the timed
/// invocations are measured, and nothing is logged while they run.
pub fn run_with_warmup(
    strategy: &Strategy,
    workload: &mut Workload,
    warmup: usize,
    trials: NonZeroUsize,
) -> BenchmarkResult {
    workload.zero_output();
    for _call in 0..warmup {
        strategy.apply(black_box(&mut *workload));
        log_trace!("Strategy {} finished warmup call {_call}", strategy.id());
    }

    let start = Instant::now();
    for _ in 0..trials.get() {
        strategy.apply(black_box(&mut *workload));
    }
    let elapsed = start.elapsed();
    log_trace!(
        "Strategy {} finished {trials} trials in {elapsed:?}",
        strategy.id()
    );

    let result = BenchmarkResult {
        strategy_id: strategy.id(),
        baseline: strategy.is_baseline(),
        len: workload.len(),
        trials,
        elapsed,
    };
    log_debug!(
        "Strategy {} took {:?} per call over {trials} trials",
        strategy.id(),
        result.per_call()
    );
    result
}

/// Results of a session, in registration order.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Report {
    results: Vec<BenchmarkResult>,
}

impl Report {
    /// Creates a report from results in registration order.
    pub fn new(results: Vec<BenchmarkResult>) -> Self {
        Self { results }
    }

    /// All results, in registration order.
    pub fn results(&self) -> &[BenchmarkResult] {
        &self.results
    }

    /// The result of the first baseline strategy, if any.
    pub fn baseline(&self) -> Option<&BenchmarkResult> {
        self.results.iter().find(|result| result.baseline)
    }

    /// Cost of a result relative to the baseline, if there is one with a
    /// non-zero cost.
    pub fn ratio(&self, result: &BenchmarkResult) -> Option<f64> {
        let baseline = self.baseline()?.per_call().as_secs_f64();
        (baseline > 0.0).then(|| result.per_call().as_secs_f64() / baseline)
    }
}

impl Display for Report {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(
            f,
            "{:<28} {:>8} {:>14} {:>8} {:>16}",
            "strategy", "baseline", "mean/call", "ratio", "elements/s"
        )?;
        for result in &self.results {
            let ratio = match self.ratio(result) {
                Some(ratio) => format!("{ratio:.2}"),
                None => "-".to_owned(),
            };
            let throughput = match result.throughput() {
                Some(throughput) => format!("{throughput:.3e}"),
                None => "-".to_owned(),
            };
            writeln!(
                f,
                "{:<28} {:>8} {:>11.3} µs {:>8} {:>16}",
                result.strategy_id,
                if result.baseline { "yes" } else { "" },
                result.per_call().as_secs_f64() * 1e6,
                ratio,
                throughput
            )?;
        }
        Ok(())
    }
}
