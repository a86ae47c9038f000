// Copyright 2025 Google LLC
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// https://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or https://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! CLI tool to validate and time all multiplication strategies.

use clap::Parser;
use lanebench::strategy::find;
use lanebench::{registry, SessionBuilder, Strategy, DEFAULT_LEN, DEFAULT_SEED};
use std::num::NonZeroUsize;
use std::process::ExitCode;

fn main() -> ExitCode {
    env_logger::init();
    let cli = Cli::parse();

    if cli.list {
        for strategy in registry() {
            let lane_width = match strategy.lane_width() {
                Some(width) => width.to_string(),
                None => "-".to_owned(),
            };
            println!(
                "{:<28} lane width {:>3}{}",
                strategy.id(),
                lane_width,
                if strategy.is_baseline() { " (baseline)" } else { "" }
            );
        }
        return ExitCode::SUCCESS;
    }

    let strategies = match select(&cli.strategies) {
        Ok(strategies) => strategies,
        Err(id) => {
            eprintln!("error: unknown strategy `{id}`, see --list");
            return ExitCode::from(2);
        }
    };

    let mut session = SessionBuilder {
        len: cli.len,
        seed: cli.seed,
        trials: cli.trials,
        warmup: cli.warmup,
    }
    .build();
    session.register_all(strategies);

    match session.run_all() {
        Ok(report) => {
            print!("{report}");
            ExitCode::SUCCESS
        }
        Err(e) => {
            eprintln!("error: {e}");
            ExitCode::FAILURE
        }
    }
}

/// Resolves the selected strategy identifiers, or all strategies if none is
/// selected. Returns the first unknown identifier as an error.
fn select(ids: &[String]) -> Result<Vec<Strategy>, &str> {
    if ids.is_empty() {
        return Ok(registry());
    }
    ids.iter()
        .map(|id| find(id).ok_or(id.as_str()))
        .collect()
}

/// CLI tool to validate and time all multiplication strategies.
#[derive(Parser, Debug, PartialEq, Eq)]
#[command(version)]
struct Cli {
    /// Number of elements in each buffer.
    #[arg(long, default_value_t = DEFAULT_LEN)]
    len: usize,

    /// Seed of the input generator.
    #[arg(long, default_value_t = DEFAULT_SEED)]
    seed: u64,

    /// Number of timed invocations per strategy.
    #[arg(long, default_value = "100")]
    trials: NonZeroUsize,

    /// Number of untimed invocations before timing each strategy.
    #[arg(long, default_value_t = 10)]
    warmup: usize,

    /// Strategy to run, can be repeated. Default to all strategies, in
    /// registration order.
    #[arg(long = "strategy")]
    strategies: Vec<String>,

    /// List the strategies and exit.
    #[arg(long, default_value_t = false)]
    list: bool,
}
