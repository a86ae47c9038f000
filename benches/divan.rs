// Copyright 2024 Google LLC
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// https://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or https://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

use divan::counter::BytesCount;
use divan::{black_box, Bencher};
use lanebench::strategy::{find, ids};
use lanebench::SessionBuilder;

fn main() {
    divan::main();
}

const LENGTHS: &[usize] = &[8 * 1_000, 8 * 10_000, 8 * 100_000];

#[divan::bench(consts = LENGTHS, args = ids())]
fn multiply<const LEN: usize>(bencher: Bencher, id: &str) {
    let strategy = find(id).unwrap();
    let mut session = SessionBuilder {
        len: LEN,
        ..SessionBuilder::default()
    }
    .build();
    session.register(strategy);
    // A strategy that fails validation must never be timed.
    if let Err(e) = session.validate_all() {
        panic!("{e}");
    }

    // Divan owns the timing loop here, in place of `Session::run()`.
    let workload = session.workload_mut();
    bencher
        .counter(BytesCount::of_many::<f32>(3 * LEN))
        .bench_local(|| strategy.apply(black_box(&mut *workload)));
}
