// Copyright 2024 Google LLC
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// https://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or https://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use lanebench::{registry, SessionBuilder};
use std::mem::size_of;

const LENGTHS: &[usize] = &[8 * 1_000, 8 * 10_000, 8 * 100_000];

fn multiply(c: &mut Criterion) {
    let mut group = c.benchmark_group("multiply");
    for &len in LENGTHS {
        let mut session = SessionBuilder {
            len,
            ..SessionBuilder::default()
        }
        .build();
        session.register_all(registry());
        // A strategy that fails validation must never be timed.
        if let Err(e) = session.validate_all() {
            panic!("{e}");
        }

        // Two inputs read and one output written per element.
        group.throughput(Throughput::Bytes((3 * len * size_of::<f32>()) as u64));
        // Criterion owns the timing loop here, in place of `Session::run()`.
        for strategy in session.strategies().to_vec() {
            let workload = session.workload_mut();
            group.bench_with_input(
                BenchmarkId::new(strategy.id(), len),
                &strategy,
                |bencher, strategy| bencher.iter(|| strategy.apply(black_box(&mut *workload))),
            );
        }
    }
    group.finish();
}

criterion_group!(benches, multiply);
criterion_main!(benches);
