//! Criterion benchmarks for full simulation runs.

use std::hint::black_box;

use criterion::{criterion_group, criterion_main, Criterion};
use hopnet_bench::{reference_profile, stress_profile};
use hopnet_core::ChargeState;
use hopnet_engine::Simulator;

fn bench_100_hops_reference(c: &mut Criterion) {
    let config = reference_profile(42).unwrap();
    let layout = config.network.layout();
    let mut sim = Simulator::new(config).unwrap();
    let mut state = ChargeState::new(layout);

    c.bench_function("100_hops_reference", |b| {
        b.iter(|| {
            state.reset();
            let report = sim.run(&mut state, 100).unwrap();
            black_box(&report);
        });
    });
}

fn bench_100_hops_stress(c: &mut Criterion) {
    let config = stress_profile(42).unwrap();
    let layout = config.network.layout();
    let mut sim = Simulator::new(config).unwrap();
    let mut state = ChargeState::new(layout);

    c.bench_function("100_hops_stress", |b| {
        b.iter(|| {
            state.reset();
            let report = sim.run(&mut state, 100).unwrap();
            black_box(&report);
        });
    });
}

fn bench_construct_and_run_reference(c: &mut Criterion) {
    c.bench_function("construct_and_run_reference", |b| {
        b.iter(|| {
            let config = reference_profile(42).unwrap();
            let mut state = ChargeState::new(config.network.layout());
            let report = hopnet_engine::simulate(config, &mut state, 1000).unwrap();
            black_box(&report);
        });
    });
}

criterion_group!(
    benches,
    bench_100_hops_reference,
    bench_100_hops_stress,
    bench_construct_and_run_reference
);
criterion_main!(benches);
