use std::time::Duration;

use butterfly::traits::butterfly::Evaluate;
use butterfly::tree::helpers::{charges_fixture, points_fixture};
use butterfly::{ButterflyBuilder, FourierKernel};
use criterion::{criterion_group, criterion_main, Criterion};

extern crate blas_src;
extern crate lapack_src;

fn fourier_2d(c: &mut Criterion) {
    let n_sources = 50000;
    let n_targets = 50000;
    let sources = points_fixture::<f64>(n_sources, 2, None, None, Some(0));
    let targets = points_fixture::<f64>(n_targets, 2, None, None, Some(1));
    let charges = charges_fixture(n_sources, Some(2));

    let mut group = c.benchmark_group("Fourier 2D");
    group
        .sample_size(10)
        .measurement_time(Duration::from_secs(20));

    for order in [4, 6, 8] {
        let mut butterfly = ButterflyBuilder::new()
            .tree(&sources, &targets, 32)
            .unwrap()
            .parameters(&charges, order, FourierKernel::new(2, 16.0))
            .unwrap()
            .build()
            .unwrap();

        group.bench_function(format!("Butterfly, order={order}, N={n_sources}"), |b| {
            b.iter(|| butterfly.evaluate().unwrap())
        });
    }
}

criterion_group!(benches, fourier_2d);
criterion_main!(benches);
