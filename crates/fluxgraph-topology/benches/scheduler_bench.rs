//! Criterion benchmarks for the tick loop on generated FFT graphs.
//!
//! Two axes:
//!
//! - **Bind**: building the scheduler (index resolution, buffer allocation)
//! - **Drain**: ticking an impulse through the whole network
//!
//! Run with: `cargo bench -p fluxgraph-topology -- scheduler/`
#![allow(missing_docs)]

use criterion::{BenchmarkId, Criterion, black_box, criterion_group, criterion_main};
use fluxgraph_core::{Complex, Graph, Scheduler};
use fluxgraph_topology::{dft4x4, radix2};

const SIZES: &[usize] = &[8, 32, 128, 512];

fn feed_impulse(s: &mut Scheduler, n: usize) {
    for i in 0..n {
        let v = if i == 0 { Complex::ONE } else { Complex::ZERO };
        let t = s.token(v);
        let _ = s.emit_from(&format!("src{i}"), "out", t);
    }
}

fn drain(graph: &Graph, n: usize) -> usize {
    let mut s = Scheduler::new(graph.clone()).expect("generated graph binds");
    feed_impulse(&mut s, n);
    let mut fires = 0;
    loop {
        let fired = s.tick(1.0, None);
        fires += fired;
        if fired == 0 && s.total_buffered() == 0 {
            break fires;
        }
    }
}

fn bench_bind(c: &mut Criterion) {
    let mut group = c.benchmark_group("scheduler/bind");
    for &n in SIZES {
        let graph = radix2(n, 0.0).expect("power of two");
        group.bench_with_input(BenchmarkId::new("radix2", n), &graph, |b, g| {
            b.iter(|| Scheduler::new(black_box(g.clone())));
        });
    }
    group.finish();
}

fn bench_drain(c: &mut Criterion) {
    let mut group = c.benchmark_group("scheduler/drain");
    for &n in SIZES {
        let graph = radix2(n, 0.0).expect("power of two");
        group.bench_with_input(BenchmarkId::new("radix2", n), &graph, |b, g| {
            b.iter(|| black_box(drain(g, n)));
        });
    }
    let graph = dft4x4(0.0);
    group.bench_function("dft4x4", |b| b.iter(|| black_box(drain(&graph, 16))));
    group.finish();
}

criterion_group!(benches, bench_bind, bench_drain);
criterion_main!(benches);
