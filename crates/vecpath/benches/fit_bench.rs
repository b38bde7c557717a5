//! Criterion benchmarks for fitting and simplification of digitized strokes.
//! Stroke sizes: n in {20, 60, 200, 1000}.
//! Results: by default under target/criterion.

use criterion::{criterion_group, criterion_main, BatchSize, BenchmarkId, Criterion};
use vecpath::fit::fit_curve;
use vecpath::sample::{draw_stroke, ReplayToken, StrokeCfg};
use vecpath::simplify::simplify_polyline;
use vecpath::{GeomCfg, VectorPath};

fn stroke(n: usize, index: u64) -> Vec<vecpath::Point> {
    let cfg = StrokeCfg {
        count: n,
        ..StrokeCfg::default()
    };
    draw_stroke(cfg, ReplayToken { seed: 42, index })
}

fn bench_fit(c: &mut Criterion) {
    let mut group = c.benchmark_group("fit");
    for &n in &[20usize, 60, 200, 1000] {
        group.bench_with_input(BenchmarkId::new("fit_curve", n), &n, |b, &n| {
            b.iter_batched(
                || stroke(n, 1),
                |pts| {
                    let _ = fit_curve(&pts, 1.0, GeomCfg::default());
                },
                BatchSize::SmallInput,
            )
        });

        group.bench_with_input(BenchmarkId::new("simplify_polyline", n), &n, |b, &n| {
            b.iter_batched(
                || stroke(n, 2),
                |pts| {
                    let _ = simplify_polyline(&pts, 0.5);
                },
                BatchSize::SmallInput,
            )
        });

        group.bench_with_input(BenchmarkId::new("path_simplify", n), &n, |b, &n| {
            b.iter_batched(
                || VectorPath::from_polyline(&stroke(n, 3), false).unwrap(),
                |path| {
                    let _ = path.simplify(0.5);
                },
                BatchSize::SmallInput,
            )
        });
    }
    group.finish();
}

criterion_group!(benches, bench_fit);
criterion_main!(benches);
