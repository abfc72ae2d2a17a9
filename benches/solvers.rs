use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};

use poly_lsq::math::{fit_householder, fit_normal_equations};

fn series(m: usize) -> (Vec<f64>, Vec<f64>) {
    let t: Vec<f64> = (1..=m).map(|i| i as f64 / m as f64).collect();
    let y = t.iter().map(|&v| (3.0 * v).sin() + 0.5 * v).collect();
    (t, y)
}

pub fn solvers(c: &mut Criterion) {
    let mut group = c.benchmark_group("poly-fit");
    for m in [100usize, 1_000] {
        let (t, y) = series(m);
        for n in [2usize, 5, 10] {
            group.bench_with_input(BenchmarkId::new(format!("normal-m{m}"), n), &n, |b, &n| {
                b.iter(|| fit_normal_equations(black_box(n), black_box(&t), black_box(&y)))
            });
            group.bench_with_input(BenchmarkId::new(format!("householder-m{m}"), n), &n, |b, &n| {
                b.iter(|| fit_householder(black_box(n), black_box(&t), black_box(&y)))
            });
        }
    }
    group.finish();
}

criterion_group!(benches, solvers);
criterion_main!(benches);
