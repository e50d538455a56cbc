use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion};
use nodal::{computed, writable, Value};

/// Measures the cost of one recompute sweep as the number of upstream
/// dependencies a `computed()` touches grows — exercises `DependencySet`'s
/// record/prune/watch path on every iteration.
fn dependency_sweep(c: &mut Criterion) {
    let mut group = c.benchmark_group("dependency_sweep");
    for dep_count in [1usize, 8, 64, 256] {
        group.bench_with_input(
            BenchmarkId::from_parameter(dep_count),
            &dep_count,
            |b, &dep_count| {
                let sources: Vec<_> = (0..dep_count).map(|i| writable(i as i64)).collect();
                let srcs = sources.clone();
                let sum = computed(move || srcs.iter().map(Value::get).sum::<i64>());
                let _sub = sum.subscribe(|_: &i64| {});

                b.iter(|| {
                    sources[0].update(|v| v + 1);
                });
            },
        );
    }
    group.finish();
}

criterion_group!(benches, dependency_sweep);
criterion_main!(benches);
