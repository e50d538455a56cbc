use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion};
use nodal::{writable, Value};

fn fanout(c: &mut Criterion) {
    let mut group = c.benchmark_group("sink_fanout");
    for subscriber_count in [1usize, 8, 64, 512] {
        group.bench_with_input(
            BenchmarkId::from_parameter(subscriber_count),
            &subscriber_count,
            |b, &subscriber_count| {
                let source = writable(0i64);
                let subs: Vec<_> = (0..subscriber_count)
                    .map(|_| source.subscribe(|_: &i64| {}))
                    .collect();
                b.iter(|| {
                    source.update(|v| v + 1);
                });
                drop(subs);
            },
        );
    }
    group.finish();
}

criterion_group!(benches, fanout);
criterion_main!(benches);
