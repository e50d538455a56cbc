//! The timed workloads themselves. Each mirrors one of `nodal`'s criterion
//! benches, but runs as a single ad-hoc pass with human-readable output
//! instead of a statistical harness — useful for a quick "did that change
//! regress anything" check without pulling in criterion's HTML report.

use std::time::{Duration, Instant};

use nodal::{computed, writable, Value};

#[derive(Debug, Clone, Copy)]
pub struct SinkFanoutReport {
    pub subscribers: usize,
    pub updates: usize,
    pub elapsed: Duration,
}

/// Subscribe `subscribers` observers to one writable source, then push
/// `updates` distinct values through it and time the fan-out.
#[must_use]
pub fn sink_fanout(subscribers: usize, updates: usize) -> SinkFanoutReport {
    let source = writable(0_i64);
    let subs: Vec<_> = (0..subscribers)
        .map(|_| source.subscribe(|_: &i64| {}))
        .collect();

    let start = Instant::now();
    for i in 1..=updates {
        source.set(i as i64);
    }
    let elapsed = start.elapsed();

    for sub in &subs {
        sub.unsubscribe();
    }

    SinkFanoutReport {
        subscribers,
        updates,
        elapsed,
    }
}

#[derive(Debug, Clone, Copy)]
pub struct DependencySweepReport {
    pub dependencies: usize,
    pub sweeps: usize,
    pub elapsed: Duration,
}

/// Build a single `computed` summing over `dependencies` writable sources,
/// subscribe to keep it warm, then repeatedly bump the first source and
/// time how long each resulting recompute sweep takes.
#[must_use]
pub fn dependency_sweep(dependencies: usize, sweeps: usize) -> DependencySweepReport {
    let sources: Vec<_> = (0..dependencies).map(|i| writable(i as i64)).collect();
    let sum = {
        let sources = sources.clone();
        computed(move || sources.iter().map(Value::get).sum::<i64>())
    };
    let _sub = sum.subscribe(|_: &i64| {});

    let start = Instant::now();
    for i in 0..sweeps {
        sources[0].set(i as i64);
        sum.validate();
    }
    let elapsed = start.elapsed();

    DependencySweepReport {
        dependencies,
        sweeps,
        elapsed,
    }
}
