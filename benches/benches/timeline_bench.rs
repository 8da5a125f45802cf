//! # Timeline Benchmarks
//!
//! Measures history push/undo, scheduler dispatch, and full frame replay.
//!
//! Run: `cargo bench --bench timeline_bench`

use criterion::{black_box, criterion_group, criterion_main, Criterion};
use qstep_core::{Circuit, Gate, GateKind};
use qstep_timeline::*;

fn circuit(depth: usize) -> Circuit {
    (0..depth)
        .map(|s| Gate::new(format!("g{s}"), if s % 2 == 0 { GateKind::H } else { GateKind::T }, s % 3, s))
        .collect()
}

/// Benchmark edit history
fn bench_history(c: &mut Criterion) {
    let mut group = c.benchmark_group("history");
    let snapshot = circuit(20);

    group.bench_function("push_past_limit", |b| {
        b.iter(|| {
            let mut history = EditHistory::new();
            for _ in 0..(DEFAULT_MAX_SNAPSHOTS + 10) {
                history.push(&snapshot);
            }
            black_box(history.len())
        })
    });

    group.bench_function("undo_redo_cycle", |b| {
        let mut history = EditHistory::new();
        for _ in 0..DEFAULT_MAX_SNAPSHOTS {
            history.push(&snapshot);
        }
        b.iter(|| {
            while history.undo().is_some() {}
            while history.redo().is_some() {}
        })
    });

    group.finish();
}

/// Benchmark scheduler schedule/cancel/dispatch
fn bench_scheduler(c: &mut Criterion) {
    c.bench_function("scheduler_1000_timers", |b| {
        b.iter(|| {
            let mut scheduler = Scheduler::new();
            let ids: Vec<TimerId> = (0..1000u64).map(|i| scheduler.schedule(i % 97, i)).collect();
            for id in ids.iter().step_by(3) {
                scheduler.cancel(*id);
            }
            black_box(scheduler.drain_until(100).len())
        })
    });
}

/// Benchmark full replay through the session
fn bench_replay(c: &mut Criterion) {
    let config = SessionConfig {
        controller: ControllerConfig {
            num_qubits: 3,
            shots: 256,
            seed: Some(5),
            ..Default::default()
        },
        ..Default::default()
    };
    let gates = circuit(30);

    c.bench_function("replay_30_steps", |b| {
        b.iter(|| {
            let mut session = Session::new(config.clone()).ok()?;
            session.load(gates.clone()).ok()?;
            session.play().ok()?;
            while session.controller().is_playing() {
                session.advance(config.tick_interval).ok()?;
            }
            Some(black_box(session.stats().ticks))
        })
    });
}

criterion_group!(benches, bench_history, bench_scheduler, bench_replay);
criterion_main!(benches);
