//! # State Vector Benchmarks
//!
//! Measures gate application, full simulation with sampling, and Bloch reduction
//! across register sizes.
//!
//! Run: `cargo bench --bench state_bench`

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use qstep_core::*;

fn layered_circuit(num_qubits: usize, depth: usize) -> Circuit {
    let kinds = [GateKind::H, GateKind::T, GateKind::Rx(0.3), GateKind::S];
    (0..depth)
        .flat_map(|step| {
            (0..num_qubits).map(move |q| Gate::new(format!("g{step}_{q}"), kinds[(step + q) % kinds.len()], q, step))
        })
        .collect()
}

/// Benchmark single gate application by register size
fn bench_apply_gate(c: &mut Criterion) {
    let mut group = c.benchmark_group("apply_gate");
    let h = Hadamard.matrix();

    for n in [2usize, 6, 10, 14] {
        let Ok(state) = StateVector::zero(n) else {
            continue;
        };
        group.bench_with_input(BenchmarkId::new("hadamard", n), &n, |b, _| {
            b.iter(|| {
                let mut s = state.clone();
                s.apply_in_place(&h, n / 2).ok();
                black_box(s)
            })
        });
    }

    group.finish();
}

/// Benchmark simulate (evolution + sampling)
fn bench_simulate(c: &mut Criterion) {
    let mut group = c.benchmark_group("simulate");
    let sim = CircuitSimulator::with_config(SimulatorConfig {
        seed: Some(1),
        ..Default::default()
    });

    for n in [2usize, 6, 10] {
        let circuit = layered_circuit(n, 10);
        group.bench_with_input(BenchmarkId::new("depth10_1024shots", n), &circuit, |b, circuit| {
            b.iter(|| black_box(sim.simulate(circuit, n, 1024)))
        });
    }

    group.finish();
}

/// Benchmark Bloch reduction
fn bench_bloch(c: &mut Criterion) {
    let gates = layered_circuit(1, 50);

    c.bench_function("reduce_single_qubit_50", |b| {
        b.iter(|| black_box(reduce_single_qubit(gates.gates())))
    });
}

criterion_group!(benches, bench_apply_gate, bench_simulate, bench_bloch);
criterion_main!(benches);
