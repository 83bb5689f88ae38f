//! Benchmarks for noisy sampling and density-matrix evolution.

use criterion::{Criterion, black_box, criterion_group, criterion_main};

use drifa_ir::{Bindings, Circuit, QubitId};
use drifa_noise::{NoiseModel, NoiseSource};
use drifa_sim::Simulator;

fn layered_circuit(n_qubits: u32, layers: usize) -> Circuit {
    let mut circuit = Circuit::with_size("layered", n_qubits);
    for layer in 0..layers {
        for q in 0..n_qubits {
            circuit.ry(0.1 * (layer as f64 + 1.0), QubitId(q)).unwrap();
        }
        for q in 0..n_qubits - 1 {
            circuit.cx(QubitId(q), QubitId(q + 1)).unwrap();
        }
    }
    circuit
}

fn bench_ideal_sampling(c: &mut Criterion) {
    let circuit = layered_circuit(8, 4);
    let sim = Simulator::new().with_seed(1);

    c.bench_function("ideal_sample_8q_1k_shots", |b| {
        b.iter(|| {
            sim.sample(
                black_box(&circuit),
                &Bindings::default(),
                1000,
                &NoiseSource::Ideal,
            )
            .unwrap()
        })
    });
}

fn bench_noisy_density_matrix(c: &mut Criterion) {
    let circuit = layered_circuit(6, 4);
    let sim = Simulator::new().with_seed(1);
    let noise = NoiseSource::Model(
        NoiseModel::depolarizing(0.01, 1).unwrap() + NoiseModel::depolarizing(0.02, 2).unwrap(),
    );

    c.bench_function("noisy_density_matrix_6q", |b| {
        b.iter(|| {
            sim.density_matrix(black_box(&circuit), &Bindings::default(), &noise)
                .unwrap()
        })
    });
}

criterion_group!(benches, bench_ideal_sampling, bench_noisy_density_matrix);
criterion_main!(benches);
