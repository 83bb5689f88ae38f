//! End-to-end channel semantics through the `Simulator` API.

use approx::assert_abs_diff_eq;

use drifa_ir::{Bindings, Circuit, Hamiltonian, HamiltonianTerm, PauliString, QubitId};
use drifa_noise::{NoiseModel, NoiseSource};
use drifa_sim::Simulator;

fn z_expectation(circuit: &Circuit, noise: &NoiseSource) -> f64 {
    Simulator::new()
        .with_seed(1)
        .expectation(
            circuit,
            &Hamiltonian::from(HamiltonianTerm::z(0, 1.0)),
            &Bindings::default(),
            noise,
        )
        .unwrap()
}

#[test]
fn certain_bit_flip_inverts_the_outcome() {
    // X then a p=1 bit flip lands back on |0⟩.
    let mut circuit = Circuit::with_size("x", 1);
    circuit.x(QubitId(0)).unwrap();

    let noise = NoiseSource::Model(NoiseModel::bit_flip(1.0, 1).unwrap());
    assert!((z_expectation(&circuit, &noise) - 1.0).abs() < 1e-10);

    let counts = Simulator::new()
        .with_seed(2)
        .sample(&circuit, &Bindings::default(), 100, &noise)
        .unwrap();
    assert_eq!(counts.get(0), 100);
}

#[test]
fn phase_flip_damps_coherence_not_population() {
    let mut circuit = Circuit::with_size("h", 1);
    circuit.h(QubitId(0)).unwrap();
    let h_x = Hamiltonian::from(HamiltonianTerm::x(0, 1.0));

    let sim = Simulator::new();
    let noise = NoiseSource::Model(NoiseModel::phase_flip(0.25, 1).unwrap());

    // ⟨X⟩ on |+⟩ shrinks by (1 - 2p); ⟨Z⟩ stays 0.
    let x = sim
        .expectation(&circuit, &h_x, &Bindings::default(), &noise)
        .unwrap();
    assert!((x - 0.5).abs() < 1e-10);
    assert!(z_expectation(&circuit, &noise).abs() < 1e-10);
}

#[test]
fn depolarizing_scales_bloch_vector() {
    // ⟨Z⟩ after a p depolarizing channel on |1⟩ is -(1 - 4p/3).
    let mut circuit = Circuit::with_size("x", 1);
    circuit.x(QubitId(0)).unwrap();

    for p in [0.0, 0.1, 0.3, 0.75] {
        let noise = NoiseSource::Model(NoiseModel::depolarizing(p, 1).unwrap());
        let expected = -(1.0 - 4.0 * p / 3.0);
        assert_abs_diff_eq!(z_expectation(&circuit, &noise), expected, epsilon = 1e-10);
    }
}

#[test]
fn full_amplitude_damping_relaxes_to_ground() {
    let mut circuit = Circuit::with_size("x", 1);
    circuit.x(QubitId(0)).unwrap();

    let noise = NoiseSource::Model(NoiseModel::amplitude_damp(1.0, 1).unwrap());
    assert!((z_expectation(&circuit, &noise) - 1.0).abs() < 1e-10);
}

#[test]
fn composition_order_changes_the_state() {
    // After X: |1⟩.
    //   amplitude_damp(1) then bit_flip(1):  |1⟩ → |0⟩ → |1⟩, ⟨Z⟩ = -1
    //   bit_flip(1) then amplitude_damp(1):  |1⟩ → |0⟩ → |0⟩, ⟨Z⟩ = +1
    let mut circuit = Circuit::with_size("x", 1);
    circuit.x(QubitId(0)).unwrap();

    let damp_then_flip = NoiseSource::Model(
        NoiseModel::amplitude_damp(1.0, 1).unwrap() + NoiseModel::bit_flip(1.0, 1).unwrap(),
    );
    let flip_then_damp = NoiseSource::Model(
        NoiseModel::bit_flip(1.0, 1).unwrap() + NoiseModel::amplitude_damp(1.0, 1).unwrap(),
    );

    assert_abs_diff_eq!(z_expectation(&circuit, &damp_then_flip), -1.0, epsilon = 1e-10);
    assert_abs_diff_eq!(z_expectation(&circuit, &flip_then_damp), 1.0, epsilon = 1e-10);
}

#[test]
fn noise_level_targets_matching_arity_only() {
    // Level-2 noise must not touch a circuit of single-qubit gates...
    let mut single = Circuit::with_size("x", 1);
    single.x(QubitId(0)).unwrap();
    let level2 = NoiseSource::Model(NoiseModel::bit_flip(1.0, 2).unwrap());
    assert!((z_expectation(&single, &level2) + 1.0).abs() < 1e-10);

    // ...but applies to both operands of a CX.
    let mut two = Circuit::with_size("cx", 2);
    two.x(QubitId(0)).unwrap();
    two.cx(QubitId(0), QubitId(1)).unwrap();

    let h = Hamiltonian::from(HamiltonianTerm::zz(0, 1, 1.0));
    let sim = Simulator::new();
    let noisy = sim
        .expectation(&two, &h, &Bindings::default(), &level2)
        .unwrap();
    // both bits flipped: |11⟩ → |00⟩, parity unchanged
    assert!((noisy - 1.0).abs() < 1e-10);

    let h_single = Hamiltonian::from(HamiltonianTerm::z(0, 1.0));
    let z0 = sim
        .expectation(&two, &h_single, &Bindings::default(), &level2)
        .unwrap();
    assert!((z0 - 1.0).abs() < 1e-10);
}

#[test]
fn combined_damping_matches_sequential_structure() {
    // γ_amp = 1, γ_phase = 0 behaves like pure amplitude damping.
    let mut circuit = Circuit::with_size("x", 1);
    circuit.x(QubitId(0)).unwrap();

    let noise = NoiseSource::Model(NoiseModel::phase_amplitude_damp(1.0, 0.0, 1).unwrap());
    assert!((z_expectation(&circuit, &noise) - 1.0).abs() < 1e-10);
}

#[test]
fn noisy_sampling_shows_leakage() {
    // A p=0.5 bit flip after X spreads outcomes across both basis states.
    let mut circuit = Circuit::with_size("x", 1);
    circuit.x(QubitId(0)).unwrap();

    let noise = NoiseSource::Model(NoiseModel::bit_flip(0.5, 1).unwrap());
    let counts = Simulator::new()
        .with_seed(9)
        .sample(&circuit, &Bindings::default(), 2000, &noise)
        .unwrap();

    assert!(counts.get(0) > 700);
    assert!(counts.get(1) > 700);
}

#[test]
fn noisy_expectation_of_pauli_string_via_density_matrix() {
    let mut circuit = Circuit::with_size("bell", 2);
    circuit.h(QubitId(0)).unwrap();
    circuit.cx(QubitId(0), QubitId(1)).unwrap();

    let sim = Simulator::new();
    let noise = NoiseSource::Model(NoiseModel::depolarizing(0.2, 1).unwrap());
    let rho = sim
        .density_matrix(&circuit, &Bindings::default(), &noise)
        .unwrap();

    assert!((rho.trace() - 1.0).abs() < 1e-10);
    assert!(rho.purity() < 1.0);
    let zz = rho.expectation_pauli(&PauliString::zz([0, 1]));
    assert!(zz < 1.0);
    assert!(zz > 0.0);
}
