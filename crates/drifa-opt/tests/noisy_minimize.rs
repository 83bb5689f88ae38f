//! Variational minimization under noise: the energy floor a channel
//! imposes must show up in the optimized result.

use approx::assert_abs_diff_eq;

use drifa_ir::{Bindings, Circuit, Hamiltonian, HamiltonianTerm, QubitId};
use drifa_noise::{NoiseModel, NoiseSource};
use drifa_opt::{ExpectationValue, GradientDescent, Minimizer, Objective, Spsa};
use drifa_sim::Simulator;

fn single_qubit_objective() -> Objective {
    let mut circuit = Circuit::with_size("ansatz", 1);
    circuit.ry("theta", QubitId(0)).unwrap();
    Objective::from(ExpectationValue::new(
        circuit,
        Hamiltonian::from(HamiltonianTerm::z(0, 1.0)),
    ))
}

fn initial(theta: f64) -> Bindings {
    let mut b = Bindings::default();
    b.insert("theta".to_string(), theta);
    b
}

#[test]
fn depolarizing_noise_raises_the_reachable_minimum() {
    let objective = single_qubit_objective();
    let sim = Simulator::new();
    let optimizer = GradientDescent::new()
        .with_learning_rate(0.3)
        .with_max_iterations(200);

    let ideal = optimizer
        .minimize(&objective, &initial(0.5), &sim, None, &NoiseSource::Ideal)
        .unwrap();
    assert!(ideal.best_energy < -0.999);

    // Depolarizing with probability p contracts ⟨Z⟩ by (1 - 4p/3):
    // the optimum becomes -(1 - 4p/3) instead of -1.
    let p = 0.15;
    let noise = NoiseSource::Model(NoiseModel::depolarizing(p, 1).unwrap());
    let noisy = optimizer
        .minimize(&objective, &initial(0.5), &sim, None, &noise)
        .unwrap();

    let floor = -(1.0 - 4.0 * p / 3.0);
    assert!(noisy.best_energy > ideal.best_energy);
    assert_abs_diff_eq!(noisy.best_energy, floor, epsilon = 1e-3);

    // The optimal angle is unchanged — noise rescales, the argmin stays.
    let theta = noisy.best_params["theta"];
    assert!((theta - std::f64::consts::PI).abs() < 0.1);
}

#[test]
fn amplitude_damping_biases_toward_the_ground_state() {
    // Full relaxation pins the state at |0⟩ regardless of θ: the
    // optimizer cannot push ⟨Z⟩ below +1.
    let objective = single_qubit_objective();
    let sim = Simulator::new();
    let noise = NoiseSource::Model(NoiseModel::amplitude_damp(1.0, 1).unwrap());

    let result = GradientDescent::new()
        .with_max_iterations(50)
        .minimize(&objective, &initial(0.5), &sim, None, &noise)
        .unwrap();
    assert_abs_diff_eq!(result.best_energy, 1.0, epsilon = 1e-9);
}

#[test]
fn spsa_minimizes_a_sampled_noisy_objective() {
    let objective = single_qubit_objective();
    let sim = Simulator::new().with_seed(23);
    let noise = NoiseSource::Model(NoiseModel::depolarizing(0.05, 1).unwrap());

    let result = Spsa::new()
        .with_seed(5)
        .with_max_iterations(120)
        .with_tolerance(0.0)
        .minimize(&objective, &initial(0.8), &sim, Some(400), &noise)
        .unwrap();

    // Floor is -(1 - 4·0.05/3) ≈ -0.933; require clear progress from
    // the sampled start near cos(0.8) ≈ 0.70.
    assert!(result.best_energy < -0.5);
    assert_eq!(result.iterations, 120);
}

#[test]
fn two_qubit_ansatz_under_two_qubit_noise() {
    // Entangling ansatz for H = Z₀ + Z₁ with noisy CX gates. The state
    // cos(a/2)|00⟩ + sin(a/2)|11⟩ gives ⟨Z₀⟩ = ⟨Z₁⟩ = cos a, minimum -2
    // at a = π.
    let mut circuit = Circuit::with_size("ansatz", 2);
    circuit.ry("a", QubitId(0)).unwrap();
    circuit.cx(QubitId(0), QubitId(1)).unwrap();
    let objective = Objective::from(ExpectationValue::new(
        circuit,
        Hamiltonian::from(HamiltonianTerm::z(0, 1.0)) + HamiltonianTerm::z(1, 1.0),
    ));

    let sim = Simulator::new();
    let noise = NoiseSource::Model(NoiseModel::depolarizing(0.1, 2).unwrap());
    let optimizer = GradientDescent::new()
        .with_learning_rate(0.3)
        .with_max_iterations(150);

    let ideal = optimizer
        .minimize(&objective, &initial(0.4), &sim, None, &NoiseSource::Ideal)
        .unwrap();
    let noisy = optimizer
        .minimize(&objective, &initial(0.4), &sim, None, &noise)
        .unwrap();

    assert!(ideal.best_energy < -1.999);
    assert!(noisy.best_energy > ideal.best_energy);
    assert!(noisy.best_energy < -1.5);
}
