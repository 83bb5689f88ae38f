//! Density-matrix simulation engine.
//!
//! Mixed-state evolution for noisy circuits. Unitaries are applied as
//! ρ → U ρ U† through the same controlled 2×2 kernels the statevector
//! engine uses, once over row indices and once (conjugated) over column
//! indices. Noise channels are applied in Kraus form, ρ → Σ K ρ K†.

use num_complex::Complex64;
use rand::Rng;

use drifa_ir::lower::lower_exp_pauli;
use drifa_ir::{Hamiltonian, Instruction, InstructionKind, PauliString, QubitId};
use drifa_noise::KrausOperator;

use crate::counts::Counts;
use crate::error::{SimError, SimResult};
use crate::statevector::{Statevector, control_mask, pauli_matrix, sample_index};

/// A density matrix representing a (possibly mixed) quantum state.
#[derive(Debug, Clone)]
pub struct DensityMatrix {
    /// Row-major 2^n × 2^n matrix.
    data: Vec<Complex64>,
    /// Matrix dimension (2^n).
    dim: usize,
    /// Number of qubits.
    num_qubits: usize,
}

impl DensityMatrix {
    /// Create a new density matrix initialized to |0...0⟩⟨0...0|.
    pub fn new(num_qubits: usize) -> Self {
        let dim = 1usize << num_qubits;
        let mut data = vec![Complex64::new(0.0, 0.0); dim * dim];
        data[0] = Complex64::new(1.0, 0.0);
        Self {
            data,
            dim,
            num_qubits,
        }
    }

    /// The density matrix of a pure state, ρ = |ψ⟩⟨ψ|.
    pub fn from_statevector(sv: &Statevector) -> Self {
        let dim = 1usize << sv.num_qubits();
        let mut data = vec![Complex64::new(0.0, 0.0); dim * dim];
        for row in 0..dim {
            for col in 0..dim {
                data[row * dim + col] = sv.amplitude(row) * sv.amplitude(col).conj();
            }
        }
        Self {
            data,
            dim,
            num_qubits: sv.num_qubits(),
        }
    }

    /// Get the number of qubits.
    pub fn num_qubits(&self) -> usize {
        self.num_qubits
    }

    /// Matrix element ρ[row, col].
    pub fn get(&self, row: usize, col: usize) -> Complex64 {
        self.data[row * self.dim + col]
    }

    /// tr(ρ) — 1.0 for any physical state, within rounding.
    pub fn trace(&self) -> f64 {
        (0..self.dim).map(|i| self.data[i * self.dim + i].re).sum()
    }

    /// tr(ρ²) — 1.0 for pure states, down to 1/2^n for the maximally
    /// mixed state.
    pub fn purity(&self) -> f64 {
        self.data.iter().map(|z| z.norm_sqr()).sum()
    }

    /// Apply an instruction to the density matrix.
    pub fn apply(&mut self, instruction: &Instruction) -> SimResult<()> {
        match &instruction.kind {
            InstructionKind::Gate(gate) => {
                let m = gate.matrix()?;
                let controls = control_mask(&instruction.controls);
                self.apply_unitary(&m, instruction.targets[0].index(), controls);
            }
            InstructionKind::Swap => {
                let controls = control_mask(&instruction.controls);
                self.apply_swap(
                    instruction.targets[0].index(),
                    instruction.targets[1].index(),
                    controls,
                );
            }
            InstructionKind::ExpPauli { pauli, angle } => {
                if !instruction.controls.is_empty() {
                    return Err(SimError::UnsupportedInstruction {
                        name: instruction.name(),
                        reason: "controlled Pauli exponentials are not supported".to_string(),
                    });
                }
                for lowered in lower_exp_pauli(pauli, angle) {
                    self.apply(&lowered)?;
                }
            }
            InstructionKind::Measure => {}
        }
        Ok(())
    }

    /// ρ → U ρ U† for a controlled 2×2 unitary.
    fn apply_unitary(&mut self, m: &[Complex64; 4], qubit: usize, controls: usize) {
        self.apply_left(m, qubit, controls);
        self.apply_right_dagger(m, qubit, controls);
    }

    /// ρ → M ρ (left multiplication only; used for unitaries and for
    /// Pauli expectation traces).
    fn apply_left(&mut self, m: &[Complex64; 4], qubit: usize, controls: usize) {
        let mask = 1usize << qubit;
        for row in 0..self.dim {
            if row & mask == 0 && row & controls == controls {
                let other = row | mask;
                for col in 0..self.dim {
                    let a = self.data[row * self.dim + col];
                    let b = self.data[other * self.dim + col];
                    self.data[row * self.dim + col] = m[0] * a + m[1] * b;
                    self.data[other * self.dim + col] = m[2] * a + m[3] * b;
                }
            }
        }
    }

    /// ρ → ρ M† (right multiplication by the adjoint).
    fn apply_right_dagger(&mut self, m: &[Complex64; 4], qubit: usize, controls: usize) {
        let mask = 1usize << qubit;
        for col in 0..self.dim {
            if col & mask == 0 && col & controls == controls {
                let other = col | mask;
                for row in 0..self.dim {
                    let a = self.data[row * self.dim + col];
                    let b = self.data[row * self.dim + other];
                    self.data[row * self.dim + col] = m[0].conj() * a + m[1].conj() * b;
                    self.data[row * self.dim + other] = m[2].conj() * a + m[3].conj() * b;
                }
            }
        }
    }

    /// Controlled qubit exchange, conjugating rows and columns.
    fn apply_swap(&mut self, q0: usize, q1: usize, controls: usize) {
        let mask0 = 1usize << q0;
        let mask1 = 1usize << q1;
        let pair = |i: usize| (i & !mask0) | mask1;
        // rows
        for row in 0..self.dim {
            if (row & mask0 != 0) && (row & mask1 == 0) && (row & controls == controls) {
                let other = pair(row);
                for col in 0..self.dim {
                    self.data.swap(row * self.dim + col, other * self.dim + col);
                }
            }
        }
        // columns
        for col in 0..self.dim {
            if (col & mask0 != 0) && (col & mask1 == 0) && (col & controls == controls) {
                let other = pair(col);
                for row in 0..self.dim {
                    self.data.swap(row * self.dim + col, row * self.dim + other);
                }
            }
        }
    }

    /// Apply a single-qubit channel to `qubit`: ρ → Σ_i K_i ρ K_i†.
    pub fn apply_kraus(&mut self, operators: &[KrausOperator], qubit: QubitId) {
        let zero = Complex64::new(0.0, 0.0);
        let mut accum = vec![zero; self.data.len()];
        for k in operators {
            let m = [k.get(0, 0), k.get(0, 1), k.get(1, 0), k.get(1, 1)];
            let mut term = self.clone();
            term.apply_left(&m, qubit.index(), 0);
            term.apply_right_dagger(&m, qubit.index(), 0);
            for (acc, t) in accum.iter_mut().zip(&term.data) {
                *acc += t;
            }
        }
        self.data = accum;
    }

    /// tr(ρ·P) for a Pauli string P.
    pub fn expectation_pauli(&self, pauli: &PauliString) -> f64 {
        if pauli.is_identity() {
            return self.trace();
        }
        let mut sigma = self.clone();
        for &(q, op) in pauli.ops() {
            sigma.apply_left(&pauli_matrix(op), q as usize, 0);
        }
        sigma.trace()
    }

    /// tr(ρ·H) for a weighted Pauli sum.
    pub fn expectation(&self, hamiltonian: &Hamiltonian) -> f64 {
        hamiltonian
            .terms()
            .iter()
            .map(|t| t.coeff * self.expectation_pauli(&t.pauli))
            .sum()
    }

    /// Basis-state probabilities: the diagonal of ρ, clamped at zero.
    pub fn probabilities(&self) -> Vec<f64> {
        (0..self.dim)
            .map(|i| self.data[i * self.dim + i].re.max(0.0))
            .collect()
    }

    /// Sample one measurement outcome over all qubits.
    pub fn sample(&self, rng: &mut impl Rng) -> usize {
        sample_index(&self.probabilities(), rng)
    }

    /// Sample a histogram of outcomes over all qubits.
    pub fn sample_counts(&self, shots: u64, rng: &mut impl Rng) -> Counts {
        let probs = self.probabilities();
        let mut counts = Counts::new(self.num_qubits as u32);
        for _ in 0..shots {
            counts.record(sample_index(&probs, rng) as u64);
        }
        counts
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use drifa_ir::Circuit;
    use drifa_noise::NoiseChannel;

    fn run(circuit: &Circuit) -> DensityMatrix {
        let mut rho = DensityMatrix::new(circuit.num_qubits() as usize);
        for inst in circuit.instructions() {
            rho.apply(inst).unwrap();
        }
        rho
    }

    #[test]
    fn test_initial_state() {
        let rho = DensityMatrix::new(2);
        assert!((rho.trace() - 1.0).abs() < 1e-12);
        assert!((rho.purity() - 1.0).abs() < 1e-12);
        assert!((rho.get(0, 0).re - 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_unitary_preserves_purity() {
        let mut circuit = Circuit::with_size("bell", 2);
        circuit.h(QubitId(0)).unwrap();
        circuit.cx(QubitId(0), QubitId(1)).unwrap();

        let rho = run(&circuit);
        assert!((rho.trace() - 1.0).abs() < 1e-10);
        assert!((rho.purity() - 1.0).abs() < 1e-10);
        assert!((rho.get(0, 0).re - 0.5).abs() < 1e-10);
        assert!((rho.get(3, 3).re - 0.5).abs() < 1e-10);
    }

    #[test]
    fn test_matches_statevector_on_unitary_circuits() {
        let mut circuit = Circuit::with_size("mix", 2);
        circuit.h(QubitId(0)).unwrap();
        circuit.ry(0.73, QubitId(1)).unwrap();
        circuit.cx(QubitId(0), QubitId(1)).unwrap();

        let mut sv = Statevector::new(2);
        for inst in circuit.instructions() {
            sv.apply(inst).unwrap();
        }
        let rho = run(&circuit);
        let pure = DensityMatrix::from_statevector(&sv);

        for row in 0..4 {
            for col in 0..4 {
                assert!((rho.get(row, col) - pure.get(row, col)).norm() < 1e-10);
            }
        }
    }

    #[test]
    fn test_full_bit_flip_is_x() {
        let mut rho = DensityMatrix::new(1);
        let kraus = NoiseChannel::bit_flip(1.0).unwrap().kraus_operators();
        rho.apply_kraus(&kraus, QubitId(0));

        assert!((rho.get(1, 1).re - 1.0).abs() < 1e-12);
        assert!((rho.trace() - 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_depolarizing_mixes() {
        // Full depolarizing on |0⟩: ρ = (1/3)(XρX + YρY + ZρZ) → ⟨Z⟩ = -1/3
        let mut rho = DensityMatrix::new(1);
        let kraus = NoiseChannel::depolarizing(1.0).unwrap().kraus_operators();
        rho.apply_kraus(&kraus, QubitId(0));

        assert!((rho.trace() - 1.0).abs() < 1e-12);
        let z = rho.expectation_pauli(&PauliString::z(0));
        assert!((z + 1.0 / 3.0).abs() < 1e-12);
        assert!(rho.purity() < 1.0);
    }

    #[test]
    fn test_amplitude_damp_decays_excited_state() {
        let mut circuit = Circuit::with_size("x", 1);
        circuit.x(QubitId(0)).unwrap();
        let mut rho = run(&circuit);

        let kraus = NoiseChannel::amplitude_damp(1.0).unwrap().kraus_operators();
        rho.apply_kraus(&kraus, QubitId(0));

        // |1⟩ fully relaxes to |0⟩
        assert!((rho.get(0, 0).re - 1.0).abs() < 1e-12);
        assert!((rho.expectation_pauli(&PauliString::z(0)) - 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_phase_damp_kills_coherence() {
        let mut circuit = Circuit::with_size("h", 1);
        circuit.h(QubitId(0)).unwrap();
        let mut rho = run(&circuit);
        assert!((rho.get(0, 1).re - 0.5).abs() < 1e-12);

        let kraus = NoiseChannel::phase_damp(1.0).unwrap().kraus_operators();
        rho.apply_kraus(&kraus, QubitId(0));

        // populations intact, off-diagonals gone
        assert!((rho.get(0, 0).re - 0.5).abs() < 1e-12);
        assert!(rho.get(0, 1).norm() < 1e-12);
        assert!(rho.expectation_pauli(&PauliString::x(0)).abs() < 1e-12);
    }

    #[test]
    fn test_sampling_from_mixed_state() {
        use rand::SeedableRng;
        use rand::rngs::StdRng;

        // Half bit flip on |0⟩ mixes the populations evenly.
        let mut rho = DensityMatrix::new(1);
        let kraus = NoiseChannel::bit_flip(0.5).unwrap().kraus_operators();
        rho.apply_kraus(&kraus, QubitId(0));

        let mut rng = StdRng::seed_from_u64(13);
        let counts = rho.sample_counts(4000, &mut rng);
        assert_eq!(counts.shots(), 4000);
        assert!(counts.get(0) > 1700);
        assert!(counts.get(1) > 1700);
    }

    #[test]
    fn test_trace_preserved_through_channel_sequence() {
        let mut rho = DensityMatrix::new(2);
        let mut circuit = Circuit::with_size("prep", 2);
        circuit.h(QubitId(0)).unwrap();
        circuit.cx(QubitId(0), QubitId(1)).unwrap();
        for inst in circuit.instructions() {
            rho.apply(inst).unwrap();
        }

        for (channel, qubit) in [
            (NoiseChannel::bit_flip(0.3).unwrap(), QubitId(0)),
            (NoiseChannel::phase_amplitude_damp(0.2, 0.1).unwrap(), QubitId(1)),
            (NoiseChannel::depolarizing(0.15).unwrap(), QubitId(0)),
        ] {
            rho.apply_kraus(&channel.kraus_operators(), qubit);
            assert!((rho.trace() - 1.0).abs() < 1e-10);
        }
    }
}
