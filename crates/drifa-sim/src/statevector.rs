//! Statevector simulation engine.
//!
//! Pure-state evolution for noiseless circuits. Every unitary reduces
//! to a controlled 2×2 kernel or a controlled exchange of index pairs;
//! Pauli exponentials are lowered on the fly.

use num_complex::Complex64;
use rand::Rng;

use drifa_ir::lower::lower_exp_pauli;
use drifa_ir::{Hamiltonian, Instruction, InstructionKind, PauliOp, PauliString, QubitId};

use crate::counts::Counts;
use crate::error::{SimError, SimResult};

/// A statevector representing a pure quantum state.
#[derive(Debug, Clone)]
pub struct Statevector {
    /// The state amplitudes (2^n complex numbers).
    amplitudes: Vec<Complex64>,
    /// Number of qubits.
    num_qubits: usize,
}

impl Statevector {
    /// Create a new statevector initialized to |0...0⟩.
    pub fn new(num_qubits: usize) -> Self {
        let size = 1usize << num_qubits;
        let mut amplitudes = vec![Complex64::new(0.0, 0.0); size];
        amplitudes[0] = Complex64::new(1.0, 0.0);
        Self {
            amplitudes,
            num_qubits,
        }
    }

    /// Get the number of qubits.
    pub fn num_qubits(&self) -> usize {
        self.num_qubits
    }

    /// The amplitude of a computational basis state.
    pub fn amplitude(&self, basis_state: usize) -> Complex64 {
        self.amplitudes[basis_state]
    }

    /// The state's norm (1.0 for any unitary evolution of |0…0⟩).
    pub fn norm(&self) -> f64 {
        self.amplitudes
            .iter()
            .map(Complex64::norm_sqr)
            .sum::<f64>()
            .sqrt()
    }

    /// Apply an instruction to the statevector.
    ///
    /// Parameters must be bound; measurements are terminal markers and
    /// leave the state untouched.
    pub fn apply(&mut self, instruction: &Instruction) -> SimResult<()> {
        match &instruction.kind {
            InstructionKind::Gate(gate) => {
                let m = gate.matrix()?;
                let controls = control_mask(&instruction.controls);
                self.apply_single_qubit(&m, instruction.targets[0].index(), controls);
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

    /// Apply a 2×2 matrix to `qubit`, restricted to basis states where
    /// every bit of `controls` is set.
    fn apply_single_qubit(&mut self, m: &[Complex64; 4], qubit: usize, controls: usize) {
        let mask = 1usize << qubit;
        for i in 0..self.amplitudes.len() {
            if i & mask == 0 && i & controls == controls {
                let j = i | mask;
                let a = self.amplitudes[i];
                let b = self.amplitudes[j];
                self.amplitudes[i] = m[0] * a + m[1] * b;
                self.amplitudes[j] = m[2] * a + m[3] * b;
            }
        }
    }

    /// Exchange two qubits, restricted to the control subspace.
    fn apply_swap(&mut self, q0: usize, q1: usize, controls: usize) {
        let mask0 = 1usize << q0;
        let mask1 = 1usize << q1;
        for i in 0..self.amplitudes.len() {
            if (i & mask0 != 0) && (i & mask1 == 0) && (i & controls == controls) {
                let j = (i & !mask0) | mask1;
                self.amplitudes.swap(i, j);
            }
        }
    }

    /// ⟨self|other⟩.
    pub fn inner(&self, other: &Statevector) -> Complex64 {
        self.amplitudes
            .iter()
            .zip(&other.amplitudes)
            .map(|(a, b)| a.conj() * b)
            .sum()
    }

    /// ⟨ψ|P|ψ⟩ for a Pauli string P.
    pub fn expectation_pauli(&self, pauli: &PauliString) -> f64 {
        if pauli.is_identity() {
            return 1.0;
        }
        let mut phi = self.clone();
        for &(q, op) in pauli.ops() {
            let m = pauli_matrix(op);
            phi.apply_single_qubit(&m, q as usize, 0);
        }
        self.inner(&phi).re
    }

    /// ⟨ψ|H|ψ⟩ for a weighted Pauli sum.
    pub fn expectation(&self, hamiltonian: &Hamiltonian) -> f64 {
        hamiltonian
            .terms()
            .iter()
            .map(|t| t.coeff * self.expectation_pauli(&t.pauli))
            .sum()
    }

    /// Basis-state probabilities |ψ_i|².
    pub fn probabilities(&self) -> Vec<f64> {
        self.amplitudes.iter().map(Complex64::norm_sqr).collect()
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

/// Combine control qubits into a bit mask.
pub(crate) fn control_mask(controls: &[QubitId]) -> usize {
    controls.iter().fold(0usize, |m, q| m | (1 << q.index()))
}

/// The 2×2 matrix of a bare Pauli operator.
pub(crate) fn pauli_matrix(op: PauliOp) -> [Complex64; 4] {
    let zero = Complex64::new(0.0, 0.0);
    let one = Complex64::new(1.0, 0.0);
    let i = Complex64::new(0.0, 1.0);
    match op {
        PauliOp::I => [one, zero, zero, one],
        PauliOp::X => [zero, one, one, zero],
        PauliOp::Y => [zero, -i, i, zero],
        PauliOp::Z => [one, zero, zero, -one],
    }
}

/// Draw an index from a probability distribution.
pub(crate) fn sample_index(probs: &[f64], rng: &mut impl Rng) -> usize {
    let r: f64 = rng.r#gen();
    let mut cumulative = 0.0;
    for (i, p) in probs.iter().enumerate() {
        cumulative += p;
        if r < cumulative {
            return i;
        }
    }
    // Fallback for accumulated rounding error.
    probs.len() - 1
}
